//! Plugin registration.
//!
//! Attaches the update guard and the resave guard as pre-operation hooks on
//! a host's schema. The host owns the hook mechanism through
//! [`HookRegistry`]; a hook returning is its completion signal.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use immutable_fields_schema::SchemaTree;

use crate::document::Document;
use crate::options::GuardOptions;
use crate::report::GuardReport;
use crate::resave::guard_resave_with;
use crate::update::guard_update_with;
use crate::PluginError;

/// Mutation entry points a guard can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operation {
    /// Whole-object (replace-style) update.
    #[serde(rename = "update")]
    Update,
    #[serde(rename = "updateOne")]
    UpdateOne,
    #[serde(rename = "updateMany")]
    UpdateMany,
    #[serde(rename = "findOneAndUpdate")]
    FindOneAndUpdate,
    #[serde(rename = "save")]
    Save,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Update,
        Operation::UpdateOne,
        Operation::UpdateMany,
        Operation::FindOneAndUpdate,
        Operation::Save,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Update => "update",
            Operation::UpdateOne => "updateOne",
            Operation::UpdateMany => "updateMany",
            Operation::FindOneAndUpdate => "findOneAndUpdate",
            Operation::Save => "save",
        }
    }

    /// True for the query-style operations that carry an update payload.
    pub fn is_update(self) -> bool {
        !matches!(self, Operation::Save)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| PluginError::UnknownOperation(s.to_string()))
    }
}

/// Runs before an update executes, with the pending payload.
pub type UpdateHook = Arc<dyn Fn(&mut Value) + Send + Sync>;

/// Runs before a document is saved, with the document itself.
pub type SaveHook = Arc<dyn Fn(&mut dyn Document) + Send + Sync>;

/// The host side of registration: somewhere to attach pre-operation hooks.
pub trait HookRegistry {
    fn pre_update(&mut self, operation: Operation, hook: UpdateHook);
    fn pre_save(&mut self, hook: SaveHook);
}

/// Immutable-field protection for one schema.
///
/// Cheap to clone; clones share the schema tree and options.
#[derive(Debug, Clone)]
pub struct ImmutableFields {
    schema: Arc<SchemaTree>,
    options: Arc<GuardOptions>,
}

impl ImmutableFields {
    pub fn new(schema: impl Into<Arc<SchemaTree>>) -> Self {
        Self::with_options(schema, GuardOptions::default())
    }

    pub fn with_options(schema: impl Into<Arc<SchemaTree>>, options: GuardOptions) -> Self {
        Self {
            schema: schema.into(),
            options: Arc::new(options),
        }
    }

    /// Build from a JSON schema descriptor.
    pub fn from_descriptor(descriptor: &Value) -> Result<Self, PluginError> {
        Ok(Self::new(SchemaTree::from_descriptor(descriptor)?))
    }

    pub fn schema(&self) -> &SchemaTree {
        &self.schema
    }

    pub fn options(&self) -> &GuardOptions {
        &self.options
    }

    pub fn guard_update(&self, payload: &mut Value) -> GuardReport {
        guard_update_with(payload, &self.schema, &self.options)
    }

    /// Guard a save; a no-op for new documents.
    pub fn guard_save(&self, doc: &mut dyn Document) -> GuardReport {
        guard_resave_with(doc, &self.schema, &self.options)
    }

    /// Attach the guards to every configured entry point.
    pub fn register<R: HookRegistry + ?Sized>(&self, registry: &mut R) {
        for operation in self.options.operations.iter().copied() {
            if operation.is_update() {
                let plugin = self.clone();
                registry.pre_update(
                    operation,
                    Arc::new(move |payload: &mut Value| {
                        plugin.guard_update(payload);
                    }),
                );
            } else {
                let plugin = self.clone();
                registry.pre_save(Arc::new(move |doc: &mut dyn Document| {
                    plugin.guard_save(doc);
                }));
            }
            tracing::trace!(operation = %operation, "registered immutable-fields hook");
        }
    }
}

/// In-memory hook registry: stores hooks per operation and runs them in
/// registration order.
#[derive(Default)]
pub struct PreHooks {
    update: BTreeMap<Operation, Vec<UpdateHook>>,
    save: Vec<SaveHook>,
}

impl PreHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run_update(&self, operation: Operation, payload: &mut Value) {
        for hook in self.update.get(&operation).into_iter().flatten() {
            hook(&mut *payload);
        }
    }

    pub fn run_save(&self, doc: &mut dyn Document) {
        for hook in &self.save {
            hook(&mut *doc);
        }
    }

    pub fn update_hook_count(&self, operation: Operation) -> usize {
        self.update.get(&operation).map_or(0, Vec::len)
    }

    pub fn save_hook_count(&self) -> usize {
        self.save.len()
    }
}

impl HookRegistry for PreHooks {
    fn pre_update(&mut self, operation: Operation, hook: UpdateHook) {
        self.update.entry(operation).or_default().push(hook);
    }

    fn pre_save(&mut self, hook: SaveHook) {
        self.save.push(hook);
    }
}

impl fmt::Debug for PreHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let update: BTreeMap<&str, usize> = self
            .update
            .iter()
            .map(|(op, hooks)| (op.as_str(), hooks.len()))
            .collect();
        f.debug_struct("PreHooks")
            .field("update", &update)
            .field("save", &self.save.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_names_roundtrip() {
        for op in Operation::ALL {
            assert_eq!(op.as_str().parse::<Operation>().unwrap(), op);
            assert_eq!(serde_json::to_value(op).unwrap(), json!(op.as_str()));
        }
        assert_eq!(
            "deleteOne".parse::<Operation>(),
            Err(PluginError::UnknownOperation("deleteOne".to_string()))
        );
    }

    #[test]
    fn test_register_all_operations() {
        let plugin = ImmutableFields::from_descriptor(&json!({
            "propA": { "type": "String", "immutable": true }
        }))
        .unwrap();
        let mut hooks = PreHooks::new();
        plugin.register(&mut hooks);

        for op in Operation::ALL.into_iter().filter(|op| op.is_update()) {
            assert_eq!(hooks.update_hook_count(op), 1, "missing hook for {op}");
        }
        assert_eq!(hooks.save_hook_count(), 1);
        assert_eq!(hooks.update_hook_count(Operation::Save), 0);
    }

    #[test]
    fn test_register_subset() {
        let schema = SchemaTree::from_descriptor(&json!({ "propA": "String" })).unwrap();
        let options = GuardOptions {
            operations: vec![Operation::UpdateMany],
            ..GuardOptions::default()
        };
        let mut hooks = PreHooks::new();
        ImmutableFields::with_options(schema, options).register(&mut hooks);

        assert_eq!(hooks.update_hook_count(Operation::UpdateMany), 1);
        assert_eq!(hooks.update_hook_count(Operation::UpdateOne), 0);
        assert_eq!(hooks.save_hook_count(), 0);
    }

    #[test]
    fn test_invalid_descriptor_is_reported() {
        let err = ImmutableFields::from_descriptor(&json!("String")).unwrap_err();
        assert!(matches!(err, PluginError::Schema(_)));
    }
}
