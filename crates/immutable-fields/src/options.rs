//! Guard configuration.

use serde::{Deserialize, Serialize};

use crate::plugin::Operation;

/// What the resave guard writes back into an immutable field before
/// clearing its modified marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RollbackPolicy {
    /// Immutable arrays are reset to `[]`; other immutable fields keep their
    /// in-memory value and only the write is suppressed.
    #[default]
    ResetArrays,
    /// Immutable fields are restored to the value the document was loaded
    /// with. Falls back to `ResetArrays` when the host has no loaded value.
    RestorePersisted,
}

/// Options shared by both guards and the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GuardOptions {
    /// Prefix of store-level update operators (`$set`, `$inc`, ...).
    pub operator_prefix: char,
    /// Operators whose clauses pass through unguarded.
    pub exempt_operators: Vec<String>,
    pub rollback: RollbackPolicy,
    /// Entry points the plugin hooks.
    pub operations: Vec<Operation>,
}

impl Default for GuardOptions {
    fn default() -> Self {
        Self {
            operator_prefix: '$',
            exempt_operators: Vec::new(),
            rollback: RollbackPolicy::default(),
            operations: Operation::ALL.to_vec(),
        }
    }
}

impl GuardOptions {
    /// True if `key` names a store-level update operator.
    pub fn is_operator(&self, key: &str) -> bool {
        key.starts_with(self.operator_prefix)
    }

    /// True if the operator's clause passes through unguarded.
    pub fn is_exempt(&self, operator: &str) -> bool {
        self.exempt_operators.iter().any(|op| op == operator)
    }

    /// True if the operator moves fields to the paths given as its values.
    pub fn is_rename(&self, operator: &str) -> bool {
        operator.strip_prefix(self.operator_prefix) == Some("rename")
    }

    /// True if the plugin attaches a hook to `operation`.
    pub fn hooks(&self, operation: Operation) -> bool {
        self.operations.contains(&operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = GuardOptions::default();
        assert!(options.is_operator("$set"));
        assert!(!options.is_operator("propA"));
        assert!(!options.is_exempt("$setOnInsert"));
        assert!(options.is_rename("$rename"));
        assert!(!options.is_rename("rename"));
        assert_eq!(options.rollback, RollbackPolicy::ResetArrays);
        for op in Operation::ALL {
            assert!(options.hooks(op));
        }
    }

    #[test]
    fn test_deserialize_partial() {
        let options: GuardOptions = serde_json::from_value(json!({
            "exemptOperators": ["$setOnInsert"],
            "rollback": "restorePersisted",
            "operations": ["updateOne", "save"]
        }))
        .unwrap();

        assert_eq!(options.operator_prefix, '$');
        assert!(options.is_exempt("$setOnInsert"));
        assert_eq!(options.rollback, RollbackPolicy::RestorePersisted);
        assert!(options.hooks(Operation::UpdateOne));
        assert!(options.hooks(Operation::Save));
        assert!(!options.hooks(Operation::UpdateMany));
    }
}
