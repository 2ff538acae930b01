//! Update-payload guard.
//!
//! Prunes a pending bulk update so that no remaining key targets an
//! immutable field. The payload may be a whole replacement object, a
//! mapping of dotted paths, or a mapping of operator clauses (`$set`,
//! `$inc`, ...) holding either of those. Deletion is shallow: once a key
//! resolves to a protected target its whole value is dropped, so an
//! immutable array can never be partially edited through a bulk update.

use serde_json::{Map, Value};

use immutable_fields_path::{is_dotted, split_path, FieldPath};
use immutable_fields_schema::{is_immutable, ObjectNode, SchemaNode, SchemaTree};

use crate::options::GuardOptions;
use crate::report::GuardReport;

/// Guard an update payload in place with default options.
///
/// Returns the keys that were dropped.
pub fn guard_update(payload: &mut Value, schema: &SchemaTree) -> GuardReport {
    guard_update_with(payload, schema, &GuardOptions::default())
}

/// Guard an update payload in place; `options` picks the operator prefix
/// and the exempt operators.
pub fn guard_update_with(
    payload: &mut Value,
    schema: &SchemaTree,
    options: &GuardOptions,
) -> GuardReport {
    let mut report = GuardReport::default();
    let Value::Object(map) = payload else {
        return report;
    };

    guard_operators(map, schema, options, &mut report);
    // whatever is left at the top level is a whole-object update
    guard_fields(map, schema.root(), &mut FieldPath::new(), None, &mut report);
    report
}

fn guard_operators(
    map: &mut Map<String, Value>,
    schema: &SchemaTree,
    options: &GuardOptions,
    report: &mut GuardReport,
) {
    let operators: Vec<String> = map
        .keys()
        .filter(|key| options.is_operator(key))
        .cloned()
        .collect();

    for operator in operators {
        if options.is_exempt(&operator) {
            tracing::trace!(operator = %operator, "operator exempt from immutability guard");
            continue;
        }
        // operators do not shift schema context: clauses start at the root
        let Some(Value::Object(clause)) = map.get_mut(&operator) else {
            continue;
        };
        let before = report.len();
        guard_fields(
            clause,
            schema.root(),
            &mut FieldPath::new(),
            Some(&operator),
            report,
        );
        if options.is_rename(&operator) {
            guard_rename_targets(clause, schema, &operator, report);
        }
        if clause.is_empty() && report.len() > before {
            tracing::debug!(operator = %operator, "dropping emptied operator clause");
            map.remove(&operator);
        }
    }
}

/// A rename clause maps source fields to destination paths; a destination
/// that is immutable would be overwritten by the move.
fn guard_rename_targets(
    clause: &mut Map<String, Value>,
    schema: &SchemaTree,
    operator: &str,
    report: &mut GuardReport,
) {
    let protected: Vec<(String, String)> = clause
        .iter()
        .filter_map(|(key, target)| {
            let target = target.as_str()?;
            schema
                .is_immutable_path(&split_path(target))
                .then(|| (key.clone(), target.to_string()))
        })
        .collect();

    for (key, target) in protected {
        clause.remove(&key);
        tracing::debug!(path = %target, operator = %operator, "dropping rename onto immutable field");
        report.record(Some(operator), target);
    }
}

fn guard_fields(
    fields: &mut Map<String, Value>,
    node: &ObjectNode,
    prefix: &mut FieldPath,
    operator: Option<&str>,
    report: &mut GuardReport,
) {
    let keys: Vec<String> = fields.keys().cloned().collect();

    for key in keys {
        if is_dotted(&key) {
            let segments = split_path(&key);
            let protected = segments
                .split_first()
                .and_then(|(head, rest)| node.field(head).map(|child| is_immutable(child, rest)))
                .unwrap_or(false);
            if protected {
                drop_key(fields, &key, prefix, operator, report);
            }
            continue;
        }

        // unknown keys are outside the schema's jurisdiction
        let Some(child) = node.field(&key) else {
            continue;
        };
        if child.immutable() {
            drop_key(fields, &key, prefix, operator, report);
            continue;
        }

        if let (Some(Value::Object(nested)), SchemaNode::Object(child_node)) =
            (fields.get_mut(&key), child)
        {
            let before = report.len();
            prefix.push(key.as_str());
            guard_fields(nested, child_node, prefix, operator, report);
            prefix.pop();
            // never hand the store an empty replacement of a partly protected object
            if nested.is_empty() && report.len() > before {
                fields.remove(&key);
            }
        }
    }
}

fn drop_key(
    fields: &mut Map<String, Value>,
    key: &str,
    prefix: &FieldPath,
    operator: Option<&str>,
    report: &mut GuardReport,
) {
    fields.remove(key);
    let path = if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    };
    tracing::debug!(path = %path, operator = ?operator, "dropping update to immutable field");
    report.record(operator, path);
}
