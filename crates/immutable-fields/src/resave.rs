//! Document resave guard.
//!
//! Before an existing document is saved again, walk its current field tree
//! alongside the schema and make sure no immutable field ends up in the
//! write set. New documents are not guarded: any initial value is allowed.

use serde_json::{Map, Value};

use immutable_fields_path::{is_within, FieldPath};
use immutable_fields_schema::{ObjectNode, SchemaNode, SchemaTree};

use crate::document::Document;
use crate::options::{GuardOptions, RollbackPolicy};
use crate::report::GuardReport;

/// Guard a document about to be re-saved, with default options.
///
/// Returns the immutable fields that were rolled back and unmarked.
pub fn guard_resave(doc: &mut dyn Document, schema: &SchemaTree) -> GuardReport {
    guard_resave_with(doc, schema, &GuardOptions::default())
}

/// Guard a document about to be re-saved, rolling back per `options.rollback`.
pub fn guard_resave_with(
    doc: &mut dyn Document,
    schema: &SchemaTree,
    options: &GuardOptions,
) -> GuardReport {
    if doc.is_new() {
        return GuardReport::default();
    }
    let snapshot = doc.to_object();
    let mut walker = ResaveWalker {
        doc,
        rollback: options.rollback,
        path: FieldPath::new(),
        report: GuardReport::default(),
    };
    walker.walk(&snapshot, schema.root(), false);
    walker.report
}

struct ResaveWalker<'a> {
    doc: &'a mut dyn Document,
    rollback: RollbackPolicy,
    /// Accumulated path from the root; pushed before a field, popped after.
    path: FieldPath,
    report: GuardReport,
}

impl ResaveWalker<'_> {
    fn walk(&mut self, fields: &Map<String, Value>, node: &ObjectNode, locked: bool) {
        for (name, value) in fields {
            let child = node.field(name);
            // undeclared fields are only protected by a locked ancestor
            if child.is_none() && !locked {
                continue;
            }
            self.path.push(name.as_str());

            match (value, child) {
                (Value::Object(nested), Some(SchemaNode::Object(child_node))) => {
                    let locked = locked || child_node.immutable;
                    self.walk(nested, child_node, locked);
                    let dotted = self.path.to_dotted();
                    if locked {
                        self.doc.unmark_subtree(&dotted);
                    } else {
                        // covers hosts that track changes at container granularity
                        self.doc.unmark_modified(&dotted);
                    }
                }
                (_, None) => self.roll_back(None),
                (_, Some(child)) if locked || child.immutable() => self.roll_back(Some(child)),
                (Value::Array(_), Some(child)) if child.is_array() && child.has_immutable() => {
                    self.guard_elements(value, child)
                }
                _ => {}
            }

            self.path.pop();
        }
    }

    /// Restore a protected field and drop it, and anything recorded beneath
    /// it, from the changed-list. Runs whether or not the field was actually
    /// changed.
    fn roll_back(&mut self, node: Option<&SchemaNode>) {
        let segments = self.path.as_slice();
        let restored = match self.rollback {
            RollbackPolicy::RestorePersisted => self.doc.persisted(segments),
            RollbackPolicy::ResetArrays => None,
        };
        let is_array = node.is_some_and(SchemaNode::is_array);
        let replacement = restored.or_else(|| is_array.then(|| Value::Array(Vec::new())));

        let dotted = self.path.to_dotted();
        if let Some(value) = replacement {
            if let Err(err) = self.doc.set(segments, value) {
                tracing::warn!(path = %dotted, error = %err, "could not roll back immutable field");
            }
        }
        self.doc.unmark_subtree(&dotted);
        tracing::debug!(path = %dotted, "suppressed write to immutable field");
        self.report.record(None, dotted);
    }

    /// A mutable array whose elements carry immutable fields is written as a
    /// unit, so the locked element fields are put back to their loaded values
    /// and the rest of the change goes through.
    fn guard_elements(&mut self, current: &Value, node: &SchemaNode) {
        let dotted = self.path.to_dotted();
        let changed = self
            .doc
            .changed_paths()
            .iter()
            .any(|p| is_within(p, &dotted) || is_within(&dotted, p));
        if !changed {
            return;
        }

        let Some(persisted) = self.doc.persisted(self.path.as_slice()) else {
            // without the loaded value the locked fields cannot be told apart
            self.doc.unmark_subtree(&dotted);
            tracing::debug!(path = %dotted, "suppressed write to array with immutable element fields");
            self.report.record(None, dotted);
            return;
        };

        let mut patched = current.clone();
        let mut restored = Vec::new();
        let mut path = self.path.clone();
        restore_locked(&mut patched, &persisted, node, &mut path, &mut restored);
        if restored.is_empty() {
            return;
        }
        if let Err(err) = self.doc.set(self.path.as_slice(), patched) {
            tracing::warn!(path = %dotted, error = %err, "could not restore immutable element fields");
            return;
        }
        for path in restored {
            tracing::debug!(path = %path, "restored immutable element field");
            self.report.record(None, path);
        }
    }
}

/// Copy the loaded value of every immutable field under `node` back into
/// `current`, pairing array elements by index. Elements with no loaded
/// counterpart are new and keep their initial values.
fn restore_locked(
    current: &mut Value,
    persisted: &Value,
    node: &SchemaNode,
    path: &mut FieldPath,
    restored: &mut Vec<String>,
) {
    if node.immutable() {
        if current != persisted {
            *current = persisted.clone();
            restored.push(path.to_dotted());
        }
        return;
    }
    match (node, current, persisted) {
        (SchemaNode::Object(obj), Value::Object(cur), Value::Object(old)) => {
            for (name, child) in &obj.fields {
                path.push(name.as_str());
                match old.get(name) {
                    Some(old_child) => {
                        if let Some(cur_child) = cur.get_mut(name) {
                            restore_locked(cur_child, old_child, child, path, restored);
                        } else if child.immutable() {
                            cur.insert(name.clone(), old_child.clone());
                            restored.push(path.to_dotted());
                        }
                    }
                    None => {
                        if child.immutable() && cur.remove(name).is_some() {
                            restored.push(path.to_dotted());
                        }
                    }
                }
                path.pop();
            }
        }
        (SchemaNode::Array(arr), Value::Array(cur), Value::Array(old)) => {
            let Some(element) = arr.element.as_deref() else {
                return;
            };
            for (idx, (cur_el, old_el)) in cur.iter_mut().zip(old).enumerate() {
                path.push(idx.to_string());
                restore_locked(cur_el, old_el, element, path, restored);
                path.pop();
            }
        }
        _ => {}
    }
}
