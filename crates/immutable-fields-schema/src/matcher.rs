//! Immutable-path matching.
//!
//! Decides whether a path, or any ancestor of it, is marked immutable in a
//! schema tree. An immutable marker on a container wins over anything
//! declared beneath it.

use immutable_fields_path::is_positional;

use crate::schema::{SchemaNode, SchemaTree};

/// Check whether the descendant of `node` named by `segments` is immutable.
///
/// `node` itself counts as an ancestor: if it is immutable the answer is
/// `true` whatever the segments say. Paths that leave the declared schema,
/// or that descend through a node with no children of the requested kind,
/// are not immutable.
///
/// # Example
///
/// ```
/// use immutable_fields_schema::{is_immutable, SchemaTree};
/// use immutable_fields_path::split_path;
/// use serde_json::json;
///
/// let tree = SchemaTree::from_descriptor(&json!({
///     "levelA": { "levelB": {
///         "levelC1": { "type": "String", "immutable": true },
///         "levelC2": "String"
///     } }
/// }))
/// .unwrap();
///
/// let level_a = tree.field("levelA").unwrap();
/// assert!(is_immutable(level_a, &split_path("levelB.levelC1")));
/// assert!(!is_immutable(level_a, &split_path("levelB.levelC2")));
/// assert!(!is_immutable(level_a, &split_path("levelB.missing")));
/// ```
pub fn is_immutable(node: &SchemaNode, segments: &[String]) -> bool {
    if node.immutable() {
        return true;
    }
    let Some((head, rest)) = segments.split_first() else {
        return false;
    };
    match node {
        SchemaNode::Object(obj) => match obj.field(head) {
            Some(child) => is_immutable(child, rest),
            None => false,
        },
        SchemaNode::Array(arr) => match &arr.element {
            Some(element) if is_positional(head) => is_immutable(element, rest),
            _ => false,
        },
        SchemaNode::Scalar(_) => false,
    }
}

impl SchemaTree {
    /// Check whether a full path from the root is immutable.
    ///
    /// A path whose first segment is not a declared field is not immutable.
    pub fn is_immutable_path(&self, segments: &[String]) -> bool {
        let Some((head, rest)) = segments.split_first() else {
            return false;
        };
        self.field(head)
            .map(|node| is_immutable(node, rest))
            .unwrap_or(false)
    }
}
