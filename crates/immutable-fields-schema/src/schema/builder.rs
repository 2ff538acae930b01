//! Schema builder.
//!
//! Provides a fluent API for constructing schema trees in code, as an
//! alternative to parsing a descriptor.

use indexmap::IndexMap;

use super::schema::*;

/// Builder for constructing schema nodes.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder;

impl SchemaBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn scalar(&self, type_name: impl Into<String>) -> SchemaNode {
        SchemaNode::Scalar(ScalarNode {
            type_name: type_name.into(),
            immutable: false,
        })
    }

    pub fn str(&self) -> SchemaNode {
        self.scalar("String")
    }

    pub fn num(&self) -> SchemaNode {
        self.scalar("Number")
    }

    pub fn array(&self, element: SchemaNode) -> SchemaNode {
        SchemaNode::Array(ArrayNode {
            element: Some(Box::new(element)),
            immutable: false,
        })
    }

    pub fn object<K, I>(&self, fields: I) -> SchemaNode
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, SchemaNode)>,
    {
        SchemaNode::Object(ObjectNode {
            fields: collect_fields(fields),
            immutable: false,
        })
    }

    /// Mark a node immutable.
    pub fn immutable(&self, mut node: SchemaNode) -> SchemaNode {
        node.set_immutable(true);
        node
    }

    pub fn tree<K, I>(&self, fields: I) -> SchemaTree
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, SchemaNode)>,
    {
        SchemaTree::new(collect_fields(fields))
    }
}

fn collect_fields<K, I>(fields: I) -> IndexMap<String, SchemaNode>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, SchemaNode)>,
{
    fields.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_nested_tree() {
        let s = SchemaBuilder::new();
        let tree = s.tree([
            (
                "levelA",
                s.object([(
                    "levelB",
                    s.object([("levelC1", s.immutable(s.str())), ("levelC2", s.str())]),
                )]),
            ),
            ("arr", s.immutable(s.array(s.object([("item", s.str())])))),
        ]);

        let level_b = tree
            .field("levelA")
            .and_then(SchemaNode::as_object)
            .and_then(|a| a.field("levelB"))
            .and_then(SchemaNode::as_object)
            .expect("levelB is an object");
        assert!(level_b.field("levelC1").unwrap().immutable());
        assert!(!level_b.field("levelC2").unwrap().immutable());
        assert!(tree.field("arr").unwrap().is_array());
    }
}
