use indexmap::IndexMap;

/// A typed leaf holding a single value (string, number, date, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarNode {
    /// Type name as written in the descriptor. Informational only.
    pub type_name: String,
    pub immutable: bool,
}

/// A typed leaf holding a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayNode {
    /// Shape of each element, when the descriptor declares one.
    pub element: Option<Box<SchemaNode>>,
    pub immutable: bool,
}

/// A nested sub-object: a mapping of further field nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectNode {
    pub fields: IndexMap<String, SchemaNode>,
    /// Applies to the whole subtree.
    pub immutable: bool,
}

impl ObjectNode {
    pub fn field(&self, name: &str) -> Option<&SchemaNode> {
        self.fields.get(name)
    }
}

/// A node of the schema definition tree.
///
/// The leaf/sub-object distinction is resolved once, when the tree is
/// built, so traversals never have to inspect descriptor shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    Scalar(ScalarNode),
    Array(ArrayNode),
    Object(ObjectNode),
}

impl SchemaNode {
    /// Returns the "kind" string identifier for this node.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// The node's own immutability marker.
    pub fn immutable(&self) -> bool {
        match self {
            Self::Scalar(s) => s.immutable,
            Self::Array(s) => s.immutable,
            Self::Object(s) => s.immutable,
        }
    }

    pub fn set_immutable(&mut self, immutable: bool) {
        match self {
            Self::Scalar(s) => s.immutable = immutable,
            Self::Array(s) => s.immutable = immutable,
            Self::Object(s) => s.immutable = immutable,
        }
    }

    /// True if this node or anything declared beneath it is immutable.
    pub fn has_immutable(&self) -> bool {
        if self.immutable() {
            return true;
        }
        match self {
            Self::Scalar(_) => false,
            Self::Array(arr) => arr.element.as_deref().is_some_and(SchemaNode::has_immutable),
            Self::Object(obj) => obj.fields.values().any(SchemaNode::has_immutable),
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    pub fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

/// The root of a schema definition tree.
///
/// Built once and read-only afterwards; share it behind an `Arc` between
/// every hook that guards the same schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaTree {
    root: ObjectNode,
}

impl SchemaTree {
    pub fn new(fields: IndexMap<String, SchemaNode>) -> Self {
        Self {
            root: ObjectNode {
                fields,
                immutable: false,
            },
        }
    }

    pub fn root(&self) -> &ObjectNode {
        &self.root
    }

    /// Top-level field by name.
    pub fn field(&self, name: &str) -> Option<&SchemaNode> {
        self.root.field(name)
    }
}
