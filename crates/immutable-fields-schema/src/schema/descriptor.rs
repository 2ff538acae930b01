//! Descriptor parsing.
//!
//! A descriptor is the declarative JSON form of a schema:
//!
//! ```text
//! {
//!   "propA": { "type": "String", "immutable": true },
//!   "propB": "Number",
//!   "arr":   { "type": [{ "item": "String" }], "immutable": true },
//!   "levelA": { "immutable": true, "levelB": { "levelC": "String" } }
//! }
//! ```
//!
//! A mapping carrying the type key is a typed leaf; a mapping without it is
//! a sub-object whose `immutable` key covers the whole subtree.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use immutable_fields_path::FieldPath;

use super::schema::*;
use crate::SchemaError;

const IMMUTABLE_KEY: &str = "immutable";

/// Options controlling how descriptors are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchemaOptions {
    /// Key that marks a mapping as a typed leaf.
    pub type_key: String,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            type_key: "type".to_string(),
        }
    }
}

impl SchemaTree {
    /// Build a tree from a descriptor using default options.
    ///
    /// # Example
    ///
    /// ```
    /// use immutable_fields_schema::SchemaTree;
    /// use serde_json::json;
    ///
    /// let tree = SchemaTree::from_descriptor(&json!({
    ///     "propA": { "type": "String", "immutable": true },
    ///     "propB": "Number"
    /// }))
    /// .unwrap();
    ///
    /// assert!(tree.field("propA").unwrap().immutable());
    /// assert!(!tree.field("propB").unwrap().immutable());
    /// ```
    pub fn from_descriptor(descriptor: &Value) -> Result<Self, SchemaError> {
        Self::from_descriptor_with(descriptor, &SchemaOptions::default())
    }

    pub fn from_descriptor_with(
        descriptor: &Value,
        options: &SchemaOptions,
    ) -> Result<Self, SchemaError> {
        let map = descriptor.as_object().ok_or(SchemaError::NotAnObject)?;
        let mut parser = Parser {
            options,
            path: FieldPath::new(),
        };
        let fields = parser.fields(map)?;
        Ok(SchemaTree::new(fields))
    }
}

struct Parser<'a> {
    options: &'a SchemaOptions,
    path: FieldPath,
}

impl Parser<'_> {
    fn fields(&mut self, map: &Map<String, Value>) -> Result<IndexMap<String, SchemaNode>, SchemaError> {
        let mut fields = IndexMap::with_capacity(map.len());
        for (name, value) in map {
            if name == IMMUTABLE_KEY {
                continue;
            }
            self.path.push(name.as_str());
            let node = self.node(value)?;
            self.path.pop();
            fields.insert(name.clone(), node);
        }
        Ok(fields)
    }

    fn node(&mut self, value: &Value) -> Result<SchemaNode, SchemaError> {
        match value {
            Value::String(type_name) => Ok(SchemaNode::Scalar(ScalarNode {
                type_name: type_name.clone(),
                immutable: false,
            })),
            Value::Array(shape) => Ok(SchemaNode::Array(ArrayNode {
                element: self.element(shape)?,
                immutable: false,
            })),
            Value::Object(map) => {
                let immutable = self.immutable_flag(map)?;
                match map.get(&self.options.type_key) {
                    Some(type_value) => self.typed_leaf(type_value, immutable),
                    None => Ok(SchemaNode::Object(ObjectNode {
                        fields: self.fields(map)?,
                        immutable,
                    })),
                }
            }
            _ => Err(SchemaError::InvalidType(self.path.to_dotted())),
        }
    }

    fn typed_leaf(&mut self, type_value: &Value, immutable: bool) -> Result<SchemaNode, SchemaError> {
        match type_value {
            Value::Array(shape) => Ok(SchemaNode::Array(ArrayNode {
                element: self.element(shape)?,
                immutable,
            })),
            Value::String(type_name) => Ok(SchemaNode::Scalar(ScalarNode {
                type_name: type_name.clone(),
                immutable,
            })),
            Value::Object(_) => Ok(SchemaNode::Scalar(ScalarNode {
                type_name: "Mixed".to_string(),
                immutable,
            })),
            _ => Err(SchemaError::InvalidType(self.path.to_dotted())),
        }
    }

    /// Element shape of an array: the first entry of `[Shape]`, if any.
    fn element(&mut self, shape: &[Value]) -> Result<Option<Box<SchemaNode>>, SchemaError> {
        match shape.first() {
            Some(first) => Ok(Some(Box::new(self.node(first)?))),
            None => Ok(None),
        }
    }

    fn immutable_flag(&self, map: &Map<String, Value>) -> Result<bool, SchemaError> {
        match map.get(IMMUTABLE_KEY) {
            None => Ok(false),
            Some(Value::Bool(flag)) => Ok(*flag),
            Some(_) => Err(SchemaError::InvalidImmutableFlag(self.path.to_dotted())),
        }
    }
}
