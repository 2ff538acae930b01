//! Schema definition trees carrying
//! `immutable` markers, and the matcher that answers "is this path
//! protected?".
//!
//! Trees are built once, from a JSON descriptor or with [`SchemaBuilder`],
//! and are read-only afterwards.

use thiserror::Error;

pub mod matcher;
pub mod schema;

pub use matcher::is_immutable;
pub use schema::{
    ArrayNode, ObjectNode, ScalarNode, SchemaBuilder, SchemaNode, SchemaOptions, SchemaTree,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("descriptor root must be an object")]
    NotAnObject,
    #[error("invalid type at `{0}`")]
    InvalidType(String),
    #[error("`immutable` must be a boolean at `{0}`")]
    InvalidImmutableFlag(String),
}
