//! Schema definition tree.

pub mod builder;
pub mod descriptor;
#[allow(clippy::module_inception)]
pub mod schema;

pub use builder::SchemaBuilder;
pub use descriptor::SchemaOptions;
pub use schema::*;
