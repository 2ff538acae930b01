//! Schema-driven protection of immutable document fields.
//!
//! Fields marked `immutable` in a schema never change once a document is
//! persisted, whichever write path a caller takes:
//!
//! - bulk updates pass through [`guard_update`], which prunes every key of
//!   the payload that targets a protected field;
//! - re-saves of a fetched document pass through [`guard_resave`], which
//!   rolls back protected fields and clears them from the document's
//!   changed-list.
//!
//! [`ImmutableFields`] wires both guards into a host's pre-operation hooks.
//!
//! # Example
//!
//! ```
//! use immutable_fields::{guard_update, SchemaTree};
//! use serde_json::json;
//!
//! let schema = SchemaTree::from_descriptor(&json!({
//!     "propA": { "type": "String", "immutable": true },
//!     "propB": "Number"
//! }))
//! .unwrap();
//!
//! let mut payload = json!({ "$set": { "propA": "X", "propB": 5 } });
//! guard_update(&mut payload, &schema);
//! assert_eq!(payload, json!({ "$set": { "propB": 5 } }));
//! ```

use thiserror::Error;

pub mod document;
pub mod options;
pub mod plugin;
pub mod report;
pub mod resave;
pub mod update;

pub use document::{Document, MemoryDocument};
pub use options::{GuardOptions, RollbackPolicy};
pub use plugin::{HookRegistry, ImmutableFields, Operation, PreHooks, SaveHook, UpdateHook};
pub use report::{GuardReport, GuardedPath};
pub use resave::{guard_resave, guard_resave_with};
pub use update::{guard_update, guard_update_with};

pub use immutable_fields_path::{FieldPath, PathError};
pub use immutable_fields_schema::{SchemaBuilder, SchemaError, SchemaNode, SchemaOptions, SchemaTree};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PluginError {
    #[error("UNKNOWN_OPERATION: {0}")]
    UnknownOperation(String),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
