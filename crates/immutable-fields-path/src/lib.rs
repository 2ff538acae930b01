//! Dotted field paths.
//!
//! A field path names a location inside a nested document, both in the
//! document itself and in the schema describing it. Paths occur in two
//! shapes: a single dotted string (`"levelA.levelB.levelC"`) and an ordered
//! list of segments. This crate converts between the two and addresses
//! nested [`serde_json::Value`] trees by path.
//!
//! # Example
//!
//! ```
//! use immutable_fields_path::{get, join_path, split_path, FieldPath};
//!
//! let segments = split_path("levelA.levelB.levelC1");
//! assert_eq!(segments, vec!["levelA", "levelB", "levelC1"]);
//! assert_eq!(join_path(&segments), "levelA.levelB.levelC1");
//!
//! let path = FieldPath::parse("levelA.levelB");
//! assert_eq!(path.to_string(), "levelA.levelB");
//!
//! let doc = serde_json::json!({"levelA": {"levelB": {"levelC1": "x"}}});
//! let val = get(&doc, &segments);
//! assert_eq!(val, Some(&serde_json::json!("x")));
//! ```

use thiserror::Error;

pub mod get;
pub mod types;
pub mod util;
pub mod validate;

pub use get::{get, get_mut, set};
pub use types::{FieldPath, PathStep};
pub use util::{is_child, is_dotted, is_positional, is_within, join_path, split_path, SEPARATOR};
pub use validate::validate_path;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("EMPTY_PATH")]
    EmptyPath,
    #[error("EMPTY_SEGMENT")]
    EmptySegment,
    #[error("NOT_AN_OBJECT")]
    NotAnObject,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_and_join_agree() {
        let cases = ["propA", "levelA.levelB", "arr.$.item", "a.0.b"];
        for dotted in cases {
            let segments = split_path(dotted);
            assert_eq!(join_path(&segments), dotted, "roundtrip failed for {dotted:?}");
        }
    }

    #[test]
    fn test_field_path_matches_free_functions() {
        let path = FieldPath::parse("parentA.childB.arr1");
        assert_eq!(path.as_slice(), split_path("parentA.childB.arr1").as_slice());
        assert_eq!(path.to_dotted(), "parentA.childB.arr1");
    }

    #[test]
    fn test_set_then_get() {
        let mut doc = json!({});
        set(&mut doc, &split_path("levelA.levelB.levelC2"), json!("Update")).unwrap();
        assert_eq!(
            get(&doc, &split_path("levelA.levelB.levelC2")),
            Some(&json!("Update"))
        );
    }

    #[test]
    fn test_set_through_scalar_fails() {
        let mut doc = json!({"propA": "scalar"});
        let err = set(&mut doc, &split_path("propA.inner"), json!(1)).unwrap_err();
        assert_eq!(err, PathError::NotAnObject);
    }
}
