//! Validation of dotted paths.

use crate::util::split_path;
use crate::PathError;

/// Validate a dotted path.
///
/// # Errors
///
/// - `PathError::EmptyPath` - the path is the empty string
/// - `PathError::EmptySegment` - a segment between separators is empty
///
/// # Example
///
/// ```
/// use immutable_fields_path::{validate_path, PathError};
///
/// validate_path("levelA.levelB").unwrap();
/// assert_eq!(validate_path(""), Err(PathError::EmptyPath));
/// assert_eq!(validate_path("a..b"), Err(PathError::EmptySegment));
/// ```
pub fn validate_path(dotted: &str) -> Result<(), PathError> {
    if dotted.is_empty() {
        return Err(PathError::EmptyPath);
    }
    if split_path(dotted).iter().any(String::is_empty) {
        return Err(PathError::EmptySegment);
    }
    Ok(())
}
