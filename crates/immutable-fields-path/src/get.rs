use serde_json::{Map, Value};

use crate::PathError;

/// Get a value from a document by path.
///
/// Object keys are matched by name, array elements by numeric index.
/// Returns `None` if any step is missing.
pub fn get<'a>(val: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut current = val;
    for path_step in path {
        match current {
            Value::Array(arr) => {
                let idx: usize = path_step.parse().ok()?;
                current = arr.get(idx)?;
            }
            Value::Object(map) => {
                current = map.get(path_step)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Get a mutable reference to a value in a document by path.
pub fn get_mut<'a>(val: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
    let mut current = val;
    for path_step in path {
        match current {
            Value::Array(arr) => {
                let idx: usize = path_step.parse().ok()?;
                current = arr.get_mut(idx)?;
            }
            Value::Object(map) => {
                current = map.get_mut(path_step)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Write `value` at `path`, creating missing intermediate objects.
///
/// Returns the previous value, if any.
///
/// # Errors
///
/// - `PathError::EmptyPath` - the root itself cannot be assigned
/// - `PathError::NotAnObject` - an intermediate step is a scalar or array
pub fn set(doc: &mut Value, path: &[String], value: Value) -> Result<Option<Value>, PathError> {
    let (last, parents) = path.split_last().ok_or(PathError::EmptyPath)?;
    let mut current = doc;
    for path_step in parents {
        let map = current.as_object_mut().ok_or(PathError::NotAnObject)?;
        current = map
            .entry(path_step.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    match current {
        Value::Object(map) => Ok(map.insert(last.clone(), value)),
        _ => Err(PathError::NotAnObject),
    }
}
