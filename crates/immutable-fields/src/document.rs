//! Live document abstraction.
//!
//! The resave guard needs a snapshot of the current field values and direct
//! write access to a field from the host's document model. It also reads the
//! document's changed-list and drops protected paths from it so the
//! subsequent save does not write them.

use serde_json::{Map, Value};

use immutable_fields_path::{get, is_child, is_within, set, split_path, validate_path, PathError};

/// A previously fetched document about to be saved again.
pub trait Document {
    /// True while the document has never been persisted.
    fn is_new(&self) -> bool;

    /// Plain snapshot of the current (in-memory) field values.
    fn to_object(&self) -> Map<String, Value>;

    /// Write a field directly.
    fn set(&mut self, path: &[String], value: Value) -> Result<(), PathError>;

    /// Dotted paths currently in the changed-list.
    fn changed_paths(&self) -> Vec<String>;

    /// Remove exactly `path` from the changed-list.
    fn unmark_modified(&mut self, path: &str);

    /// Remove `path` and every path beneath it from the changed-list.
    fn unmark_subtree(&mut self, path: &str) {
        for changed in self.changed_paths() {
            if is_within(&changed, path) {
                self.unmark_modified(&changed);
            }
        }
    }

    /// The value `path` had when the document was loaded, if the host
    /// keeps one.
    fn persisted(&self, _path: &[String]) -> Option<Value> {
        None
    }
}

/// In-memory document with a persisted snapshot and a changed-list.
///
/// Changes are tracked per assigned path, except that anything assigned
/// inside an array marks the whole array: arrays are written as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryDocument {
    persisted: Value,
    current: Value,
    modified: Vec<String>,
    is_new: bool,
}

impl MemoryDocument {
    /// A document that has not been saved yet.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            persisted: Value::Object(Map::new()),
            current: Value::Object(fields),
            modified: Vec::new(),
            is_new: true,
        }
    }

    /// A document as loaded from the store.
    pub fn from_persisted(fields: Map<String, Value>) -> Self {
        let persisted = Value::Object(fields);
        Self {
            current: persisted.clone(),
            persisted,
            modified: Vec::new(),
            is_new: false,
        }
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        get(&self.current, &split_path(path))
    }

    /// Value of `path` as last persisted.
    pub fn get_persisted(&self, path: &str) -> Option<&Value> {
        get(&self.persisted, &split_path(path))
    }

    /// Assign a field the way application code would, marking it modified.
    pub fn assign(&mut self, path: &str, value: Value) -> Result<(), PathError> {
        validate_path(path)?;
        let segments = split_path(path);
        let marked = self.tracked_path(&segments);
        write(&mut self.current, &segments, value)?;
        self.mark_modified(&marked);
        Ok(())
    }

    pub fn mark_modified(&mut self, path: &str) {
        if !self.is_modified(path) {
            self.modified.push(path.to_string());
        }
    }

    pub fn is_modified(&self, path: &str) -> bool {
        self.modified.iter().any(|p| p == path)
    }

    pub fn modified_paths(&self) -> &[String] {
        &self.modified
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// The write set a save would send: each modified path with its current
    /// value, minus paths already covered by a modified ancestor.
    pub fn delta(&self) -> Map<String, Value> {
        let parsed: Vec<Vec<String>> = self.modified.iter().map(|p| split_path(p)).collect();
        let mut delta = Map::new();
        for (dotted, segments) in self.modified.iter().zip(&parsed) {
            if parsed.iter().any(|other| is_child(other, segments)) {
                continue;
            }
            if let Some(value) = get(&self.current, segments) {
                delta.insert(dotted.clone(), value.clone());
            }
        }
        delta
    }

    /// Persist the document: a new document is written whole, an existing
    /// one receives its delta. Returns what was written.
    pub fn commit(&mut self) -> Result<Map<String, Value>, PathError> {
        let written = if self.is_new {
            self.persisted = self.current.clone();
            self.is_new = false;
            self.current.as_object().cloned().unwrap_or_default()
        } else {
            let delta = self.delta();
            for (dotted, value) in &delta {
                write(&mut self.persisted, &split_path(dotted), value.clone())?;
            }
            delta
        };
        self.modified.clear();
        Ok(written)
    }

    /// Path recorded in the changed-list for an assignment to `segments`:
    /// the assignment itself, or the enclosing array.
    fn tracked_path(&self, segments: &[String]) -> String {
        let mut current = &self.current;
        for (depth, segment) in segments.iter().enumerate() {
            if current.is_array() && depth > 0 {
                return segments[..depth].join(".");
            }
            match current {
                Value::Object(map) => match map.get(segment) {
                    Some(next) => current = next,
                    None => break,
                },
                _ => break,
            }
        }
        segments.join(".")
    }
}

/// Write through arrays by index, creating missing objects elsewhere.
fn write(doc: &mut Value, segments: &[String], value: Value) -> Result<(), PathError> {
    let (last, parents) = segments.split_last().ok_or(PathError::EmptyPath)?;
    match immutable_fields_path::get_mut(doc, parents) {
        Some(Value::Array(arr)) => {
            let idx: usize = last.parse().map_err(|_| PathError::NotAnObject)?;
            let slot = arr.get_mut(idx).ok_or(PathError::NotAnObject)?;
            *slot = value;
            Ok(())
        }
        Some(Value::Object(map)) => {
            map.insert(last.clone(), value);
            Ok(())
        }
        Some(_) => Err(PathError::NotAnObject),
        None => set(doc, segments, value).map(|_| ()),
    }
}

impl Document for MemoryDocument {
    fn is_new(&self) -> bool {
        self.is_new
    }

    fn to_object(&self) -> Map<String, Value> {
        self.current.as_object().cloned().unwrap_or_default()
    }

    fn set(&mut self, path: &[String], value: Value) -> Result<(), PathError> {
        let marked = self.tracked_path(path);
        write(&mut self.current, path, value)?;
        self.mark_modified(&marked);
        Ok(())
    }

    fn changed_paths(&self) -> Vec<String> {
        self.modified.clone()
    }

    fn unmark_modified(&mut self, path: &str) {
        self.modified.retain(|p| p != path);
    }

    fn unmark_subtree(&mut self, path: &str) {
        self.modified.retain(|p| !is_within(p, path));
    }

    fn persisted(&self, path: &[String]) -> Option<Value> {
        if self.is_new {
            return None;
        }
        get(&self.persisted, path).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loaded(value: Value) -> MemoryDocument {
        MemoryDocument::from_persisted(value.as_object().cloned().unwrap())
    }

    #[test]
    fn test_assign_marks_exact_path() {
        let mut doc = loaded(json!({ "levelA": { "levelB": { "levelC1": "a", "levelC2": "b" } } }));
        doc.assign("levelA.levelB.levelC2", json!("Update")).unwrap();

        assert_eq!(doc.modified_paths(), ["levelA.levelB.levelC2".to_string()]);
        assert_eq!(doc.get("levelA.levelB.levelC2"), Some(&json!("Update")));
        assert_eq!(doc.get_persisted("levelA.levelB.levelC2"), Some(&json!("b")));
    }

    #[test]
    fn test_assign_inside_array_marks_array() {
        let mut doc = loaded(json!({ "arr": [{ "item": "1" }] }));
        doc.assign("arr.0.item", json!("Update")).unwrap();

        assert_eq!(doc.modified_paths(), ["arr".to_string()]);
        assert_eq!(doc.get("arr"), Some(&json!([{ "item": "Update" }])));
    }

    #[test]
    fn test_assign_rejects_invalid_path() {
        let mut doc = loaded(json!({}));
        assert_eq!(doc.assign("a..b", json!(1)), Err(PathError::EmptySegment));
        assert!(doc.modified_paths().is_empty());
    }

    #[test]
    fn test_delta_skips_paths_under_modified_ancestor() {
        let mut doc = loaded(json!({ "levelA": { "levelB": { "levelC2": "b" } } }));
        doc.assign("levelA.levelB.levelC2", json!("x")).unwrap();
        doc.assign("levelA", json!({ "levelB": { "levelC2": "y" } })).unwrap();

        let delta = doc.delta();
        assert_eq!(delta.len(), 1);
        assert_eq!(delta.get("levelA"), Some(&json!({ "levelB": { "levelC2": "y" } })));
    }

    #[test]
    fn test_unmark_is_exact() {
        let mut doc = loaded(json!({ "levelA": { "levelB": { "levelC2": "b" } } }));
        doc.assign("levelA.levelB.levelC2", json!("x")).unwrap();
        doc.unmark_modified("levelA.levelB");
        doc.unmark_modified("levelA");

        assert!(doc.is_modified("levelA.levelB.levelC2"));
        doc.unmark_modified("levelA.levelB.levelC2");
        assert!(doc.delta().is_empty());
    }

    #[test]
    fn test_commit_new_then_existing() {
        let mut doc = MemoryDocument::new(json!({ "propA": "a", "propB": 1 }).as_object().cloned().unwrap());
        assert!(Document::persisted(&doc, &split_path("propA")).is_none());

        let written = doc.commit().unwrap();
        assert_eq!(written.len(), 2);
        assert!(!doc.is_new());

        doc.assign("propB", json!(5)).unwrap();
        let written = doc.commit().unwrap();
        assert_eq!(Value::Object(written), json!({ "propB": 5 }));
        assert_eq!(doc.get_persisted("propB"), Some(&json!(5)));
        assert!(doc.modified_paths().is_empty());
    }

    #[test]
    fn test_trait_set_and_persisted() {
        let mut doc = loaded(json!({ "arr": [{ "item": "1" }], "propA": "a" }));
        doc.assign("propA", json!("b")).unwrap();

        Document::set(&mut doc, &split_path("arr"), json!([])).unwrap();
        assert_eq!(doc.get("arr"), Some(&json!([])));
        assert!(doc.is_modified("arr"));
        assert_eq!(Document::persisted(&doc, &split_path("propA")), Some(json!("a")));
    }

    #[test]
    fn test_unmark_subtree() {
        let mut doc = loaded(json!({ "meta": { "k": "v" }, "metadata": 1 }));
        doc.assign("meta.k", json!("x")).unwrap();
        doc.assign("meta.extra", json!(1)).unwrap();
        doc.assign("metadata", json!(2)).unwrap();

        doc.unmark_subtree("meta");
        assert_eq!(doc.modified_paths(), ["metadata".to_string()]);
    }

    /// A host that only implements the required methods.
    struct ListOnly(Vec<String>);

    impl Document for ListOnly {
        fn is_new(&self) -> bool {
            false
        }

        fn to_object(&self) -> Map<String, Value> {
            Map::new()
        }

        fn set(&mut self, _path: &[String], _value: Value) -> Result<(), PathError> {
            Ok(())
        }

        fn changed_paths(&self) -> Vec<String> {
            self.0.clone()
        }

        fn unmark_modified(&mut self, path: &str) {
            self.0.retain(|p| p != path);
        }
    }

    #[test]
    fn test_default_unmark_subtree() {
        let mut doc = ListOnly(vec![
            "locked".to_string(),
            "locked.extra".to_string(),
            "lockedness".to_string(),
        ]);
        doc.unmark_subtree("locked");
        assert_eq!(doc.changed_paths(), vec!["lockedness".to_string()]);
    }
}
