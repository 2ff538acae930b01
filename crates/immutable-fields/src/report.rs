/// A protected location a guard acted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardedPath {
    /// Operator clause the key was found in, for update payloads.
    pub operator: Option<String>,
    /// Dotted path of the field, relative to the document root.
    pub path: String,
}

/// What a guard run did: keys dropped from an update payload, or fields
/// rolled back on a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardReport {
    pub entries: Vec<GuardedPath>,
}

impl GuardReport {
    pub(crate) fn record(&mut self, operator: Option<&str>, path: String) {
        self.entries.push(GuardedPath {
            operator: operator.map(str::to_string),
            path,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths().any(|p| p == path)
    }
}
