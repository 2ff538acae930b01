//! Type definitions for field paths.

use std::fmt;

use crate::util::{join_path, split_path};

/// A single segment of a field path.
pub type PathStep = String;

/// An ordered list of segments, convertible to and from a dotted string.
///
/// Also serves as the accumulator of a recursive walk: segments are pushed
/// before a field is handled and popped after, so siblings always start from
/// the same prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathStep>,
}

impl FieldPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a dotted string. The empty string is the root path.
    pub fn parse(dotted: &str) -> Self {
        Self {
            segments: split_path(dotted),
        }
    }

    pub fn push(&mut self, segment: impl Into<PathStep>) {
        self.segments.push(segment.into());
    }

    pub fn pop(&mut self) -> Option<PathStep> {
        self.segments.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn as_slice(&self) -> &[PathStep] {
        &self.segments
    }

    pub fn to_dotted(&self) -> String {
        join_path(&self.segments)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dotted())
    }
}

impl From<Vec<PathStep>> for FieldPath {
    fn from(segments: Vec<PathStep>) -> Self {
        Self { segments }
    }
}
