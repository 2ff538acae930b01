/// Separator between the segments of a dotted path.
pub const SEPARATOR: char = '.';

/// Split a dotted path into its segments.
///
/// The empty string is the root path and yields no segments.
pub fn split_path(dotted: &str) -> Vec<String> {
    if dotted.is_empty() {
        return Vec::new();
    }
    dotted.split(SEPARATOR).map(str::to_string).collect()
}

/// Join segments into a dotted path.
pub fn join_path(path: &[String]) -> String {
    path.join(".")
}

/// Check if a key addresses a nested location (contains a separator).
pub fn is_dotted(key: &str) -> bool {
    key.contains(SEPARATOR)
}

/// Check if a segment addresses an array element rather than a named field.
///
/// Recognized forms: a plain index (`0`, `12`), the positional operator
/// `$`, the all-elements operator `$[]` and the filtered form
/// `$[identifier]`.
pub fn is_positional(segment: &str) -> bool {
    if segment == "$" || segment == "$[]" {
        return true;
    }
    if let Some(inner) = segment
        .strip_prefix("$[")
        .and_then(|rest| rest.strip_suffix(']'))
    {
        return inner
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    }
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Check if the dotted `path` is `ancestor` itself or lies beneath it.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    match path.strip_prefix(ancestor) {
        Some(rest) => rest.is_empty() || rest.starts_with(SEPARATOR),
        None => false,
    }
}

/// Check if `parent` path contains the `child` path.
pub fn is_child(parent: &[String], child: &[String]) -> bool {
    parent.len() < child.len() && child.starts_with(parent)
}
