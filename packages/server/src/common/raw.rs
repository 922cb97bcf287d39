//! Field lookup over untyped actor output.
//!
//! Each canonical field is resolved from an ordered list of JSON pointers;
//! the first pointer that yields a usable value wins. Empty strings count as
//! absent, matching how the actors pad missing fields.

use serde_json::Value;

/// First non-empty string among `paths`.
pub fn first_str(value: &Value, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|path| {
        value
            .pointer(path)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// First non-negative integer among `paths`. Numeric strings are accepted.
pub fn first_u64(value: &Value, paths: &[&str]) -> Option<u64> {
    paths.iter().find_map(|path| match value.pointer(path)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// First array among `paths`.
pub fn first_array<'a>(value: &'a Value, paths: &[&str]) -> Option<&'a Vec<Value>> {
    paths
        .iter()
        .find_map(|path| value.pointer(path).and_then(Value::as_array))
}
