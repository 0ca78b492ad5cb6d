//! Tolerant string coercion for heterogeneous provider payloads.
//!
//! Provider fields arrive as strings, numbers, lists, or nothing at all.
//! These helpers flatten that mess into clean strings and string lists so
//! the per-source normalizers stay declarative.

use serde_json::Value;

/// Maximum description length in characters (code points).
pub const DESCRIPTION_MAX: usize = 500;

/// Coerces an optional JSON value into a sanitized string.
///
/// Rules:
/// - absent / null / empty list → empty string
/// - non-empty list → first element, sanitized (some providers wrap single
///   values in one-element arrays)
/// - non-string scalars are stringified
/// - internal whitespace runs collapse to a single space; result is trimmed
#[must_use]
pub fn sanitize(value: Option<&Value>) -> String {
    let raw = match value {
        None | Some(Value::Null) => return String::new(),
        Some(Value::Array(items)) => return sanitize(items.first()),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other @ Value::Object(_)) => other.to_string(),
    };
    collapse_whitespace(&raw)
}

/// Collapses whitespace runs to single spaces and trims the ends.
#[must_use]
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Coerces an optional JSON value into a list of non-empty strings.
///
/// Rules:
/// - absent / null → empty list
/// - list → each element stringified and trimmed, empties dropped
/// - a single string containing `,` or `;` → split on those delimiters
/// - any other scalar → singleton list
#[must_use]
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| sanitize(Some(item)))
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .replace(',', ";")
            .split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(collapse_whitespace)
            .collect(),
        Some(scalar) => {
            let single = sanitize(Some(scalar));
            if single.is_empty() { Vec::new() } else { vec![single] }
        }
    }
}

/// Truncates to at most `max` characters, respecting char boundaries.
#[must_use]
pub fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

/// Converts an empty string into `None`, used for optional URL fields.
#[must_use]
pub fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_collapses_whitespace() {
        let value = json!("  hello   world  ");
        assert_eq!(sanitize(Some(&value)), "hello world");
    }

    #[test]
    fn test_sanitize_none_and_null_yield_empty() {
        assert_eq!(sanitize(None), "");
        assert_eq!(sanitize(Some(&Value::Null)), "");
    }

    #[test]
    fn test_sanitize_empty_list_yields_empty() {
        let value = json!([]);
        assert_eq!(sanitize(Some(&value)), "");
    }

    #[test]
    fn test_sanitize_takes_first_list_element() {
        let value = json!(["  first sentence ", "second"]);
        assert_eq!(sanitize(Some(&value)), "first sentence");
    }

    #[test]
    fn test_sanitize_stringifies_scalars() {
        assert_eq!(sanitize(Some(&json!(42))), "42");
        assert_eq!(sanitize(Some(&json!(true))), "true");
    }

    #[test]
    fn test_string_list_from_array_drops_empties() {
        let value = json!(["History", "  ", null, " Science "]);
        assert_eq!(string_list(Some(&value)), vec!["History", "Science"]);
    }

    #[test]
    fn test_string_list_splits_delimited_string() {
        let value = json!("fiqh, seerah; hadith");
        assert_eq!(string_list(Some(&value)), vec!["fiqh", "seerah", "hadith"]);
    }

    #[test]
    fn test_string_list_plain_string_is_singleton() {
        let value = json!("philosophy");
        assert_eq!(string_list(Some(&value)), vec!["philosophy"]);
    }

    #[test]
    fn test_string_list_scalar_is_singleton() {
        let value = json!(1979);
        assert_eq!(string_list(Some(&value)), vec!["1979"]);
    }

    #[test]
    fn test_clip_respects_char_boundaries() {
        let arabic = "كتاب التاريخ";
        assert_eq!(clip(arabic, 4), "كتاب");
        assert_eq!(clip("short", 500), "short");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(String::new()), None);
        assert_eq!(non_empty("x".to_string()), Some("x".to_string()));
    }
}
