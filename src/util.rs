//! Shared naming and identifier utilities for Python code generation.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Python keywords and soft keywords that cannot be used as identifiers.
pub static PY_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
        "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
        "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
        "try", "while", "with", "yield", "match", "case", "type",
    ]
    .into_iter()
    .collect()
});

/// Whether a string is usable as a Python identifier without escaping.
pub fn is_py_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return false;
    }
    !PY_RESERVED_WORDS.contains(name)
}

/// Escape a string for use inside a double-quoted Python string literal.
pub fn escape_py_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render a Python string literal.
pub fn py_string(s: &str) -> String {
    format!("\"{}\"", escape_py_string(s))
}

/// Convert an arbitrary name to PascalCase, splitting on any
/// non-alphanumeric character and on lower-to-upper case boundaries.
pub fn pascal_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::new();
    let mut start_word = true;
    let mut prev: Option<char> = None;
    for (index, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            start_word = true;
            prev = None;
            continue;
        }
        if c.is_ascii_uppercase() {
            let prev_lower = prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit());
            let prev_upper = prev.is_some_and(|p| p.is_ascii_uppercase());
            let next_lower = chars
                .get(index + 1)
                .is_some_and(|n| n.is_ascii_lowercase());
            // Word breaks at camelCase humps and at the tail of an
            // acronym run (HTTPError -> Http, Error).
            if prev_lower || (prev_upper && next_lower) {
                start_word = true;
            }
        } else if c.is_ascii_alphabetic() && prev.is_some_and(|p| p.is_ascii_digit()) {
            start_word = true;
        }
        if start_word {
            out.push(c.to_ascii_uppercase());
            start_word = false;
        } else {
            out.push(c.to_ascii_lowercase());
        }
        prev = Some(c);
    }
    out
}

/// Sanitize a schema name into a valid Python type identifier.
///
/// Names that are already valid identifiers are kept as-is so component
/// names like `Item` or `item_list` survive regeneration unchanged.
pub fn sanitize_type_name(name: &str) -> String {
    if is_py_identifier(name) {
        return name.to_string();
    }
    let mut out = pascal_case(name);
    if out.is_empty() {
        out = "Unnamed".to_string();
    }
    if out
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit())
    {
        out.insert(0, '_');
    }
    if PY_RESERVED_WORDS.contains(out.as_str()) {
        out.insert(0, '_');
    }
    out
}

/// Synthesize a PascalCase operation name from method + path template.
///
/// `operation_name("get", "/users/{id}")` -> `GetUsersId`.
pub fn operation_name(method: &str, path: &str) -> String {
    pascal_case(&format!("{method} {path}"))
}

/// Last pointer segment of a reference, unescaped.
pub fn pointer_tail(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_is_py_identifier() {
        assert!(is_py_identifier("foo"));
        assert!(is_py_identifier("_foo"));
        assert!(is_py_identifier("Item2"));
        assert!(!is_py_identifier(""));
        assert!(!is_py_identifier("2foo"));
        assert!(!is_py_identifier("foo-bar"));
        assert!(!is_py_identifier("class"));
        assert!(!is_py_identifier("match"));
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("foo"), "Foo");
        assert_eq!(pascal_case("foo_bar"), "FooBar");
        assert_eq!(pascal_case("foo-bar.baz"), "FooBarBaz");
        assert_eq!(pascal_case("itemId"), "ItemId");
        assert_eq!(pascal_case("HTTPError"), "HttpError");
        assert_eq!(pascal_case("/users/{id}"), "UsersId");
    }

    #[test]
    fn test_sanitize_type_name() {
        assert_eq!(sanitize_type_name("Item"), "Item");
        assert_eq!(sanitize_type_name("item_list"), "item_list");
        assert_eq!(sanitize_type_name("item-list"), "ItemList");
        assert_eq!(sanitize_type_name("2fast"), "_2Fast");
        assert_eq!(sanitize_type_name(""), "Unnamed");
    }

    #[test]
    fn test_operation_name() {
        assert_eq!(operation_name("get", "/users/{id}"), "GetUsersId");
        assert_eq!(operation_name("post", "/items"), "PostItems");
        assert_eq!(operation_name("get", "/users/{user_id}"), "GetUsersUserId");
    }

    #[test]
    fn test_py_string_escaping() {
        assert_eq!(py_string("plain"), "\"plain\"");
        assert_eq!(py_string("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(py_string("a\\b"), "\"a\\\\b\"");
    }
}
