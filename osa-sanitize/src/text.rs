use crate::html::strip_all_tags;
use regex_lite::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::LazyLock;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n\t ]+").expect("whitespace pattern"));

/// Scalar text of a raw value. Numbers are rendered, everything else
/// (arrays, objects, booleans, null) has no text form.
pub fn raw_text(raw: &Value) -> Option<Cow<'_, str>> {
    match raw {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        _ => None,
    }
}

/// Whether a submitted value counts as "nothing entered".
pub fn is_empty_input(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Reduces free text to a single safe line: tags removed, runs of
/// whitespace collapsed, stray angle brackets escaped, ends trimmed.
pub fn sanitize_text_field(input: &str) -> String {
    let stripped = strip_all_tags(input);
    let collapsed = WHITESPACE_RE.replace_all(&stripped, " ");
    collapsed
        .trim()
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
