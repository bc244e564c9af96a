use crate::html::sanitize_html;
use crate::text::{is_empty_input, raw_text, sanitize_text_field};
use osa_model::{FieldOptions, FieldType, Sanitized};
use regex_lite::Regex;
use serde_json::{Number, Value};
use std::sync::LazyLock;
use url::Url;

/// A built-in sanitizer. Receives the field's options for choice types.
pub type BuiltinRule = fn(&Value, &FieldOptions) -> Sanitized;

/// URL schemes accepted by the `url` rule.
pub const ALLOWED_URL_SCHEMES: &[&str] = &[
    "http", "https", "ftp", "ftps", "mailto", "news", "irc", "gopher", "nntp", "feed", "telnet",
    "sms", "tel", "webcal", "xmpp",
];

const MAX_EMAIL_LEN: usize = 254;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$",
    )
    .expect("email pattern")
});

/// The built-in rule for a field type.
pub fn builtin_rule(field_type: FieldType) -> BuiltinRule {
    match field_type {
        FieldType::Checkbox => checkbox,
        FieldType::Number | FieldType::Range => number,
        FieldType::Textarea | FieldType::Wysiwyg => rich_text,
        FieldType::Email => email,
        FieldType::Url => web_url,
        FieldType::Multicheck => multicheck,
        FieldType::Text
        | FieldType::Password
        | FieldType::Select
        | FieldType::Radio
        | FieldType::Color
        | FieldType::File
        | FieldType::Image
        | FieldType::Date
        | FieldType::Html
        | FieldType::Content
        | FieldType::Title
        | FieldType::Separator => plain_text,
    }
}

/// Checks an address against the email grammar.
pub fn is_email(candidate: &str) -> bool {
    if candidate.len() > MAX_EMAIL_LEN || !EMAIL_RE.is_match(candidate) {
        return false;
    }
    let Some((local, _)) = candidate.split_once('@') else {
        return false;
    };
    !local.starts_with('.') && !local.ends_with('.') && !local.contains("..")
}

fn checkbox(raw: &Value, _: &FieldOptions) -> Sanitized {
    let on = matches!(raw, Value::String(s) if s == "on");
    Sanitized::text(if on { "on" } else { "off" })
}

fn number(raw: &Value, _: &FieldOptions) -> Sanitized {
    let parsed = match raw {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => parse_number(s.trim()),
        _ => None,
    };
    Sanitized::Valid(Value::Number(parsed.unwrap_or_else(|| Number::from(0))))
}

fn parse_number(s: &str) -> Option<Number> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Number::from_f64)
}

fn rich_text(raw: &Value, _: &FieldOptions) -> Sanitized {
    let html = raw_text(raw).map(|s| sanitize_html(&s)).unwrap_or_default();
    Sanitized::text(html)
}

fn email(raw: &Value, _: &FieldOptions) -> Sanitized {
    match raw_text(raw) {
        Some(s) if is_email(s.trim()) => Sanitized::text(s.trim()),
        _ => Sanitized::Invalid,
    }
}

fn web_url(raw: &Value, _: &FieldOptions) -> Sanitized {
    let Some(s) = raw_text(raw) else {
        return Sanitized::Invalid;
    };
    match Url::parse(s.trim()) {
        Ok(parsed) if ALLOWED_URL_SCHEMES.contains(&parsed.scheme()) => {
            Sanitized::text(parsed.as_str())
        }
        _ => Sanitized::Invalid,
    }
}

/// Accepts a list of keys, a key→value map (checked boxes post their key) or
/// a single key; keeps known options in declaration order.
fn multicheck(raw: &Value, options: &FieldOptions) -> Sanitized {
    let selected: Vec<&str> = match raw {
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        Value::Object(map) => map
            .iter()
            .filter(|(_, v)| !is_empty_input(v) && v.as_str() != Some("0"))
            .map(|(k, _)| k.as_str())
            .collect(),
        Value::String(s) => vec![s.as_str()],
        _ => Vec::new(),
    };
    let keys = options
        .keys()
        .filter(|key| selected.contains(key))
        .map(|key| Value::String(key.to_string()))
        .collect();
    Sanitized::Valid(Value::Array(keys))
}

fn plain_text(raw: &Value, _: &FieldOptions) -> Sanitized {
    let Some(s) = raw_text(raw) else {
        return Sanitized::Invalid;
    };
    let clean = sanitize_text_field(&s);
    if clean.is_empty() {
        Sanitized::Invalid
    } else {
        Sanitized::text(clean)
    }
}
