//! Markup filtering for rich-text fields.
//!
//! [`sanitize_html`] keeps a small allow-list of formatting tags and
//! attributes and escapes every other angle bracket; [`strip_all_tags`]
//! removes markup entirely for plain-text fields.

use crate::rules::ALLOWED_URL_SCHEMES;
use regex_lite::{Captures, Regex};
use std::sync::LazyLock;

/// Tags kept by [`sanitize_html`].
pub const ALLOWED_TAGS: &[&str] = &[
    "a", "abbr", "b", "blockquote", "br", "code", "del", "em", "h1", "h2", "h3", "h4", "h5",
    "h6", "hr", "i", "img", "li", "ol", "p", "pre", "s", "span", "strong", "sub", "sup", "u",
    "ul",
];

/// Attributes kept on allowed tags.
pub const ALLOWED_ATTRIBUTES: &[&str] = &[
    "alt", "class", "height", "href", "rel", "src", "target", "title", "width",
];

const URL_ATTRIBUTES: &[&str] = &["href", "src"];

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern"));

static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>").expect("block pattern")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9]*)([^>]*)>").expect("tag pattern"));

static ANY_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z!?][^>]*>").expect("any-tag pattern"));

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&#[xX]([0-9A-Fa-f]+);?|&#([0-9]+);?|&([A-Za-z][A-Za-z0-9]*);")
        .expect("entity pattern")
});

static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z][a-z0-9+.-]*):").expect("scheme pattern"));

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
        .expect("attribute pattern")
});

/// Removes comments, `script`/`style` blocks (with their content) and every
/// remaining tag.
pub fn strip_all_tags(input: &str) -> String {
    let without_comments = COMMENT_RE.replace_all(input, "");
    let without_blocks = BLOCK_RE.replace_all(&without_comments, "");
    ANY_TAG_RE.replace_all(&without_blocks, "").into_owned()
}

/// Keeps the allowed formatting subset of `input`.
///
/// Disallowed tags are dropped (their text content stays), disallowed
/// attributes and script-bearing URLs are removed, and stray `<`/`>` in text
/// are escaped. Running the filter on its own output is a no-op.
pub fn sanitize_html(input: &str) -> String {
    let without_comments = COMMENT_RE.replace_all(input, "");
    let cleaned = BLOCK_RE.replace_all(&without_comments, "");

    let mut out = String::with_capacity(cleaned.len());
    let mut last = 0;
    for caps in TAG_RE.captures_iter(&cleaned) {
        let Some(whole) = caps.get(0) else { continue };
        escape_text(&cleaned[last..whole.start()], &mut out);
        if let Some(tag) = rebuild_tag(&caps) {
            out.push_str(&tag);
        }
        last = whole.end();
    }
    escape_text(&cleaned[last..], &mut out);
    out
}

fn rebuild_tag(caps: &Captures<'_>) -> Option<String> {
    let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
    let name = caps.get(2)?.as_str().to_ascii_lowercase();
    let rest = caps.get(3).map_or("", |m| m.as_str());

    if !ALLOWED_TAGS.contains(&name.as_str()) {
        return None;
    }
    // `<b-x>` and friends are not the allowed tag with attributes.
    if !rest.is_empty() && !rest.starts_with(|c: char| c.is_ascii_whitespace() || c == '/') {
        return None;
    }
    if closing {
        return Some(format!("</{name}>"));
    }

    let mut tag = format!("<{name}");
    for attr in ATTR_RE.captures_iter(rest) {
        let Some(attr_name) = attr.get(1).map(|m| m.as_str().to_ascii_lowercase()) else {
            continue;
        };
        if !ALLOWED_ATTRIBUTES.contains(&attr_name.as_str()) {
            continue;
        }
        let value = attr
            .get(2)
            .or_else(|| attr.get(3))
            .or_else(|| attr.get(4))
            .map_or("", |m| m.as_str());
        if URL_ATTRIBUTES.contains(&attr_name.as_str()) && is_blocked_url(value) {
            continue;
        }
        tag.push(' ');
        tag.push_str(&attr_name);
        tag.push_str("=\"");
        tag.push_str(&escape_attribute(value));
        tag.push('"');
    }
    let self_closing = rest.trim_end().strip_suffix('/').is_some_and(|head| {
        head.is_empty() || head.ends_with(|c: char| c.is_ascii_whitespace() || c == '"' || c == '\'')
    });
    if self_closing {
        tag.push_str(" /");
    }
    tag.push('>');
    Some(tag)
}

/// A URL attribute is dropped when, read the way a browser reads it, it
/// names a scheme outside [`ALLOWED_URL_SCHEMES`]. Scheme-less (relative)
/// URLs are kept.
fn is_blocked_url(value: &str) -> bool {
    let compact: String = decode_entities(value)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    SCHEME_RE
        .captures(&compact)
        .and_then(|caps| caps.get(1))
        .is_some_and(|scheme| !ALLOWED_URL_SCHEMES.contains(&scheme.as_str()))
}

/// Decodes numeric character references and the named references that can
/// spell out a scheme. Unknown names are left as written.
fn decode_entities(value: &str) -> String {
    ENTITY_RE
        .replace_all(value, |caps: &Captures<'_>| {
            if let Some(hex) = caps.get(1) {
                return code_point(u32::from_str_radix(hex.as_str(), 16).ok()).to_string();
            }
            if let Some(dec) = caps.get(2) {
                return code_point(dec.as_str().parse().ok()).to_string();
            }
            let name = caps.get(3).map_or("", |m| m.as_str());
            match named_entity(name) {
                Some(c) => c.to_string(),
                None => caps.get(0).map_or("", |m| m.as_str()).to_string(),
            }
        })
        .into_owned()
}

fn code_point(value: Option<u32>) -> char {
    value
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "colon" => ':',
        "Tab" => '\t',
        "NewLine" => '\n',
        "amp" | "AMP" => '&',
        "quot" | "QUOT" => '"',
        "apos" => '\'',
        "lt" | "LT" => '<',
        "gt" | "GT" => '>',
        "lpar" => '(',
        "rpar" => ')',
        "sol" => '/',
        "bsol" => '\\',
        "period" => '.',
        "comma" => ',',
        "semi" => ';',
        "num" => '#',
        "excl" => '!',
        "nbsp" => '\u{a0}',
        _ => return None,
    };
    Some(c)
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}
