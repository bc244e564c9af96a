//! Field sanitizers for OSA.
//!
//! Maps an untrusted, arbitrarily-shaped raw value to a validated value or
//! [`Sanitized::Invalid`]. Every [`FieldType`] has a built-in rule; a
//! sanitizer attached to the schema always takes precedence.
//!
//! | type | rule |
//! |---|---|
//! | checkbox | `"on"` → `"on"`, anything else → `"off"` |
//! | number, range | numeric string → number, otherwise `0` |
//! | textarea, wysiwyg | safe HTML subset |
//! | email | address grammar, otherwise invalid |
//! | url | well-formed URL with an allowed scheme, otherwise invalid |
//! | multicheck | selected option keys, unknown keys dropped |
//! | everything else | plain text; empty is invalid |

mod html;
mod rules;
mod text;

pub use html::{ALLOWED_ATTRIBUTES, ALLOWED_TAGS, sanitize_html, strip_all_tags};
pub use rules::{ALLOWED_URL_SCHEMES, BuiltinRule, builtin_rule, is_email};
pub use text::{is_empty_input, raw_text, sanitize_text_field};

use osa_model::{FieldSchema, FieldType, SanitizeFn, Sanitized};
use serde_json::Value;
use std::sync::Arc;

/// Returns the sanitizer that applies to `schema`: its override when set,
/// otherwise the built-in rule for its type.
pub fn resolve(schema: &FieldSchema) -> SanitizeFn {
    if let Some(custom) = &schema.sanitizer {
        return Arc::clone(custom);
    }
    let rule = builtin_rule(schema.field_type);
    let options = schema.options.clone();
    Arc::new(move |raw: &Value| rule(raw, &options))
}

/// Runs the resolved sanitizer for `schema` over `raw`.
pub fn sanitize(schema: &FieldSchema, raw: &Value) -> Sanitized {
    match &schema.sanitizer {
        Some(custom) => custom(raw),
        None => builtin_rule(schema.field_type)(raw, &schema.options),
    }
}

/// Whether the built-in rule of `field_type` can ever reject a value.
pub fn can_reject(field_type: FieldType) -> bool {
    !matches!(
        field_type,
        FieldType::Checkbox
            | FieldType::Number
            | FieldType::Range
            | FieldType::Textarea
            | FieldType::Wysiwyg
            | FieldType::Multicheck
    )
}
