//! Tests for field types, field schemas and options.

use osa_model::{FieldOptions, FieldSchema, FieldType, ModelError, Sanitized};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

// ── FieldType ────────────────────────────────────────────────────

#[test]
fn field_type_round_trips_through_str() {
    for ft in FieldType::ALL {
        let parsed: FieldType = ft.as_str().parse().unwrap();
        assert_eq!(parsed, ft);
    }
}

#[test]
fn field_type_unknown_name_is_invalid_schema() {
    let err = "colour".parse::<FieldType>().unwrap_err();
    assert!(matches!(err, ModelError::InvalidSchema(_)));
}

#[test]
fn field_type_default_is_text() {
    assert_eq!(FieldType::default(), FieldType::Text);
}

#[test]
fn display_only_types() {
    assert!(FieldType::Html.is_display_only());
    assert!(FieldType::Content.is_display_only());
    assert!(FieldType::Title.is_display_only());
    assert!(FieldType::Separator.is_display_only());
    assert!(!FieldType::Text.is_display_only());
    assert!(!FieldType::Checkbox.is_display_only());
}

#[test]
fn choice_types_require_options() {
    assert!(FieldType::Select.requires_options());
    assert!(FieldType::Radio.requires_options());
    assert!(FieldType::Multicheck.requires_options());
    assert!(!FieldType::Text.requires_options());
}

#[test]
fn field_type_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&FieldType::Wysiwyg).unwrap(), "\"wysiwyg\"");
    let ft: FieldType = serde_json::from_str("\"multicheck\"").unwrap();
    assert_eq!(ft, FieldType::Multicheck);
}

// ── Defaults ─────────────────────────────────────────────────────

#[test]
fn explicit_default_wins() {
    let f = FieldSchema::text("f1", "Field").with_default("Default Text");
    assert_eq!(f.default_value(), json!("Default Text"));
}

#[test]
fn implicit_defaults_per_type() {
    assert_eq!(FieldSchema::checkbox("c", "C").default_value(), json!("off"));
    assert_eq!(
        FieldSchema::choice("m", FieldType::Multicheck, [("a", "A")]).default_value(),
        json!([])
    );
    assert_eq!(FieldSchema::text("t", "T").default_value(), json!(""));
}

#[test]
fn default_error_message_names_the_type() {
    let f = FieldSchema::email("mail", "Mail");
    assert_eq!(f.error_message(), "Please insert a valid email");
}

#[test]
fn custom_error_message() {
    let f = FieldSchema::email("mail", "Mail").with_error_message("Bad address");
    assert_eq!(f.error_message(), "Bad address");
}

// ── Validation ───────────────────────────────────────────────────

#[test]
fn empty_id_is_rejected() {
    let err = FieldSchema::text("  ", "Blank").validate().unwrap_err();
    assert!(matches!(err, ModelError::InvalidSchema(_)));
}

#[test]
fn select_without_options_is_rejected() {
    let err = FieldSchema::new("pick", FieldType::Select)
        .validate()
        .unwrap_err();
    assert!(err.to_string().contains("requires options"));
}

#[test]
fn select_with_options_is_valid() {
    let f = FieldSchema::choice("pick", FieldType::Select, [("yes", "Yes"), ("no", "No")]);
    assert!(f.validate().is_ok());
}

// ── Options ──────────────────────────────────────────────────────

#[test]
fn options_keep_declaration_order() {
    let opts: FieldOptions = [("z", "Zed"), ("a", "Ay"), ("m", "Em")].into_iter().collect();
    assert_eq!(opts.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
}

#[test]
fn options_insert_replaces_label_in_place() {
    let mut opts: FieldOptions = [("yes", "Yes"), ("no", "No")].into_iter().collect();
    opts.insert("yes", "Sure");
    assert_eq!(opts.len(), 2);
    assert_eq!(opts.get("yes"), Some("Sure"));
    assert_eq!(opts.keys().next(), Some("yes"));
}

#[test]
fn options_deserialize_in_document_order() {
    let opts: FieldOptions = serde_json::from_str(r#"{"zeta":"Z","alpha":"A"}"#).unwrap();
    assert_eq!(opts.keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
    assert_eq!(
        serde_json::to_string(&opts).unwrap(),
        r#"{"zeta":"Z","alpha":"A"}"#
    );
}

// ── Sanitizer override ───────────────────────────────────────────

#[test]
fn sanitizer_override_is_attached() {
    let f = FieldSchema::number("n", "N").with_sanitizer(|_| Sanitized::Valid(json!(7)));
    assert!(f.has_sanitizer_override());
    let run = f.sanitizer.as_ref().unwrap();
    assert_eq!(run(&json!("x")), Sanitized::Valid(json!(7)));
}

#[test]
fn clones_share_the_sanitizer() {
    let f = FieldSchema::text("t", "T").with_sanitizer(|v| Sanitized::Valid(v.clone()));
    let g = f.clone();
    assert_eq!(f, g);
}

#[test]
fn distinct_sanitizers_are_not_equal() {
    let f = FieldSchema::text("t", "T").with_sanitizer(|v| Sanitized::Valid(v.clone()));
    let g = FieldSchema::text("t", "T").with_sanitizer(|v| Sanitized::Valid(v.clone()));
    assert_ne!(f, g);
}

#[test]
fn debug_hides_the_sanitizer_body() {
    let f = FieldSchema::text("t", "T").with_sanitizer(|_| Sanitized::Invalid);
    assert!(format!("{f:?}").contains("<fn>"));
}

#[test]
fn sanitized_helpers() {
    assert!(Sanitized::Invalid.is_invalid());
    assert_eq!(Sanitized::text("x").into_value(), Some(Value::String("x".into())));
    assert_eq!(Sanitized::Invalid.into_value(), None);
}

// ── Serde ────────────────────────────────────────────────────────

#[test]
fn schema_deserializes_legacy_aliases() {
    let f: FieldSchema = serde_json::from_value(json!({
        "id": "text_no",
        "type": "number",
        "name": "Number Input",
        "desc": "Number field",
        "default": 1,
        "sanitization_error_message": "Numbers only"
    }))
    .unwrap();
    assert_eq!(f.field_type, FieldType::Number);
    assert_eq!(f.label, "Number Input");
    assert_eq!(f.description, "Number field");
    assert_eq!(f.default_value(), json!(1));
    assert_eq!(f.error_message(), "Numbers only");
    assert!(f.sanitizer.is_none());
}

#[test]
fn schema_type_defaults_to_text() {
    let f: FieldSchema = serde_json::from_value(json!({"id": "plain"})).unwrap();
    assert_eq!(f.field_type, FieldType::Text);
    assert!(!f.allow_clear_on_empty);
}

#[test]
fn display_metadata_is_carried() {
    let f = FieldSchema::text("t", "T")
        .with_placeholder("Type here")
        .with_size("large")
        .with_attribute("maxlength", "20");
    assert_eq!(f.placeholder.as_deref(), Some("Type here"));
    assert_eq!(f.size.as_deref(), Some("large"));
    assert_eq!(f.attributes.get("maxlength").map(String::as_str), Some("20"));
}
