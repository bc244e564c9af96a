use crate::error::{ModelError, ModelResult};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Outcome of running a sanitizer over one raw value.
///
/// `Invalid` is a distinct marker, never an empty or zero value, so the
/// engine can tell "sanitized to empty" apart from "rejected".
#[derive(Debug, Clone, PartialEq)]
pub enum Sanitized {
    Valid(Value),
    Invalid,
}

impl Sanitized {
    /// Shorthand for a valid string result.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Valid(Value::String(value.into()))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }

    /// Returns the sanitized value, or `None` when rejected.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Valid(v) => Some(v),
            Self::Invalid => None,
        }
    }
}

/// Caller-supplied sanitizer that replaces the built-in rule of a field.
pub type SanitizeFn = Arc<dyn Fn(&Value) -> Sanitized + Send + Sync>;

/// The kind of input a field represents.
///
/// Determines the built-in sanitizer and serves as the rendering hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Range,
    Password,
    Textarea,
    Wysiwyg,
    Checkbox,
    Multicheck,
    Radio,
    Select,
    File,
    Image,
    Color,
    Email,
    Url,
    Date,
    Html,
    Content,
    Title,
    Separator,
}

impl FieldType {
    /// Every variant, in declaration order.
    pub const ALL: [FieldType; 20] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Range,
        FieldType::Password,
        FieldType::Textarea,
        FieldType::Wysiwyg,
        FieldType::Checkbox,
        FieldType::Multicheck,
        FieldType::Radio,
        FieldType::Select,
        FieldType::File,
        FieldType::Image,
        FieldType::Color,
        FieldType::Email,
        FieldType::Url,
        FieldType::Date,
        FieldType::Html,
        FieldType::Content,
        FieldType::Title,
        FieldType::Separator,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Range => "range",
            Self::Password => "password",
            Self::Textarea => "textarea",
            Self::Wysiwyg => "wysiwyg",
            Self::Checkbox => "checkbox",
            Self::Multicheck => "multicheck",
            Self::Radio => "radio",
            Self::Select => "select",
            Self::File => "file",
            Self::Image => "image",
            Self::Color => "color",
            Self::Email => "email",
            Self::Url => "url",
            Self::Date => "date",
            Self::Html => "html",
            Self::Content => "content",
            Self::Title => "title",
            Self::Separator => "separator",
        }
    }

    /// Display-only fields are rendered but never hold a stored value.
    pub fn is_display_only(self) -> bool {
        matches!(
            self,
            Self::Html | Self::Content | Self::Title | Self::Separator
        )
    }

    /// Choice types that cannot be registered without options.
    pub fn requires_options(self) -> bool {
        matches!(self, Self::Select | Self::Radio | Self::Multicheck)
    }

    /// Value read back for a field that declares no default.
    pub fn implicit_default(self) -> Value {
        match self {
            Self::Checkbox => Value::String("off".into()),
            Self::Multicheck => Value::Array(Vec::new()),
            _ => Value::String(String::new()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ModelError::InvalidSchema(format!("unknown field type '{s}'")))
    }
}

/// Ordered key→label choices for select, radio and multicheck fields.
///
/// Serialized as a map; declaration order is kept on both sides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions(Vec<(String, String)>);

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a choice, replacing the label in place if the key exists.
    pub fn insert(&mut self, key: impl Into<String>, label: impl Into<String>) {
        let key = key.into();
        let label = label.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = label,
            None => self.0.push((key, label)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, label)| label.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, l)| (k.as_str(), l.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, L: Into<String>> FromIterator<(K, L)> for FieldOptions {
    fn from_iter<I: IntoIterator<Item = (K, L)>>(iter: I) -> Self {
        let mut options = Self::new();
        for (key, label) in iter {
            options.insert(key, label);
        }
        options
    }
}

impl Serialize for FieldOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, label) in &self.0 {
            map.serialize_entry(key, label)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldOptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OptionsVisitor;

        impl<'de> Visitor<'de> for OptionsVisitor {
            type Value = FieldOptions;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of option keys to labels")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut options = FieldOptions::new();
                while let Some((key, label)) = access.next_entry::<String, String>()? {
                    options.insert(key, label);
                }
                Ok(options)
            }
        }

        deserializer.deserialize_map(OptionsVisitor)
    }
}

/// Typed description of one settings input.
///
/// Deserializable from a settings file; the sanitizer override can only be
/// attached in code via [`FieldSchema::with_sanitizer`].
#[derive(Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    pub id: String,
    /// Owning section; filled in on registration.
    #[serde(skip)]
    pub section_id: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default, alias = "name", alias = "title")]
    pub label: String,
    #[serde(default, alias = "desc")]
    pub description: String,
    #[serde(rename = "default", default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "FieldOptions::is_empty")]
    pub options: FieldOptions,
    #[serde(skip)]
    pub sanitizer: Option<SanitizeFn>,
    #[serde(
        default,
        alias = "sanitization_error_message",
        skip_serializing_if = "Option::is_none"
    )]
    pub error_message: Option<String>,
    /// An empty submission removes the stored value instead of being ignored.
    #[serde(default)]
    pub allow_clear_on_empty: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Rendering width hint ("regular", "large", "500px", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Extra attributes handed to the rendering host verbatim.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl FieldSchema {
    pub fn new(id: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            section_id: String::new(),
            field_type,
            label: String::new(),
            description: String::new(),
            default_value: None,
            options: FieldOptions::new(),
            sanitizer: None,
            error_message: None,
            allow_clear_on_empty: false,
            placeholder: None,
            size: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Shorthand for a plain text field.
    pub fn text(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, FieldType::Text).with_label(label)
    }

    /// Shorthand for a multi-line text field.
    pub fn textarea(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, FieldType::Textarea).with_label(label)
    }

    /// Shorthand for a numeric field.
    pub fn number(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, FieldType::Number).with_label(label)
    }

    /// Shorthand for an on/off checkbox.
    pub fn checkbox(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, FieldType::Checkbox).with_label(label)
    }

    /// Shorthand for an email address field.
    pub fn email(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, FieldType::Email).with_label(label)
    }

    /// Shorthand for a URL field.
    pub fn url(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, FieldType::Url).with_label(label)
    }

    /// Shorthand for a choice field (`select`, `radio` or `multicheck`).
    pub fn choice<K, L>(
        id: impl Into<String>,
        field_type: FieldType,
        options: impl IntoIterator<Item = (K, L)>,
    ) -> Self
    where
        K: Into<String>,
        L: Into<String>,
    {
        Self::new(id, field_type).with_options(options)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_options<K, L>(mut self, options: impl IntoIterator<Item = (K, L)>) -> Self
    where
        K: Into<String>,
        L: Into<String>,
    {
        self.options = options.into_iter().collect();
        self
    }

    /// Replaces the built-in sanitizer for this field.
    pub fn with_sanitizer<F>(mut self, sanitizer: F) -> Self
    where
        F: Fn(&Value) -> Sanitized + Send + Sync + 'static,
    {
        self.sanitizer = Some(Arc::new(sanitizer));
        self
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn allow_clear_on_empty(mut self, allow: bool) -> Self {
        self.allow_clear_on_empty = allow;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Value read back when nothing is stored for this field.
    pub fn default_value(&self) -> Value {
        self.default_value
            .clone()
            .unwrap_or_else(|| self.field_type.implicit_default())
    }

    /// Message reported when this field's value is rejected.
    pub fn error_message(&self) -> String {
        self.error_message
            .clone()
            .unwrap_or_else(|| format!("Please insert a valid {}", self.field_type))
    }

    pub fn has_sanitizer_override(&self) -> bool {
        self.sanitizer.is_some()
    }

    /// Form input name, `section[field]`.
    pub fn label_for(&self) -> String {
        format!("{}[{}]", self.section_id, self.id)
    }

    /// Checks the declaration is structurally usable.
    pub fn validate(&self) -> ModelResult<()> {
        if self.id.trim().is_empty() {
            return Err(ModelError::InvalidSchema(format!(
                "{} field declared without an id",
                self.field_type
            )));
        }
        if self.field_type.requires_options() && self.options.is_empty() {
            return Err(ModelError::InvalidSchema(format!(
                "{} field '{}' requires options",
                self.field_type, self.id
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for FieldSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSchema")
            .field("id", &self.id)
            .field("section_id", &self.section_id)
            .field("field_type", &self.field_type)
            .field("label", &self.label)
            .field("description", &self.description)
            .field("default_value", &self.default_value)
            .field("options", &self.options)
            .field("sanitizer", &self.sanitizer.as_ref().map(|_| "<fn>"))
            .field("error_message", &self.error_message)
            .field("allow_clear_on_empty", &self.allow_clear_on_empty)
            .field("placeholder", &self.placeholder)
            .field("size", &self.size)
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl PartialEq for FieldSchema {
    fn eq(&self, other: &Self) -> bool {
        let same_sanitizer = match (&self.sanitizer, &other.sanitizer) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        same_sanitizer
            && self.id == other.id
            && self.section_id == other.section_id
            && self.field_type == other.field_type
            && self.label == other.label
            && self.description == other.description
            && self.default_value == other.default_value
            && self.options == other.options
            && self.error_message == other.error_message
            && self.allow_clear_on_empty == other.allow_clear_on_empty
            && self.placeholder == other.placeholder
            && self.size == other.size
            && self.attributes == other.attributes
    }
}
