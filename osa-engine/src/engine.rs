use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::render::{FieldView, RenderHost};
use crate::storage::StorageHost;
use crate::submission::{FieldError, Submission};
use osa_model::{FieldSchema, FieldType, Record, RecordKey, Registry, Sanitized, Section};
use osa_sanitize::{is_empty_input, sanitize};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Untrusted form input: field id → raw value.
pub type RawValues = serde_json::Map<String, Value>;

/// Reconciles submitted values against a [`Registry`] and persists them
/// through a [`StorageHost`].
pub struct SettingsEngine<'r, S> {
    registry: &'r Registry,
    storage: S,
    config: EngineConfig,
}

impl<'r, S: StorageHost> SettingsEngine<'r, S> {
    pub fn new(registry: &'r Registry, storage: S) -> Self {
        Self::with_config(registry, storage, EngineConfig::default())
    }

    pub fn with_config(registry: &'r Registry, storage: S, config: EngineConfig) -> Self {
        Self {
            registry,
            storage,
            config,
        }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Sanitizes `raw` against the section behind `key` and returns the
    /// record that would be stored, without writing it.
    ///
    /// The result starts from the stored record. Accepted values overwrite
    /// it, rejected ones leave the previous value (or no key) in place and
    /// are reported in [`Submission::errors`]. Checkboxes that are absent or
    /// empty are submitted as `"off"`, since an unchecked box posts nothing.
    pub fn submit(&self, key: impl Into<RecordKey>, raw: &RawValues) -> EngineResult<Submission> {
        let key = key.into();
        let section = self.registry.require_section(key.section_id())?;
        let old_record = self.stored(&key)?;
        let mut submission = Submission {
            record: old_record.clone(),
            errors: Vec::new(),
        };

        for (field_id, raw_value) in raw {
            let Some(schema) = section.field(field_id) else {
                self.accept_unknown(section, field_id, raw_value, &mut submission);
                continue;
            };
            if schema.field_type.is_display_only() {
                debug!(record = %key, field_id = %field_id, "Display-only field ignored");
                continue;
            }
            if is_empty_input(raw_value) && !schema.has_sanitizer_override() {
                if schema.field_type == FieldType::Checkbox {
                    apply(&key, schema, &unchecked(), &old_record, &mut submission);
                } else if schema.allow_clear_on_empty {
                    debug!(record = %key, field_id = %field_id, "Empty input clears stored value");
                    submission.record.remove(field_id);
                } else {
                    debug!(record = %key, field_id = %field_id, "Empty input skipped");
                }
                continue;
            }
            apply(&key, schema, raw_value, &old_record, &mut submission);
        }

        for schema in section.fields() {
            if schema.field_type == FieldType::Checkbox && !raw.contains_key(&schema.id) {
                apply(&key, schema, &unchecked(), &old_record, &mut submission);
            }
        }

        Ok(submission)
    }

    /// [`submit`](Self::submit), then writes the reconciled record.
    pub fn save(&self, key: impl Into<RecordKey>, raw: &RawValues) -> EngineResult<Submission> {
        let key = key.into();
        let submission = self.submit(&key, raw)?;
        self.storage.set(&key, &submission.record)?;
        info!(
            record = %key,
            fields = submission.record.len(),
            errors = submission.errors.len(),
            "Settings saved"
        );
        Ok(submission)
    }

    /// Removes the stored record; reads fall back to defaults afterward.
    pub fn reset(&self, key: impl Into<RecordKey>) -> EngineResult<()> {
        let key = key.into();
        self.registry.require_section(key.section_id())?;
        self.storage.delete(&key)?;
        info!(record = %key, "Settings reset");
        Ok(())
    }

    /// The stored record as-is, empty when nothing was saved.
    pub fn stored(&self, key: &RecordKey) -> EngineResult<Record> {
        Ok(self.storage.get(key)?.unwrap_or_default())
    }

    /// Stored value of one field, or its default.
    pub fn value(&self, key: impl Into<RecordKey>, field_id: &str) -> EngineResult<Value> {
        let key = key.into();
        let schema = self.registry.get_field_schema(key.section_id(), field_id)?;
        let record = self.stored(&key)?;
        Ok(current_value(&record, schema))
    }

    /// Every input field of the section with its stored or default value;
    /// display-only fields are left out.
    pub fn values(&self, key: impl Into<RecordKey>) -> EngineResult<Record> {
        let key = key.into();
        let section = self.registry.require_section(key.section_id())?;
        let record = self.stored(&key)?;
        Ok(section
            .input_fields()
            .map(|schema| (schema.id.clone(), current_value(&record, schema)))
            .collect())
    }

    /// Page-level values of every section, keyed `<section>_<field>`.
    pub fn constants(&self) -> EngineResult<Record> {
        let mut constants = Record::new();
        for section in self.registry.sections() {
            let record = self.stored(&RecordKey::section(section.id()))?;
            for schema in section.input_fields() {
                constants.insert(
                    format!("{}_{}", section.id(), schema.id),
                    current_value(&record, schema),
                );
            }
        }
        Ok(constants)
    }

    /// Hands the section behind `key` to `host`, field by field, with current
    /// values and the errors that target each field.
    pub fn render<R: RenderHost + ?Sized>(
        &self,
        key: impl Into<RecordKey>,
        host: &mut R,
        errors: &[FieldError],
    ) -> EngineResult<()> {
        let key = key.into();
        let section = self.registry.require_section(key.section_id())?;
        let record = self.stored(&key)?;

        host.render_section(section);
        for schema in section.fields() {
            let value = (!schema.field_type.is_display_only()).then(|| current_value(&record, schema));
            let field_errors: Vec<&FieldError> = errors
                .iter()
                .filter(|e| e.section_id == section.id() && e.field_id == schema.id)
                .collect();
            host.render_field(FieldView {
                section,
                schema,
                value: value.as_ref(),
                errors: &field_errors,
            });
        }
        Ok(())
    }

    fn accept_unknown(
        &self,
        section: &Section,
        field_id: &str,
        raw_value: &Value,
        submission: &mut Submission,
    ) {
        if self.config.accepts_unknown(field_id) {
            debug!(section_id = %section.id(), field_id, "Unregistered field passed through");
            submission.record.insert(field_id.to_string(), raw_value.clone());
        } else {
            warn!(section_id = %section.id(), field_id, "Unregistered field rejected");
            submission
                .errors
                .push(FieldError::unknown_field(section.id(), field_id));
        }
    }
}

/// Runs the field's sanitizer and folds the outcome into `submission`.
fn apply(
    key: &RecordKey,
    schema: &FieldSchema,
    raw_value: &Value,
    old_record: &Record,
    submission: &mut Submission,
) {
    match sanitize(schema, raw_value) {
        Sanitized::Valid(value) => {
            debug!(record = %key, field_id = %schema.id, field_type = %schema.field_type, "Field accepted");
            submission.record.insert(schema.id.clone(), value);
        }
        Sanitized::Invalid => {
            warn!(record = %key, field_id = %schema.id, field_type = %schema.field_type, "Field value rejected");
            match old_record.get(&schema.id) {
                Some(previous) => {
                    submission.record.insert(schema.id.clone(), previous.clone());
                }
                None => {
                    submission.record.remove(&schema.id);
                }
            }
            submission.errors.push(FieldError::invalid_value(
                key.section_id(),
                schema.id.as_str(),
                schema.error_message(),
            ));
        }
    }
}

/// What an unchecked checkbox would have posted.
fn unchecked() -> Value {
    Value::String("off".into())
}

fn current_value(record: &Record, schema: &FieldSchema) -> Value {
    record
        .get(&schema.id)
        .cloned()
        .unwrap_or_else(|| schema.default_value())
}
