//! Field validation for wizard flows
//!
//! Wraps a caller-supplied schema validator behind the [`ValidationGateway`],
//! which scopes validation to the fields of a single step and layers an
//! optional asynchronous custom validator on top.

use crate::constants::system::CUSTOM_VALIDATION_KEY;
use crate::registry::StepRegistry;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Field name to error message, scoped to whatever was validated
pub type FieldErrors = BTreeMap<String, String>;

/// Raw result returned by the schema validator collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(default)]
    pub errors: FieldErrors,
}

impl ValidationReport {
    /// Report with no errors
    pub fn passed() -> Self {
        Self {
            valid: true,
            errors: FieldErrors::new(),
        }
    }

    /// Report carrying the given field errors
    pub fn failed(errors: FieldErrors) -> Self {
        Self {
            valid: false,
            errors,
        }
    }
}

/// Gateway-level verdict after schema and custom validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationVerdict {
    Passed,
    Failed(FieldErrors),
}

impl ValidationVerdict {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Field errors of a failed verdict
    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Passed => None,
            Self::Failed(errors) => Some(errors),
        }
    }
}

/// Schema validator collaborator
///
/// Owns the field-value store; the wizard core only reads snapshots through
/// `field_values` at commit time.
pub trait SchemaValidator: Send + Sync {
    /// Validate only the named fields
    fn validate_fields(&self, fields: &[String]) -> ValidationReport;

    /// Validate every field; used at final submission
    fn validate_all(&self) -> ValidationReport;

    /// Current snapshot of all field values
    fn field_values(&self) -> Value;

    /// Restore every field to its default value
    ///
    /// Invoked on form reset. The default implementation does nothing, for
    /// validators whose field store is reset elsewhere.
    fn reset_fields(&self) {}
}

/// Optional business-level validator run after schema validation passes
///
/// A `false` result or an error counts as failure, reported under the
/// synthetic `"custom"` key.
#[async_trait]
pub trait CustomValidator: Send + Sync {
    async fn validate(&self, step_index: usize, values: &Value) -> anyhow::Result<bool>;
}

/// Maps a step position to the form fields validated for it
pub type FieldsForStep = Arc<dyn Fn(usize) -> Vec<String> + Send + Sync>;

/// Coordinates per-step and whole-form validation
pub struct ValidationGateway {
    validator: Arc<dyn SchemaValidator>,
    fields_for_step: FieldsForStep,
    custom_validator: Option<Arc<dyn CustomValidator>>,
}

impl ValidationGateway {
    /// Create a gateway whose fields-for-step mapping is the registry's
    /// declared descriptor fields
    pub fn new(validator: Arc<dyn SchemaValidator>, registry: Arc<StepRegistry>) -> Self {
        let fields_for_step: FieldsForStep =
            Arc::new(move |index| registry.fields_for_step(index).to_vec());

        Self {
            validator,
            fields_for_step,
            custom_validator: None,
        }
    }

    /// Override the fields-for-step mapping
    pub fn with_fields_mapping(
        mut self,
        mapping: impl Fn(usize) -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        self.fields_for_step = Arc::new(mapping);
        self
    }

    /// Install a custom validator run after schema validation passes
    pub fn with_custom_validator(mut self, custom: Arc<dyn CustomValidator>) -> Self {
        self.set_custom_validator(custom);
        self
    }

    /// Setter form of [`Self::with_custom_validator`]
    pub fn set_custom_validator(&mut self, custom: Arc<dyn CustomValidator>) {
        self.custom_validator = Some(custom);
    }

    /// Setter form of [`Self::with_fields_mapping`]
    pub fn set_fields_mapping(
        &mut self,
        mapping: impl Fn(usize) -> Vec<String> + Send + Sync + 'static,
    ) {
        self.fields_for_step = Arc::new(mapping);
    }

    /// Validate the fields belonging to one step
    ///
    /// Steps with no mapped fields pass schema validation vacuously; the
    /// custom validator still runs for them.
    pub async fn validate_step(&self, step_index: usize) -> ValidationVerdict {
        let fields = (self.fields_for_step)(step_index);

        if !fields.is_empty() {
            let report = self.validator.validate_fields(&fields);
            if !report.valid {
                tracing::debug!(
                    step_index = step_index,
                    error_count = report.errors.len(),
                    "Step failed schema validation"
                );
                return ValidationVerdict::Failed(report.errors);
            }
        }

        self.run_custom_validator(step_index).await
    }

    /// Validate every field, for final submission
    pub async fn validate_all(&self) -> ValidationVerdict {
        let report = self.validator.validate_all();
        if !report.valid {
            return ValidationVerdict::Failed(report.errors);
        }
        ValidationVerdict::Passed
    }

    /// Validate a single field, for blur-triggered validation
    pub fn validate_field(&self, field: &str) -> ValidationVerdict {
        let report = self.validator.validate_fields(&[field.to_string()]);
        if report.valid {
            ValidationVerdict::Passed
        } else {
            ValidationVerdict::Failed(report.errors)
        }
    }

    /// Current snapshot of all field values
    pub fn field_values(&self) -> Value {
        self.validator.field_values()
    }

    /// Snapshot of just one step's fields, captured at completion time
    pub fn step_snapshot(&self, step_index: usize) -> Value {
        let fields = (self.fields_for_step)(step_index);
        let values = self.validator.field_values();

        match values {
            Value::Object(map) => {
                let scoped: serde_json::Map<String, Value> = map
                    .into_iter()
                    .filter(|(key, _)| fields.iter().any(|field| field == key))
                    .collect();
                Value::Object(scoped)
            }
            // Non-object stores cannot be scoped per step
            other => other,
        }
    }

    /// Restore every field to its default value
    pub fn reset_fields(&self) {
        self.validator.reset_fields();
    }

    async fn run_custom_validator(&self, step_index: usize) -> ValidationVerdict {
        let Some(custom) = &self.custom_validator else {
            return ValidationVerdict::Passed;
        };

        let values = self.validator.field_values();
        match custom.validate(step_index, &values).await {
            Ok(true) => ValidationVerdict::Passed,
            Ok(false) => {
                let mut errors = FieldErrors::new();
                errors.insert(
                    CUSTOM_VALIDATION_KEY.to_string(),
                    "Custom validation failed".to_string(),
                );
                ValidationVerdict::Failed(errors)
            }
            Err(e) => {
                tracing::warn!(step_index = step_index, error = %e, "Custom validator failed");
                let mut errors = FieldErrors::new();
                errors.insert(CUSTOM_VALIDATION_KEY.to_string(), e.to_string());
                ValidationVerdict::Failed(errors)
            }
        }
    }
}
