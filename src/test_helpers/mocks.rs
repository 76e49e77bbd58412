// Scripted collaborators for exercising the wizard core without a real form
// library or backend.

use crate::orchestration::types::SubmitHandler;
use crate::orchestration::WizardCallbacks;
use crate::validation::{FieldErrors, SchemaValidator, ValidationReport};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Scripted schema validator with an owned field-value store
///
/// Fields fail validation when a failure message has been scripted for them;
/// everything else passes.
#[derive(Default)]
pub struct MockFormValidator {
    values: Mutex<Map<String, Value>>,
    failures: Mutex<BTreeMap<String, String>>,
}

impl MockFormValidator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Set a field value
    pub fn set_value(&self, field: impl Into<String>, value: Value) {
        self.values.lock().insert(field.into(), value);
    }

    /// Script a validation failure for a field
    pub fn fail_field(&self, field: impl Into<String>, message: impl Into<String>) {
        self.failures.lock().insert(field.into(), message.into());
    }

    /// Clear a scripted failure
    pub fn pass_field(&self, field: &str) {
        self.failures.lock().remove(field);
    }

    /// Clear all scripted failures
    pub fn clear_failures(&self) {
        self.failures.lock().clear();
    }

    fn errors_for(&self, fields: &[String]) -> FieldErrors {
        let failures = self.failures.lock();
        fields
            .iter()
            .filter_map(|field| {
                failures
                    .get(field)
                    .map(|message| (field.clone(), message.clone()))
            })
            .collect()
    }
}

impl SchemaValidator for MockFormValidator {
    fn validate_fields(&self, fields: &[String]) -> ValidationReport {
        let errors = self.errors_for(fields);
        if errors.is_empty() {
            ValidationReport::passed()
        } else {
            ValidationReport::failed(errors)
        }
    }

    fn validate_all(&self) -> ValidationReport {
        let errors: FieldErrors = self.failures.lock().clone();
        if errors.is_empty() {
            ValidationReport::passed()
        } else {
            ValidationReport::failed(errors)
        }
    }

    fn field_values(&self) -> Value {
        Value::Object(self.values.lock().clone())
    }

    fn reset_fields(&self) {
        self.values.lock().clear();
    }
}

/// Submit handler that records every invocation and can be scripted to fail
pub struct RecordingSubmitHandler {
    fail: AtomicBool,
    calls: Mutex<Vec<Value>>,
}

impl RecordingSubmitHandler {
    /// Handler that accepts every submission
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            fail: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Handler that rejects every submission
    pub fn rejecting() -> Arc<Self> {
        Arc::new(Self {
            fail: AtomicBool::new(true),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Change the scripted behavior
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of times the handler was invoked
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Field values the handler last received
    pub fn last_values(&self) -> Option<Value> {
        self.calls.lock().last().cloned()
    }
}

#[async_trait]
impl SubmitHandler for RecordingSubmitHandler {
    async fn submit(&self, values: Value) -> anyhow::Result<Value> {
        self.calls.lock().push(values);

        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("backend rejected the submission");
        }
        Ok(json!({ "status": "accepted" }))
    }
}

/// Records every fired callback as a readable entry
///
/// Entries look like `step_changed:2:forward`, `validation_error:0`,
/// `step_complete:1`, `step_skip:1`, `form_reset`.
#[derive(Clone, Default)]
pub struct CallbackLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallbackLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a [`WizardCallbacks`] bundle that appends to this log
    pub fn callbacks(&self) -> WizardCallbacks {
        let changed = self.entries.clone();
        let failed = self.entries.clone();
        let completed = self.entries.clone();
        let skipped = self.entries.clone();
        let reset = self.entries.clone();

        WizardCallbacks::new()
            .on_step_change(move |index, direction| {
                changed.lock().push(format!("step_changed:{index}:{direction}"));
            })
            .on_validation_error(move |index, _errors| {
                failed.lock().push(format!("validation_error:{index}"));
            })
            .on_step_complete(move |index, _data| {
                completed.lock().push(format!("step_complete:{index}"));
            })
            .on_step_skip(move |index| {
                skipped.lock().push(format!("step_skip:{index}"));
            })
            .on_form_reset(move || {
                reset.lock().push("form_reset".to_string());
            })
    }

    /// All recorded entries in firing order
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Number of entries starting with the given prefix
    pub fn count_of(&self, prefix: &str) -> usize {
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.starts_with(prefix))
            .count()
    }
}
