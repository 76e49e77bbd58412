//! Step descriptors and the ordered registry they live in.

use crate::error::{Result, StepflowError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declarative description of a single wizard step
///
/// Descriptors are immutable once a flow starts. `fields` names the subset of
/// form fields validated when this step is the one being left; an empty list
/// means the step passes validation vacuously.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDescriptor {
    /// Stable identifier, unique within a registry
    pub id: String,
    /// Human-readable title for presentation layers
    pub title: String,
    /// Form fields validated for this step
    #[serde(default)]
    pub fields: Vec<String>,
    /// Optional steps may be skipped when skipping is enabled
    #[serde(default)]
    pub optional: bool,
    /// Disabled steps can never become the active target of a jump
    #[serde(default)]
    pub disabled: bool,
    /// Caller-owned metadata, carried through untouched
    #[serde(default)]
    pub metadata: Value,
}

impl StepDescriptor {
    /// Create a descriptor with the given id and title
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            fields: Vec::new(),
            optional: false,
            disabled: false,
            metadata: Value::Null,
        }
    }

    /// Declare the form fields validated for this step
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Mark this step as optional (skippable)
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark this step as disabled
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Attach caller-owned metadata
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Ordered, immutable collection of step descriptors
#[derive(Debug, Clone)]
pub struct StepRegistry {
    steps: Vec<StepDescriptor>,
}

impl StepRegistry {
    /// Build a registry from descriptors in presentation order
    ///
    /// Rejects empty registries and duplicate step ids.
    pub fn new(steps: Vec<StepDescriptor>) -> Result<Self> {
        if steps.is_empty() {
            return Err(StepflowError::RegistryError(
                "A flow requires at least one step".to_string(),
            ));
        }

        for (i, step) in steps.iter().enumerate() {
            if steps[..i].iter().any(|other| other.id == step.id) {
                return Err(StepflowError::RegistryError(format!(
                    "Duplicate step id: {}",
                    step.id
                )));
            }
        }

        Ok(Self { steps })
    }

    /// Number of steps in the flow
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Registries are never empty, but the predicate is provided for
    /// completeness
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the terminal step
    pub fn last_index(&self) -> usize {
        self.steps.len() - 1
    }

    /// Descriptor at the given position
    pub fn descriptor(&self, index: usize) -> Option<&StepDescriptor> {
        self.steps.get(index)
    }

    /// Position of the step with the given id
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.id == id)
    }

    /// Fields validated for the step at the given position
    ///
    /// Out-of-range positions resolve to no fields.
    pub fn fields_for_step(&self, index: usize) -> &[String] {
        self.steps
            .get(index)
            .map(|step| step.fields.as_slice())
            .unwrap_or(&[])
    }

    /// Iterate descriptors in presentation order
    pub fn iter(&self) -> impl Iterator<Item = &StepDescriptor> {
        self.steps.iter()
    }
}
