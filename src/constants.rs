//! # System Constants
//!
//! Core constants and shared enums that define the operational boundaries of
//! the stepflow wizard engine.

use serde::{Deserialize, Serialize};

// Re-export state types for convenience
pub use crate::state_machine::{NavigationDirection, StepStatus};

/// Lifecycle events broadcast through the [`EventPublisher`](crate::events::EventPublisher)
pub mod events {
    // Step lifecycle events
    pub const STEP_CHANGED: &str = "step.changed";
    pub const STEP_COMPLETED: &str = "step.completed";
    pub const STEP_SKIPPED: &str = "step.skipped";
    pub const STEP_VALIDATION_FAILED: &str = "step.validation_failed";

    // Form lifecycle events
    pub const FORM_SUBMITTED: &str = "form.submitted";
    pub const FORM_SUBMIT_FAILED: &str = "form.submit_failed";
    pub const FORM_RESET: &str = "form.reset";
    pub const FORM_RESET_REQUESTED: &str = "form.reset_requested";
}

/// System-level defaults
pub mod system {
    /// Prefix for persisted state keys when the caller does not choose one
    pub const STATE_KEY_PREFIX: &str = "stepflow:state";

    /// Synthetic field key used to report custom-validator failures
    pub const CUSTOM_VALIDATION_KEY: &str = "custom";

    /// Default capacity of the lifecycle event channel
    pub const EVENT_CHANNEL_CAPACITY: usize = 1000;
}

/// Why a navigation intent was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// Target index lies outside `[0, total)`
    OutOfRange,
    /// Already at a boundary the move would cross
    AtBoundary,
    /// A navigation guard rejected the transition
    PolicyDenied,
    /// Step validation failed for the step being left
    ValidationFailed,
    /// The intent is only meaningful on the terminal step
    NotOnLastStep,
    /// The target step is disabled
    StepDisabled,
}

impl DenialReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenialReason::OutOfRange => "out_of_range",
            DenialReason::AtBoundary => "at_boundary",
            DenialReason::PolicyDenied => "policy_denied",
            DenialReason::ValidationFailed => "validation_failed",
            DenialReason::NotOnLastStep => "not_on_last_step",
            DenialReason::StepDisabled => "step_disabled",
        }
    }
}
