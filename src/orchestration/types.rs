//! # Orchestration Types
//!
//! Core types shared across the form orchestration layer: user intents,
//! intent outcomes, the async submit port and the derived per-step view.

use crate::constants::DenialReason;
use crate::registry::StepDescriptor;
use crate::state_machine::{NavigationDirection, StepStatus};
use crate::validation::FieldErrors;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// User intent fed into the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum WizardIntent {
    /// Advance to the next step
    Next,
    /// Return to the previous step
    Back,
    /// Skip the current step
    Skip,
    /// Jump to an arbitrary step
    JumpTo(usize),
    /// Submit the whole form
    Submit,
    /// Reset the flow
    Reset,
}

impl WizardIntent {
    /// Get a string representation of the intent for logging
    pub fn intent_type(&self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Back => "back",
            Self::Skip => "skip",
            Self::JumpTo(_) => "jump_to",
            Self::Submit => "submit",
            Self::Reset => "reset",
        }
    }
}

/// Outcome of handling one intent
///
/// Denials and validation failures are explicit outcomes so callers can
/// assert on them directly instead of diffing state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IntentOutcome {
    /// The position changed
    Moved {
        from: usize,
        to: usize,
        direction: NavigationDirection,
    },
    /// The current step was marked skipped; `moved` reports whether the
    /// position advanced (it cannot on the terminal step)
    Skipped { index: usize, moved: bool },
    /// A guard or boundary rejected the intent; state is unchanged
    Denied {
        reason: DenialReason,
        detail: String,
    },
    /// Validation of the step being left failed; the flow stays put
    ValidationFailed { index: usize, errors: FieldErrors },
    /// The submit handler succeeded and the session is now submitted
    Submitted { result: Value },
    /// The submit handler failed or resolved after the session was reset;
    /// position is unchanged
    SubmitFailed { error: String },
    /// Reset requires confirmation before it is applied
    ResetConfirmationRequired { message: String },
    /// The flow was reset to its initial state
    ResetApplied,
}

impl IntentOutcome {
    /// Check if the intent was denied by policy or boundary
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied { .. })
    }

    /// Denial reason, if the intent was denied
    pub fn denial_reason(&self) -> Option<DenialReason> {
        match self {
            Self::Denied { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// Target index of a committed move
    pub fn moved_to(&self) -> Option<usize> {
        match self {
            Self::Moved { to, .. } => Some(*to),
            _ => None,
        }
    }
}

/// Async submit port invoked on the terminal step
///
/// Receives the full field-value snapshot; the returned value is surfaced to
/// the caller in [`IntentOutcome::Submitted`].
#[async_trait]
pub trait SubmitHandler: Send + Sync {
    async fn submit(&self, values: Value) -> anyhow::Result<Value>;
}

/// Derived view state for the active step, consumed by presentation shells
#[derive(Debug, Clone, Serialize)]
pub struct StepView {
    /// Descriptor of the active step
    pub descriptor: StepDescriptor,
    pub index: usize,
    pub total_steps: usize,
    pub is_first_step: bool,
    pub is_last_step: bool,
    pub visited: bool,
    pub completed: bool,
    pub skipped: bool,
    /// The last validation failure targeted this step and has not cleared
    pub has_errors: bool,
    /// Position progress percentage
    pub progress: u32,
    /// Completed-steps percentage
    pub completion_progress: u32,
    /// Derived status per step position, for flow indicators
    pub statuses: Vec<StepStatus>,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub can_skip: bool,
    pub can_reset: bool,
    pub is_validating: bool,
    pub is_submitting: bool,
    pub is_submitted: bool,
}
