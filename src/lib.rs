#![allow(clippy::doc_markdown)] // Allow technical terms like JSON, serde in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Stepflow Core Rust
//!
//! Rust core for multi-step form flows: onboarding, checkout and guided
//! setup wizards.
//!
//! ## Overview
//!
//! Stepflow Core drives the state behind a wizard UI without owning any of
//! its rendering: it tracks the active step, records completion/skip/visit
//! state per step, coordinates field-level validation against a declarative
//! step registry, persists progress across reloads, and gates every
//! navigation intent behind pluggable guards.
//!
//! ## Architecture
//!
//! The crate follows a **ports and collaborators** design: the step state
//! machine is pure and storage-agnostic, while the schema validator, the
//! persistence store and the submit backend are caller-supplied trait
//! objects. The orchestration layer composes them and exposes intents
//! (next/back/skip/jump/submit/reset) plus derived view state.
//!
//! ## Module Organization
//!
//! - [`registry`] - Ordered, immutable step descriptors
//! - [`state_machine`] - Position-based step state machine, guards and the
//!   persistence port
//! - [`validation`] - Per-step and whole-form validation gateway
//! - [`orchestration`] - Intent handling, callbacks and view derivation
//! - [`events`] - Lifecycle event broadcasting
//! - [`config`] - Navigation, validation and reset configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use stepflow_core::config::WizardConfig;
//! use stepflow_core::orchestration::{FormOrchestrator, WizardIntent};
//! use stepflow_core::registry::{StepDescriptor, StepRegistry};
//! use stepflow_core::test_helpers::MockFormValidator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = StepRegistry::new(vec![
//!     StepDescriptor::new("account", "Account").with_fields(["email"]),
//!     StepDescriptor::new("review", "Review"),
//! ])?;
//!
//! let validator = MockFormValidator::new();
//! let mut wizard = FormOrchestrator::new(registry, WizardConfig::default(), validator);
//!
//! let outcome = wizard.dispatch(WizardIntent::Next).await;
//! println!("moved to {:?}", outcome.moved_to());
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! The [`test_helpers`] module ships scripted collaborators (a mock schema
//! validator, a recording submit handler, callback logs) used by both the
//! unit tests and the integration tests under `tests/`.

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod logging;
pub mod orchestration;
pub mod registry;
pub mod state_machine;
pub mod test_helpers;
pub mod validation;

pub use config::{ResetConfig, WizardConfig};
pub use constants::DenialReason;
// Re-export constants events with a distinct name to avoid conflict
pub use constants::events as lifecycle_events;
pub use error::{Result, StepflowError};
pub use events::{EventPublisher, PublishedEvent};
pub use orchestration::{
    FormOrchestrator, IntentOutcome, StepView, SubmitHandler, WizardCallbacks, WizardIntent,
};
pub use registry::{StepDescriptor, StepRegistry};
pub use state_machine::{
    InMemoryStorage, JsonStateStore, KeyValueStorage, NavigationDirection, PersistedState,
    StateStore, StepStateMachine, StepStatus, TransitionOutcome,
};
pub use validation::{
    CustomValidator, FieldErrors, SchemaValidator, ValidationGateway, ValidationReport,
    ValidationVerdict,
};
