//! # Form Orchestration
//!
//! Coordination layer that turns user intents into validated step
//! transitions and caller-visible side effects.
//!
//! ## Core Components
//!
//! - **FormOrchestrator**: Owns one flow session; dispatches intents through
//!   guards and validation to the step state machine
//! - **WizardCallbacks**: Optional lifecycle hooks observing committed
//!   transitions
//! - **SubmitHandler**: Async port invoked with the full field snapshot on
//!   final submission
//! - **StepView**: Derived per-step view state for presentation shells

pub mod callbacks;
pub mod form_orchestrator;
pub mod types;

// Re-export key types for convenience
pub use callbacks::WizardCallbacks;
pub use form_orchestrator::FormOrchestrator;
pub use types::{IntentOutcome, StepView, SubmitHandler, WizardIntent};
