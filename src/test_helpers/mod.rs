// Test Helpers Module - Shared Testing Infrastructure
//
// Provides scripted collaborators and registry fixtures shared between unit
// tests and the integration tests under tests/.

pub mod fixtures;
pub mod mocks;

pub use fixtures::{checkout_registry, onboarding_registry};
pub use mocks::{CallbackLog, MockFormValidator, RecordingSubmitHandler};
