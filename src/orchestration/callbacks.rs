//! Caller-facing lifecycle hooks
//!
//! All hooks are optional; unset hooks cost nothing. Hooks observe committed
//! transitions, they cannot veto them (guards do that).

use crate::state_machine::NavigationDirection;
use crate::validation::FieldErrors;
use serde_json::Value;

type StepChangeHook = Box<dyn Fn(usize, NavigationDirection) + Send + Sync>;
type ValidationErrorHook = Box<dyn Fn(usize, &FieldErrors) + Send + Sync>;
type StepCompleteHook = Box<dyn Fn(usize, &Value) + Send + Sync>;
type StepSkipHook = Box<dyn Fn(usize) + Send + Sync>;
type FormResetHook = Box<dyn Fn() + Send + Sync>;

/// Bundle of optional lifecycle hooks
#[derive(Default)]
pub struct WizardCallbacks {
    on_step_change: Option<StepChangeHook>,
    on_validation_error: Option<ValidationErrorHook>,
    on_step_complete: Option<StepCompleteHook>,
    on_step_skip: Option<StepSkipHook>,
    on_form_reset: Option<FormResetHook>,
}

impl WizardCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoked after every committed position change with the new index
    pub fn on_step_change(
        mut self,
        hook: impl Fn(usize, NavigationDirection) + Send + Sync + 'static,
    ) -> Self {
        self.on_step_change = Some(Box::new(hook));
        self
    }

    /// Invoked when validation blocks a transition, with the failing step's
    /// field errors
    pub fn on_validation_error(
        mut self,
        hook: impl Fn(usize, &FieldErrors) + Send + Sync + 'static,
    ) -> Self {
        self.on_validation_error = Some(Box::new(hook));
        self
    }

    /// Invoked when a step is marked completed, with its data snapshot
    pub fn on_step_complete(
        mut self,
        hook: impl Fn(usize, &Value) + Send + Sync + 'static,
    ) -> Self {
        self.on_step_complete = Some(Box::new(hook));
        self
    }

    /// Invoked when a step is skipped
    pub fn on_step_skip(mut self, hook: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.on_step_skip = Some(Box::new(hook));
        self
    }

    /// Invoked after the flow has been reset
    pub fn on_form_reset(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_form_reset = Some(Box::new(hook));
        self
    }

    pub(crate) fn step_changed(&self, index: usize, direction: NavigationDirection) {
        if let Some(hook) = &self.on_step_change {
            hook(index, direction);
        }
    }

    pub(crate) fn validation_failed(&self, index: usize, errors: &FieldErrors) {
        if let Some(hook) = &self.on_validation_error {
            hook(index, errors);
        }
    }

    pub(crate) fn step_completed(&self, index: usize, data: &Value) {
        if let Some(hook) = &self.on_step_complete {
            hook(index, data);
        }
    }

    pub(crate) fn step_skipped(&self, index: usize) {
        if let Some(hook) = &self.on_step_skip {
            hook(index);
        }
    }

    pub(crate) fn form_reset(&self) {
        if let Some(hook) = &self.on_form_reset {
            hook();
        }
    }
}
