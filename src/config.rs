//! # Wizard Configuration
//!
//! Configuration types that define the navigation, validation and reset
//! behavior of a wizard flow. Configuration is constructed by the caller and
//! is immutable for the lifetime of a flow instance.

use std::fmt;
use std::sync::Arc;

/// Pluggable business rule consulted on every jump request.
///
/// Receives `(current_index, target_index)` and returns `false` to deny the
/// jump. Any other result permits it.
pub type NavigationRule = Arc<dyn Fn(usize, usize) -> bool + Send + Sync>;

/// Top-level configuration for a wizard flow
#[derive(Clone)]
pub struct WizardConfig {
    /// Validate the step being left on every forward transition
    pub validate_on_step_change: bool,
    /// Validate a single field when the caller reports a blur event
    pub validate_on_blur: bool,
    /// Run whole-form validation before invoking the submit handler
    pub validate_on_submit: bool,
    /// Permit backward navigation from any step after the first
    pub allow_back_navigation: bool,
    /// Permit forward navigation (next / forward jumps)
    pub allow_forward_navigation: bool,
    /// Permit jumping to arbitrary forward steps; backward jumps are always
    /// governed by `allow_back_navigation` semantics instead
    pub allow_step_jumping: bool,
    /// Permit skipping the current step
    pub allow_skipping: bool,
    /// Optional caller-supplied rule consulted on every jump
    pub custom_navigation_rule: Option<NavigationRule>,
    /// Reset availability policy
    pub reset: ResetConfig,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            validate_on_step_change: true,
            validate_on_blur: false,
            validate_on_submit: true,
            allow_back_navigation: true,
            allow_forward_navigation: true,
            allow_step_jumping: false,
            allow_skipping: false,
            custom_navigation_rule: None,
            reset: ResetConfig::default(),
        }
    }
}

impl fmt::Debug for WizardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardConfig")
            .field("validate_on_step_change", &self.validate_on_step_change)
            .field("validate_on_blur", &self.validate_on_blur)
            .field("validate_on_submit", &self.validate_on_submit)
            .field("allow_back_navigation", &self.allow_back_navigation)
            .field("allow_forward_navigation", &self.allow_forward_navigation)
            .field("allow_step_jumping", &self.allow_step_jumping)
            .field("allow_skipping", &self.allow_skipping)
            .field(
                "custom_navigation_rule",
                &self.custom_navigation_rule.as_ref().map(|_| "<rule>"),
            )
            .field("reset", &self.reset)
            .finish()
    }
}

impl WizardConfig {
    /// Configuration with every navigation affordance enabled and no
    /// validation gates. Useful for free-form review flows and tests.
    pub fn permissive() -> Self {
        Self {
            validate_on_step_change: false,
            validate_on_blur: false,
            validate_on_submit: false,
            allow_back_navigation: true,
            allow_forward_navigation: true,
            allow_step_jumping: true,
            allow_skipping: true,
            custom_navigation_rule: None,
            reset: ResetConfig {
                enabled: true,
                ..ResetConfig::default()
            },
        }
    }

    /// Install a custom navigation rule
    pub fn with_navigation_rule(
        mut self,
        rule: impl Fn(usize, usize) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.custom_navigation_rule = Some(Arc::new(rule));
        self
    }
}

/// Reset availability policy
///
/// All gates are AND-combined: reset is available only when every configured
/// gate passes.
#[derive(Debug, Clone)]
pub struct ResetConfig {
    /// Master switch; reset intents are rejected outright when false
    pub enabled: bool,
    /// Defer the reset until the caller confirms it
    pub require_confirmation: bool,
    /// Message surfaced to the caller when confirmation is required
    pub confirmation_message: String,
    /// Permit reset while the flow is on the first step
    pub allow_reset_on_first_step: bool,
    /// Permit reset while the flow is on the last step
    pub allow_reset_on_last_step: bool,
    /// Minimum number of completed steps required before reset is offered
    pub min_steps_completed: usize,
    /// Upper bound on completed steps beyond which reset is withheld
    pub max_steps_completed: Option<usize>,
    /// Permit reset after a successful submission
    pub allow_reset_after_submission: bool,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            require_confirmation: true,
            confirmation_message: "Reset the form? All entered data will be lost.".to_string(),
            allow_reset_on_first_step: true,
            allow_reset_on_last_step: true,
            min_steps_completed: 0,
            max_steps_completed: None,
            allow_reset_after_submission: false,
        }
    }
}
