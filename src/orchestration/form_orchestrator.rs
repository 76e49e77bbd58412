//! # Form Orchestrator
//!
//! Turns user intents into validated transitions over the step state
//! machine, firing callbacks and broadcasting lifecycle events along the
//! way. One orchestrator owns one flow session from construction to
//! submission or reset.

use crate::config::WizardConfig;
use crate::constants::{events, system, DenialReason};
use crate::events::EventPublisher;
use crate::orchestration::callbacks::WizardCallbacks;
use crate::orchestration::types::{IntentOutcome, StepView, SubmitHandler, WizardIntent};
use crate::registry::StepRegistry;
use crate::state_machine::guards::{
    BackNavigationGuard, ForwardNavigationGuard, GuardContext, JumpGuard, NavigationGuard,
    ResetGuard, SkipGuard,
};
use crate::state_machine::{
    GuardError, NavigationDirection, StateStore, StepStateMachine, StepStatus, TransitionOutcome,
};
use crate::validation::{
    CustomValidator, FieldErrors, SchemaValidator, ValidationGateway, ValidationVerdict,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Orchestrates one wizard flow session
pub struct FormOrchestrator {
    flow_id: Uuid,
    registry: Arc<StepRegistry>,
    config: WizardConfig,
    machine: StepStateMachine,
    gateway: ValidationGateway,
    callbacks: WizardCallbacks,
    publisher: EventPublisher,
    submit_handler: Option<Arc<dyn SubmitHandler>>,
    is_validating: bool,
    is_submitting: bool,
    is_submitted: bool,
    pending_reset: bool,
    // Bumped on every reset; stale async completions compare against it
    generation: u64,
    last_validation_errors: Option<(usize, FieldErrors)>,
}

impl FormOrchestrator {
    /// Create an orchestrator for the given flow
    pub fn new(
        registry: StepRegistry,
        config: WizardConfig,
        validator: Arc<dyn SchemaValidator>,
    ) -> Self {
        let registry = Arc::new(registry);
        let machine = StepStateMachine::new(registry.len());
        let gateway = ValidationGateway::new(validator, registry.clone());

        Self {
            flow_id: Uuid::new_v4(),
            registry,
            config,
            machine,
            gateway,
            callbacks: WizardCallbacks::default(),
            publisher: EventPublisher::default(),
            submit_handler: None,
            is_validating: false,
            is_submitting: false,
            is_submitted: false,
            pending_reset: false,
            generation: 0,
            last_validation_errors: None,
        }
    }

    /// Attach a persistence store under the caller-chosen flow key and
    /// rehydrate the machine from it
    pub fn with_store(mut self, store: Arc<dyn StateStore>, key: impl Into<String>) -> Self {
        self.machine.attach_store(store, key);
        self
    }

    /// Attach a store under the default key for this flow id
    pub fn with_store_default_key(self, store: Arc<dyn StateStore>) -> Self {
        let key = format!("{}:{}", system::STATE_KEY_PREFIX, self.flow_id);
        self.with_store(store, key)
    }

    /// Install lifecycle hooks
    pub fn with_callbacks(mut self, callbacks: WizardCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Install the async submit handler invoked on the terminal step
    pub fn with_submit_handler(mut self, handler: Arc<dyn SubmitHandler>) -> Self {
        self.submit_handler = Some(handler);
        self
    }

    /// Install a custom validator run after schema validation passes
    pub fn with_custom_validator(mut self, custom: Arc<dyn CustomValidator>) -> Self {
        self.gateway.set_custom_validator(custom);
        self
    }

    /// Override the fields-for-step mapping used by validation
    pub fn with_fields_mapping(
        mut self,
        mapping: impl Fn(usize) -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        self.gateway.set_fields_mapping(mapping);
        self
    }

    /// Share an external lifecycle event publisher
    pub fn with_publisher(mut self, publisher: EventPublisher) -> Self {
        self.publisher = publisher;
        self
    }

    /// Dispatch a user intent to its handler
    pub async fn dispatch(&mut self, intent: WizardIntent) -> IntentOutcome {
        tracing::debug!(
            flow_id = %self.flow_id,
            intent = intent.intent_type(),
            current_index = self.machine.current_index(),
            "Handling wizard intent"
        );

        match intent {
            WizardIntent::Next => self.next().await,
            WizardIntent::Back => self.back(),
            WizardIntent::Skip => self.skip(),
            WizardIntent::JumpTo(target) => self.jump_to(target).await,
            WizardIntent::Submit => self.submit().await,
            WizardIntent::Reset => self.reset(),
        }
    }

    /// Advance to the next step, validating the step being left when
    /// configured
    pub async fn next(&mut self) -> IntentOutcome {
        if let Err(e) = ForwardNavigationGuard.check(&self.guard_context()) {
            return Self::denied(e);
        }
        if self.machine.is_last_step() {
            return IntentOutcome::Denied {
                reason: DenialReason::AtBoundary,
                detail: "already on the last step".to_string(),
            };
        }

        let current = self.machine.current_index();
        if self.config.validate_on_step_change {
            if let Some(errors) = self.validate_and_commit(current).await {
                return IntentOutcome::ValidationFailed {
                    index: current,
                    errors,
                };
            }
        }

        match self.machine.go_next() {
            TransitionOutcome::Moved {
                from,
                to,
                direction,
            } => {
                self.after_move(from, to, direction);
                IntentOutcome::Moved {
                    from,
                    to,
                    direction,
                }
            }
            TransitionOutcome::Rejected { reason } => IntentOutcome::Denied {
                reason,
                detail: "cannot advance".to_string(),
            },
        }
    }

    /// Return to the previous step; never validates the step being left
    pub fn back(&mut self) -> IntentOutcome {
        if let Err(e) = BackNavigationGuard.check(&self.guard_context()) {
            return Self::denied(e);
        }

        match self.machine.go_back() {
            TransitionOutcome::Moved {
                from,
                to,
                direction,
            } => {
                self.after_move(from, to, direction);
                IntentOutcome::Moved {
                    from,
                    to,
                    direction,
                }
            }
            TransitionOutcome::Rejected { reason } => IntentOutcome::Denied {
                reason,
                detail: "cannot move back".to_string(),
            },
        }
    }

    /// Skip the current step and advance
    pub fn skip(&mut self) -> IntentOutcome {
        if let Err(e) = SkipGuard.check(&self.guard_context()) {
            return Self::denied(e);
        }

        let index = self.machine.current_index();
        let outcome = self.machine.skip_step(index);

        self.callbacks.step_skipped(index);
        self.publisher.publish(
            events::STEP_SKIPPED,
            self.flow_id,
            json!({ "index": index }),
        );

        if let TransitionOutcome::Moved {
            from,
            to,
            direction,
        } = outcome
        {
            self.after_move(from, to, direction);
            IntentOutcome::Skipped { index, moved: true }
        } else {
            IntentOutcome::Skipped {
                index,
                moved: false,
            }
        }
    }

    /// Jump to an arbitrary step
    ///
    /// Forward jumps validate the step being left (when configured) with the
    /// same handling as [`Self::next`]; backward jumps commit
    /// unconditionally.
    pub async fn jump_to(&mut self, target: usize) -> IntentOutcome {
        let current = self.machine.current_index();
        if target == current {
            return IntentOutcome::Denied {
                reason: DenialReason::AtBoundary,
                detail: format!("already on step {target}"),
            };
        }

        if let Err(e) = (JumpGuard { target }).check(&self.guard_context()) {
            return Self::denied(e);
        }

        if target > current && self.config.validate_on_step_change {
            if let Some(errors) = self.validate_and_commit(current).await {
                return IntentOutcome::ValidationFailed {
                    index: current,
                    errors,
                };
            }
        }

        match self.machine.go_to_step(target) {
            TransitionOutcome::Moved {
                from,
                to,
                direction,
            } => {
                self.after_move(from, to, direction);
                IntentOutcome::Moved {
                    from,
                    to,
                    direction,
                }
            }
            TransitionOutcome::Rejected { reason } => IntentOutcome::Denied {
                reason,
                detail: format!("cannot jump to step {target}"),
            },
        }
    }

    /// Submit the whole form from the terminal step
    pub async fn submit(&mut self) -> IntentOutcome {
        if !self.machine.is_last_step() {
            return IntentOutcome::Denied {
                reason: DenialReason::NotOnLastStep,
                detail: "submit is only available on the last step".to_string(),
            };
        }
        if self.is_submitted {
            return IntentOutcome::Denied {
                reason: DenialReason::PolicyDenied,
                detail: "the form was already submitted".to_string(),
            };
        }

        let current = self.machine.current_index();

        if self.config.validate_on_submit {
            self.is_validating = true;
            let verdict = self.gateway.validate_all().await;
            self.is_validating = false;

            if let ValidationVerdict::Failed(errors) = verdict {
                self.last_validation_errors = Some((current, errors.clone()));
                self.callbacks.validation_failed(current, &errors);
                self.publisher.publish(
                    events::STEP_VALIDATION_FAILED,
                    self.flow_id,
                    json!({ "index": current, "errors": errors }),
                );
                return IntentOutcome::ValidationFailed {
                    index: current,
                    errors,
                };
            }
        }

        let Some(handler) = self.submit_handler.clone() else {
            return IntentOutcome::SubmitFailed {
                error: "no submit handler configured".to_string(),
            };
        };

        let generation = self.generation;
        let values = self.gateway.field_values();

        self.is_submitting = true;
        let result = handler.submit(values).await;
        self.is_submitting = false;

        match result {
            Ok(result) => {
                if self.generation != generation {
                    tracing::warn!(
                        flow_id = %self.flow_id,
                        "Submission resolved after the session was reset; discarding"
                    );
                    return IntentOutcome::SubmitFailed {
                        error: "submission completed after the session was reset".to_string(),
                    };
                }

                self.is_submitted = true;
                self.publisher.publish(
                    events::FORM_SUBMITTED,
                    self.flow_id,
                    json!({ "result": result }),
                );
                IntentOutcome::Submitted { result }
            }
            Err(e) => {
                tracing::error!(flow_id = %self.flow_id, error = %e, "Submit handler failed");
                self.publisher.publish(
                    events::FORM_SUBMIT_FAILED,
                    self.flow_id,
                    json!({ "error": e.to_string() }),
                );
                IntentOutcome::SubmitFailed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Request a reset of the flow
    ///
    /// When confirmation is configured the reset is deferred until
    /// [`Self::confirm_reset`].
    pub fn reset(&mut self) -> IntentOutcome {
        if let Err(e) = ResetGuard.check(&self.guard_context()) {
            return Self::denied(e);
        }

        if self.config.reset.require_confirmation {
            self.pending_reset = true;
            let message = self.config.reset.confirmation_message.clone();
            self.publisher.publish(
                events::FORM_RESET_REQUESTED,
                self.flow_id,
                json!({ "message": message }),
            );
            return IntentOutcome::ResetConfirmationRequired { message };
        }

        self.apply_reset()
    }

    /// Confirm a pending reset
    pub fn confirm_reset(&mut self) -> IntentOutcome {
        if !self.pending_reset {
            return IntentOutcome::Denied {
                reason: DenialReason::PolicyDenied,
                detail: "no reset is pending confirmation".to_string(),
            };
        }

        // State may have moved since the request; the gates must still pass
        if let Err(e) = ResetGuard.check(&self.guard_context()) {
            self.pending_reset = false;
            return Self::denied(e);
        }

        self.apply_reset()
    }

    /// Abandon a pending reset; returns whether one was pending
    pub fn cancel_reset(&mut self) -> bool {
        std::mem::take(&mut self.pending_reset)
    }

    /// Report a field blur, validating that field when configured
    pub fn field_blurred(&mut self, field: &str) -> ValidationVerdict {
        if !self.config.validate_on_blur {
            return ValidationVerdict::Passed;
        }

        let verdict = self.gateway.validate_field(field);
        if let ValidationVerdict::Failed(errors) = &verdict {
            let index = self.machine.current_index();
            self.last_validation_errors = Some((index, errors.clone()));
            self.callbacks.validation_failed(index, errors);
            self.publisher.publish(
                events::STEP_VALIDATION_FAILED,
                self.flow_id,
                json!({ "index": index, "errors": errors, "field": field }),
            );
        }
        verdict
    }

    /// Derived view state for the active step
    pub fn step_view(&self) -> StepView {
        let index = self.machine.current_index();
        let ctx = self.guard_context();

        let descriptor = self
            .registry
            .descriptor(index)
            .cloned()
            .unwrap_or_else(|| crate::registry::StepDescriptor::new("", ""));

        StepView {
            descriptor,
            index,
            total_steps: self.machine.total_steps(),
            is_first_step: self.machine.is_first_step(),
            is_last_step: self.machine.is_last_step(),
            visited: self.machine.is_step_visited(index),
            completed: self.machine.is_step_completed(index),
            skipped: self.machine.is_step_skipped(index),
            has_errors: matches!(&self.last_validation_errors, Some((i, _)) if *i == index),
            progress: self.machine.progress(),
            completion_progress: self.machine.completion_progress(),
            statuses: self.step_statuses(),
            can_go_back: BackNavigationGuard.check(&ctx).is_ok(),
            can_go_forward: ForwardNavigationGuard.check(&ctx).is_ok()
                && !self.machine.is_last_step(),
            can_skip: SkipGuard.check(&ctx).is_ok(),
            can_reset: ResetGuard.check(&ctx).is_ok(),
            is_validating: self.is_validating,
            is_submitting: self.is_submitting,
            is_submitted: self.is_submitted,
        }
    }

    /// Render the active step through a caller-owned render callback
    pub fn render<R>(&self, render_fn: impl FnOnce(&StepView) -> R) -> R {
        render_fn(&self.step_view())
    }

    /// Derived status for every step position, for flow indicators
    pub fn step_statuses(&self) -> Vec<StepStatus> {
        (0..self.machine.total_steps())
            .map(|index| self.machine.step_status(index))
            .collect()
    }

    // Accessors

    pub fn flow_id(&self) -> Uuid {
        self.flow_id
    }

    pub fn current_index(&self) -> usize {
        self.machine.current_index()
    }

    pub fn is_submitted(&self) -> bool {
        self.is_submitted
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn is_validating(&self) -> bool {
        self.is_validating
    }

    pub fn is_reset_pending(&self) -> bool {
        self.pending_reset
    }

    /// The underlying state machine, for queries
    pub fn machine(&self) -> &StepStateMachine {
        &self.machine
    }

    /// The step registry driving this flow
    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<crate::events::PublishedEvent> {
        self.publisher.subscribe()
    }

    // Internals

    fn guard_context(&self) -> GuardContext<'_> {
        GuardContext {
            config: &self.config,
            registry: &self.registry,
            current_index: self.machine.current_index(),
            completed_count: self.machine.completed_count(),
            is_submitted: self.is_submitted,
        }
    }

    fn denied(error: GuardError) -> IntentOutcome {
        let reason = match &error {
            GuardError::InvalidTarget { .. } => DenialReason::OutOfRange,
            GuardError::StepDisabled { .. } => DenialReason::StepDisabled,
            GuardError::NavigationDenied { .. } | GuardError::BusinessRuleViolation { .. } => {
                DenialReason::PolicyDenied
            }
        };

        IntentOutcome::Denied {
            reason,
            detail: error.to_string(),
        }
    }

    /// Validate the step being left and commit the result
    ///
    /// Success marks the step completed with a scoped snapshot; failure
    /// marks it incomplete. Returns the errors of a failed verdict.
    async fn validate_and_commit(&mut self, index: usize) -> Option<FieldErrors> {
        self.is_validating = true;
        let verdict = self.gateway.validate_step(index).await;
        self.is_validating = false;

        match verdict {
            ValidationVerdict::Passed => {
                let snapshot = self.gateway.step_snapshot(index);
                self.machine.mark_step_completed(index, Some(snapshot.clone()));
                self.last_validation_errors = None;

                self.callbacks.step_completed(index, &snapshot);
                self.publisher.publish(
                    events::STEP_COMPLETED,
                    self.flow_id,
                    json!({ "index": index, "data": snapshot }),
                );
                None
            }
            ValidationVerdict::Failed(errors) => {
                self.machine.mark_step_incomplete(index);
                self.last_validation_errors = Some((index, errors.clone()));

                self.callbacks.validation_failed(index, &errors);
                self.publisher.publish(
                    events::STEP_VALIDATION_FAILED,
                    self.flow_id,
                    json!({ "index": index, "errors": errors }),
                );
                Some(errors)
            }
        }
    }

    fn after_move(&mut self, from: usize, to: usize, direction: NavigationDirection) {
        self.callbacks.step_changed(to, direction);
        self.publisher.publish(
            events::STEP_CHANGED,
            self.flow_id,
            json!({ "from": from, "to": to, "direction": direction.to_string() }),
        );
    }

    fn apply_reset(&mut self) -> IntentOutcome {
        self.gateway.reset_fields();
        self.machine.reset();

        self.is_submitted = false;
        self.is_submitting = false;
        self.is_validating = false;
        self.pending_reset = false;
        self.last_validation_errors = None;
        self.generation += 1;

        self.callbacks.form_reset();
        self.publisher
            .publish(events::FORM_RESET, self.flow_id, json!({}));

        tracing::info!(flow_id = %self.flow_id, "Wizard flow reset");
        IntentOutcome::ResetApplied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResetConfig;
    use crate::test_helpers::{
        onboarding_registry, CallbackLog, MockFormValidator, RecordingSubmitHandler,
    };
    use std::sync::Arc;

    fn wizard_with(
        config: WizardConfig,
        validator: Arc<MockFormValidator>,
        log: &CallbackLog,
    ) -> FormOrchestrator {
        FormOrchestrator::new(onboarding_registry(), config, validator)
            .with_callbacks(log.callbacks())
    }

    #[tokio::test]
    async fn test_next_validates_completes_and_advances() {
        let validator = MockFormValidator::new();
        validator.set_value("email", json!("a@b.c"));
        validator.set_value("password", json!("hunter2"));
        let log = CallbackLog::new();
        let mut wizard = wizard_with(WizardConfig::default(), validator, &log);

        let outcome = wizard.next().await;

        assert_eq!(outcome.moved_to(), Some(1));
        assert!(wizard.machine().is_step_completed(0));
        assert_eq!(
            wizard.machine().step_data(0),
            Some(&json!({"email": "a@b.c", "password": "hunter2"}))
        );
        // completion is reported before the position change
        assert_eq!(
            log.entries(),
            vec!["step_complete:0", "step_changed:1:forward"]
        );
    }

    #[tokio::test]
    async fn test_next_blocked_by_validation_failure() {
        let validator = MockFormValidator::new();
        validator.fail_field("email", "email is required");
        let log = CallbackLog::new();
        let mut wizard = wizard_with(WizardConfig::default(), validator, &log);

        let outcome = wizard.next().await;

        match outcome {
            IntentOutcome::ValidationFailed { index, errors } => {
                assert_eq!(index, 0);
                assert_eq!(errors["email"], "email is required");
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert_eq!(wizard.current_index(), 0);
        assert!(!wizard.machine().is_step_completed(0));
        assert_eq!(log.count_of("validation_error"), 1);
        assert_eq!(log.count_of("step_changed"), 0);
    }

    #[tokio::test]
    async fn test_next_without_step_change_validation() {
        let validator = MockFormValidator::new();
        validator.fail_field("email", "email is required");
        let config = WizardConfig {
            validate_on_step_change: false,
            ..WizardConfig::default()
        };
        let log = CallbackLog::new();
        let mut wizard = wizard_with(config, validator, &log);

        assert_eq!(wizard.next().await.moved_to(), Some(1));
        assert!(!wizard.machine().is_step_completed(0));
    }

    #[tokio::test]
    async fn test_back_skips_validation_and_respects_guard() {
        let validator = MockFormValidator::new();
        validator.fail_field("email", "still broken");
        let config = WizardConfig {
            validate_on_step_change: false,
            ..WizardConfig::default()
        };
        let log = CallbackLog::new();
        let mut wizard = wizard_with(config, validator, &log);

        // denied on the first step
        assert!(wizard.back().is_denied());

        wizard.next().await;
        let outcome = wizard.back();
        assert_eq!(
            outcome,
            IntentOutcome::Moved {
                from: 1,
                to: 0,
                direction: NavigationDirection::Backward,
            }
        );
        assert_eq!(log.count_of("validation_error"), 0);
    }

    #[tokio::test]
    async fn test_skip_reserved_for_optional_steps() {
        let validator = MockFormValidator::new();
        let config = WizardConfig {
            allow_skipping: true,
            validate_on_step_change: false,
            ..WizardConfig::default()
        };
        let log = CallbackLog::new();
        let mut wizard = wizard_with(config, validator, &log);

        // step 0 (account) is required
        let denied = wizard.skip();
        assert_eq!(denied.denial_reason(), Some(DenialReason::PolicyDenied));

        // step 1 (profile) is optional
        wizard.next().await;
        let outcome = wizard.skip();
        assert_eq!(
            outcome,
            IntentOutcome::Skipped {
                index: 1,
                moved: true
            }
        );
        assert!(wizard.machine().is_step_skipped(1));
        assert_eq!(
            log.entries(),
            vec![
                "step_changed:1:forward",
                "step_skip:1",
                "step_changed:2:forward"
            ]
        );
    }

    #[tokio::test]
    async fn test_jump_policy() {
        let validator = MockFormValidator::new();
        let config = WizardConfig {
            validate_on_step_change: false,
            ..WizardConfig::default()
        };
        let log = CallbackLog::new();
        let mut wizard = wizard_with(config, validator.clone(), &log);

        // forward jump denied while jumping is disabled
        let denied = wizard.jump_to(2).await;
        assert_eq!(denied.denial_reason(), Some(DenialReason::PolicyDenied));

        wizard.next().await;
        wizard.next().await;

        // backward jump is always permitted
        let outcome = wizard.jump_to(0).await;
        assert_eq!(outcome.moved_to(), Some(0));
    }

    #[tokio::test]
    async fn test_forward_jump_validates_current_step() {
        let validator = MockFormValidator::new();
        validator.fail_field("email", "email is required");
        let config = WizardConfig {
            allow_step_jumping: true,
            ..WizardConfig::default()
        };
        let log = CallbackLog::new();
        let mut wizard = wizard_with(config, validator.clone(), &log);

        let outcome = wizard.jump_to(2).await;
        assert!(matches!(outcome, IntentOutcome::ValidationFailed { index: 0, .. }));
        assert_eq!(wizard.current_index(), 0);

        validator.clear_failures();
        let outcome = wizard.jump_to(2).await;
        assert_eq!(outcome.moved_to(), Some(2));
        assert!(wizard.machine().is_step_completed(0));
    }

    #[tokio::test]
    async fn test_submit_only_on_last_step() {
        let validator = MockFormValidator::new();
        let log = CallbackLog::new();
        let mut wizard = wizard_with(WizardConfig::default(), validator, &log)
            .with_submit_handler(RecordingSubmitHandler::accepting());

        let outcome = wizard.submit().await;
        assert_eq!(outcome.denial_reason(), Some(DenialReason::NotOnLastStep));
    }

    #[tokio::test]
    async fn test_submit_blocked_by_whole_form_validation() {
        let validator = MockFormValidator::new();
        let handler = RecordingSubmitHandler::accepting();
        let config = WizardConfig {
            validate_on_step_change: false,
            ..WizardConfig::default()
        };
        let log = CallbackLog::new();
        let mut wizard = wizard_with(config, validator.clone(), &log)
            .with_submit_handler(handler.clone());

        wizard.next().await;
        wizard.next().await;
        assert_eq!(wizard.current_index(), 2);

        validator.fail_field("email", "email is required");
        let outcome = wizard.submit().await;

        assert!(matches!(outcome, IntentOutcome::ValidationFailed { index: 2, .. }));
        assert!(!wizard.is_submitted());
        assert_eq!(wizard.current_index(), 2);
        assert_eq!(handler.call_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_success_sets_submitted() {
        let validator = MockFormValidator::new();
        validator.set_value("email", json!("a@b.c"));
        let handler = RecordingSubmitHandler::accepting();
        let config = WizardConfig::permissive();
        let log = CallbackLog::new();
        let mut wizard = wizard_with(config, validator, &log)
            .with_submit_handler(handler.clone());

        wizard.jump_to(2).await;
        let outcome = wizard.submit().await;

        assert!(matches!(outcome, IntentOutcome::Submitted { .. }));
        assert!(wizard.is_submitted());
        assert_eq!(handler.call_count(), 1);
        assert_eq!(handler.last_values().unwrap()["email"], "a@b.c");

        // a second submit is rejected
        assert!(wizard.submit().await.is_denied());
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_state() {
        let validator = MockFormValidator::new();
        let handler = RecordingSubmitHandler::rejecting();
        let config = WizardConfig::permissive();
        let log = CallbackLog::new();
        let mut wizard = wizard_with(config, validator, &log)
            .with_submit_handler(handler.clone());

        wizard.jump_to(2).await;
        let outcome = wizard.submit().await;

        assert!(matches!(outcome, IntentOutcome::SubmitFailed { .. }));
        assert!(!wizard.is_submitted());
        assert_eq!(wizard.current_index(), 2);
    }

    #[tokio::test]
    async fn test_submit_without_handler_fails_cleanly() {
        let validator = MockFormValidator::new();
        let config = WizardConfig::permissive();
        let log = CallbackLog::new();
        let mut wizard = wizard_with(config, validator, &log);

        wizard.jump_to(2).await;
        let outcome = wizard.submit().await;
        assert!(matches!(outcome, IntentOutcome::SubmitFailed { .. }));
        assert!(!wizard.is_submitted());
    }

    #[tokio::test]
    async fn test_reset_confirmation_flow() {
        let validator = MockFormValidator::new();
        validator.set_value("email", json!("a@b.c"));
        let mut config = WizardConfig::permissive();
        config.reset = ResetConfig {
            enabled: true,
            require_confirmation: true,
            ..ResetConfig::default()
        };
        let log = CallbackLog::new();
        let mut wizard = wizard_with(config, validator.clone(), &log);

        wizard.next().await;

        let outcome = wizard.reset();
        assert!(matches!(
            outcome,
            IntentOutcome::ResetConfirmationRequired { .. }
        ));
        assert!(wizard.is_reset_pending());
        assert_eq!(wizard.current_index(), 1);

        let outcome = wizard.confirm_reset();
        assert_eq!(outcome, IntentOutcome::ResetApplied);
        assert_eq!(wizard.current_index(), 0);
        assert!(!wizard.is_submitted());
        assert_eq!(wizard.machine().completed_count(), 0);
        // field values were restored to defaults
        assert_eq!(validator.field_values(), json!({}));
        assert_eq!(log.count_of("form_reset"), 1);
    }

    #[tokio::test]
    async fn test_reset_denied_when_disabled() {
        let validator = MockFormValidator::new();
        let log = CallbackLog::new();
        let mut wizard = wizard_with(WizardConfig::default(), validator, &log);

        assert!(wizard.reset().is_denied());
        // confirming with nothing pending is also denied
        assert!(wizard.confirm_reset().is_denied());
    }

    #[tokio::test]
    async fn test_cancel_reset() {
        let validator = MockFormValidator::new();
        let mut config = WizardConfig::permissive();
        config.reset.require_confirmation = true;
        let log = CallbackLog::new();
        let mut wizard = wizard_with(config, validator, &log);

        wizard.reset();
        assert!(wizard.cancel_reset());
        assert!(!wizard.is_reset_pending());
        assert!(wizard.confirm_reset().is_denied());
    }

    #[tokio::test]
    async fn test_field_blur_validation() {
        let validator = MockFormValidator::new();
        validator.fail_field("email", "email is required");
        let config = WizardConfig {
            validate_on_blur: true,
            ..WizardConfig::default()
        };
        let log = CallbackLog::new();
        let mut wizard = wizard_with(config, validator, &log);

        let verdict = wizard.field_blurred("email");
        assert!(!verdict.is_passed());
        assert_eq!(log.count_of("validation_error"), 1);

        // blur validation disabled: no callback fires
        let validator = MockFormValidator::new();
        validator.fail_field("email", "email is required");
        let log = CallbackLog::new();
        let mut wizard = wizard_with(WizardConfig::default(), validator, &log);
        assert!(wizard.field_blurred("email").is_passed());
        assert_eq!(log.count_of("validation_error"), 0);
    }

    #[tokio::test]
    async fn test_step_view_reflects_state() {
        let validator = MockFormValidator::new();
        validator.fail_field("email", "email is required");
        let log = CallbackLog::new();
        let mut wizard = wizard_with(WizardConfig::default(), validator, &log);

        wizard.next().await;
        let view = wizard.step_view();

        assert_eq!(view.index, 0);
        assert_eq!(view.descriptor.id, "account");
        assert!(view.is_first_step);
        assert!(view.has_errors);
        assert!(!view.can_go_back);
        assert!(view.can_go_forward);
        assert!(!view.can_skip);
        assert_eq!(view.statuses.len(), 3);
        assert_eq!(view.statuses[0], StepStatus::Active);

        let rendered = wizard.render(|view| format!("{}@{}", view.descriptor.id, view.index));
        assert_eq!(rendered, "account@0");
    }

    #[tokio::test]
    async fn test_lifecycle_events_published() {
        let validator = MockFormValidator::new();
        let log = CallbackLog::new();
        let mut wizard = wizard_with(WizardConfig::default(), validator, &log);
        let mut receiver = wizard.subscribe();

        wizard.next().await;

        let completed = receiver.recv().await.unwrap();
        assert_eq!(completed.name, events::STEP_COMPLETED);
        assert_eq!(completed.flow_id, wizard.flow_id());

        let changed = receiver.recv().await.unwrap();
        assert_eq!(changed.name, events::STEP_CHANGED);
        assert_eq!(changed.context["to"], 1);
    }

    #[tokio::test]
    async fn test_dispatch_routes_intents() {
        let validator = MockFormValidator::new();
        let config = WizardConfig::permissive();
        let log = CallbackLog::new();
        let mut wizard = wizard_with(config, validator, &log);

        assert!(wizard.dispatch(WizardIntent::Next).await.moved_to().is_some());
        assert!(wizard
            .dispatch(WizardIntent::Back)
            .await
            .moved_to()
            .is_some());
        assert!(matches!(
            wizard.dispatch(WizardIntent::Skip).await,
            IntentOutcome::Denied { .. }
        ));
    }
}
