use super::errors::{business_rule_violation, navigation_denied, GuardError, GuardResult};
use crate::config::WizardConfig;
use crate::registry::StepRegistry;

/// Snapshot of the state a guard decides over
///
/// Guards are pure predicates: everything they need is captured here and no
/// guard mutates anything.
#[derive(Clone, Copy)]
pub struct GuardContext<'a> {
    pub config: &'a WizardConfig,
    pub registry: &'a StepRegistry,
    pub current_index: usize,
    pub completed_count: usize,
    pub is_submitted: bool,
}

/// Trait for implementing navigation guards
pub trait NavigationGuard {
    /// Check if the transition is allowed
    fn check(&self, ctx: &GuardContext<'_>) -> GuardResult<()>;

    /// Get a description of this guard for logging
    fn description(&self) -> &'static str;
}

/// Guard for backward navigation: allowed by configuration and not on the
/// first step
pub struct BackNavigationGuard;

impl NavigationGuard for BackNavigationGuard {
    fn check(&self, ctx: &GuardContext<'_>) -> GuardResult<()> {
        if !ctx.config.allow_back_navigation {
            return Err(navigation_denied("back navigation is disabled"));
        }
        if ctx.current_index == 0 {
            return Err(navigation_denied("already on the first step"));
        }
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Back navigation must be enabled and the flow past the first step"
    }
}

/// Guard for advancing to the next step
pub struct ForwardNavigationGuard;

impl NavigationGuard for ForwardNavigationGuard {
    fn check(&self, ctx: &GuardContext<'_>) -> GuardResult<()> {
        if !ctx.config.allow_forward_navigation {
            return Err(navigation_denied("forward navigation is disabled"));
        }
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Forward navigation must be enabled"
    }
}

/// Guard for jumping to an arbitrary step
///
/// Backward jumps are always permitted; forward jumps require step jumping
/// to be enabled. A configured custom navigation rule can veto either.
pub struct JumpGuard {
    pub target: usize,
}

impl NavigationGuard for JumpGuard {
    fn check(&self, ctx: &GuardContext<'_>) -> GuardResult<()> {
        let descriptor = ctx.registry.descriptor(self.target).ok_or_else(|| {
            GuardError::InvalidTarget {
                index: self.target,
                reason: format!("flow has {} steps", ctx.registry.len()),
            }
        })?;

        if descriptor.disabled {
            return Err(GuardError::StepDisabled { index: self.target });
        }

        if self.target > ctx.current_index && !ctx.config.allow_step_jumping {
            return Err(navigation_denied("forward step jumping is disabled"));
        }

        if let Some(rule) = &ctx.config.custom_navigation_rule {
            if !rule(ctx.current_index, self.target) {
                return Err(navigation_denied(format!(
                    "custom navigation rule rejected jump from {} to {}",
                    ctx.current_index, self.target
                )));
            }
        }

        Ok(())
    }

    fn description(&self) -> &'static str {
        "Jump target must be reachable under the jumping policy and custom rules"
    }
}

/// Guard for skipping the current step
///
/// Skipping is reserved for steps declared optional.
pub struct SkipGuard;

impl NavigationGuard for SkipGuard {
    fn check(&self, ctx: &GuardContext<'_>) -> GuardResult<()> {
        if !ctx.config.allow_skipping {
            return Err(navigation_denied("skipping is disabled"));
        }

        let descriptor = ctx
            .registry
            .descriptor(ctx.current_index)
            .ok_or_else(|| GuardError::InvalidTarget {
                index: ctx.current_index,
                reason: "current index out of range".to_string(),
            })?;

        if !descriptor.optional {
            return Err(business_rule_violation(format!(
                "step '{}' is required and cannot be skipped",
                descriptor.id
            )));
        }

        Ok(())
    }

    fn description(&self) -> &'static str {
        "Skipping must be enabled and the current step optional"
    }
}

/// Guard for resetting the flow
///
/// Every configured gate must pass: master switch, submission state,
/// first/last-step policy, and completed-count bounds.
pub struct ResetGuard;

impl NavigationGuard for ResetGuard {
    fn check(&self, ctx: &GuardContext<'_>) -> GuardResult<()> {
        let reset = &ctx.config.reset;

        if !reset.enabled {
            return Err(business_rule_violation("reset is disabled"));
        }

        if ctx.is_submitted && !reset.allow_reset_after_submission {
            return Err(business_rule_violation(
                "the form was already submitted and post-submission reset is disabled",
            ));
        }

        if ctx.current_index == 0 && !reset.allow_reset_on_first_step {
            return Err(business_rule_violation("reset is not offered on the first step"));
        }

        if ctx.current_index == ctx.registry.last_index() && !reset.allow_reset_on_last_step {
            return Err(business_rule_violation("reset is not offered on the last step"));
        }

        if ctx.completed_count < reset.min_steps_completed {
            return Err(business_rule_violation(format!(
                "{} steps completed, reset requires at least {}",
                ctx.completed_count, reset.min_steps_completed
            )));
        }

        if let Some(max) = reset.max_steps_completed {
            if ctx.completed_count > max {
                return Err(business_rule_violation(format!(
                    "{} steps completed, reset is withheld beyond {}",
                    ctx.completed_count, max
                )));
            }
        }

        Ok(())
    }

    fn description(&self) -> &'static str {
        "All reset gates must pass"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResetConfig;
    use crate::registry::StepDescriptor;

    fn registry() -> StepRegistry {
        StepRegistry::new(vec![
            StepDescriptor::new("account", "Account"),
            StepDescriptor::new("profile", "Profile").optional(),
            StepDescriptor::new("extras", "Extras").disabled(),
            StepDescriptor::new("review", "Review"),
        ])
        .unwrap()
    }

    fn ctx<'a>(
        config: &'a WizardConfig,
        registry: &'a StepRegistry,
        current_index: usize,
    ) -> GuardContext<'a> {
        GuardContext {
            config,
            registry,
            current_index,
            completed_count: 0,
            is_submitted: false,
        }
    }

    #[test]
    fn test_back_guard_denies_first_step() {
        let config = WizardConfig::default();
        let registry = registry();
        assert!(BackNavigationGuard.check(&ctx(&config, &registry, 0)).is_err());
        assert!(BackNavigationGuard.check(&ctx(&config, &registry, 2)).is_ok());
    }

    #[test]
    fn test_back_guard_respects_configuration() {
        let config = WizardConfig {
            allow_back_navigation: false,
            ..WizardConfig::default()
        };
        let registry = registry();
        assert!(BackNavigationGuard.check(&ctx(&config, &registry, 2)).is_err());
    }

    #[test]
    fn test_jump_guard_backward_always_allowed() {
        // allow_step_jumping=false still permits backward jumps
        let config = WizardConfig::default();
        let registry = registry();
        assert!(JumpGuard { target: 0 }.check(&ctx(&config, &registry, 3)).is_ok());
        assert!(JumpGuard { target: 3 }.check(&ctx(&config, &registry, 0)).is_err());
    }

    #[test]
    fn test_jump_guard_forward_requires_jumping_enabled() {
        let config = WizardConfig {
            allow_step_jumping: true,
            ..WizardConfig::default()
        };
        let registry = registry();
        assert!(JumpGuard { target: 3 }.check(&ctx(&config, &registry, 0)).is_ok());
    }

    #[test]
    fn test_jump_guard_rejects_disabled_and_out_of_range() {
        let config = WizardConfig {
            allow_step_jumping: true,
            ..WizardConfig::default()
        };
        let registry = registry();

        let denied = JumpGuard { target: 2 }.check(&ctx(&config, &registry, 0));
        assert!(matches!(denied, Err(GuardError::StepDisabled { index: 2 })));

        let denied = JumpGuard { target: 9 }.check(&ctx(&config, &registry, 0));
        assert!(matches!(denied, Err(GuardError::InvalidTarget { .. })));
    }

    #[test]
    fn test_jump_guard_consults_custom_rule() {
        let config = WizardConfig {
            allow_step_jumping: true,
            ..WizardConfig::default()
        }
        .with_navigation_rule(|_, to| to != 3);
        let registry = registry();

        assert!(JumpGuard { target: 1 }.check(&ctx(&config, &registry, 0)).is_ok());
        assert!(JumpGuard { target: 3 }.check(&ctx(&config, &registry, 0)).is_err());
    }

    #[test]
    fn test_skip_guard_requires_optional_step() {
        let config = WizardConfig {
            allow_skipping: true,
            ..WizardConfig::default()
        };
        let registry = registry();

        // step 1 is optional, step 0 is required
        assert!(SkipGuard.check(&ctx(&config, &registry, 1)).is_ok());
        assert!(SkipGuard.check(&ctx(&config, &registry, 0)).is_err());
    }

    #[test]
    fn test_reset_guard_gates() {
        let registry = registry();
        let mut config = WizardConfig::default();
        config.reset = ResetConfig {
            enabled: true,
            allow_reset_on_first_step: false,
            min_steps_completed: 1,
            ..ResetConfig::default()
        };

        // first-step gate
        let mut context = ctx(&config, &registry, 0);
        context.completed_count = 2;
        assert!(ResetGuard.check(&context).is_err());

        // completed-count gate
        let mut context = ctx(&config, &registry, 1);
        context.completed_count = 0;
        assert!(ResetGuard.check(&context).is_err());

        // all gates pass
        let mut context = ctx(&config, &registry, 1);
        context.completed_count = 2;
        assert!(ResetGuard.check(&context).is_ok());
    }

    #[test]
    fn test_reset_guard_after_submission() {
        let registry = registry();
        let mut config = WizardConfig::default();
        config.reset.enabled = true;

        let mut context = ctx(&config, &registry, 1);
        context.is_submitted = true;
        assert!(ResetGuard.check(&context).is_err());

        config.reset.allow_reset_after_submission = true;
        let mut context = ctx(&config, &registry, 1);
        context.is_submitted = true;
        assert!(ResetGuard.check(&context).is_ok());
    }

    #[test]
    fn test_guard_descriptions() {
        assert_eq!(
            SkipGuard.description(),
            "Skipping must be enabled and the current step optional"
        );
        assert_eq!(ResetGuard.description(), "All reset gates must pass");
    }
}
