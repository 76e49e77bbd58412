use crate::constants::DenialReason;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a committed step transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationDirection {
    /// Moving toward the terminal step
    Forward,
    /// Moving toward the first step
    Backward,
}

impl NavigationDirection {
    /// Derive the direction from an index delta; a same-index move counts
    /// as forward
    pub fn from_delta(from: usize, to: usize) -> Self {
        if to >= from {
            Self::Forward
        } else {
            Self::Backward
        }
    }
}

impl fmt::Display for NavigationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => write!(f, "forward"),
            Self::Backward => write!(f, "backward"),
        }
    }
}

impl std::str::FromStr for NavigationDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(Self::Forward),
            "backward" => Ok(Self::Backward),
            _ => Err(format!("Invalid navigation direction: {s}")),
        }
    }
}

/// Derived presentation status of a single step
///
/// The underlying visited/completed/skipped flags are not mutually
/// exclusive; this enum collapses them into the one status an indicator
/// would display, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// The step has not been reached yet
    Pending,
    /// The step is the active position
    Active,
    /// The step was visited but neither completed nor skipped
    Visited,
    /// The step was completed
    Completed,
    /// The step was skipped
    Skipped,
}

impl StepStatus {
    /// Check if the step has been interacted with in any way
    pub fn is_touched(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Check if the step counts toward flow completion
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Completed | Self::Skipped)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Active => write!(f, "active"),
            Self::Visited => write!(f, "visited"),
            Self::Completed => write!(f, "completed"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

impl std::str::FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "visited" => Ok(Self::Visited),
            "completed" => Ok(Self::Completed),
            "skipped" => Ok(Self::Skipped),
            _ => Err(format!("Invalid step status: {s}")),
        }
    }
}

impl Default for StepStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Outcome of a single state-machine operation
///
/// Boundary violations and denied moves are explicit outcomes rather than
/// silent no-ops, so callers and tests can assert on denial directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransitionOutcome {
    /// The position changed
    Moved {
        from: usize,
        to: usize,
        direction: NavigationDirection,
    },
    /// The operation was rejected and state is unchanged
    Rejected { reason: DenialReason },
}

impl TransitionOutcome {
    /// Check if the operation committed a move
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }

    /// Target index of a committed move
    pub fn moved_to(&self) -> Option<usize> {
        match self {
            Self::Moved { to, .. } => Some(*to),
            Self::Rejected { .. } => None,
        }
    }

    /// Denial reason of a rejected operation
    pub fn rejection(&self) -> Option<DenialReason> {
        match self {
            Self::Moved { .. } => None,
            Self::Rejected { reason } => Some(*reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_delta() {
        assert_eq!(
            NavigationDirection::from_delta(0, 2),
            NavigationDirection::Forward
        );
        assert_eq!(
            NavigationDirection::from_delta(2, 0),
            NavigationDirection::Backward
        );
    }

    #[test]
    fn test_direction_string_conversion() {
        assert_eq!(NavigationDirection::Forward.to_string(), "forward");
        assert_eq!(
            "backward".parse::<NavigationDirection>().unwrap(),
            NavigationDirection::Backward
        );
        assert!("sideways".parse::<NavigationDirection>().is_err());
    }

    #[test]
    fn test_step_status_resolution() {
        assert!(StepStatus::Completed.is_resolved());
        assert!(StepStatus::Skipped.is_resolved());
        assert!(!StepStatus::Visited.is_resolved());
        assert!(!StepStatus::Pending.is_touched());
        assert!(StepStatus::Active.is_touched());
    }

    #[test]
    fn test_transition_outcome_accessors() {
        let moved = TransitionOutcome::Moved {
            from: 0,
            to: 1,
            direction: NavigationDirection::Forward,
        };
        assert!(moved.is_moved());
        assert_eq!(moved.moved_to(), Some(1));
        assert_eq!(moved.rejection(), None);

        let rejected = TransitionOutcome::Rejected {
            reason: DenialReason::OutOfRange,
        };
        assert!(!rejected.is_moved());
        assert_eq!(rejected.rejection(), Some(DenialReason::OutOfRange));
    }

    #[test]
    fn test_step_status_serde() {
        let json = serde_json::to_string(&StepStatus::Active).unwrap();
        assert_eq!(json, "\"active\"");
        let parsed: StepStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, StepStatus::Active);
    }
}
