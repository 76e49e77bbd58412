use super::persistence::{PersistedState, StateStore};
use super::states::{NavigationDirection, StepStatus, TransitionOutcome};
use crate::constants::DenialReason;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Fixed-size boolean arena over step positions
///
/// Step counts are small and bounded, so the three index sets are flat
/// boolean arrays rather than hashed containers.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexFlags {
    slots: Vec<bool>,
}

impl IndexFlags {
    fn new(total: usize) -> Self {
        Self {
            slots: vec![false; total],
        }
    }

    fn mark(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = true;
                true
            }
            None => false,
        }
    }

    fn clear(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = false;
                true
            }
            None => false,
        }
    }

    fn clear_all(&mut self) {
        self.slots.fill(false);
    }

    pub fn contains(&self, index: usize) -> bool {
        self.slots.get(index).copied().unwrap_or(false)
    }

    pub fn count(&self) -> usize {
        self.slots.iter().filter(|set| **set).count()
    }

    /// Positions currently set, in ascending order
    pub fn indices(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, &set)| set.then_some(i))
            .collect()
    }
}

/// Position-based step state machine
///
/// Tracks the active step, the visited/completed/skipped arenas and per-step
/// data snapshots. `current_index` is always in `[0, total)`; index 0 is
/// visited at construction. Every operation returns an explicit outcome and
/// never panics; every mutation is persisted through the attached store.
pub struct StepStateMachine {
    total_steps: usize,
    current_index: usize,
    visited: IndexFlags,
    completed: IndexFlags,
    skipped: IndexFlags,
    step_data: HashMap<usize, Value>,
    store: Option<Arc<dyn StateStore>>,
    storage_key: Option<String>,
}

impl StepStateMachine {
    /// Create a machine for a flow with the given number of steps, without
    /// persistence
    ///
    /// Flows have at least one step; a zero is treated as one.
    pub fn new(total_steps: usize) -> Self {
        let total_steps = total_steps.max(1);
        let mut visited = IndexFlags::new(total_steps);
        visited.mark(0);

        Self {
            total_steps,
            current_index: 0,
            visited,
            completed: IndexFlags::new(total_steps),
            skipped: IndexFlags::new(total_steps),
            step_data: HashMap::new(),
            store: None,
            storage_key: None,
        }
    }

    /// Attach a persistence store under the caller-chosen flow key and
    /// rehydrate from it once
    ///
    /// Missing or corrupt persisted state leaves the machine at its
    /// defaults; load failures are logged, never surfaced.
    pub fn attach_store(&mut self, store: Arc<dyn StateStore>, key: impl Into<String>) {
        let key = key.into();

        match store.load(&key) {
            Ok(Some(persisted)) => self.restore(persisted),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "State load failed, starting fresh");
            }
        }

        self.store = Some(store);
        self.storage_key = Some(key);
    }

    /// Move to an arbitrary step and mark it visited
    pub fn go_to_step(&mut self, index: usize) -> TransitionOutcome {
        if index >= self.total_steps {
            return TransitionOutcome::Rejected {
                reason: DenialReason::OutOfRange,
            };
        }

        let from = self.current_index;
        self.current_index = index;
        self.visited.mark(index);
        self.persist();

        TransitionOutcome::Moved {
            from,
            to: index,
            direction: NavigationDirection::from_delta(from, index),
        }
    }

    /// Advance by one step, marking the new position visited
    pub fn go_next(&mut self) -> TransitionOutcome {
        if self.current_index + 1 >= self.total_steps {
            return TransitionOutcome::Rejected {
                reason: DenialReason::AtBoundary,
            };
        }

        let from = self.current_index;
        self.current_index += 1;
        self.visited.mark(self.current_index);
        self.persist();

        TransitionOutcome::Moved {
            from,
            to: self.current_index,
            direction: NavigationDirection::Forward,
        }
    }

    /// Move back by one step; never validates
    pub fn go_back(&mut self) -> TransitionOutcome {
        if self.current_index == 0 {
            return TransitionOutcome::Rejected {
                reason: DenialReason::AtBoundary,
            };
        }

        let from = self.current_index;
        self.current_index -= 1;
        self.persist();

        TransitionOutcome::Moved {
            from,
            to: self.current_index,
            direction: NavigationDirection::Backward,
        }
    }

    /// Mark a step skipped; when it is the active step, also advance
    ///
    /// The returned outcome describes the position change only: skipping the
    /// terminal step marks it but reports `Rejected(AtBoundary)` because the
    /// position cannot advance.
    pub fn skip_step(&mut self, index: usize) -> TransitionOutcome {
        if index >= self.total_steps {
            return TransitionOutcome::Rejected {
                reason: DenialReason::OutOfRange,
            };
        }

        self.skipped.mark(index);

        if index == self.current_index {
            // go_next persists; persist here only for the non-advancing case
            let outcome = self.go_next();
            if !outcome.is_moved() {
                self.persist();
            }
            outcome
        } else {
            self.persist();
            TransitionOutcome::Rejected {
                reason: DenialReason::AtBoundary,
            }
        }
    }

    /// Mark a step completed, optionally overwriting its data snapshot
    ///
    /// Returns false for out-of-range indices.
    pub fn mark_step_completed(&mut self, index: usize, data: Option<Value>) -> bool {
        if !self.completed.mark(index) {
            return false;
        }
        if let Some(data) = data {
            self.step_data.insert(index, data);
        }
        self.persist();
        true
    }

    /// Remove a step from the completed set and discard its snapshot
    pub fn mark_step_incomplete(&mut self, index: usize) -> bool {
        if !self.completed.clear(index) {
            return false;
        }
        self.step_data.remove(&index);
        self.persist();
        true
    }

    /// Reset to the initial state and remove the persisted entry
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.visited.clear_all();
        self.visited.mark(0);
        self.completed.clear_all();
        self.skipped.clear_all();
        self.step_data.clear();

        if let (Some(store), Some(key)) = (&self.store, &self.storage_key) {
            if let Err(e) = store.clear(key) {
                tracing::warn!(key = %key, error = %e, "Failed to clear persisted state");
            }
        }
    }

    // Queries

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn is_first_step(&self) -> bool {
        self.current_index == 0
    }

    pub fn is_last_step(&self) -> bool {
        self.current_index + 1 == self.total_steps
    }

    pub fn is_step_completed(&self, index: usize) -> bool {
        self.completed.contains(index)
    }

    pub fn is_step_visited(&self, index: usize) -> bool {
        self.visited.contains(index)
    }

    pub fn is_step_skipped(&self, index: usize) -> bool {
        self.skipped.contains(index)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.count()
    }

    /// Data snapshot captured when the step was completed
    pub fn step_data(&self, index: usize) -> Option<&Value> {
        self.step_data.get(&index)
    }

    /// Position progress as a percentage of traversal
    ///
    /// Single-step flows report 100: the only step is terminal.
    pub fn progress(&self) -> u32 {
        if self.total_steps <= 1 {
            return 100;
        }
        let ratio = self.current_index as f64 / (self.total_steps - 1) as f64;
        (ratio * 100.0).round() as u32
    }

    /// Completion progress as a percentage of steps completed
    pub fn completion_progress(&self) -> u32 {
        let ratio = self.completed.count() as f64 / self.total_steps as f64;
        (ratio * 100.0).round() as u32
    }

    /// Derived presentation status of a step
    pub fn step_status(&self, index: usize) -> StepStatus {
        if index == self.current_index {
            StepStatus::Active
        } else if self.completed.contains(index) {
            StepStatus::Completed
        } else if self.skipped.contains(index) {
            StepStatus::Skipped
        } else if self.visited.contains(index) {
            StepStatus::Visited
        } else {
            StepStatus::Pending
        }
    }

    /// Full serializable snapshot of the machine state
    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            current_index: self.current_index,
            completed_steps: self.completed.indices(),
            visited_steps: self.visited.indices(),
            skipped_steps: self.skipped.indices(),
            step_data: self.step_data.clone(),
        }
    }

    /// Rehydrate from a persisted snapshot, dropping anything that no longer
    /// fits the flow
    fn restore(&mut self, persisted: PersistedState) {
        self.current_index = if persisted.current_index < self.total_steps {
            persisted.current_index
        } else {
            tracing::warn!(
                persisted_index = persisted.current_index,
                total_steps = self.total_steps,
                "Persisted index out of range, falling back to the first step"
            );
            0
        };

        for index in persisted.visited_steps {
            self.visited.mark(index);
        }
        for index in persisted.completed_steps {
            self.completed.mark(index);
        }
        for index in persisted.skipped_steps {
            self.skipped.mark(index);
        }

        self.step_data = persisted
            .step_data
            .into_iter()
            .filter(|(index, _)| *index < self.total_steps)
            .collect();

        // Construction invariant holds regardless of what was persisted
        self.visited.mark(0);
    }

    /// Write the full state through the attached store, if any
    ///
    /// Write failures are logged and swallowed; a flow never fails because
    /// its progress could not be saved.
    fn persist(&self) {
        let (Some(store), Some(key)) = (&self.store, &self.storage_key) else {
            return;
        };

        if let Err(e) = store.save(key, &self.snapshot()) {
            tracing::warn!(key = %key, error = %e, "Failed to persist state");
        }
    }
}
