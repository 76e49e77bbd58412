use super::errors::{storage_failed, PersistenceResult};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Raw key-value storage collaborator (browser local storage, a session
/// cache, a file-backed map). Failures are recoverable by design: readers
/// treat them as "no persisted state" and writers log and continue.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> PersistenceResult<()>;
    fn remove(&self, key: &str) -> PersistenceResult<()>;
}

/// Serialized machine state, written on every mutation
///
/// The wire layout is stable: `{currentIndex, completedSteps, visitedSteps,
/// skippedSteps, stepData}`. Every field defaults so partially-written or
/// older payloads deserialize into a usable state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    pub current_index: usize,
    pub completed_steps: Vec<usize>,
    pub visited_steps: Vec<usize>,
    pub skipped_steps: Vec<usize>,
    pub step_data: HashMap<usize, Value>,
}

/// Typed save/load port injected into the state machine
///
/// Keeps the machine storage-agnostic and testable without a real
/// environment-backed store.
pub trait StateStore: Send + Sync {
    /// Load persisted state for the given flow key, if any
    fn load(&self, key: &str) -> PersistenceResult<Option<PersistedState>>;

    /// Persist the full state under the given flow key
    fn save(&self, key: &str, state: &PersistedState) -> PersistenceResult<()>;

    /// Remove any persisted state for the given flow key
    fn clear(&self, key: &str) -> PersistenceResult<()>;
}

/// `StateStore` adapter over any `KeyValueStorage`, using the JSON wire
/// layout above
///
/// Corrupt payloads and storage read failures never surface: they resolve to
/// "no persisted state" with a warning.
pub struct JsonStateStore<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> JsonStateStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }
}

impl<S: KeyValueStorage> StateStore for JsonStateStore<S> {
    fn load(&self, key: &str) -> PersistenceResult<Option<PersistedState>> {
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(None),
            Err(e) => {
                tracing::warn!(key = key, error = %e, "Storage read failed, starting fresh");
                return Ok(None);
            }
        };

        match serde_json::from_str::<PersistedState>(&raw) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                tracing::warn!(key = key, error = %e, "Corrupt persisted state, starting fresh");
                Ok(None)
            }
        }
    }

    fn save(&self, key: &str, state: &PersistedState) -> PersistenceResult<()> {
        let serialized = serde_json::to_string(state)?;
        self.storage.set(key, &serialized)
    }

    fn clear(&self, key: &str) -> PersistenceResult<()> {
        self.storage.remove(key)
    }
}

/// Concurrent in-memory key-value store
///
/// Ships as the default store for tests and single-process embedding.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStorage {
    entries: Arc<DashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> PersistenceResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PersistenceResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Key-value storage that fails every operation, for exercising degradation
/// paths in tests
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStorage;

impl KeyValueStorage for FailingStorage {
    fn get(&self, _key: &str) -> PersistenceResult<Option<String>> {
        Err(storage_failed("storage unavailable"))
    }

    fn set(&self, _key: &str, _value: &str) -> PersistenceResult<()> {
        Err(storage_failed("storage unavailable"))
    }

    fn remove(&self, _key: &str) -> PersistenceResult<()> {
        Err(storage_failed("storage unavailable"))
    }
}
