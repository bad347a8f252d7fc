// Storage for the session state that survives restarts: the compare set and the
// active location. Nothing else is persisted.

use crate::error::PersistenceError;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub compare_set_ids: Vec<String>,
    #[serde(default)]
    pub active_location: Option<String>,
}

pub trait SessionStore: Send + Sync {
    /// Previously saved state. A store with nothing saved yet returns the default state.
    fn load(&self) -> Result<PersistedState, PersistenceError>;

    fn save(&self, state: &PersistedState) -> Result<(), PersistenceError>;
}

// Keeps the state as a small JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for JsonFileStore {
    fn load(&self) -> Result<PersistedState, PersistenceError> {
        if !self.path.exists() {
            tracing::info!("No session file at {:?}, starting fresh.", self.path);
            return Ok(PersistedState::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, state: &PersistedState) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // Write beside the target and rename so a crash never leaves half a file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(state)?)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!("Saved session state to {:?}", self.path);
        Ok(())
    }
}

// Volatile store, used when no session file is wanted
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<Option<PersistedState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: PersistedState) -> Self {
        Self { state: Mutex::new(Some(state)) }
    }

    // A panicked writer cannot leave a half-assigned `Option`, so a poisoned lock is still usable
    pub fn snapshot(&self) -> Option<PersistedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<PersistedState, PersistenceError> {
        Ok(self.snapshot().unwrap_or_default())
    }

    fn save(&self, state: &PersistedState) -> Result<(), PersistenceError> {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = Some(state.clone());
        Ok(())
    }
}
