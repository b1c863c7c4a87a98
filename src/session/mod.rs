//! Session Store
//!
//! Carries workflow state across full screen navigations. Values are stored
//! as JSON text under a small closed set of keys; a backend supplies the raw
//! string storage.
//!
//! Loading never fails: a missing, unreadable or corrupt entry degrades to
//! the caller's fallback.

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use wannabe_types::{PathResult, SelectedRoles};

use crate::error::SessionError;

/// Raw string storage behind a [`SessionStore`]
pub trait SessionBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// Replace the entry; readers see either the old or the new value in full
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// Well-known session entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKey {
    /// Last successful [`PathResult`]
    Results,
    /// The [`SelectedRoles`] that produced it
    Input,
}

impl SessionKey {
    pub const ALL: [SessionKey; 2] = [SessionKey::Results, SessionKey::Input];

    pub fn as_str(self) -> &'static str {
        match self {
            SessionKey::Results => "wb_results",
            SessionKey::Input => "wb_input",
        }
    }
}

/// Typed JSON facade over a [`SessionBackend`]
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
        Self { backend }
    }

    /// Store backed by process memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Serialize `value` under `key`, overwriting any prior entry
    pub fn save<T: Serialize + ?Sized>(&self, key: SessionKey, value: &T) -> Result<(), SessionError> {
        let json = serde_json::to_string(value)?;
        self.backend.set(key.as_str(), &json)?;
        debug!(key = key.as_str(), bytes = json.len(), "session entry saved");
        Ok(())
    }

    /// Deserialize the entry under `key`, or return `fallback`
    pub fn load<T: DeserializeOwned>(&self, key: SessionKey, fallback: T) -> T {
        let raw = match self.backend.get(key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return fallback,
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "session entry unreadable");
                return fallback;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "session entry corrupt, using fallback");
                fallback
            }
        }
    }

    pub fn save_results(&self, result: &PathResult) -> Result<(), SessionError> {
        self.save(SessionKey::Results, result)
    }

    pub fn save_input(&self, roles: &SelectedRoles) -> Result<(), SessionError> {
        self.save(SessionKey::Input, roles)
    }

    /// Persist a found path together with the input that produced it.
    ///
    /// Both entries are written or neither is: if the input cannot be
    /// saved, the previous `wb_results` entry is put back.
    pub fn save_path(&self, result: &PathResult, roles: &SelectedRoles) -> Result<(), SessionError> {
        let key = SessionKey::Results.as_str();
        let previous = self.backend.get(key)?;

        self.save_results(result)?;
        if let Err(e) = self.save_input(roles) {
            let restored = match &previous {
                Some(raw) => self.backend.set(key, raw),
                None => self.backend.remove(key),
            };
            if let Err(restore) = restored {
                warn!(error = %restore, "could not roll back session results");
            }
            return Err(e);
        }
        Ok(())
    }

    pub fn results(&self) -> Option<PathResult> {
        self.load(SessionKey::Results, None)
    }

    pub fn input(&self) -> Option<SelectedRoles> {
        self.load(SessionKey::Input, None)
    }

    /// Drop every workflow entry (end of session)
    pub fn clear(&self) -> Result<(), SessionError> {
        for key in SessionKey::ALL {
            self.backend.remove(key.as_str())?;
        }
        Ok(())
    }
}
