//! JSON-file session storage.
//!
//! Persists the session as a small JSON object (`auth_token`, `auth_user`,
//! `token_expires_at`) so it survives process restarts, the way the original
//! deployment persisted it in browser local storage.

use gymlog_core::error::{GymlogError, Result};
use gymlog_core::storage::{PersistedSession, SessionStorage};
use std::fs;
use std::path::{Path, PathBuf};

/// [`SessionStorage`] backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at the default location: `<config dir>/gymlog/session.json`.
    pub fn default_location() -> Result<Self> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            GymlogError::config("could not determine the user configuration directory")
        })?;
        Ok(Self::new(config_dir.join("gymlog").join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> PersistedSession {
        if !self.path.exists() {
            return PersistedSession::default();
        }
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("failed to read session file {:?}: {}", self.path, e);
                return PersistedSession::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(persisted) => persisted,
            Err(e) => {
                tracing::warn!("session file {:?} is not valid JSON: {}", self.path, e);
                PersistedSession::default()
            }
        }
    }
}

impl SessionStorage for JsonFileStorage {
    fn load(&self) -> PersistedSession {
        self.read_file()
    }

    fn store(&self, fields: &PersistedSession) -> Result<()> {
        let mut current = self.read_file();
        current.merge_from(fields);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(&current)
            .map_err(|e| GymlogError::storage(format!("failed to serialize session: {}", e)))?;
        fs::write(&self.path, text)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
