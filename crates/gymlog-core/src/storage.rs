//! Persistence seam for session state.
//!
//! The session store talks to durable storage through the [`SessionStorage`]
//! trait so the store itself can be tested without touching the filesystem.
//! The JSON-file implementation lives in `gymlog-client`; the in-memory one
//! here backs tests and shared-secret deployments that have no session.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// The three fields a session persists between process runs.
///
/// Field names match the storage keys of the original deployment
/// (`auth_token`, `auth_user`, `token_expires_at`). The user profile is kept
/// as raw JSON text: whether it parses is decided at load time, not here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(rename = "auth_token", skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(rename = "auth_user", skip_serializing_if = "Option::is_none")]
    pub user_json: Option<String>,
    #[serde(rename = "token_expires_at", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl PersistedSession {
    /// Merges `fields` into `self`: present fields overwrite, absent fields
    /// leave the previously stored value alone. Persistence is additive,
    /// not transactional.
    pub fn merge_from(&mut self, fields: &PersistedSession) {
        if let Some(token) = &fields.token {
            self.token = Some(token.clone());
        }
        if let Some(user_json) = &fields.user_json {
            self.user_json = Some(user_json.clone());
        }
        if let Some(expires_at) = &fields.expires_at {
            self.expires_at = Some(expires_at.clone());
        }
    }
}

/// Durable storage for session state.
pub trait SessionStorage: Send + Sync {
    /// Loads whatever was persisted. Missing or unreadable state degrades to
    /// an empty record; loading never fails.
    fn load(&self) -> PersistedSession;

    /// Merges the given fields into persisted state ([`PersistedSession::merge_from`]
    /// semantics).
    fn store(&self, fields: &PersistedSession) -> Result<()>;

    /// Removes all persisted fields together.
    fn clear(&self) -> Result<()>;
}

/// In-memory [`SessionStorage`] implementation.
///
/// Used by tests and by shared-secret deployments, where there is no
/// session to survive a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    state: Mutex<PersistedSession>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> PersistedSession {
        self.state.lock().unwrap().clone()
    }

    fn store(&self, fields: &PersistedSession) -> Result<()> {
        self.state.lock().unwrap().merge_from(fields);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.state.lock().unwrap() = PersistedSession::default();
        Ok(())
    }
}
