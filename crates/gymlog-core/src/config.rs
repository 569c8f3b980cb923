//! Client configuration model.
//!
//! The three deployment modes of the backend are configuration, not forked
//! code paths: the mode picks the credential strategy the gateway runs with.

use crate::credential::{BearerToken, CredentialStrategy, SharedSecret};
use crate::error::{GymlogError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Which credential strategy a deployment uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialMode {
    /// Username/password login; the server issues a bearer token with an
    /// explicit expiry timestamp.
    #[default]
    TokenWithExpiry,
    /// Bearer token provisioned out of band; never expires client-side.
    TokenNoExpiry,
    /// Fixed shared secret on every request; no per-user identity.
    SharedSecret,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Configuration for one backend deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// The single HTTP endpoint of the deployment.
    pub base_url: String,
    #[serde(default)]
    pub mode: CredentialMode,
    /// Required when `mode` is `shared-secret`.
    #[serde(default)]
    pub shared_key: Option<String>,
    /// Overrides the default session file location.
    #[serde(default)]
    pub session_file: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Token-with-expiry configuration for the given endpoint, with defaults
    /// everywhere else.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            mode: CredentialMode::default(),
            shared_key: None,
            session_file: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn with_mode(mut self, mode: CredentialMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_shared_key(mut self, key: impl Into<String>) -> Self {
        self.shared_key = Some(key.into());
        self
    }

    /// Builds the credential strategy for the configured mode.
    pub fn strategy(&self) -> Result<Arc<dyn CredentialStrategy>> {
        match self.mode {
            CredentialMode::TokenWithExpiry => Ok(Arc::new(BearerToken::with_expiry())),
            CredentialMode::TokenNoExpiry => Ok(Arc::new(BearerToken::without_expiry())),
            CredentialMode::SharedSecret => {
                let key = self.shared_key.as_ref().ok_or_else(|| {
                    GymlogError::config("shared-secret mode requires `shared_key`")
                })?;
                Ok(Arc::new(SharedSecret::new(key)))
            }
        }
    }
}
