//! Credential strategies for the three deployment modes of the backend.
//!
//! The backend has been deployed three ways: username/password login issuing
//! a bearer token with an expiry, a bearer token provisioned out of band with
//! no expiry, and a fixed shared secret with no per-user identity at all.
//! One gateway serves all three; the differences live behind this trait.

use crate::error::{GymlogError, Result};
use crate::session::SessionStore;

/// How a request obtains and carries its identity.
pub trait CredentialStrategy: Send + Sync + std::fmt::Debug {
    /// Name of the query/body parameter carrying the identity
    /// (`token` or `key`).
    fn param_name(&self) -> &'static str;

    /// Resolves the credential for one request. Fails `NotAuthenticated`
    /// when a required token is absent; no network call is attempted then.
    fn resolve(&self, session: &SessionStore) -> Result<String>;

    /// Whether a session store backs this credential. Drives whether an
    /// authentication-class error clears the session and broadcasts logout,
    /// and whether login/register/logout exist at all.
    fn session_backed(&self) -> bool;

    /// Whether login responses carry an expiry worth recording.
    fn records_expiry(&self) -> bool;

    /// Whether a backend error message signals an invalid or expired
    /// credential (as opposed to an ordinary domain error).
    fn is_auth_error(&self, message: &str) -> bool;
}

/// Server-issued bearer token held in the session store.
#[derive(Debug, Clone)]
pub struct BearerToken {
    record_expiry: bool,
}

impl BearerToken {
    /// Token-with-expiry mode: login responses include `expires_at` and it
    /// is recorded client-side.
    pub fn with_expiry() -> Self {
        Self {
            record_expiry: true,
        }
    }

    /// Token-no-expiry mode: the session never expires client-side; the
    /// backend is the sole authority on token lifetime.
    pub fn without_expiry() -> Self {
        Self {
            record_expiry: false,
        }
    }
}

impl CredentialStrategy for BearerToken {
    fn param_name(&self) -> &'static str {
        "token"
    }

    fn resolve(&self, session: &SessionStore) -> Result<String> {
        session.token().ok_or(GymlogError::NotAuthenticated)
    }

    fn session_backed(&self) -> bool {
        true
    }

    fn records_expiry(&self) -> bool {
        self.record_expiry
    }

    /// The backend's token-error vocabulary: any message mentioning `token`,
    /// or the exact `Authorization required` answer. This substring match is
    /// the wire contract of the deployed Apps Script backend, fragile as it
    /// is; see DESIGN.md.
    fn is_auth_error(&self, message: &str) -> bool {
        message.contains("token") || message == "Authorization required"
    }
}

/// Fixed shared secret baked into the deployment. No login, no logout,
/// no session.
#[derive(Debug, Clone)]
pub struct SharedSecret {
    key: String,
}

impl SharedSecret {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl CredentialStrategy for SharedSecret {
    fn param_name(&self) -> &'static str {
        "key"
    }

    fn resolve(&self, _session: &SessionStore) -> Result<String> {
        Ok(self.key.clone())
    }

    fn session_backed(&self) -> bool {
        false
    }

    fn records_expiry(&self) -> bool {
        false
    }

    /// There is no session to invalidate, so no error is authentication-class.
    fn is_auth_error(&self, _message: &str) -> bool {
        false
    }
}
