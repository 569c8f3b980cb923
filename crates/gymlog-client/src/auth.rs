//! Authentication lifecycle: login, registration, logout.

use crate::gateway::{Gateway, build_body};
use gymlog_core::error::{GymlogError, Result};
use gymlog_core::event::AuthEvent;
use gymlog_core::session::parse_expiry;
use serde::Deserialize;
use serde_json::{Value, json};

/// Successful login or registration answer from the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// The issued bearer token.
    pub token: String,
    /// The user profile, opaque to the client.
    #[serde(default)]
    pub user: Option<Value>,
    /// RFC 3339 expiry, absent in deployments that never expire tokens.
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl Gateway {
    /// Logs in with username and password and stores the issued session.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        self.ensure_session_backed("login")?;
        let data = self
            .post_public("login", json!({ "username": username, "password": password }))
            .await?;
        self.store_login(data)
    }

    /// Registers a new user and stores the issued session.
    pub async fn register(&self, username: &str, password: &str, name: &str) -> Result<LoginResponse> {
        self.ensure_session_backed("register")?;
        let data = self
            .post_public(
                "register",
                json!({ "username": username, "password": password, "name": name }),
            )
            .await?;
        self.store_login(data)
    }

    /// Ends the session.
    ///
    /// The remote call is best-effort: its failure is logged and discarded,
    /// because the local clear must proceed regardless of server-side
    /// acknowledgment. Always clears the session store and broadcasts the
    /// logout event.
    pub async fn logout(&self) {
        if !self.strategy().session_backed() {
            tracing::warn!("logout is a no-op in shared-secret deployments");
            return;
        }

        if let Some(token) = self.session().token() {
            let body = build_body(
                "logout",
                Some((self.strategy().param_name(), token)),
                Value::Null,
            );
            self.send_post_best_effort("logout", body).await;
        }

        self.session().clear();
        self.events().emit(AuthEvent::LoggedOut);
    }

    fn store_login(&self, data: Value) -> Result<LoginResponse> {
        let parsed: LoginResponse = serde_json::from_value(data).map_err(|e| {
            GymlogError::transport(format!("malformed login response: {}", e))
        })?;

        let expires_at = if self.strategy().records_expiry() {
            parsed.expires_at.as_deref().and_then(parse_expiry)
        } else {
            None
        };
        self.session()
            .set_session(&parsed.token, parsed.user.clone(), expires_at)?;

        Ok(parsed)
    }

    fn ensure_session_backed(&self, operation: &str) -> Result<()> {
        if self.strategy().session_backed() {
            Ok(())
        } else {
            Err(GymlogError::config(format!(
                "{} is not available in shared-secret deployments",
                operation
            )))
        }
    }
}
