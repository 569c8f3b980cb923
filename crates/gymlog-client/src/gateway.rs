//! The remote call gateway.
//!
//! Translates a named domain action plus parameters into an HTTP call
//! against the single configured endpoint, and normalizes the result into
//! success-data-or-typed-failure while keeping the session store informed.

use crate::storage::JsonFileStorage;
use gymlog_core::config::{ClientConfig, CredentialMode};
use gymlog_core::credential::CredentialStrategy;
use gymlog_core::error::{GymlogError, Result};
use gymlog_core::event::{AuthEvent, AuthEvents};
use gymlog_core::session::SessionStore;
use gymlog_core::storage::{MemorySessionStorage, SessionStorage};
use reqwest::Url;
use reqwest::header;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Request keys the gateway owns. Caller payload fields with these names are
/// dropped rather than silently overriding the action tag or credential.
const RESERVED_KEYS: [&str; 3] = ["action", "token", "key"];

/// Issues authenticated GET and POST calls against the backend endpoint.
///
/// One gateway per deployment. The session store is shared with the rest of
/// the application through an `Arc`; the gateway reads the credential from
/// it on every call and clears it when the backend rejects the credential.
pub struct Gateway {
    http: reqwest::Client,
    base_url: Url,
    strategy: Arc<dyn CredentialStrategy>,
    session: Arc<SessionStore>,
    events: AuthEvents,
    timeout: Duration,
}

impl Gateway {
    /// Creates a gateway over an existing session store.
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            GymlogError::config(format!("invalid base URL '{}': {}", config.base_url, e))
        })?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            strategy: config.strategy()?,
            session,
            events: AuthEvents::new(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Creates a gateway plus its session store from configuration alone.
    ///
    /// Token modes persist the session to a JSON file (the configured
    /// `session_file` or the default location) and load whatever a previous
    /// run left there. Shared-secret mode keeps no session at all.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let storage: Arc<dyn SessionStorage> = match config.mode {
            CredentialMode::SharedSecret => Arc::new(MemorySessionStorage::new()),
            _ => match &config.session_file {
                Some(path) => Arc::new(JsonFileStorage::new(path)),
                None => Arc::new(JsonFileStorage::default_location()?),
            },
        };
        let session = Arc::new(SessionStore::new(storage));
        session.init();
        Self::new(config, session)
    }

    /// The session store backing this gateway.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub(crate) fn strategy(&self) -> &Arc<dyn CredentialStrategy> {
        &self.strategy
    }

    pub(crate) fn events(&self) -> &AuthEvents {
        &self.events
    }

    /// Subscribes to logout notifications: emitted when the user logs out
    /// and when the backend forcibly invalidates the credential.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    /// Issues a GET call. Parameters with an absent value are omitted from
    /// the query string entirely rather than sent empty.
    pub async fn get(&self, action: &str, params: &[(&str, Option<String>)]) -> Result<Value> {
        let credential = self.strategy.resolve(&self.session)?;

        let mut pairs: Vec<(&str, String)> = vec![
            ("action", action.to_string()),
            (self.strategy.param_name(), credential),
        ];
        for (key, value) in params {
            if let Some(value) = value {
                pairs.push((key, value.clone()));
            }
        }

        tracing::debug!("GET {}", action);
        let response = self
            .http
            .get(self.base_url.clone())
            .query(&pairs)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("GET {} failed: {}", action, e);
                GymlogError::transport(format!("request failed: {}", e))
            })?;

        self.decode(action, response).await
    }

    /// Issues a POST call. `payload` must be a JSON object; its fields are
    /// merged into the body alongside the action tag and credential, with
    /// the reserved keys `action`/`token`/`key` dropped from the payload.
    pub async fn post(&self, action: &str, payload: Value) -> Result<Value> {
        let credential = self.strategy.resolve(&self.session)?;
        let body = build_body(
            action,
            Some((self.strategy.param_name(), credential)),
            payload,
        );
        self.send_post(action, body).await
    }

    /// POST without a credential, for login and registration.
    pub(crate) async fn post_public(&self, action: &str, payload: Value) -> Result<Value> {
        let body = build_body(action, None, payload);
        self.send_post(action, body).await
    }

    pub(crate) async fn send_post(&self, action: &str, body: String) -> Result<Value> {
        tracing::debug!("POST {}", action);
        let response = self
            .http
            .post(self.base_url.clone())
            // The Apps Script backend only accepts JSON posted as plain text.
            .header(header::CONTENT_TYPE, "text/plain")
            .body(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("POST {} failed: {}", action, e);
                GymlogError::transport(format!("request failed: {}", e))
            })?;

        self.decode(action, response).await
    }

    /// Fires a POST and ignores the response entirely. Best-effort calls
    /// (logout) use this so a credential rejection in the reply cannot
    /// trigger a second forced-logout round.
    pub(crate) async fn send_post_best_effort(&self, action: &str, body: String) {
        let result = self
            .http
            .post(self.base_url.clone())
            .header(header::CONTENT_TYPE, "text/plain")
            .body(body)
            .timeout(self.timeout)
            .send()
            .await;
        if let Err(e) = result {
            tracing::warn!("best-effort {} request failed: {}", action, e);
        }
    }

    /// Decodes a response body and normalizes the embedded error contract.
    ///
    /// An authentication-class error clears the session store and broadcasts
    /// the logout event exactly once before the error reaches the caller.
    /// Ordinary errors leave the session untouched.
    async fn decode(&self, action: &str, response: reqwest::Response) -> Result<Value> {
        let text = response.text().await.map_err(|e| {
            tracing::error!("{}: failed to read response body: {}", action, e);
            GymlogError::transport(format!("failed to read response body: {}", e))
        })?;

        let value: Value = serde_json::from_str(&text).map_err(|e| {
            tracing::error!("{}: response body is not JSON: {}", action, e);
            GymlogError::transport(format!("response body is not JSON: {}", e))
        })?;

        if let Some(message) = value.get("error").and_then(Value::as_str) {
            if self.strategy.session_backed() && self.strategy.is_auth_error(message) {
                tracing::warn!("{}: credential rejected by backend, dropping session", action);
                self.session.clear();
                self.events.emit(AuthEvent::LoggedOut);
            }
            return Err(GymlogError::remote(message));
        }

        Ok(value)
    }
}

/// Assembles a POST body: caller fields first (minus reserved keys), then
/// the action tag and credential, so the fixed fields always win.
pub(crate) fn build_body(
    action: &str,
    credential: Option<(&str, String)>,
    payload: Value,
) -> String {
    let mut body = Map::new();
    if let Value::Object(fields) = payload {
        for (key, value) in fields {
            if RESERVED_KEYS.contains(&key.as_str()) {
                tracing::warn!(
                    "{}: payload field '{}' collides with a reserved request key, dropping it",
                    action,
                    key
                );
                continue;
            }
            body.insert(key, value);
        }
    }
    body.insert("action".to_string(), Value::String(action.to_string()));
    if let Some((name, value)) = credential {
        body.insert(name.to_string(), Value::String(value));
    }
    Value::Object(body).to_string()
}
