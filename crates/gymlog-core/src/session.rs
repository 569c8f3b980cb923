//! In-memory session state and its lifecycle.
//!
//! The [`SessionStore`] is the single source of truth for "am I
//! authenticated, as whom, until when". It is owned by the application's
//! composition root and handed to the gateway as an `Arc`, never reached
//! through ambient globals.

use crate::error::Result;
use crate::storage::{MemorySessionStorage, PersistedSession, SessionStorage};
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::sync::{Arc, RwLock};

/// Lookahead applied to expiry checks so a request is not launched with a
/// credential that will expire mid-flight. Five minutes.
pub const DEFAULT_EXPIRY_BUFFER_SECS: i64 = 300;

/// Current session state: credential, user profile, expiry.
///
/// `user` and `expires_at` are only meaningful while `token` is present.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<Value>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Parses a persisted or backend-supplied expiry timestamp (RFC 3339).
///
/// Anything unparsable degrades to "no expiry"; the backend stays the sole
/// authority on expiry in that case.
pub fn parse_expiry(text: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(text) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!("ignoring unparsable expiry timestamp '{}': {}", text, e);
            None
        }
    }
}

/// Single source of truth for the authentication state of the process.
///
/// Reads and writes go through a short `RwLock` section that never spans an
/// await point, so a read always sees the most recently completed write.
pub struct SessionStore {
    state: RwLock<Session>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    /// Creates an empty store backed by the given storage.
    /// Call [`SessionStore::init`] to pick up persisted state.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            state: RwLock::new(Session::default()),
            storage,
        }
    }

    /// Creates a store backed by in-memory storage. Nothing survives the
    /// process; used by tests and shared-secret deployments.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStorage::new()))
    }

    /// Loads persisted state into memory. Called once at startup.
    ///
    /// Never fails: a missing token, a user profile that is not valid JSON,
    /// or an unparsable expiry each degrade to the absent value.
    pub fn init(&self) {
        let persisted = self.storage.load();

        let user = persisted.user_json.as_deref().and_then(|text| {
            match serde_json::from_str::<Value>(text) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("stored user profile is not valid JSON, dropping it: {}", e);
                    None
                }
            }
        });
        let expires_at = persisted.expires_at.as_deref().and_then(parse_expiry);

        *self.state.write().unwrap() = Session {
            token: persisted.token,
            user,
            expires_at,
        };
    }

    /// True iff a token is held and it does not expire within the default
    /// five-minute buffer.
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_within(DEFAULT_EXPIRY_BUFFER_SECS)
    }

    /// True iff a token is held AND (no expiry is known OR
    /// `now < expires_at - buffer`).
    pub fn is_authenticated_within(&self, buffer_secs: i64) -> bool {
        let state = self.state.read().unwrap();
        if state.token.is_none() {
            return false;
        }
        match state.expires_at {
            None => true,
            Some(expires_at) => Utc::now() < expires_at - Duration::seconds(buffer_secs),
        }
    }

    /// Remaining credential lifetime in whole seconds. Never negative;
    /// 0 at and after expiry, and when no expiry is known.
    pub fn time_left(&self) -> i64 {
        match self.state.read().unwrap().expires_at {
            None => 0,
            Some(expires_at) => (expires_at - Utc::now()).num_seconds().max(0),
        }
    }

    /// The held credential, if any.
    pub fn token(&self) -> Option<String> {
        self.state.read().unwrap().token.clone()
    }

    /// The cached user profile, if any. Opaque to the client.
    pub fn current_user(&self) -> Option<Value> {
        self.state.read().unwrap().user.clone()
    }

    /// The known expiry, if any.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.state.read().unwrap().expires_at
    }

    /// Overwrites in-memory state wholesale and persists the given fields.
    ///
    /// Persistence is additive: a field passed as `None` is not written, but
    /// a previously persisted value for it is left untouched.
    pub fn set_session(
        &self,
        token: impl Into<String>,
        user: Option<Value>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let token = token.into();

        let fields = PersistedSession {
            token: Some(token.clone()),
            user_json: user.as_ref().map(|u| u.to_string()),
            expires_at: expires_at.map(|t| t.to_rfc3339()),
        };

        *self.state.write().unwrap() = Session {
            token: Some(token),
            user,
            expires_at,
        };

        self.storage.store(&fields)
    }

    /// Wipes the in-memory and persisted session together.
    ///
    /// A storage failure is logged and discarded: the local clear must win
    /// regardless, so subsequent `is_authenticated()` calls return false.
    pub fn clear(&self) {
        *self.state.write().unwrap() = Session::default();
        if let Err(e) = self.storage.clear() {
            tracing::warn!("failed to clear persisted session: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn shared_storage() -> Arc<MemorySessionStorage> {
        Arc::new(MemorySessionStorage::new())
    }

    #[test]
    fn empty_store_is_not_authenticated() {
        let store = SessionStore::in_memory();
        assert!(!store.is_authenticated());
        assert_eq!(store.token(), None);
        assert_eq!(store.time_left(), 0);
    }

    #[test]
    fn authentication_follows_most_recent_set_or_clear() {
        let store = SessionStore::in_memory();

        store.set_session("t1", None, None).unwrap();
        assert!(store.is_authenticated());

        store.clear();
        assert!(!store.is_authenticated());

        store.set_session("t2", None, None).unwrap();
        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("t2"));
    }

    #[test]
    fn expiry_within_buffer_counts_as_expired() {
        let store = SessionStore::in_memory();

        store
            .set_session("t1", None, Some(Utc::now() + Duration::seconds(60)))
            .unwrap();
        // 60 s left is inside the default 300 s buffer.
        assert!(!store.is_authenticated());

        store
            .set_session("t1", None, Some(Utc::now() + Duration::seconds(3600)))
            .unwrap();
        assert!(store.is_authenticated());
    }

    #[test]
    fn custom_buffer_is_honored() {
        let store = SessionStore::in_memory();
        store
            .set_session("t1", None, Some(Utc::now() + Duration::seconds(60)))
            .unwrap();

        assert!(store.is_authenticated_within(10));
        assert!(!store.is_authenticated_within(120));
    }

    #[test]
    fn missing_expiry_means_never_expiring() {
        let store = SessionStore::in_memory();
        store.set_session("t1", None, None).unwrap();

        assert!(store.is_authenticated());
        assert_eq!(store.time_left(), 0);
    }

    #[test]
    fn time_left_is_never_negative() {
        let store = SessionStore::in_memory();

        store
            .set_session("t1", None, Some(Utc::now() - Duration::seconds(30)))
            .unwrap();
        assert_eq!(store.time_left(), 0);

        store
            .set_session("t1", None, Some(Utc::now() + Duration::seconds(3600)))
            .unwrap();
        let left = store.time_left();
        assert!(left > 3590 && left <= 3600, "time_left was {left}");
    }

    #[test]
    fn session_round_trips_through_storage() {
        let storage = shared_storage();
        let expires_at = Utc::now() + Duration::seconds(3600);

        let store = SessionStore::new(storage.clone());
        store
            .set_session("t1", Some(json!({"username": "kira"})), Some(expires_at))
            .unwrap();

        // Simulated reload: a fresh store over the same storage.
        let reloaded = SessionStore::new(storage);
        reloaded.init();

        assert_eq!(reloaded.token().as_deref(), Some("t1"));
        assert_eq!(reloaded.current_user(), Some(json!({"username": "kira"})));
        assert_eq!(reloaded.expires_at(), Some(expires_at));
        assert!(reloaded.is_authenticated());
    }

    #[test]
    fn malformed_stored_user_degrades_to_absent() {
        let storage = shared_storage();
        storage
            .store(&PersistedSession {
                token: Some("t1".to_string()),
                user_json: Some("{not json".to_string()),
                expires_at: None,
            })
            .unwrap();

        let store = SessionStore::new(storage);
        store.init();

        assert_eq!(store.token().as_deref(), Some("t1"));
        assert_eq!(store.current_user(), None);
        assert!(store.is_authenticated());
    }

    #[test]
    fn malformed_stored_expiry_degrades_to_absent() {
        let storage = shared_storage();
        storage
            .store(&PersistedSession {
                token: Some("t1".to_string()),
                user_json: None,
                expires_at: Some("next tuesday".to_string()),
            })
            .unwrap();

        let store = SessionStore::new(storage);
        store.init();

        assert_eq!(store.expires_at(), None);
        assert!(store.is_authenticated());
    }

    #[test]
    fn set_session_overwrites_memory_but_persists_additively() {
        let storage = shared_storage();
        let store = SessionStore::new(storage.clone());

        store
            .set_session("t1", Some(json!({"username": "kira"})), None)
            .unwrap();
        store.set_session("t2", None, None).unwrap();

        // In-memory state is overwritten wholesale.
        assert_eq!(store.current_user(), None);

        // The persisted profile was not cleared by the second write.
        let reloaded = SessionStore::new(storage);
        reloaded.init();
        assert_eq!(reloaded.token().as_deref(), Some("t2"));
        assert_eq!(reloaded.current_user(), Some(json!({"username": "kira"})));
    }

    #[test]
    fn clear_wipes_persisted_state_too() {
        let storage = shared_storage();
        let store = SessionStore::new(storage.clone());
        store
            .set_session("t1", Some(json!({})), Some(Utc::now() + Duration::seconds(3600)))
            .unwrap();

        store.clear();

        let reloaded = SessionStore::new(storage);
        reloaded.init();
        assert_eq!(reloaded.token(), None);
        assert_eq!(reloaded.current_user(), None);
        assert_eq!(reloaded.expires_at(), None);
    }
}
