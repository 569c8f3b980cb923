//! Logout notification channel.
//!
//! The gateway publishes here when a session ends, whether the user logged
//! out explicitly or the backend rejected the credential mid-use. Listeners
//! (a UI shell redirecting to a login screen, for example) subscribe rather
//! than being reached through a hidden global side channel.

use tokio::sync::broadcast;

/// Events published on the auth channel. No payload: the session store is
/// the source of truth for what state remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// The session was cleared, locally or by a backend credential rejection.
    LoggedOut,
}

/// Broadcast sender for [`AuthEvent`]s. Cloning shares the channel.
#[derive(Debug, Clone)]
pub struct AuthEvents {
    tx: broadcast::Sender<AuthEvent>,
}

impl AuthEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    /// Subscribes a new listener. Each receiver sees every event emitted
    /// after subscription.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.tx.subscribe()
    }

    /// Emits an event. Having no listeners is not an error.
    pub fn emit(&self, event: AuthEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}
