//! Error types for the gymlog client.

use thiserror::Error;

/// A shared error type for the whole client.
///
/// Every failure surfaces to the immediate caller as one of these variants;
/// nothing is swallowed except where a contract explicitly says so (the
/// best-effort logout call and persisted-session cleanup).
#[derive(Error, Debug, Clone)]
pub enum GymlogError {
    /// A credential is required for the request but none is held.
    ///
    /// Raised before any network activity takes place.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The backend answered with a structured `{ "error": ... }` body.
    /// The message is passed through verbatim.
    #[error("{message}")]
    Remote { message: String },

    /// Network failure or a response body that is not JSON.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// Session persistence failure (reading or writing the session file).
    #[error("session storage error: {message}")]
    Storage { message: String },

    /// Bad endpoint URL, unreadable configuration file, or an operation
    /// that the configured credential mode does not support.
    #[error("configuration error: {0}")]
    Config(String),
}

impl GymlogError {
    /// Creates a Remote error.
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }

    /// Creates a Transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a Storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is a NotAuthenticated error.
    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, Self::NotAuthenticated)
    }

    /// Check if this is a Remote error.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Check if this is a Transport error.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl From<std::io::Error> for GymlogError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

/// A type alias for `Result<T, GymlogError>`.
pub type Result<T> = std::result::Result<T, GymlogError>;
