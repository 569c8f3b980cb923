//! Core domain types for the gymlog workout-tracker client.
//!
//! This crate holds everything that is independent of the HTTP transport:
//! the session model and store, the persistence seam, credential strategies
//! for the three deployment modes of the backend, the shared error type,
//! and the logout event bus.

pub mod config;
pub mod credential;
pub mod error;
pub mod event;
pub mod session;
pub mod storage;

pub use config::{ClientConfig, CredentialMode};
pub use credential::CredentialStrategy;
pub use error::{GymlogError, Result};
pub use event::{AuthEvent, AuthEvents};
pub use session::SessionStore;
