//! HTTP client for the gymlog spreadsheet backend.
//!
//! The backend is a single web-app endpoint (a Google Apps Script deployment
//! in front of a spreadsheet) that takes an `action` tag plus parameters and
//! answers JSON: either a domain payload or `{ "error": "<message>" }`.
//!
//! This crate provides the [`Gateway`] that issues those calls, the
//! JSON-file session storage, and configuration loading.
//!
//! ```no_run
//! use gymlog_client::Gateway;
//! use gymlog_core::ClientConfig;
//!
//! # async fn run() -> gymlog_core::Result<()> {
//! let config = ClientConfig::new("https://script.google.com/macros/s/DEPLOYMENT/exec");
//! let gateway = Gateway::from_config(&config)?;
//!
//! gateway.login("kira", "hunter2").await?;
//! let exercises = gateway.list_exercises().await?;
//! println!("{exercises}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod gateway;
pub mod storage;

mod api;
mod auth;

pub use auth::LoginResponse;
pub use gateway::Gateway;
pub use storage::JsonFileStorage;
