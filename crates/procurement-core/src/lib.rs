//! Core library for the procurement client.
//!
//! - `auth`: the persisted session (token + user) and its storage backends
//! - `api`: the request dispatcher and typed endpoint calls
//! - `models`: users, items, suppliers, and purchases
//! - `utils`: Indonesian currency and date formatting
//! - `config`: base URL, timeouts, and on-disk locations

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{Navigator, Notifier, Session};
pub use config::Config;
