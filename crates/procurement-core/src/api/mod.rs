//! REST API client module for the procurement backend.
//!
//! `ApiClient` prefixes every endpoint with the configured base URL and
//! attaches the session's JWT as a bearer token. A 401 from the server ends
//! the session: the user is notified, the stored token and user are
//! removed, and the session navigates back to the entry route.

pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod error;

pub use client::ApiClient;
pub use envelope::ApiResponse;
pub use error::ApiError;
