//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `Session`: token and user record persisted across runs
//! - `KeyValueStore`: string-keyed storage backing the session
//! - `Navigator` / `Notifier`: the outward effects of a session ending
//!
//! No expiry is tracked locally. An expired token is discovered when the
//! server answers 401.

pub mod navigation;
pub mod session;
pub mod store;

pub use navigation::{Navigator, Notifier};
pub use session::{Session, ENTRY_ROUTE, TOKEN_KEY, USER_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore};
