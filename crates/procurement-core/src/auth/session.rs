use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::navigation::Navigator;
use super::store::{FileStore, KeyValueStore};
use crate::config::Config;
use crate::models::User;

/// Storage key holding the raw JWT
pub const TOKEN_KEY: &str = "jwt_token";

/// Storage key holding the JSON-serialized user record
pub const USER_KEY: &str = "user";

/// Route the user is sent to when logged out or not authenticated
pub const ENTRY_ROUTE: &str = "index.html";

/// The logged-in state: a bearer token and the user it belongs to.
///
/// Token and user are stored independently; either can be present without
/// the other. Share one `Session` between the API client and the front end
/// through an `Arc`.
pub struct Session {
    store: Box<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
}

impl Session {
    pub fn new(store: impl KeyValueStore + 'static, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store: Box::new(store),
            navigator,
        }
    }

    /// Load the persisted session from the configured storage file
    pub fn open(config: &Config, navigator: Arc<dyn Navigator>) -> Result<Self> {
        let path = config.storage_path()?;
        let store = FileStore::open(path).context("Failed to open session storage")?;
        let session = Self::new(store, navigator);
        debug!(has_token = session.is_authenticated(), "Session loaded");
        Ok(session)
    }

    pub fn get_token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY)
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        self.store.set(TOKEN_KEY, token)
    }

    pub fn remove_token(&self) -> Result<()> {
        self.store.remove(TOKEN_KEY)
    }

    /// Read the stored user record.
    ///
    /// Nothing stored is `Ok(None)`. Text that does not deserialize into `U`
    /// is an error.
    pub fn get_user<U: DeserializeOwned>(&self) -> Result<Option<U>> {
        match self.store.get(USER_KEY) {
            Some(text) => {
                let user = serde_json::from_str(&text).context("Failed to parse stored user")?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    pub fn set_user<U: Serialize + ?Sized>(&self, user: &U) -> Result<()> {
        let text = serde_json::to_string(user).context("Failed to serialize user")?;
        self.store.set(USER_KEY, &text)
    }

    pub fn remove_user(&self) -> Result<()> {
        self.store.remove(USER_KEY)
    }

    /// The stored user as the backend's `User` model
    pub fn current_user(&self) -> Result<Option<User>> {
        self.get_user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }

    /// Remove token and user, then navigate to the entry route.
    ///
    /// Navigation happens even if clearing storage fails; the first storage
    /// error is returned afterwards.
    pub fn logout(&self) -> Result<()> {
        let token_result = self.remove_token();
        let user_result = self.remove_user();
        if let Err(ref e) = token_result {
            warn!(error = %e, "Failed to remove token during logout");
        }
        if let Err(ref e) = user_result {
            warn!(error = %e, "Failed to remove user during logout");
        }

        debug!("Session cleared");
        self.navigator.navigate(ENTRY_ROUTE);

        token_result.and(user_result)
    }

    /// Returns true if a token is stored. Otherwise navigates to the entry
    /// route and returns false; storage is left untouched. Callers should
    /// stop when this returns false.
    pub fn require_auth(&self) -> bool {
        if self.is_authenticated() {
            return true;
        }
        debug!("No token stored, redirecting to entry route");
        self.navigator.navigate(ENTRY_ROUTE);
        false
    }
}
