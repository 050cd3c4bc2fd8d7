//! Session gate holding the admin token

mod store;

use std::sync::Arc;

use crate::error::Result;

pub use store::*;

/// The admin session.
///
/// The token is never validated locally; the first authenticated call
/// decides whether it is any good.
pub struct Session {
    token: Option<String>,
    store: Arc<dyn TokenStore>,
}

impl Session {
    /// Load the session from persisted storage
    pub fn load(store: Arc<dyn TokenStore>) -> Result<Self> {
        let token = store.load()?.filter(|t| !t.is_empty());
        tracing::debug!(authenticated = token.is_some(), "session loaded");
        Ok(Self { token, store })
    }

    /// The active token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Persist and activate a token. An empty value signs out.
    pub fn save_token(&mut self, value: &str) -> Result<()> {
        if value.is_empty() {
            return self.clear_token();
        }
        self.store.save(value)?;
        self.token = Some(value.to_string());
        tracing::info!("admin token saved");
        Ok(())
    }

    /// Remove the token from storage and memory
    pub fn clear_token(&mut self) -> Result<()> {
        self.store.clear()?;
        self.token = None;
        tracing::info!("admin token cleared");
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
