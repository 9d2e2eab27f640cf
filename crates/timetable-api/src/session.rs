// Bearer-token session
//
// The token is owned by an external login system. This module only mirrors
// it: an in-memory copy for the transport, written through to a persistent
// `TokenStore` so other processes (and the guard) see the same value.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::Error;

/// Fixed storage key for the session token.
pub const TOKEN_KEY: &str = "auth_token";

/// Persistent storage capability for the session token.
///
/// Implementations must treat a missing entry as `None` rather than an error.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<SecretString>;
    fn save(&self, token: &SecretString) -> Result<(), Error>;
    fn clear(&self) -> Result<(), Error>;
}

/// Process-local store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<SecretString>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(SecretString::from(token.into()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, token: &SecretString) -> Result<(), Error> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Empty strings count as "no token".
pub(crate) fn present(token: Option<SecretString>) -> Option<SecretString> {
    token.filter(|t| !t.expose_secret().is_empty())
}

/// In-memory token mirrored to a [`TokenStore`].
///
/// Hydrated from the store on construction, and again lazily on read while
/// the in-memory copy is empty. Writes go to both synchronously.
pub struct Session {
    token: RwLock<Option<SecretString>>,
    store: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let token = present(store.load());
        if token.is_some() {
            debug!("session hydrated from token store");
        }
        Self {
            token: RwLock::new(token),
            store,
        }
    }

    /// Current token, hydrating from the store if memory is empty.
    pub fn token(&self) -> Option<SecretString> {
        if let Some(token) = self
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Some(token);
        }

        let loaded = present(self.store.load());
        if let Some(ref token) = loaded {
            debug!("session hydrated lazily from token store");
            *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        }
        loaded
    }

    /// Replace the token in memory and in the store.
    pub fn set_token(&self, token: SecretString) -> Result<(), Error> {
        debug!("storing session token");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        self.store.save(&token)
    }

    /// Drop the token from memory and from the store.
    pub fn clear_token(&self) -> Result<(), Error> {
        debug!("clearing session token");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.store.clear()
    }

    /// The backing store, shared with the guard.
    pub fn store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.store)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let has_token = self
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some();
        f.debug_struct("Session")
            .field("has_token", &has_token)
            .finish_non_exhaustive()
    }
}
