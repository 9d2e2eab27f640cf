// Persistent token stores
//
// The session token lives under a single fixed key. The file store keeps it
// in `<config dir>/auth_token`; the keyring store uses the OS credential
// store. Both report a missing entry as "no token".

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use timetable_api::{Error as ApiError, MemoryTokenStore, TOKEN_KEY, TokenStore};

use crate::ConfigError;

/// Keyring service name for the token entry.
pub const KEYRING_SERVICE: &str = "staff-timetable";

/// Which backend holds the session token.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TokenStoreKind {
    #[default]
    File,
    Keyring,
    Memory,
}

/// Open a store of the given kind at its default location.
pub fn open(kind: TokenStoreKind) -> Result<Arc<dyn TokenStore>, ConfigError> {
    Ok(match kind {
        TokenStoreKind::File => Arc::new(FileTokenStore::default_location()),
        TokenStoreKind::Keyring => Arc::new(KeyringTokenStore::new()?),
        TokenStoreKind::Memory => Arc::new(MemoryTokenStore::new()),
    })
}

// ── File ────────────────────────────────────────────────────────────

/// Token kept as the sole contents of one file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/auth_token`
    pub fn default_location() -> Self {
        Self::new(crate::config_dir().join(TOKEN_KEY))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<SecretString> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        let token = raw.trim();
        if token.is_empty() {
            return None;
        }
        Some(SecretString::from(token.to_owned()))
    }

    fn save(&self, token: &SecretString) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| store_error(&self.path, &e))?;
        }
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(&self.path)
            .map_err(|e| store_error(&self.path, &e))?;
        // `mode` only applies on creation; tighten a file that already existed.
        restrict_permissions(&self.path)?;
        file.write_all(token.expose_secret().as_bytes())
            .map_err(|e| store_error(&self.path, &e))?;
        debug!(path = %self.path.display(), "token written");
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "token removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(store_error(&self.path, &e)),
        }
    }
}

fn store_error(path: &Path, err: &std::io::Error) -> ApiError {
    ApiError::TokenStore(format!("{}: {err}", path.display()))
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), ApiError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| store_error(path, &e))
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
fn restrict_permissions(_path: &Path) -> Result<(), ApiError> {
    Ok(())
}

// ── Keyring ─────────────────────────────────────────────────────────

/// Token kept in the OS keyring under `staff-timetable` / `auth_token`.
#[derive(Debug)]
pub struct KeyringTokenStore {
    entry: keyring::Entry,
}

impl KeyringTokenStore {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            entry: keyring::Entry::new(KEYRING_SERVICE, TOKEN_KEY)?,
        })
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Option<SecretString> {
        self.entry
            .get_password()
            .ok()
            .filter(|t| !t.is_empty())
            .map(SecretString::from)
    }

    fn save(&self, token: &SecretString) -> Result<(), ApiError> {
        self.entry
            .set_password(token.expose_secret())
            .map_err(|e| ApiError::TokenStore(format!("keyring: {e}")))
    }

    fn clear(&self) -> Result<(), ApiError> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(ApiError::TokenStore(format!("keyring: {e}"))),
        }
    }
}
