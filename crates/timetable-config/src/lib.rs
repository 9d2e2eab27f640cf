//! Configuration for the staff timetable client.
//!
//! Three named environments select the API base URL, debug flag, locale and
//! timezone label. The environment is chosen once at startup from a mode
//! string (unset or unknown falls back to [`Environment::Local`]) and passed
//! down as an explicit [`AppConfig`]. A small TOML settings file, merged with
//! `TIMETABLE_*` environment variables, supplies the mode, the same-origin
//! host and which token store to use.

pub mod store;

use std::path::PathBuf;
use std::sync::Arc;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use timetable_api::TokenStore;

pub use store::{FileTokenStore, KeyringTokenStore, TokenStoreKind};

/// API root below the serving origin.
pub const API_PATH: &str = "/staff-timetable/api";
/// Fixed endpoint for local development.
pub const LOCAL_API_BASE_URL: &str = "http://localhost:8002/staff-timetable/api";
pub const DEFAULT_LOCALE: &str = "es-MX";
/// Timezone label carried for display. No conversion is done with it.
pub const DEFAULT_TIMEZONE: &str = "America/Mexico_City";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Environment ─────────────────────────────────────────────────────

/// Named deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Development,
    Production,
}

impl Environment {
    /// Select from a mode string, case-insensitively.
    ///
    /// `development` and `production` pick those environments. Everything
    /// else, including `localhost`, `local`, unset and unknown values,
    /// selects [`Environment::Local`].
    pub fn from_mode(mode: Option<&str>) -> Self {
        match mode.map(|m| m.trim().to_ascii_lowercase()).as_deref() {
            Some("development") => Self::Development,
            Some("production") => Self::Production,
            _ => Self::Local,
        }
    }

    pub fn debug(self) -> bool {
        !matches!(self, Self::Production)
    }
}

// ── Resolved application config ─────────────────────────────────────

/// Fully resolved configuration for one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api_base_url: Url,
    pub debug: bool,
    pub locale: String,
    pub timezone: String,
}

impl AppConfig {
    /// Resolve the configuration for `environment`.
    ///
    /// Local uses the fixed localhost endpoint. Development and production
    /// serve the API from the same origin as the app, so `origin` is
    /// required for them.
    pub fn for_environment(
        environment: Environment,
        origin: Option<&Url>,
    ) -> Result<Self, ConfigError> {
        let api_base_url = match environment {
            Environment::Local => {
                Url::parse(LOCAL_API_BASE_URL).map_err(|e| ConfigError::Validation {
                    field: "api_base_url".into(),
                    reason: e.to_string(),
                })?
            }
            Environment::Development | Environment::Production => {
                let origin = origin.ok_or_else(|| ConfigError::Validation {
                    field: "origin".into(),
                    reason: format!("required for the {environment} environment"),
                })?;
                same_origin_api(origin)
            }
        };

        Ok(Self {
            environment,
            api_base_url,
            debug: environment.debug(),
            locale: DEFAULT_LOCALE.into(),
            timezone: DEFAULT_TIMEZONE.into(),
        })
    }
}

fn same_origin_api(origin: &Url) -> Url {
    let mut url = origin.clone();
    url.set_path(API_PATH);
    url.set_query(None);
    url.set_fragment(None);
    url
}

// ── Settings file ───────────────────────────────────────────────────

/// On-disk settings, overridable by `TIMETABLE_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Environment selector: `localhost`, `development` or `production`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Origin the app is served from (e.g. `https://hub.example.com`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    /// Where the session token lives.
    #[serde(default)]
    pub token_store: TokenStoreKind,
}

impl Settings {
    /// Extract settings from an arbitrary figment (used by tests and
    /// [`load_settings`]).
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        Ok(figment.extract()?)
    }

    pub fn environment(&self) -> Environment {
        Environment::from_mode(self.mode.as_deref())
    }

    pub fn origin_url(&self) -> Result<Option<Url>, ConfigError> {
        self.origin
            .as_deref()
            .map(|raw| {
                Url::parse(raw).map_err(|_| ConfigError::Validation {
                    field: "origin".into(),
                    reason: format!("invalid URL: {raw}"),
                })
            })
            .transpose()
    }

    pub fn app_config(&self) -> Result<AppConfig, ConfigError> {
        let origin = self.origin_url()?;
        AppConfig::for_environment(self.environment(), origin.as_ref())
    }

    /// Open the configured token store.
    pub fn open_token_store(&self) -> Result<Arc<dyn TokenStore>, ConfigError> {
        store::open(self.token_store)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Platform config directory for this app.
pub fn config_dir() -> PathBuf {
    ProjectDirs::from("com", "timetable", "timetable").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("timetable");
            p
        },
        |dirs| dirs.config_dir().to_path_buf(),
    )
}

/// Resolve the settings file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// ── Loading / saving ────────────────────────────────────────────────

/// Load settings from file + environment.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("TIMETABLE_"));

    Settings::from_figment(&figment)
}

/// Serialize settings to TOML and write to the canonical path.
pub fn save_settings(settings: &Settings) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(settings)?;
    std::fs::write(&path, toml_str)?;
    Ok(path)
}
