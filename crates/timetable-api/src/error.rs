use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for the `timetable-api` crate.
///
/// Every variant can be flattened into the uniform [`ApiError`] shape via
/// [`Error::to_api_error`], which is what the view layer reports.
#[derive(Debug, Error)]
pub enum Error {
    // ── Remote API ──────────────────────────────────────────────────
    /// Non-2xx response. `detail` and `kind` come from the body's
    /// `detail` / `type` fields when present.
    #[error("API error (HTTP {status}): {detail}")]
    Api {
        status: u16,
        detail: String,
        kind: Option<String>,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured base URL cannot carry path segments.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// A staff id that is empty or whitespace.
    #[error("Invalid staff id: {0:?}")]
    InvalidId(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Session ─────────────────────────────────────────────────────
    /// The persistent token store could not be read or written.
    #[error("Token store error: {0}")]
    TokenStore(String),
}

impl Error {
    /// Returns `true` for an authentication rejection (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Normalize into the `{detail, type?}` shape.
    ///
    /// Server rejections keep the server-supplied fields; everything else
    /// carries the transport-level message and no type.
    pub fn to_api_error(&self) -> ApiError {
        match self {
            Self::Api { detail, kind, .. } => ApiError {
                detail: detail.clone(),
                kind: kind.clone(),
            },
            other => ApiError {
                detail: other.to_string(),
                kind: None,
            },
        }
    }
}

/// Uniform error shape surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub detail: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            Some(kind) => write!(f, "{} ({kind})", self.detail),
            None => f.write_str(&self.detail),
        }
    }
}

impl From<&Error> for ApiError {
    fn from(err: &Error) -> Self {
        err.to_api_error()
    }
}
