//! CLI error types with miette diagnostics.
//!
//! Maps API and configuration errors into user-facing errors with actionable
//! help text and a stable process exit code.

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

use timetable_api::Error as ApiError;
use timetable_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(dead_code, unused_assignments)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to the timetable API at {url}")]
    #[diagnostic(
        code(timetable::connection_failed),
        help(
            "Check that the API is running and reachable.\n\
             URL: {url}\n\
             Try: timetable config show"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────

    #[error("No authentication token stored")]
    #[diagnostic(
        code(timetable::not_authenticated),
        help(
            "Log in through the main system at {login_url}\n\
             then store the issued token with: timetable token set"
        )
    )]
    NotAuthenticated { login_url: String },

    #[error("The API rejected the session token: {detail}")]
    #[diagnostic(
        code(timetable::auth_rejected),
        help(
            "The stored token has been cleared.\n\
             Log in again through the main system and run: timetable token set"
        )
    )]
    AuthRejected { detail: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(timetable::not_found),
        help("Run: timetable {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error (HTTP {status}): {detail}")]
    #[diagnostic(code(timetable::api_error))]
    Api {
        status: u16,
        detail: String,
        kind: Option<String>,
    },

    #[error("Unexpected response from the API: {message}")]
    #[diagnostic(
        code(timetable::bad_response),
        help("Run with -vv to log the raw response body.")
    )]
    BadResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(timetable::validation))]
    Validation { field: String, reason: String },

    // ── Configuration / session storage ──────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(timetable::config),
        help("Inspect the resolved settings with: timetable config show")
    )]
    Config(#[from] ConfigError),

    #[error("Could not access the token store: {message}")]
    #[diagnostic(code(timetable::token_store))]
    TokenStore { message: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(timetable::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────

    #[error("Request timed out after {timeout:?}")]
    #[diagnostic(
        code(timetable::timeout),
        help("Check the API's responsiveness and try again.")
    )]
    Timeout { timeout: Duration },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(timetable::json), help("Check the JSON contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotAuthenticated { .. } | Self::AuthRejected { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Like `From<ApiError>`, but reports a 404 as a missing staff member.
    pub fn for_staff(err: ApiError, id: &str) -> Self {
        if err.is_not_found() {
            return Self::NotFound {
                resource_type: "staff member".into(),
                identifier: id.into(),
                list_command: "staff list".into(),
            };
        }
        err.into()
    }
}

// ── ApiError → CliError mapping ──────────────────────────────────────

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Api { status: 401, detail, .. } => CliError::AuthRejected { detail },

            ApiError::Api {
                status,
                detail,
                kind,
            } => CliError::Api {
                status,
                detail,
                kind,
            },

            ApiError::Timeout { timeout } => CliError::Timeout { timeout },

            ApiError::Transport(e) => CliError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "(unknown)".into(), ToString::to_string),
                source: Box::new(e),
            },

            ApiError::InvalidUrl(e) => CliError::Validation {
                field: "url".into(),
                reason: e.to_string(),
            },

            ApiError::InvalidId(id) => CliError::Validation {
                field: "id".into(),
                reason: format!("must not be blank (got {id:?})"),
            },
            ApiError::InvalidBaseUrl(url) => CliError::Validation {
                field: "api_base_url".into(),
                reason: format!("cannot be used as an API root: {url}"),
            },

            ApiError::Deserialization { message, body } => {
                tracing::debug!(%body, "undecodable response body");
                CliError::BadResponse { message }
            }

            ApiError::TokenStore(message) => CliError::TokenStore { message },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_auth_exit_code() {
        let err: CliError = ApiError::Api {
            status: 401,
            detail: "Not authenticated".into(),
            kind: None,
        }
        .into();
        assert!(matches!(err, CliError::AuthRejected { .. }));
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn staff_not_found_names_the_id() {
        let err = CliError::for_staff(
            ApiError::Api {
                status: 404,
                detail: "Staff not found".into(),
                kind: None,
            },
            "s-9",
        );
        assert_eq!(err.to_string(), "staff member 's-9' not found");
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }

    #[test]
    fn other_statuses_keep_server_detail() {
        let err = CliError::for_staff(
            ApiError::Api {
                status: 422,
                detail: "name required".into(),
                kind: Some("validation_error".into()),
            },
            "s-1",
        );
        assert_eq!(err.to_string(), "API error (HTTP 422): name required");
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn timeout_exit_code() {
        let err: CliError = ApiError::Timeout {
            timeout: Duration::from_secs(10),
        }
        .into();
        assert_eq!(err.to_string(), "Request timed out after 10s");
        assert_eq!(err.exit_code(), exit_code::TIMEOUT);
    }

    #[test]
    fn blank_id_is_usage_error() {
        let err = CliError::for_staff(ApiError::InvalidId(String::new()), "");
        assert!(err.to_string().starts_with("Invalid value for id"), "{err}");
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn missing_token_exit_code() {
        let err = CliError::NotAuthenticated {
            login_url: "http://localhost:8002/".into(),
        };
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
