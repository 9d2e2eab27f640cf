// Staff timetable HTTP client
//
// Wraps `reqwest::Client` with base-URL resolution, per-request bearer
// injection from the `Session`, and error normalization. Resource endpoints
// are implemented as inherent methods in separate files (see `staff.rs`) to
// keep this module focused on transport mechanics.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::session::Session;
use crate::transport::{DEFAULT_TIMEOUT, TransportConfig};

// ── Error response shape from the API ────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
    #[serde(rename = "type", default)]
    kind: Option<Value>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the staff timetable API.
///
/// Every request carries `Authorization: Bearer <token>` when the session
/// holds one; requests without a token are still sent and left for the
/// server to reject. A 401 clears the session before the error is returned.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<Session>,
    timeout: Duration,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` (e.g. `http://localhost:8002/staff-timetable/api`).
    pub fn new(
        base_url: &Url,
        session: Arc<Session>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url),
            session,
            timeout: transport.timeout,
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages timeout and headers).
    pub fn with_client(http: reqwest::Client, base_url: &Url, session: Arc<Session>) -> Self {
        Self {
            http,
            base_url: Self::normalize_base_url(base_url),
            session,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Force a trailing slash so relative paths join underneath the API root.
    fn normalize_base_url(raw: &Url) -> Url {
        let mut url = raw.clone();
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        url
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Join a relative path (e.g. `"staff/"`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Append path segments to the base URL, percent-encoding each one.
    pub fn endpoint_segments(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");
        let resp = self.send(self.http.get(url)).await?;
        self.handle_response(resp).await
    }

    pub async fn get_with_params<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        debug!("GET {url} params={params:?}");
        let resp = self.send(self.http.get(url).query(params)).await?;
        self.handle_response(resp).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("POST {url}");
        let resp = self.send(self.http.post(url).json(body)).await?;
        self.handle_response(resp).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("PUT {url}");
        let resp = self.send(self.http.put(url).json(body)).await?;
        self.handle_response(resp).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("DELETE {url}");
        let resp = self.send(self.http.delete(url)).await?;
        self.handle_response(resp).await
    }

    // ── Request / response pipeline ──────────────────────────────────

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        let builder = match self.session.token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        };
        builder.send().await.map_err(|e| self.transport_error(e))
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout: self.timeout,
            }
        } else {
            Error::Transport(err)
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await.map_err(|e| self.transport_error(e))?;
            return serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body: body.clone(),
                }
            });
        }

        let err = Self::parse_error(status, resp).await;
        if status == StatusCode::UNAUTHORIZED {
            self.invalidate_session();
        }
        Err(err)
    }

    async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let body = serde_json::from_str::<ErrorBody>(&raw).ok();

        let detail = body
            .as_ref()
            .and_then(|b| b.detail.as_ref())
            .and_then(detail_text)
            .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
        let kind = body
            .as_ref()
            .and_then(|b| b.kind.as_ref())
            .and_then(Value::as_str)
            .filter(|k| !k.is_empty())
            .map(String::from);

        debug!(%status, %detail, "request rejected");
        Error::Api {
            status: status.as_u16(),
            detail,
            kind,
        }
    }

    fn invalidate_session(&self) {
        warn!("authentication rejected, clearing session token");
        if let Err(e) = self.session.clear_token() {
            warn!(error = %e, "failed to clear persisted token");
        }
    }
}

/// Render a server `detail` as text. Strings pass through; structured
/// details (validation error lists) become compact JSON.
fn detail_text(detail: &Value) -> Option<String> {
    match detail {
        Value::Null => None,
        Value::String(s) => (!s.is_empty()).then(|| s.clone()),
        other => Some(other.to_string()),
    }
}
