//! The authenticated API client.
//!
//! [`ApiClient`] sends requests to the backend with the session cookies held
//! in its own cookie jar, unwraps the response envelope, and recovers from
//! an expired access token:
//!
//! 1. A 401 on an ordinary request marks the request as retried and calls
//!    `POST /auth/refresh-token`.
//! 2. If the refresh succeeds the original request is sent once more, with
//!    the same method, path, body and options.
//! 3. If the refresh fails the session's circuit breaker trips and every
//!    later 401 is surfaced immediately until the session is reset.
//!
//! Every other failure is returned to the caller without a retry.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::envelope;
use crate::error::{ApiError, Result};
use crate::request::{RequestBody, RequestOptions};
use crate::session::{MemorySessionState, SessionState};

/// Endpoint that rotates the session cookies.
pub const REFRESH_ENDPOINT: &str = "/auth/refresh-token";

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the headshot backend.
///
/// Cloning is cheap; clones share the connection pool, the cookie jar and
/// the session state.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionState>,
}

impl ApiClient {
    /// Create a client with a fresh in-memory session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidConfig`] or [`ApiError::UrlParse`] if the
    /// configuration is unusable.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_session(config, Arc::new(MemorySessionState::new()))
    }

    /// Create a client configured from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a client that records refresh failures in `session`.
    pub fn with_session(config: ClientConfig, session: Arc<dyn SessionState>) -> Result<Self> {
        let base_url = config.parsed_base_url()?;

        let mut builder = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| ApiError::InvalidConfig {
            reason: format!("failed to build HTTP client: {e}"),
        })?;

        Ok(Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            session,
        })
    }

    /// The backend base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The session state holding the refresh circuit breaker.
    pub fn session(&self) -> &Arc<dyn SessionState> {
        &self.session
    }

    /// Clear the refresh circuit breaker, e.g. after a successful login.
    pub fn reset_session(&self) {
        self.session.reset();
    }

    // -----------------------------------------------------------------------
    // Public API
    // -----------------------------------------------------------------------

    /// `GET endpoint`, returning the unwrapped `data`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: Option<RequestOptions>,
    ) -> Result<T> {
        self.execute(PendingRequest::new(Method::GET, endpoint, None, options))
            .await
    }

    /// `POST endpoint` with an optional body, returning the unwrapped `data`.
    pub async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<RequestBody>,
        options: Option<RequestOptions>,
    ) -> Result<T> {
        self.execute(PendingRequest::new(Method::POST, endpoint, body, options))
            .await
    }

    /// `PUT endpoint` with an optional body, returning the unwrapped `data`.
    pub async fn put<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<RequestBody>,
        options: Option<RequestOptions>,
    ) -> Result<T> {
        self.execute(PendingRequest::new(Method::PUT, endpoint, body, options))
            .await
    }

    /// `DELETE endpoint`, returning the unwrapped `data`.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: Option<RequestOptions>,
    ) -> Result<T> {
        self.execute(PendingRequest::new(Method::DELETE, endpoint, None, options))
            .await
    }

    // -----------------------------------------------------------------------
    // Request pipeline
    // -----------------------------------------------------------------------

    /// Run a request through the refresh protocol.
    async fn execute<T: DeserializeOwned>(&self, mut request: PendingRequest) -> Result<T> {
        loop {
            match self.attempt(&request).await {
                Attempt::Success { status, body } => {
                    return envelope::decode_data(status, &request.endpoint, &body);
                }
                Attempt::Failed(err) => return Err(err),
                Attempt::Unauthorized => {
                    if request.is_refresh() || request.retried || self.session.is_tripped() {
                        tracing::debug!(
                            method = %request.method,
                            endpoint = %request.endpoint,
                            retried = request.retried,
                            circuit_open = self.session.is_tripped(),
                            "401 not recoverable, rejecting"
                        );
                        return Err(request.unauthenticated());
                    }

                    request.retried = true;

                    if let Err(err) = self.refresh().await {
                        self.session.trip();
                        return Err(ApiError::RefreshFailed {
                            source: Box::new(err),
                        });
                    }

                    tracing::debug!(
                        method = %request.method,
                        endpoint = %request.endpoint,
                        "retrying request after session refresh"
                    );
                }
            }
        }
    }

    /// Call the refresh endpoint once.
    ///
    /// A 401 from the refresh endpoint is never itself refreshed.
    async fn refresh(&self) -> Result<()> {
        let request = PendingRequest::new(Method::POST, REFRESH_ENDPOINT, None, None);
        tracing::debug!("access token rejected, refreshing session");

        match self.attempt(&request).await {
            Attempt::Success { .. } => {
                tracing::info!("session refreshed");
                Ok(())
            }
            Attempt::Unauthorized => Err(request.unauthenticated()),
            Attempt::Failed(err) => Err(err),
        }
    }

    /// Send one request and classify the outcome.
    async fn attempt(&self, request: &PendingRequest) -> Attempt {
        let builder = match self.build(request) {
            Ok(builder) => builder,
            Err(err) => return Attempt::Failed(err),
        };

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(
                    method = %request.method,
                    endpoint = %request.endpoint,
                    error = %err,
                    "request failed without a response"
                );
                return Attempt::Failed(ApiError::network(err));
            }
        };

        let status = response.status();
        tracing::debug!(
            method = %request.method,
            endpoint = %request.endpoint,
            status = status.as_u16(),
            "response received"
        );

        if status == StatusCode::UNAUTHORIZED {
            return Attempt::Unauthorized;
        }

        if status.is_success() {
            match response.text().await {
                Ok(body) => Attempt::Success {
                    status: status.as_u16(),
                    body,
                },
                Err(err) => Attempt::Failed(ApiError::network(err)),
            }
        } else {
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    tracing::debug!(
                        method = %request.method,
                        endpoint = %request.endpoint,
                        status = status.as_u16(),
                        error = %err,
                        "failed to read error body"
                    );
                    String::new()
                }
            };
            Attempt::Failed(envelope::backend_error(status.as_u16(), &body))
        }
    }

    /// Build a fresh `reqwest` request for one attempt.
    fn build(&self, request: &PendingRequest) -> Result<reqwest::RequestBuilder> {
        let url = join_endpoint(&self.base_url, &request.endpoint)?;

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .headers(request.options.headers.clone());

        if !request.options.query.is_empty() {
            builder = builder.query(&request.options.query);
        }
        if let Some(timeout) = request.options.timeout {
            builder = builder.timeout(timeout);
        }

        builder = match &request.body {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Multipart(parts)) => builder.multipart(RequestBody::to_form(parts)?),
            None => builder,
        };

        Ok(builder)
    }
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

/// A request together with its retry marker.
#[derive(Debug)]
struct PendingRequest {
    method: Method,
    endpoint: String,
    body: Option<RequestBody>,
    options: RequestOptions,
    /// Set once a refresh has been attempted on behalf of this request.
    retried: bool,
}

impl PendingRequest {
    fn new(
        method: Method,
        endpoint: &str,
        body: Option<RequestBody>,
        options: Option<RequestOptions>,
    ) -> Self {
        Self {
            method,
            endpoint: endpoint.to_string(),
            body,
            options: options.unwrap_or_default(),
            retried: false,
        }
    }

    fn is_refresh(&self) -> bool {
        let path = self.endpoint.split('?').next().unwrap_or_default();
        path.trim_end_matches('/').ends_with(REFRESH_ENDPOINT)
    }

    fn unauthenticated(&self) -> ApiError {
        ApiError::Unauthenticated {
            method: self.method.to_string(),
            endpoint: self.endpoint.clone(),
        }
    }
}

/// Outcome of a single send.
enum Attempt {
    Success { status: u16, body: String },
    Unauthorized,
    Failed(ApiError),
}

/// Resolve an endpoint against the base URL.
///
/// Relative endpoints are appended to the base path (so `/auth/me` under
/// `http://host/api/v1` becomes `http://host/api/v1/auth/me`); absolute URLs
/// are used as given.
fn join_endpoint(base_url: &str, endpoint: &str) -> Result<Url> {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        return Ok(Url::parse(endpoint)?);
    }
    let path = endpoint.trim_start_matches('/');
    Ok(Url::parse(&format!("{}/{path}", base_url.trim_end_matches('/')))?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_keeps_base_path() {
        let url = join_endpoint("http://localhost:8000/api/v1", "/auth/me").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/auth/me");

        let url = join_endpoint("http://localhost:8000/api/v1/", "headshots").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/headshots");
    }

    #[test]
    fn join_keeps_inline_query() {
        let url = join_endpoint("http://localhost:8000/api/v1", "/auth/verify-email?token=abc")
            .unwrap();
        assert_eq!(url.path(), "/api/v1/auth/verify-email");
        assert_eq!(url.query(), Some("token=abc"));
    }

    #[test]
    fn join_passes_absolute_urls_through() {
        let url = join_endpoint("http://localhost:8000/api/v1", "https://cdn.test/x").unwrap();
        assert_eq!(url.as_str(), "https://cdn.test/x");
    }

    #[test]
    fn refresh_endpoint_detection() {
        let refresh = PendingRequest::new(Method::POST, REFRESH_ENDPOINT, None, None);
        assert!(refresh.is_refresh());

        let with_query =
            PendingRequest::new(Method::POST, "/auth/refresh-token?x=1", None, None);
        assert!(with_query.is_refresh());

        let other = PendingRequest::new(Method::GET, "/auth/me", None, None);
        assert!(!other.is_refresh());
        assert!(!other.retried);
    }

    #[test]
    fn client_construction() {
        let client = ApiClient::new(ClientConfig::new("http://localhost:8000/api/v1/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api/v1");
        assert!(!client.session().is_tripped());
    }

    #[test]
    fn client_rejects_bad_base_url() {
        assert!(ApiClient::new(ClientConfig::new("not a url")).is_err());
    }

    #[test]
    fn clones_share_session() {
        let client = ApiClient::new(ClientConfig::default()).unwrap();
        let clone = client.clone();
        clone.session().trip();
        assert!(client.session().is_tripped());
        client.reset_session();
        assert!(!clone.session().is_tripped());
    }

    #[test]
    fn client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ApiClient>();
    }
}
