//! Error types for the headshot API client.
//!
//! Every client operation surfaces failures through [`ApiError`]. Structured
//! failures (a backend reply or a transport failure) carry a status, a
//! message and a payload; the unrecoverable-auth rejection is kept as its
//! own variant so callers can route the user back to the login entry point
//! instead of displaying an error.

use serde_json::Value;

/// Status reported for failures where no HTTP response was received.
pub const NETWORK_ERROR_STATUS: u16 = 0;

/// Message used when the transport gives no description of a failure.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error";

/// Unified error type for the headshot API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Backend {
        /// HTTP status code of the reply.
        status: u16,
        /// The backend's `message`, or a transport-level description.
        message: String,
        /// Raw error payload returned by the backend, if any.
        data: Option<Value>,
    },

    /// No response was received (connection refused, DNS, timeout, ...).
    #[error("{message}")]
    Network {
        /// Description of the transport failure.
        message: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// A 401 that the client will not try to recover from: the request was
    /// the refresh call itself, it was already retried once, or an earlier
    /// refresh in this session failed.
    #[error("session is no longer authenticated ({method} {endpoint})")]
    Unauthenticated {
        /// HTTP method of the rejected request.
        method: String,
        /// Endpoint path of the rejected request.
        endpoint: String,
    },

    /// The refresh call triggered by a 401 failed. The session is dead until
    /// the next successful login.
    #[error("session refresh failed: {source}")]
    RefreshFailed {
        /// The error returned by the refresh endpoint.
        #[source]
        source: Box<ApiError>,
    },

    /// A 2xx reply whose envelope or `data` could not be decoded into the
    /// requested type.
    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        /// HTTP status code of the reply.
        status: u16,
        /// Endpoint path that produced the reply.
        endpoint: String,
        /// The decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// The request could not be built locally (bad header, bad MIME type,
    /// unserialisable body).
    #[error("invalid request: {reason}")]
    InvalidRequest {
        /// What is wrong with the request.
        reason: String,
    },

    /// Client configuration is missing or malformed.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// URL parsing error.
    #[error("url parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Build a [`ApiError::Network`] from a transport error, falling back to
    /// a generic message when the transport gives none.
    pub fn network(source: reqwest::Error) -> Self {
        let message = source.to_string();
        let message = if message.trim().is_empty() {
            NETWORK_ERROR_MESSAGE.to_string()
        } else {
            message
        };
        Self::Network { message, source }
    }

    /// HTTP status associated with this error.
    ///
    /// Failures without a response (network and local errors) report
    /// [`NETWORK_ERROR_STATUS`]. A refresh failure reports the status of the
    /// refresh call.
    pub fn status(&self) -> u16 {
        match self {
            Self::Backend { status, .. } | Self::Decode { status, .. } => *status,
            Self::Unauthenticated { .. } => 401,
            Self::RefreshFailed { source } => source.status(),
            Self::Network { .. }
            | Self::InvalidRequest { .. }
            | Self::InvalidConfig { .. }
            | Self::UrlParse(_) => NETWORK_ERROR_STATUS,
        }
    }

    /// Human-readable message, preferring what the backend said.
    pub fn message(&self) -> String {
        match self {
            Self::Backend { message, .. } | Self::Network { message, .. } => message.clone(),
            Self::RefreshFailed { source } => source.message(),
            other => other.to_string(),
        }
    }

    /// Raw backend error payload, if the backend returned one.
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Backend { data, .. } => data.as_ref(),
            Self::RefreshFailed { source } => source.data(),
            _ => None,
        }
    }

    /// The transport error behind a network failure.
    pub fn transport_error(&self) -> Option<&reqwest::Error> {
        match self {
            Self::Network { source, .. } => Some(source),
            Self::RefreshFailed { source } => source.transport_error(),
            _ => None,
        }
    }

    /// `true` if no response was received from the backend.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// `true` if the session cannot be recovered and the caller should send
    /// the user back to the login entry point.
    pub fn is_session_expired(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated { .. } | Self::RefreshFailed { .. }
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
