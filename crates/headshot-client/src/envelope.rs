//! The uniform response envelope wrapped around every backend reply.
//!
//! The backend answers `{ success, message, data?, error? }` on every
//! route, success or failure. The client unwraps `data` on 2xx and builds an
//! [`ApiError`] from the envelope otherwise; callers never see the wrapper.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, Result};

/// Wire shape of every backend reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = Value> {
    /// Whether the backend considers the call successful.
    #[serde(default)]
    pub success: bool,

    /// Human-readable message from the backend.
    #[serde(default)]
    pub message: String,

    /// The payload, present on most successful replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Machine-readable error code, present on most failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// A successful envelope carrying `data`.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    /// A failed envelope with an error code and no payload.
    pub fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Decode the `data` field of a 2xx reply into `T`.
///
/// An empty body or a missing `data` decodes as JSON `null`, so `()` and
/// `Option<_>` targets succeed on replies that carry no payload.
pub(crate) fn decode_data<T: DeserializeOwned>(
    status: u16,
    endpoint: &str,
    body: &str,
) -> Result<T> {
    let data = if body.trim().is_empty() {
        Value::Null
    } else {
        let envelope: ApiResponse<Value> =
            serde_json::from_str(body).map_err(|source| ApiError::Decode {
                status,
                endpoint: endpoint.to_string(),
                source,
            })?;

        if !envelope.success {
            tracing::warn!(
                status,
                endpoint,
                message = %envelope.message,
                "backend returned a 2xx reply flagged as unsuccessful"
            );
        }

        envelope.data.unwrap_or(Value::Null)
    };

    serde_json::from_value(data).map_err(|source| ApiError::Decode {
        status,
        endpoint: endpoint.to_string(),
        source,
    })
}

/// Build an [`ApiError::Backend`] from a non-2xx reply.
///
/// The backend's `message` wins when present; otherwise the message names
/// the status code the way the transport would. A body that is not JSON is
/// kept as a string payload.
pub(crate) fn backend_error(status: u16, body: &str) -> ApiError {
    let data = if body.trim().is_empty() {
        None
    } else {
        Some(serde_json::from_str::<Value>(body).unwrap_or_else(|_| Value::String(body.to_string())))
    };

    let message = data
        .as_ref()
        .and_then(|d| d.get("message"))
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status code {status}"));

    ApiError::Backend {
        status,
        message,
        data,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Headshots {
        headshots: Vec<String>,
    }

    #[test]
    fn decode_returns_only_data() {
        let body = json!({
            "success": true,
            "message": "ok",
            "data": { "headshots": [] }
        })
        .to_string();

        let data: Headshots = decode_data(200, "/headshots", &body).unwrap();
        assert_eq!(data, Headshots { headshots: vec![] });
    }

    #[test]
    fn decode_missing_data_as_unit() {
        let body = json!({ "success": true, "message": "deleted" }).to_string();
        decode_data::<()>(200, "/headshots/1", &body).unwrap();

        let maybe: Option<Headshots> = decode_data(200, "/headshots/1", &body).unwrap();
        assert!(maybe.is_none());
    }

    #[test]
    fn decode_empty_body() {
        decode_data::<()>(204, "/admin/users/u1", "").unwrap();
    }

    #[test]
    fn decode_wrong_shape_is_decode_error() {
        let body = json!({ "success": true, "message": "ok", "data": 42 }).to_string();
        let err = decode_data::<Headshots>(200, "/headshots", &body).unwrap_err();
        assert!(matches!(err, ApiError::Decode { status: 200, .. }));
    }

    #[test]
    fn decode_non_json_is_decode_error() {
        let err = decode_data::<Value>(200, "/headshots", "<html>").unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[test]
    fn backend_error_prefers_backend_message() {
        let body = json!({
            "success": false,
            "message": "Package not found",
            "error": "NOT_FOUND"
        })
        .to_string();

        let err = backend_error(404, &body);
        assert_eq!(err.status(), 404);
        assert_eq!(err.message(), "Package not found");
        assert_eq!(err.data().unwrap()["error"], "NOT_FOUND");
    }

    #[test]
    fn backend_error_falls_back_to_status_message() {
        let body = json!({ "success": false, "message": "" }).to_string();
        let err = backend_error(500, &body);
        assert_eq!(err.message(), "Request failed with status code 500");

        let err = backend_error(502, "");
        assert_eq!(err.message(), "Request failed with status code 502");
        assert!(err.data().is_none());
    }

    #[test]
    fn backend_error_keeps_non_json_body() {
        let err = backend_error(503, "upstream unavailable");
        assert_eq!(err.data(), Some(&Value::String("upstream unavailable".into())));
        assert_eq!(err.message(), "Request failed with status code 503");
    }

    #[test]
    fn envelope_serialization_skips_absent_fields() {
        let ok = ApiResponse::ok("done", json!({ "id": 1 }));
        let v = serde_json::to_value(&ok).unwrap();
        assert_eq!(v, json!({ "success": true, "message": "done", "data": { "id": 1 } }));

        let failed: ApiResponse = ApiResponse::failure("nope", "BAD_REQUEST");
        let v = serde_json::to_value(&failed).unwrap();
        assert_eq!(
            v,
            json!({ "success": false, "message": "nope", "error": "BAD_REQUEST" })
        );
    }
}
