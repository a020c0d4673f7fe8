//! API error type and StreamError → HTTP status mapping.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use sluice_core::error::StreamError;

/// API error with HTTP status code and error code.
#[derive(Debug)]
pub struct ApiError {
    /// Error code (e.g., "E501").
    pub code: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// HTTP status code.
    pub status: StatusCode,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: &'static str, message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            code,
            message: message.into(),
            status,
        }
    }

    /// Create a 400 Bad Request error.
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(code, message, StatusCode::BAD_REQUEST)
    }

    /// Create a 404 Not Found error.
    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(code, message, StatusCode::NOT_FOUND)
    }

    /// Create a 502 Bad Gateway error.
    pub fn bad_gateway(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(code, message, StatusCode::BAD_GATEWAY)
    }

    /// Convert to HTTP response.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let body = serde_json::json!({
            "error": {
                "code": self.code,
                "message": self.message,
                "status": self.status.as_u16()
            }
        });

        Response::builder()
            .status(self.status)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(body.to_string())))
            .expect("response builder should not fail")
    }
}

impl From<StreamError> for ApiError {
    fn from(err: StreamError) -> Self {
        let code = err.code();
        let message = err.to_string();

        let status = match &err {
            // 404 Not Found
            StreamError::NotFound { .. } => StatusCode::NOT_FOUND,

            // 502 Bad Gateway (the runtime failed, not the caller)
            StreamError::Timeout { .. }
            | StreamError::Construction { .. }
            | StreamError::Teardown { .. } => StatusCode::BAD_GATEWAY,

            // 400 Bad Request
            StreamError::Conflict { .. }
            | StreamError::BadRequest { .. }
            | StreamError::Reconcile { .. }
            | StreamError::Decode { .. }
            | StreamError::InvalidConfig { .. }
            | StreamError::Collision { .. } => StatusCode::BAD_REQUEST,

            // 500 Internal Server Error
            StreamError::Io { .. } | StreamError::Network { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            code,
            message,
            status,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_core::error::Operation;

    #[test]
    fn not_found_mapping() {
        let api_err: ApiError = StreamError::NotFound {
            id: "foo".to_string(),
        }
        .into();

        assert_eq!(api_err.code, "E501");
        assert_eq!(api_err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflict_is_bad_request() {
        let api_err: ApiError = StreamError::Conflict {
            id: "foo".to_string(),
        }
        .into();

        assert_eq!(api_err.code, "E502");
        assert_eq!(api_err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn runtime_failures_are_bad_gateway() {
        let api_err: ApiError = StreamError::Timeout {
            id: "foo".to_string(),
            operation: Operation::Start,
            timeout_ms: 10,
        }
        .into();
        assert_eq!(api_err.status, StatusCode::BAD_GATEWAY);

        let api_err: ApiError = StreamError::Construction {
            id: "foo".to_string(),
            cause: "no such input".to_string(),
        }
        .into();
        assert_eq!(api_err.status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn error_response_format() {
        let response = ApiError::not_found("E501", "Stream 'foo' not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
