/// Unified error handling module
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Unified error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    /// Parent list the client can navigate back to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back: Option<String>,
    /// Whether re-issuing the same request may succeed
    pub retryable: bool,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("External API error: {0}")]
    ExternalApi(#[from] reqwest::Error),

    #[error("Upstream {endpoint} answered with status {status}")]
    UpstreamStatus { endpoint: String, status: u16 },

    #[error("Malformed upstream payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("{kind} '{id}' not found")]
    NotFound {
        kind: &'static str,
        id: String,
        back: &'static str,
    },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    pub fn not_found(kind: &'static str, id: impl Into<String>, back: &'static str) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
            back,
        }
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::ExternalApi(e) => match e.status().map(|s| s.as_u16()) {
                Some(403) => (StatusCode::BAD_GATEWAY, "UPSTREAM_403"),
                Some(429) => (StatusCode::BAD_GATEWAY, "UPSTREAM_429"),
                Some(500..=599) => (StatusCode::BAD_GATEWAY, "UPSTREAM_5XX"),
                _ if e.is_timeout() => (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT"),
                _ => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            },
            Self::UpstreamStatus { status, .. } => match status {
                403 => (StatusCode::BAD_GATEWAY, "UPSTREAM_403"),
                429 => (StatusCode::BAD_GATEWAY, "UPSTREAM_429"),
                500..=599 => (StatusCode::BAD_GATEWAY, "UPSTREAM_5XX"),
                _ => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            },
            Self::Payload(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_PAYLOAD"),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::InvalidRecord(_) => (StatusCode::BAD_GATEWAY, "INVALID_RECORD"),
            Self::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            Self::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Upstream failures are surfaced with a manual retry, never retried here.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ExternalApi(_) | Self::UpstreamStatus { .. } | Self::Payload(_)
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let back = match &self {
            ApiError::NotFound { back, .. } => Some((*back).to_string()),
            _ => None,
        };

        if status.is_server_error() {
            tracing::error!(code, "request failed: {}", self);
        } else {
            tracing::debug!(code, "request rejected: {}", self);
        }

        let error_response = ErrorResponse {
            ok: false,
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                back,
                retryable: self.is_retryable(),
            },
        };

        (status, Json(error_response)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display_and_status() {
        let err = ApiError::not_found("launch", "42", "/api/v1/rocket-launches");
        assert_eq!(err.to_string(), "launch '42' not found");
        assert!(matches!(err, ApiError::NotFound { .. }));
        assert_eq!(err.status_and_code(), (StatusCode::NOT_FOUND, "NOT_FOUND"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_upstream_status_is_retryable_bad_gateway() {
        let err = ApiError::UpstreamStatus {
            endpoint: "/api/v1/news".to_string(),
            status: 503,
        };
        assert_eq!(err.status_and_code(), (StatusCode::BAD_GATEWAY, "UPSTREAM_5XX"));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_invalid_input_is_bad_request() {
        let err = ApiError::InvalidInput("order".to_string());
        assert_eq!(err.status_and_code(), (StatusCode::BAD_REQUEST, "INVALID_INPUT"));
    }

    #[test]
    fn test_config_error_is_internal() {
        let err = ApiError::Config("LAUNCHDATE_HTTP_TIMEOUT_SECONDS".to_string());
        assert_eq!(
            err.status_and_code(),
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<i32>("nope").unwrap_err();
        let err: ApiError = json_err.into();
        assert!(matches!(err, ApiError::Payload(_)));
    }

    #[tokio::test]
    async fn test_not_found_response_carries_back_link() {
        let response = ApiError::not_found("rocket", "9", "/api/v1/rockets").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["back"], "/api/v1/rockets");
        assert_eq!(json["error"]["retryable"], false);
    }
}
