use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Application-wide error types with appropriate HTTP status codes.
///
/// # Upstream Errors
///
/// Registry-related errors are split into specific variants so the pipeline
/// can translate each outcome to exactly one HTTP status:
///
/// - `UpstreamNotFound` - Registry has no record for the query (404)
/// - `UpstreamFault` - Registry answered with an unexpected status (502)
/// - `UpstreamTimeout` - The single outbound call exceeded its deadline (504)
/// - `UpstreamUnreachable` - Connection to the registry failed (503)
/// - `UpstreamMalformedResponse` - 2xx payload missing contract fields (502)
#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid credentials")]
    Unauthorized,

    #[error("rate limit exceeded: {limit} requests per {window_seconds} seconds")]
    RateLimited { limit: u32, window_seconds: u64 },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("medical book not found in registry")]
    UpstreamNotFound,

    #[error("registry returned unexpected status {0}")]
    UpstreamFault(u16),

    #[error("registry request timed out")]
    UpstreamTimeout,

    #[error("registry unreachable: {0}")]
    UpstreamUnreachable(String),

    #[error("malformed registry response: {0}")]
    UpstreamMalformedResponse(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Error response body for API endpoints.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    detail: String,
    timestamp: DateTime<Utc>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full error details server-side for debugging
        // but only expose sanitized messages to clients
        tracing::error!(error = %self, "Request failed");

        let (status, error_type, detail) = match &self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Incorrect username or password".to_string(),
            ),
            AppError::RateLimited {
                limit,
                window_seconds,
            } => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limit_exceeded",
                format!("Too many requests. Limit: {limit} per {window_seconds} seconds"),
            ),

            // Input validation messages name the offending field(s); they are
            // user-facing and safe to return verbatim.
            AppError::InvalidInput(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                detail.clone(),
            ),

            AppError::UpstreamNotFound => (
                StatusCode::NOT_FOUND,
                "not_found",
                "Medical book not found in registry".to_string(),
            ),
            AppError::UpstreamFault(code) => (
                StatusCode::BAD_GATEWAY,
                "bad_gateway",
                format!("External API error: {code}"),
            ),
            AppError::UpstreamTimeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "gateway_timeout",
                "External API timeout".to_string(),
            ),
            AppError::UpstreamUnreachable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                "External API unavailable".to_string(),
            ),
            // Don't leak upstream payload fragments to clients
            AppError::UpstreamMalformedResponse(_) => (
                StatusCode::BAD_GATEWAY,
                "bad_gateway",
                "External API returned a malformed response".to_string(),
            ),

            // Internal errors - never expose internal details to clients
            AppError::Config(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
            ),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            detail,
            timestamp: Utc::now(),
        };

        let mut response = (status, axum::Json(body)).into_response();

        // Basic challenge so HTTP clients know which scheme to retry with
        if matches!(self, AppError::Unauthorized) {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Basic"),
            );
        }

        response
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(AppError::RateLimited {
                limit: 100,
                window_seconds: 3600
            }),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            status_of(AppError::InvalidInput(
                "elmk_number must be exactly 12 digits".to_string()
            )),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_of(AppError::UpstreamNotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(AppError::UpstreamFault(500)),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(AppError::UpstreamTimeout),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_of(AppError::UpstreamUnreachable("refused".to_string())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(AppError::UpstreamMalformedResponse(
                "missing field".to_string()
            )),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unauthorized_carries_basic_challenge() {
        let response = AppError::Unauthorized.into_response();
        let challenge = response
            .headers()
            .get(axum::http::header::WWW_AUTHENTICATE)
            .expect("401 must carry WWW-Authenticate");
        assert_eq!(challenge, "Basic");
    }

    #[test]
    fn test_other_errors_do_not_challenge() {
        let response = AppError::UpstreamNotFound.into_response();
        assert!(
            response
                .headers()
                .get(axum::http::header::WWW_AUTHENTICATE)
                .is_none()
        );
    }
}
