//! Application routing configuration with middleware stack.
//!
//! # Request Pipeline (per request)
//!
//! ```text
//! Request
//!    │
//!    ▼
//! ┌──────────────────┐
//! │   Request Log    │ ← records start, completion, elapsed time
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │  Rate Limiting   │ ← 429 if the client's trailing window is full
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │      CORS        │ ← Cross-origin headers
//! └────────┬─────────┘
//!          │
//!          ▼
//!      Handler        ← Basic-Auth (401), input shape (422), upstream call
//! ```
//!
//! # Route Groups
//!
//! - `/healthz`, `/metrics` - monitoring, no authentication
//! - `/api/v1/medical-book/validate` - the validation operation, Basic-Auth

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;
use crate::middleware::{RateLimitLayer, RequestLogLayer};
use crate::state::AppState;

/// Build the application router with all routes and middleware configured.
///
/// # Middleware Configuration
///
/// - **Rate Limiting**: Enabled if `rate_limit_requests > 0`
/// - **CORS**: Configured from `cors_allowed_origins`
/// - **Request Log**: Always on, outermost, so rejected requests are logged
///   as completions too
pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    let cors = build_cors_layer(&config.cors_allowed_origins);

    let mut router = Router::new()
        // Monitoring endpoints (no authentication)
        .route("/healthz", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        // Validation endpoint (Basic-Auth enforced in the handler)
        .route(
            "/api/v1/medical-book/validate",
            post(handlers::validate_medical_book),
        );

    // =========================================================================
    // Apply Middleware Stack (order matters - applied bottom to top)
    // =========================================================================

    // 1. Request body size limit (lookup payloads are tiny)
    router = router.layer(DefaultBodyLimit::max(config.max_request_body_size));

    // 2. CORS
    router = router.layer(cors);

    // 3. Tracing spans
    router = router.layer(TraceLayer::new_for_http());

    // 4. Rate Limiting (if enabled)
    if config.rate_limiting_enabled() {
        info!(
            max_requests = config.rate_limit_requests,
            window_seconds = config.rate_limit_window.as_secs(),
            "Rate limiting enabled"
        );
        router = router.layer(RateLimitLayer::new(
            config.rate_limit_requests,
            config.rate_limit_window,
        ));
    } else {
        info!("Rate limiting disabled (RATE_LIMIT_REQUESTS=0)");
    }

    // 5. Request logging - added last so it wraps every other layer
    router = router.layer(RequestLogLayer::new());

    // Add state
    router.with_state(state)
}

/// Build CORS layer from configuration.
///
/// # Security Note
///
/// Using `*` (any origin) is convenient for development but should be
/// avoided in production. Specify explicit origins instead.
fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_any = allowed_origins.iter().any(|o| o == "*");

    if allow_any {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_cors_layer_any() {
        let origins = vec!["*".to_string()];
        let _layer = build_cors_layer(&origins);
        // Just verify it doesn't panic
    }

    #[test]
    fn test_build_cors_layer_specific() {
        let origins = vec![
            "https://example.com".to_string(),
            "https://app.example.com".to_string(),
        ];
        let _layer = build_cors_layer(&origins);
        // Just verify it doesn't panic
    }
}
