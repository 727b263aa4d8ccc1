//! Health and metrics endpoints.
//!
//! # Endpoints
//!
//! - `GET /healthz` - Liveness check, no authentication
//! - `GET /metrics` - Metrics placeholder, no authentication
//!
//! Neither endpoint touches the external registry, so a healthy response
//! means only that the process is up and serving.

use axum::Json;
use chrono::Utc;
use tracing::instrument;

use crate::models::{HealthResponse, MetricsPlaceholder};

/// Health check endpoint.
///
/// # Response Body
///
/// ```json
/// {
///   "status": "healthy",
///   "timestamp": "2024-01-15T10:30:00Z",
///   "version": "0.1.0"
/// }
/// ```
#[instrument]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Metrics placeholder endpoint.
///
/// Returns a static informational body; there is no real metrics contract.
#[instrument]
pub async fn metrics() -> Json<MetricsPlaceholder> {
    Json(MetricsPlaceholder {
        status: "metrics endpoint".to_string(),
        note: "Prometheus metrics would be implemented here".to_string(),
    })
}
