//! # ELMK Validation Gateway
//!
//! A thin validation gateway for electronic personal medical book (ELMK)
//! registry lookups: it authenticates the caller, admits the request
//! through a per-client rate limiter, validates the input shape, forwards
//! the query to the external registry, and relays a structured response.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum HTTP Server                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Middleware (Request Log → Rate Limit → CORS)               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Handlers (healthz, metrics, validate)                      │
//! │    └ Basic-Auth extractor (constant-time verification)      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  RegistryClient (one outbound call, bounded timeout)        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  External Medical Book Registry (HTTPS)                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use elmk_gateway::{AppResult, AppState, Config, RegistryClient, build_router};
//!
//! fn main() -> AppResult<()> {
//!     let config = Config::from_env()?;
//!     let registry = RegistryClient::new(&config)?;
//!
//!     let state = AppState::new(registry, config);
//!     let app = build_router(state);
//!
//!     // Serve the router...
//!     Ok(())
//! }
//! ```
//!
//! ## Security Configuration
//!
//! Basic-Auth credentials are required and have no default:
//! ```bash
//! BASIC_AUTH_USERNAME=svc BASIC_AUTH_PASSWORD=... cargo run
//! ```
//!
//! Tune admission control:
//! ```bash
//! RATE_LIMIT_REQUESTS=100 RATE_LIMIT_WINDOW=3600 cargo run
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod registry;
pub mod routes;
pub mod state;
pub mod validation;

// Re-exports for convenience
pub use config::Config;
pub use error::{AppError, AppResult};
pub use registry::RegistryClient;
pub use routes::build_router;
pub use state::AppState;
