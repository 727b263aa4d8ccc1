//! HTTP middleware for admission control and observability.
//!
//! # Architecture
//!
//! ```text
//! Request → Request Log → Rate Limiter → Handler (auth, validation, upstream)
//!               ↓              ↓
//!        start/completion   429 Too Many Requests
//!        entries
//! ```
//!
//! Authentication is not a layer here: the validation handler declares it as
//! an extractor dependency (see [`crate::auth`]), so health and metrics
//! endpoints stay open without a bypass list.

pub mod ip;
pub mod logging;
pub mod rate_limit;

pub use ip::{UNKNOWN_IP, client_ip_from_extensions, extract_client_ip};
pub use logging::{REQUEST_ID_HEADER, RequestLogLayer};
pub use rate_limit::{RateLimitLayer, SlidingWindowLimiter};
