//! Rate limiting middleware using a trailing-window algorithm.
//!
//! # Algorithm
//!
//! Each client key maps to an ordered sequence of admission timestamps. On
//! every check the sequence is purged of entries older than the window,
//! re-evaluating the live window relative to the current instant; the
//! effective limit is therefore "at most `max_requests` admissions in any
//! `window` look-back from now", not a fixed bucket that resets on a
//! boundary. A rejected request is not recorded and does not extend the
//! client's window.
//!
//! # Concurrency
//!
//! Buckets live in a map behind a mutex that is held only long enough to
//! fetch or insert the bucket handle; each bucket then has its own mutex,
//! so concurrent requests from different clients do not serialize on one
//! global lock, while racing requests from the same client are checked one
//! at a time.
//!
//! # Persistence
//!
//! None. A process restart resets all counters; rate limiting is
//! best-effort admission control, not an accounting system.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{Request, Response};
use axum::response::IntoResponse;
use tower::{Layer, Service};
use tracing::warn;

use super::ip::extract_client_ip;
use crate::error::AppError;

/// Per-client admission timestamps, newest at the back.
type WindowBucket = Arc<Mutex<VecDeque<Instant>>>;

/// Lock a mutex, recovering the guard if a previous holder panicked.
///
/// The window state stays usable across a poisoned lock; the worst case is
/// one stale timestamp, which the next purge removes.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Trailing-window admission counter keyed by client identity.
pub struct SlidingWindowLimiter {
    max_requests: u32,
    window: Duration,
    buckets: Mutex<HashMap<String, WindowBucket>>,
}

impl SlidingWindowLimiter {
    /// Create a limiter admitting at most `max_requests` per client within
    /// any trailing `window`.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Check whether a request from `client_id` at `now` is admitted.
    ///
    /// Purges timestamps older than `now - window`, then either records
    /// `now` and admits, or rejects without recording. Immediately after a
    /// successful admission a bucket never holds more than `max_requests`
    /// timestamps.
    pub fn admit(&self, client_id: &str, now: Instant) -> bool {
        let bucket = {
            let mut buckets = lock(&self.buckets);
            buckets.entry(client_id.to_string()).or_default().clone()
        };

        let mut timestamps = lock(&bucket);

        // checked_sub: `now - window` can underflow shortly after boot
        if let Some(horizon) = now.checked_sub(self.window) {
            while timestamps.front().is_some_and(|&t| t <= horizon) {
                timestamps.pop_front();
            }
        }

        if timestamps.len() >= self.max_requests as usize {
            false
        } else {
            timestamps.push_back(now);
            true
        }
    }
}

/// Rate limiting layer for the Tower middleware stack.
///
/// # Example
///
/// ```rust,ignore
/// let layer = RateLimitLayer::new(100, Duration::from_secs(3600));
/// let app = Router::new()
///     .route("/api", post(handler))
///     .layer(layer);
/// ```
#[derive(Clone)]
pub struct RateLimitLayer {
    limiter: Arc<SlidingWindowLimiter>,
    /// Configured admission count (for the 429 body)
    limit: u32,
    /// Configured window length in seconds (for the 429 body)
    window_seconds: u64,
}

impl RateLimitLayer {
    /// Create a new per-client rate limit layer.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            limiter: Arc::new(SlidingWindowLimiter::new(max_requests, window)),
            limit: max_requests,
            window_seconds: window.as_secs(),
        }
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            limiter: self.limiter.clone(),
            limit: self.limit,
            window_seconds: self.window_seconds,
        }
    }
}

/// Rate limiting service wrapper.
#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    limiter: Arc<SlidingWindowLimiter>,
    limit: u32,
    window_seconds: u64,
}

impl<S> Service<Request<Body>> for RateLimitService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let client_ip = extract_client_ip(&req).into_owned();

        // The admission check is synchronous; only the forwarded call is
        // deferred into the boxed future
        if self.limiter.admit(&client_ip, Instant::now()) {
            let mut inner = self.inner.clone();
            Box::pin(async move { inner.call(req).await })
        } else {
            warn!(
                client_ip = %client_ip,
                path = %req.uri().path(),
                max_requests = self.limit,
                window_seconds = self.window_seconds,
                "Rate limit exceeded"
            );

            let response = AppError::RateLimited {
                limit: self.limit,
                window_seconds: self.window_seconds,
            }
            .into_response();

            Box::pin(async move { Ok(response) })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    #[test]
    fn test_admits_up_to_limit() {
        let limiter = SlidingWindowLimiter::new(3, WINDOW);
        let now = Instant::now();

        assert!(limiter.admit("1.2.3.4", now));
        assert!(limiter.admit("1.2.3.4", now));
        assert!(limiter.admit("1.2.3.4", now));
    }

    #[test]
    fn test_rejects_over_limit_within_window() {
        let limiter = SlidingWindowLimiter::new(3, WINDOW);
        let now = Instant::now();

        for _ in 0..3 {
            assert!(limiter.admit("1.2.3.4", now));
        }
        assert!(!limiter.admit("1.2.3.4", now + Duration::from_secs(1)));
    }

    #[test]
    fn test_admission_resumes_when_oldest_expires() {
        let limiter = SlidingWindowLimiter::new(2, WINDOW);
        let start = Instant::now();

        assert!(limiter.admit("1.2.3.4", start));
        assert!(limiter.admit("1.2.3.4", start + Duration::from_secs(10)));
        assert!(!limiter.admit("1.2.3.4", start + Duration::from_secs(30)));

        // The window trails from `now`: once the oldest timestamp is a full
        // window old it no longer counts
        assert!(limiter.admit("1.2.3.4", start + WINDOW));
    }

    #[test]
    fn test_rejection_is_not_recorded() {
        let limiter = SlidingWindowLimiter::new(1, WINDOW);
        let start = Instant::now();

        assert!(limiter.admit("1.2.3.4", start));
        // Rejected halfway through the window; must not extend it
        assert!(!limiter.admit("1.2.3.4", start + Duration::from_secs(30)));
        // Only the original admission counts, and it has expired by now
        assert!(limiter.admit("1.2.3.4", start + WINDOW));
    }

    #[test]
    fn test_clients_are_limited_independently() {
        let limiter = SlidingWindowLimiter::new(1, WINDOW);
        let now = Instant::now();

        assert!(limiter.admit("1.2.3.4", now));
        assert!(!limiter.admit("1.2.3.4", now));
        assert!(limiter.admit("5.6.7.8", now));
    }

    #[test]
    fn test_zero_limit_rejects_everything() {
        let limiter = SlidingWindowLimiter::new(0, WINDOW);
        assert!(!limiter.admit("1.2.3.4", Instant::now()));
    }

    #[test]
    fn test_sliding_not_fixed_bucket() {
        let limiter = SlidingWindowLimiter::new(2, WINDOW);
        let start = Instant::now();

        assert!(limiter.admit("1.2.3.4", start));
        assert!(limiter.admit("1.2.3.4", start + Duration::from_secs(50)));
        assert!(!limiter.admit("1.2.3.4", start + Duration::from_secs(55)));

        // The admission at t=0 has aged out; exactly one slot frees
        assert!(limiter.admit("1.2.3.4", start + Duration::from_secs(70)));

        // A fixed bucket anchored at t=0 would have fully reset at t=60;
        // the trailing window still counts the admissions at t=50 and t=70
        assert!(!limiter.admit("1.2.3.4", start + Duration::from_secs(71)));
    }

    #[test]
    fn test_concurrent_same_key_admissions_never_exceed_limit() {
        let limiter = Arc::new(SlidingWindowLimiter::new(10, WINDOW));
        let now = Instant::now();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || {
                    (0..5)
                        .filter(|_| limiter.admit("shared-client", now))
                        .count()
                })
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 10);
    }
}
