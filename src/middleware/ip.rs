//! Client identity extraction for middleware and audit logging.
//!
//! The client identity is the peer network address of the connection, taken
//! from Axum's [`ConnectInfo`] extension. It is used only as the rate-limit
//! bucket key and as a log correlation field; it is never persisted.
//!
//! Forwarding headers such as `X-Forwarded-For` are deliberately not
//! consulted: they are client-controlled, and trusting them would let a
//! caller rotate spoofed addresses to escape per-client rate limiting.
//! Deployments behind a reverse proxy should have the proxy enforce
//! admission, or terminate connections such that the peer address is
//! meaningful.

use std::borrow::Cow;
use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::{Extensions, Request};

/// Fallback identity when no peer address is available.
///
/// All such requests share one rate-limit bucket. This only happens when the
/// server is driven without connection info (e.g., in-process tests).
pub const UNKNOWN_IP: &str = "unknown";

/// Extract the client IP from request extensions.
///
/// Returns a borrowed `"unknown"` when [`ConnectInfo`] is absent, so the
/// common fallback allocates nothing.
#[inline]
pub fn client_ip_from_extensions(extensions: &Extensions) -> Cow<'static, str> {
    match extensions.get::<ConnectInfo<SocketAddr>>() {
        Some(ConnectInfo(addr)) => Cow::Owned(addr.ip().to_string()),
        None => Cow::Borrowed(UNKNOWN_IP),
    }
}

/// Extract the client IP from a request.
#[inline]
pub fn extract_client_ip<B>(req: &Request<B>) -> Cow<'static, str> {
    client_ip_from_extensions(req.extensions())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use axum::body::Body;

    use super::*;

    #[test]
    fn test_extract_with_connect_info() {
        let mut req = Request::builder().body(Body::empty()).unwrap();
        let addr: SocketAddr = "203.0.113.7:51234".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));

        assert_eq!(extract_client_ip(&req), "203.0.113.7");
    }

    #[test]
    fn test_extract_ipv6_peer() {
        let mut req = Request::builder().body(Body::empty()).unwrap();
        let addr: SocketAddr = "[2001:db8::1]:443".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));

        assert_eq!(extract_client_ip(&req), "2001:db8::1");
    }

    #[test]
    fn test_extract_without_connect_info() {
        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(extract_client_ip(&req), UNKNOWN_IP);
    }
}
