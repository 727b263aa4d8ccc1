//! HTTP Basic authentication for the validation endpoint.
//!
//! # Security Features
//!
//! - **Constant-time comparison**: Username and password are both compared
//!   with [`subtle::ConstantTimeEq`], and both comparisons always run, so
//!   response timing does not reveal which field mismatched or at which byte.
//! - **Audit logging**: Every verification outcome is logged with the
//!   supplied username and client address. The password is never logged.
//!
//! # Usage
//!
//! Handlers declare authentication as a dependency by taking an
//! [`AuthenticatedUser`] argument; extraction failure short-circuits into a
//! 401 response carrying a `WWW-Authenticate: Basic` challenge.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::error::AppError;
use crate::middleware::client_ip_from_extensions;
use crate::state::AppState;

/// The authenticated caller, carrying the verified username.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub String);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let client_ip = client_ip_from_extensions(&parts.extensions);

        let Some(credentials) = parse_basic_credentials(parts) else {
            warn!(
                client_ip = %client_ip,
                "Authentication failed: missing or malformed Authorization header"
            );
            return Err(AppError::Unauthorized);
        };

        if verify_credentials(
            &credentials.username,
            &credentials.password,
            &state.config.basic_auth_username,
            &state.config.basic_auth_password,
        ) {
            info!(
                username = %credentials.username,
                client_ip = %client_ip,
                "Authentication successful"
            );
            Ok(Self(credentials.username))
        } else {
            warn!(
                username = %credentials.username,
                client_ip = %client_ip,
                "Authentication failed"
            );
            Err(AppError::Unauthorized)
        }
    }
}

/// Credentials decoded from a `Basic` Authorization header.
struct BasicCredentials {
    username: String,
    password: String,
}

/// Parse Basic credentials from the Authorization header.
///
/// Returns `None` for a missing header, a non-Basic scheme, undecodable
/// base64, non-UTF-8 payload, or a payload without a `:` separator. The
/// scheme token is matched case-insensitively per RFC 7617.
fn parse_basic_credentials(parts: &Parts) -> Option<BasicCredentials> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = header.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;

    // The password may itself contain ':'; only the first one separates
    let (username, password) = decoded.split_once(':')?;

    Some(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Verify supplied credentials against the expected pair in constant time.
///
/// Both field comparisons always execute and are combined with a bitwise
/// AND, never a short-circuiting `&&`.
pub fn verify_credentials(
    supplied_username: &str,
    supplied_password: &str,
    expected_username: &str,
    expected_password: &str,
) -> bool {
    let username_ok = supplied_username
        .as_bytes()
        .ct_eq(expected_username.as_bytes());
    let password_ok = supplied_password
        .as_bytes()
        .ct_eq(expected_password.as_bytes());

    bool::from(username_ok & password_ok)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;

    use super::*;

    fn parts_with_auth(value: &str) -> Parts {
        let request = Request::builder()
            .header(AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap();
        request.into_parts().0
    }

    #[test]
    fn test_verify_credentials_match() {
        assert!(verify_credentials("svc", "secret", "svc", "secret"));
    }

    #[test]
    fn test_verify_credentials_wrong_password() {
        assert!(!verify_credentials("svc", "wrong", "svc", "secret"));
    }

    #[test]
    fn test_verify_credentials_wrong_username() {
        assert!(!verify_credentials("other", "secret", "svc", "secret"));
    }

    #[test]
    fn test_verify_credentials_both_wrong() {
        assert!(!verify_credentials("other", "wrong", "svc", "secret"));
    }

    #[test]
    fn test_verify_credentials_length_mismatch() {
        assert!(!verify_credentials("svc", "secre", "svc", "secret"));
    }

    #[test]
    fn test_parse_valid_header() {
        // "user:pass"
        let parts = parts_with_auth("Basic dXNlcjpwYXNz");
        let credentials = parse_basic_credentials(&parts).unwrap();

        assert_eq!(credentials.username, "user");
        assert_eq!(credentials.password, "pass");
    }

    #[test]
    fn test_parse_lowercase_scheme() {
        let parts = parts_with_auth("basic dXNlcjpwYXNz");
        assert!(parse_basic_credentials(&parts).is_some());
    }

    #[test]
    fn test_parse_password_containing_colon() {
        // "user:pa:ss" - only the first colon separates
        let parts = parts_with_auth("Basic dXNlcjpwYTpzcw==");
        let credentials = parse_basic_credentials(&parts).unwrap();

        assert_eq!(credentials.username, "user");
        assert_eq!(credentials.password, "pa:ss");
    }

    #[test]
    fn test_parse_rejects_other_scheme() {
        let parts = parts_with_auth("Bearer dXNlcjpwYXNz");
        assert!(parse_basic_credentials(&parts).is_none());
    }

    #[test]
    fn test_parse_rejects_invalid_base64() {
        let parts = parts_with_auth("Basic not!!base64");
        assert!(parse_basic_credentials(&parts).is_none());
    }

    #[test]
    fn test_parse_rejects_missing_colon() {
        // "userpass"
        let parts = parts_with_auth("Basic dXNlcnBhc3M=");
        assert!(parse_basic_credentials(&parts).is_none());
    }

    #[test]
    fn test_parse_rejects_missing_header() {
        let request = Request::builder().body(Body::empty()).unwrap();
        let parts = request.into_parts().0;
        assert!(parse_basic_credentials(&parts).is_none());
    }
}
