//! Basic authentication gate.
//!
//! The configured secret is compared against the `Authorization` header
//! payload as-is: the header `Basic dXNlcjpwdw==` matches the secret
//! `dXNlcjpwdw==`. No decoding, hashing or expiry.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ServeError;

const BASIC_PREFIX: &str = "Basic ";

/// Decide whether a request carrying `header_value` may proceed.
///
/// With no `expected` secret, authentication is disabled and every request
/// is let through.
pub fn authorize(header_value: Option<&str>, expected: Option<&str>) -> bool {
    let Some(expected) = expected else {
        return true;
    };

    match header_value {
        Some(value) => {
            let credential = value.strip_prefix(BASIC_PREFIX).unwrap_or(value);
            constant_time_eq(credential.as_bytes(), expected.as_bytes())
        }
        None => false,
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Shared state for the auth middleware.
#[derive(Debug, Clone, Default)]
pub struct AccessGate {
    secret: Option<Arc<str>>,
}

impl AccessGate {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.map(Arc::from),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    pub fn check(&self, request: &Request<Body>) -> bool {
        let header_value = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        authorize(header_value, self.secret.as_deref())
    }
}

pub async fn basic_auth_middleware(
    State(gate): State<AccessGate>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if gate.check(&request) {
        return next.run(request).await;
    }

    tracing::warn!(path = %request.uri().path(), "Rejected request without valid credentials");
    ServeError::AuthenticationFailed.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize() {
        assert!(!authorize(None, Some("secret")));
        assert!(authorize(Some("secret"), Some("secret")));
        assert!(!authorize(Some("wrong"), Some("secret")));
    }

    #[test]
    fn test_basic_prefix_stripped() {
        assert!(authorize(Some("Basic secret"), Some("secret")));
        assert!(!authorize(Some("Bearer secret"), Some("secret")));
        assert!(!authorize(Some("Basic  secret"), Some("secret")));
    }

    #[test]
    fn test_disabled_without_secret() {
        assert!(authorize(None, None));
        assert!(authorize(Some("anything"), None));
    }

    #[test]
    fn test_prefix_of_secret_rejected() {
        assert!(!authorize(Some("secre"), Some("secret")));
        assert!(!authorize(Some("secrets"), Some("secret")));
        assert!(!authorize(Some(""), Some("secret")));
    }

    #[test]
    fn test_gate_reads_header() {
        let gate = AccessGate::new(Some("dXNlcjpwdw==".into()));
        assert!(gate.is_enabled());

        let ok = Request::builder()
            .header("Authorization", "Basic dXNlcjpwdw==")
            .body(Body::empty())
            .unwrap();
        assert!(gate.check(&ok));

        let missing = Request::builder().body(Body::empty()).unwrap();
        assert!(!gate.check(&missing));
    }
}
