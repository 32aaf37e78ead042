//! Request-level error kinds and their HTTP mapping.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::scan::ScanError;

/// Everything a request can fail with. Raw causes go to the log only.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("not found")]
    NotFound,

    #[error("directory scan failed: {0}")]
    ScanFailed(#[from] ScanError),

    #[error("failed to open file for streaming: {0}")]
    StreamSetupFailed(#[source] std::io::Error),

    #[error("unexpected I/O error: {0}")]
    UnexpectedIo(#[source] std::io::Error),
}

impl ServeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            ServeError::NotFound => StatusCode::NOT_FOUND,
            ServeError::ScanFailed(_)
            | ServeError::StreamSetupFailed(_)
            | ServeError::UnexpectedIo(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        let body = match &self {
            ServeError::AuthenticationFailed => "Unauthorized",
            ServeError::NotFound => "Not Found",
            _ => "Internal Server Error",
        };

        let mut response = (status, body).into_response();
        let headers = response.headers_mut();
        match self {
            ServeError::AuthenticationFailed => {
                headers.insert(
                    header::WWW_AUTHENTICATE,
                    HeaderValue::from_static("Basic realm=\"Secure Area\""),
                );
            }
            ServeError::NotFound => {}
            _ => {
                headers.insert(header::CONNECTION, HeaderValue::from_static("close"));
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ServeError::AuthenticationFailed.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ServeError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ServeError::StreamSetupFailed(io::Error::from(io::ErrorKind::PermissionDenied)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServeError::ScanFailed(ScanError::Cancelled).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unauthorized_carries_challenge() {
        let response = ServeError::AuthenticationFailed.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers()[header::WWW_AUTHENTICATE],
            "Basic realm=\"Secure Area\""
        );
    }

    #[test]
    fn test_server_errors_close_connection() {
        let err = ServeError::UnexpectedIo(io::Error::new(io::ErrorKind::Other, "/secret/path leaked?"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::CONNECTION], "close");
    }
}
