//! Gateway error taxonomy and its mapping onto HTTP responses.
//!
//! Every variant renders as a short, fixed plain-text body. Details (upstream
//! status text, transport errors, parse errors) only reach the log.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::signing::Denial;

/// Terminal failure of a single request.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Token was malformed, expired or did not match. Collapsed to one 403.
    #[error("signature verification failed: {0}")]
    Forbidden(Denial),

    #[error("method not allowed")]
    MethodNotAllowed,

    /// Link API answered but carried no usable `data.url`.
    #[error("upstream resolved no file url")]
    ResourceNotFound,

    /// Link API answered with a non-2xx status.
    #[error("link resolution failed with status {status}")]
    UpstreamResolutionFailed { status: StatusCode },

    /// File host answered with a non-2xx status.
    #[error("file fetch failed with status {status}")]
    UpstreamFetchFailed { status: StatusCode },

    /// Anything else: transport errors, timeouts, invalid JSON, bad header values.
    #[error("unexpected fault: {0}")]
    Unexpected(String),
}

impl GatewayError {
    /// Status code presented to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Forbidden(_) => StatusCode::FORBIDDEN,
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::ResourceNotFound => StatusCode::NOT_FOUND,
            GatewayError::UpstreamResolutionFailed { status }
            | GatewayError::UpstreamFetchFailed { status } => *status,
            GatewayError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Fixed body presented to the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            GatewayError::Forbidden(_) => "signature verification failed",
            GatewayError::MethodNotAllowed => "method not allowed",
            GatewayError::ResourceNotFound => "file not found",
            GatewayError::UpstreamResolutionFailed { .. } => "link resolution failed",
            GatewayError::UpstreamFetchFailed { .. } => "file download failed",
            GatewayError::Unexpected(_) => "internal server error",
        }
    }

    /// Label used in metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            GatewayError::Forbidden(_) => "denied",
            GatewayError::MethodNotAllowed => "method_not_allowed",
            GatewayError::ResourceNotFound => "not_found",
            GatewayError::UpstreamResolutionFailed { .. } => "resolution_failed",
            GatewayError::UpstreamFetchFailed { .. } => "fetch_failed",
            GatewayError::Unexpected(_) => "unexpected",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %self, "Request rejected");
        }

        let mut response = (status, self.public_message()).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        response
    }
}
