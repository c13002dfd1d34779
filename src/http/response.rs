//! Response construction.
//!
//! # Responsibilities
//! - Build the preflight answer
//! - Build file responses: upstream status, streamed body, normalized headers
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Only content type, disposition, encoding and length are carried over from the file host
//! - Bodies are relayed as received; an encoded body keeps its `Content-Encoding`
//! - A synthesized disposition names the last path segment

use axum::body::Body;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;

use crate::security::headers::{apply_cors, apply_preflight};

/// Content type used when the file host sends none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// 204 answer to an `OPTIONS` preflight.
pub fn preflight() -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;
    apply_preflight(response.headers_mut());
    response
}

/// Last `/`-separated segment of `path`, possibly empty.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// `attachment; filename="<name>"` for `path`.
pub fn attachment_disposition(path: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file_name(path)))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

/// Wrap a file body coming from the file host.
pub fn file_response(
    status: StatusCode,
    upstream_headers: &HeaderMap,
    path: &str,
    body: Body,
) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;

    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        upstream_headers
            .get(CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE)),
    );
    headers.insert(
        CONTENT_DISPOSITION,
        upstream_headers
            .get(CONTENT_DISPOSITION)
            .cloned()
            .unwrap_or_else(|| attachment_disposition(path)),
    );
    for name in [CONTENT_ENCODING, CONTENT_LENGTH] {
        if let Some(value) = upstream_headers.get(&name) {
            headers.insert(name, value.clone());
        }
    }
    apply_cors(headers);

    response
}
