//! Request inspection.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Extract the `sign` query parameter
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The path is never decoded or normalized; it is signed as received

use axum::http::{HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID in both directions.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Query parameter carrying the token.
pub const SIGN_PARAM: &str = "sign";

/// Generates a UUID v4 request ID for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// First `sign` value in `query`, form-urlencoded decoded.
pub fn sign_param(query: Option<&str>) -> Option<String> {
    let query = query?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == SIGN_PARAM)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_sign_param() {
        assert_eq!(sign_param(None), None);
        assert_eq!(sign_param(Some("")), None);
        assert_eq!(sign_param(Some("other=1")), None);
        assert_eq!(
            sign_param(Some("sign=abc-_:1700000000")).as_deref(),
            Some("abc-_:1700000000")
        );
        assert_eq!(
            sign_param(Some("x=1&sign=abc%3A12&sign=second")).as_deref(),
            Some("abc:12")
        );
        assert_eq!(sign_param(Some("sign=")).as_deref(), Some(""));
    }

    #[test]
    fn test_request_ids_are_unique_uuids() {
        let request = Request::builder().body(Body::empty()).unwrap();
        let mut make = MakeRequestUuidV4;
        let a = make.make_request_id(&request).unwrap();
        let b = make.make_request_id(&request).unwrap();

        let a = a.header_value().to_str().unwrap().to_string();
        assert!(Uuid::parse_str(&a).is_ok());
        assert_ne!(a, b.header_value().to_str().unwrap());
    }
}
