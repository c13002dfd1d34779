//! CORS response headers.
//!
//! Downloads are served to any origin; the token in the URL is the only
//! credential, so no cookie or credential mode is advertised.

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderMap, HeaderValue};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Headers attached to every served file.
pub fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(ALLOW_ORIGIN));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
}

/// Headers answering an `OPTIONS` preflight.
pub fn apply_preflight(headers: &mut HeaderMap) {
    apply_cors(headers);
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preflight_is_superset_of_cors() {
        let mut cors = HeaderMap::new();
        apply_cors(&mut cors);
        assert_eq!(cors.len(), 2);
        assert_eq!(cors[ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let mut preflight = HeaderMap::new();
        apply_preflight(&mut preflight);
        assert_eq!(preflight.len(), 3);
        assert_eq!(preflight[ACCESS_CONTROL_ALLOW_METHODS], "GET, OPTIONS");
        assert_eq!(
            preflight[ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type, Authorization"
        );
    }
}
