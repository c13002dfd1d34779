//! Canonical signature encoding.
//!
//! Standard Base64 with `+` → `-`, `/` → `_` and the `=` padding stripped,
//! which is exactly the RFC 4648 URL-safe alphabet without padding.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// Encode raw MAC bytes into the token alphabet.
pub fn encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}
