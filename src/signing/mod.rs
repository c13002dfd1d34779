//! Signed-URL scheme.
//!
//! # Data Flow
//! ```text
//! Issuer (trusted context):
//!     (path, expiry, secret)
//!         → signer.rs (HMAC-SHA256 over "path:expiry")
//!         → encoding.rs (URL-safe, unpadded Base64)
//!         → token "signature:expiry"
//!
//! Gateway:
//!     (path, token, secret, now)
//!         → verifier.rs (parse, expiry check, recompute, compare)
//!         → Verdict (allow / deny with reason)
//! ```
//!
//! # Design Decisions
//! - Signer and verifier share one encoder so both sides produce identical strings
//! - Verification is total: every fault is a denial, nothing escapes as an error
//! - The reason for a denial is kept for operator logs only, never for the caller
//! - The secret never appears in `Debug` output

pub mod encoding;
pub mod signer;
pub mod verifier;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use encoding::encode;
pub use signer::{sign, signature};
pub use verifier::{verify, verify_token, Denial, Verifier};

/// Shared HMAC key.
///
/// Loaded once at startup and held for the process lifetime.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(Vec<u8>);

impl Secret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value for an `Authorization: Bearer` header.
    ///
    /// Lossy for non-UTF-8 keys; upstream bearer tokens are always text.
    pub fn expose_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl From<&str> for Secret {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for Secret {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("Secret(<empty>)")
        } else {
            f.write_str("Secret(<redacted>)")
        }
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("<redacted>")
    }
}

impl<'de> Deserialize<'de> for Secret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Secret::from)
    }
}
