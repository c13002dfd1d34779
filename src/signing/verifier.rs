//! Token verification.
//!
//! # Responsibilities
//! - Parse `signature:expiry`
//! - Reject tokens whose expiry is before `now`
//! - Recompute the signature and compare it against the presented one
//!
//! # Design Decisions
//! - Total: malformed input, overflow and mismatches all end in a `Denial`
//! - `expiry == now` is still valid; the token ages out strictly after it
//! - Comparison runs in constant time over the encoded bytes
//! - No revocation list and no replay tracking; a token is reusable until it expires

use subtle::ConstantTimeEq;
use thiserror::Error;

use super::signer::signature;
use super::Secret;

/// Why a token was refused.
///
/// Only ever surfaced to operators. Callers see a single 403 regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Denial {
    /// Missing separator, empty part, or non-decimal expiry.
    #[error("malformed token")]
    MalformedToken,

    /// Expiry is earlier than the verification time.
    #[error("token expired")]
    ExpiredToken,

    /// Well-formed and fresh, but the MAC does not match this path.
    #[error("signature mismatch")]
    SignatureMismatch,
}

impl Denial {
    /// Label used in metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Denial::MalformedToken => "malformed",
            Denial::ExpiredToken => "expired",
            Denial::SignatureMismatch => "mismatch",
        }
    }
}

/// Verify `token` for `path` at unix time `now`, returning the token's expiry.
pub fn verify_token(path: &str, token: &str, secret: &Secret, now: u64) -> Result<u64, Denial> {
    let (presented, expiry_str) = token.split_once(':').ok_or(Denial::MalformedToken)?;
    if presented.is_empty() || expiry_str.is_empty() {
        return Err(Denial::MalformedToken);
    }

    let expiry = parse_expiry(expiry_str).ok_or(Denial::MalformedToken)?;
    if expiry < now {
        return Err(Denial::ExpiredToken);
    }

    let expected = signature(path, expiry, secret);
    if bool::from(presented.as_bytes().ct_eq(expected.as_bytes())) {
        Ok(expiry)
    } else {
        Err(Denial::SignatureMismatch)
    }
}

/// Boolean form of [`verify_token`].
pub fn verify(path: &str, token: &str, secret: &Secret, now: u64) -> bool {
    verify_token(path, token, secret, now).is_ok()
}

/// Decimal digits only; `u64::from_str` alone would also take a leading `+`.
fn parse_expiry(raw: &str) -> Option<u64> {
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Verifier bound to the process-wide secret and the `DISABLE_SIGN` switch.
#[derive(Debug, Clone)]
pub struct Verifier {
    secret: Secret,
    disabled: bool,
}

impl Verifier {
    pub fn new(secret: Secret, disabled: bool) -> Self {
        Self { secret, disabled }
    }

    /// Whether signature checking is switched off entirely.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Check `token` for `path`. With checking disabled every input passes.
    pub fn check(&self, path: &str, token: &str, now: u64) -> Result<(), Denial> {
        if self.disabled {
            return Ok(());
        }
        verify_token(path, token, &self.secret, now).map(|_| ())
    }

    pub fn verify(&self, path: &str, token: &str, now: u64) -> bool {
        self.check(path, token, now).is_ok()
    }
}
