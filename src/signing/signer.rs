//! Reference token issuer.
//!
//! Tokens are normally minted in a separate trusted context; this is the
//! symmetric implementation the verifier recomputes against, also used by
//! `sign-cli`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::encoding::encode;
use super::Secret;

type HmacSha256 = Hmac<Sha256>;

/// Encoded MAC over `"{path}:{expiry}"`.
pub fn signature(path: &str, expiry: u64, secret: &Secret) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(path.as_bytes());
    mac.update(b":");
    mac.update(expiry.to_string().as_bytes());

    encode(&mac.finalize().into_bytes())
}

/// Build the full `signature:expiry` token for `path`.
pub fn sign(path: &str, expiry: u64, secret: &Secret) -> String {
    format!("{}:{}", signature(path, expiry, secret), expiry)
}
