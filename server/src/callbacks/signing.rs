//! HMAC-SHA256 Callback Signing
//!
//! Verifies the `x-signature` header the platform attaches to every callback,
//! and derives the member hash handed to the client SDK at boot.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex-encoded HMAC of the raw body.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// What to do when an endpoint has no secret configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingSecretPolicy {
    /// Treat every request as unauthenticated.
    Reject,
    /// Skip verification and accept the request.
    Allow,
}

/// Sign a payload with HMAC-SHA256 and return the lowercase hex signature.
pub fn sign_payload(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify an HMAC-SHA256 signature against the exact bytes received.
///
/// Only the canonical form matches: exactly 64 lowercase hex digits, no
/// surrounding whitespace. The digest comparison runs in constant time.
pub fn verify_signature(secret: &str, payload: &[u8], signature: &str) -> bool {
    if !is_canonical_hex(signature) {
        return false;
    }
    let Ok(provided) = hex::decode(signature) else {
        return false;
    };
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload);
    mac.verify_slice(&provided).is_ok()
}

/// Length of a hex-encoded SHA-256 digest.
const SIGNATURE_HEX_LEN: usize = 64;

fn is_canonical_hex(signature: &str) -> bool {
    signature.len() == SIGNATURE_HEX_LEN
        && signature
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Verify a callback body under the endpoint's missing-secret policy.
pub fn verify(
    payload: &[u8],
    signature: &str,
    secret: Option<&str>,
    policy: MissingSecretPolicy,
) -> bool {
    match (secret, policy) {
        (Some(secret), _) => verify_signature(secret, payload, signature),
        (None, MissingSecretPolicy::Allow) => {
            warn!("Signing secret not configured, accepting unsigned callback");
            true
        }
        (None, MissingSecretPolicy::Reject) => {
            warn!("Signing secret not configured, rejecting callback");
            false
        }
    }
}

/// Member hash for SDK boot: hex HMAC-SHA256 of the member id.
pub fn member_hash(secret: &str, member_id: &str) -> String {
    sign_payload(secret, member_id.as_bytes())
}
