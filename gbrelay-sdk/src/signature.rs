//! Signature algorithm and verification for GameBoost webhook deliveries.
//!
//! GameBoost signs every delivery with HMAC-SHA256 over the raw request
//! body, keyed with the shared secret, and sends the digest as lowercase
//! hex:
//!
//! ```text
//! signature: {hex(HMAC-SHA256(raw_body, secret))}
//! ```
//!
//! Some senders use `x-gameboost-signature` instead of `signature`. When both
//! are present the first one in [`SIGNATURE_HEADERS`] wins.

use ring::hmac;

/// Primary header name for the HMAC signature.
pub const SIGNATURE_HEADER: &str = "signature";

/// Alternate header name for the HMAC signature.
pub const ALT_SIGNATURE_HEADER: &str = "x-gameboost-signature";

/// Signature headers in lookup order.
pub const SIGNATURE_HEADERS: [&str; 2] = [SIGNATURE_HEADER, ALT_SIGNATURE_HEADER];

/// The `User-Agent` GameBoost sends with every delivery.
pub const GAMEBOOST_USER_AGENT: &str = "GameBoost Server";

/// Length of a hex-encoded SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// Errors produced by signature verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("no signing secret configured")]
    MissingSecret,
    #[error("missing signature header")]
    MissingSignature,
    #[error("signature is not a lowercase hex digest")]
    InvalidFormat,
    #[error("invalid signature")]
    SignatureMismatch,
}

impl From<ring::error::Unspecified> for SignatureError {
    fn from(_: ring::error::Unspecified) -> Self {
        Self::SignatureMismatch
    }
}

fn signing_key(secret: &[u8]) -> hmac::Key {
    hmac::Key::new(hmac::HMAC_SHA256, secret)
}

/// Compute the lowercase hex signature GameBoost would send for `body`.
pub fn sign_body(secret: &[u8], body: &[u8]) -> String {
    hex::encode(hmac::sign(&signing_key(secret), body).as_ref())
}

/// Verify a claimed signature against the raw request body.
///
/// Empty secrets and empty signatures count as absent. The digest comparison
/// is done by [`ring::hmac::verify`], which runs in constant time.
pub fn verify_body(
    body: &[u8],
    claimed: Option<&str>,
    secret: Option<&[u8]>,
) -> Result<(), SignatureError> {
    let secret = secret
        .filter(|s| !s.is_empty())
        .ok_or(SignatureError::MissingSecret)?;
    let claimed = claimed
        .filter(|s| !s.is_empty())
        .ok_or(SignatureError::MissingSignature)?;

    let digest = decode_digest(claimed)?;
    hmac::verify(&signing_key(secret), body, &digest)?;
    Ok(())
}

/// Boolean form of [`verify_body`] with the test-mode bypass.
///
/// Returns `true` unconditionally when `test_mode` is set.
pub fn verify(body: &[u8], claimed: Option<&str>, secret: Option<&[u8]>, test_mode: bool) -> bool {
    if test_mode {
        return true;
    }
    verify_body(body, claimed, secret).is_ok()
}

/// Only the exact lowercase encoding is accepted, so a decoded match is the
/// same as a byte-for-byte match on the hex string.
fn decode_digest(claimed: &str) -> Result<Vec<u8>, SignatureError> {
    let well_formed = claimed.len() == DIGEST_HEX_LEN
        && claimed
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
    if !well_formed {
        return Err(SignatureError::InvalidFormat);
    }
    hex::decode(claimed).map_err(|_| SignatureError::InvalidFormat)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"gameboost-secret";
    const BODY: &[u8] = br#"{"event":"item.order.purchased","payload":{"id":42}}"#;

    #[test]
    fn test_rfc4231_vector() {
        assert_eq!(
            sign_body(b"Jefe", b"what do ya want for nothing?"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_valid_signature_accepted() {
        let sig = sign_body(SECRET, BODY);
        assert_eq!(verify_body(BODY, Some(&sig), Some(SECRET)), Ok(()));
        assert!(verify(BODY, Some(&sig), Some(SECRET), false));
    }

    #[test]
    fn test_tampered_inputs_rejected() {
        let sig = sign_body(SECRET, BODY);

        let mut flipped = sig.clone().into_bytes();
        flipped[10] = if flipped[10] == b'0' { b'1' } else { b'0' };
        let flipped = String::from_utf8(flipped).unwrap();
        assert_eq!(
            verify_body(BODY, Some(&flipped), Some(SECRET)),
            Err(SignatureError::SignatureMismatch)
        );

        assert!(!verify(b"{}", Some(&sig), Some(SECRET), false));
        assert!(!verify(BODY, Some(&sig), Some(b"other-secret"), false));
    }

    #[test]
    fn test_malformed_signature_rejected() {
        let sig = sign_body(SECRET, BODY);
        let upper = sig.to_uppercase();
        let truncated = &sig[..sig.len() - 2];
        let prefixed = format!("sha256={sig}");

        for claimed in [upper.as_str(), truncated, prefixed.as_str(), "zz", "é"] {
            assert_eq!(
                verify_body(BODY, Some(claimed), Some(SECRET)),
                Err(SignatureError::InvalidFormat),
                "{claimed}"
            );
        }
    }

    #[test]
    fn test_missing_inputs_rejected() {
        let sig = sign_body(SECRET, BODY);
        assert_eq!(
            verify_body(BODY, Some(&sig), None),
            Err(SignatureError::MissingSecret)
        );
        assert_eq!(
            verify_body(BODY, Some(&sig), Some(b"")),
            Err(SignatureError::MissingSecret)
        );
        assert_eq!(
            verify_body(BODY, None, Some(SECRET)),
            Err(SignatureError::MissingSignature)
        );
        assert_eq!(
            verify_body(BODY, Some(""), Some(SECRET)),
            Err(SignatureError::MissingSignature)
        );
    }

    #[test]
    fn test_test_mode_bypasses_everything() {
        assert!(verify(BODY, None, None, true));
        assert!(verify(BODY, Some("garbage"), Some(SECRET), true));
    }
}
