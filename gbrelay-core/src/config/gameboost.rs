//! Inbound GameBoost authentication settings.

use gbrelay_sdk::signature::{self, SignatureError};

/// Shared secret and test-mode switch for verifying deliveries.
#[derive(Debug, Clone, Default)]
pub struct GameBoostConfig {
    /// Secret key bytes for HMAC verification.
    pub secret: Option<Box<[u8]>>,
    /// Skip signature verification entirely.
    pub test_mode: bool,
}

impl GameBoostConfig {
    pub fn new(secret: Option<impl Into<Box<[u8]>>>, test_mode: bool) -> Self {
        Self {
            secret: secret.map(Into::into),
            test_mode,
        }
    }

    pub fn secret_bytes(&self) -> Option<&[u8]> {
        self.secret.as_deref()
    }

    /// Check a delivery's signature, honouring test mode.
    pub fn verify(&self, body: &[u8], claimed: Option<&str>) -> Result<(), SignatureError> {
        if self.test_mode {
            return Ok(());
        }
        signature::verify_body(body, claimed, self.secret_bytes())
    }
}
