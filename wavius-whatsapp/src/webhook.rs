//! Incoming webhook verification and parsing.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::Sha256;
use wavius_config::WebhookSettings;

use crate::{Result, ServiceError};

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_PREFIX: &str = "sha256=";

/// A webhook delivery from Wavius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event name, e.g. `message.received`.
    pub event: String,
    #[serde(default, alias = "instanceId")]
    pub instance_id: Option<String>,
    #[serde(default)]
    pub data: Value,
}

/// Checks HMAC-SHA256 signatures on webhook bodies.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: Option<String>,
    verify: bool,
}

impl WebhookVerifier {
    /// Verifier that requires a valid signature made with `secret`.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            verify: true,
        }
    }

    /// Verifier that accepts every body.
    pub fn disabled() -> Self {
        Self {
            secret: None,
            verify: false,
        }
    }

    pub fn from_settings(settings: &WebhookSettings) -> Self {
        Self {
            secret: settings.secret.clone().filter(|s| !s.is_empty()),
            verify: settings.verify_signature,
        }
    }

    pub fn is_enforcing(&self) -> bool {
        self.verify
    }

    /// Hex HMAC-SHA256 of `body`.
    pub fn sign(&self, body: &[u8]) -> Result<String> {
        let secret = self
            .secret
            .as_deref()
            .ok_or_else(|| ServiceError::Webhook("no webhook secret configured".into()))?;

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| ServiceError::Webhook(e.to_string()))?;
        mac.update(body);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Verify `signature` (hex, optionally `sha256=`-prefixed) against `body`.
    pub fn verify(&self, body: &[u8], signature: Option<&str>) -> Result<()> {
        if !self.verify {
            return Ok(());
        }

        let signature = signature
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ServiceError::Webhook("signature missing".into()))?;
        let signature = signature.strip_prefix(SIGNATURE_PREFIX).unwrap_or(signature);

        let expected = self.sign(body)?;
        if constant_time_compare(&signature.to_ascii_lowercase(), &expected) {
            Ok(())
        } else {
            Err(ServiceError::Webhook("signature mismatch".into()))
        }
    }

    /// Verify and decode a webhook body.
    pub fn parse(&self, body: &[u8], signature: Option<&str>) -> Result<WebhookEvent> {
        self.verify(body, signature)?;
        Ok(serde_json::from_slice(body)?)
    }
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("has_secret", &self.secret.is_some())
            .field("verify", &self.verify)
            .finish()
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
