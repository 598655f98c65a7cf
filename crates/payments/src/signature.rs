//! Webhook signature verification.
//!
//! The processor signs each delivery with a shared secret using the
//! `t=<unix>,v1=<hex hmac-sha256>` header scheme: the signature covers
//! `"{timestamp}.{raw body}"`, so neither the payload nor the timestamp
//! can be altered without invalidating it.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::PaymentError;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted age of a delivery's timestamp, in seconds.
const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Verifies webhook signature headers against a shared secret.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    secret: String,
    tolerance_secs: i64,
}

impl SignatureVerifier {
    /// Creates a verifier with the default 5-minute timestamp tolerance.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    /// Creates a verifier with an explicit timestamp tolerance.
    pub fn with_tolerance(secret: impl Into<String>, tolerance_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            tolerance_secs,
        }
    }

    /// Verifies a signature header against the raw payload.
    ///
    /// Accepts when any `v1` entry matches and the timestamp is within
    /// tolerance of the current time. The comparison is constant-time.
    pub fn verify(&self, payload: &[u8], header: &str) -> Result<(), PaymentError> {
        let Some((timestamp, candidates)) = parse_header(header) else {
            return Err(PaymentError::SignatureVerification);
        };

        let age = (Utc::now().timestamp() - timestamp).abs();
        if age > self.tolerance_secs {
            return Err(PaymentError::SignatureVerification);
        }

        let mac = signed_payload_mac(&self.secret, timestamp, payload);
        for candidate in candidates {
            let Ok(bytes) = hex::decode(candidate) else {
                continue;
            };
            if mac.clone().verify_slice(&bytes).is_ok() {
                return Ok(());
            }
        }

        Err(PaymentError::SignatureVerification)
    }
}

/// Produces the signature header a processor would send for a payload.
///
/// Counterpart to [`SignatureVerifier::verify`]; used to simulate
/// deliveries in tests and local tooling.
pub fn sign(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mac = signed_payload_mac(secret, timestamp, payload);
    let signature = hex::encode(mac.finalize().into_bytes());
    format!("t={timestamp},v1={signature}")
}

fn signed_payload_mac(secret: &str, timestamp: i64, payload: &[u8]) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac
}

fn parse_header(header: &str) -> Option<(i64, Vec<&str>)> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let (key, value) = part.trim().split_once('=')?;
        match key {
            "t" => timestamp = value.parse::<i64>().ok(),
            "v1" => signatures.push(value),
            _ => {}
        }
    }

    if signatures.is_empty() {
        return None;
    }
    Some((timestamp?, signatures))
}
