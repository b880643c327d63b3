//! Webhook Signature Verification
//!
//! Stripe signs `"<timestamp>.<raw body>"` with HMAC-SHA256 and sends
//! `Stripe-Signature: t=<timestamp>,v1=<hex>[,v1=<hex>...]`. Verification must
//! run over the body bytes exactly as received.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{PaymentError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Maximum age (either direction) of a signed timestamp, in seconds
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Verify a `Stripe-Signature` header against the raw payload.
///
/// `now` is the current unix time in seconds.
pub fn verify(payload: &[u8], header: &str, secret: &str, now: i64, tolerance_secs: i64) -> Result<()> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| PaymentError::WebhookSignature("Unable to extract timestamp from header".into()))?;

    if signatures.is_empty() {
        return Err(PaymentError::WebhookSignature(
            "No v1 signatures found in header".into(),
        ));
    }

    if now.abs_diff(timestamp) > tolerance_secs.unsigned_abs() {
        return Err(PaymentError::WebhookSignature(
            "Timestamp outside the tolerance zone".into(),
        ));
    }

    let mac = signed_mac(payload, secret, timestamp)?;
    let matched = signatures.iter().any(|candidate| {
        hex::decode(candidate)
            .map(|bytes| mac.clone().verify_slice(&bytes).is_ok())
            .unwrap_or(false)
    });

    if matched {
        Ok(())
    } else {
        Err(PaymentError::WebhookSignature(
            "No signatures found matching the expected signature for payload".into(),
        ))
    }
}

/// Compute the `Stripe-Signature` header value for a payload.
///
/// Used to sign test fixtures and local replays.
pub fn sign(payload: &[u8], secret: &str, timestamp: i64) -> Result<String> {
    let mac = signed_mac(payload, secret, timestamp)?;
    Ok(format!(
        "t={timestamp},v1={}",
        hex::encode(mac.finalize().into_bytes())
    ))
}

fn signed_mac(payload: &[u8], secret: &str, timestamp: i64) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PaymentError::Config(format!("Invalid webhook secret: {e}")))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}
