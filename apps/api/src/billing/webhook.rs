//! Webhook signature verification and event dispatch.
//!
//! The provider signs `"{t}.{raw_body}"` with the shared endpoint secret and
//! sends `t=<unix>,v1=<hex>` in the `Stripe-Signature` header. Verification
//! runs over the raw bytes before any JSON parsing; the signature is the only
//! authentication this route has.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use tracing::{debug, info};

use crate::errors::AppError;

type HmacSha256 = Hmac<Sha256>;

pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";
pub const SUBSCRIPTION_DELETED: &str = "customer.subscription.deleted";

#[derive(Debug, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    /// All `v1` candidates; the header may carry several during secret
    /// rotation.
    pub signatures: Vec<String>,
}

/// Parses `t=...,v1=...[,v1=...]`. Unknown schemes are ignored.
pub fn parse_signature_header(header: &str) -> Result<SignatureHeader, AppError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();
    for part in header.split(',') {
        let Some((scheme, value)) = part.trim().split_once('=') else {
            continue;
        };
        match scheme {
            "t" => timestamp = value.parse::<i64>().ok(),
            "v1" => signatures.push(value.to_string()),
            _ => {}
        }
    }
    let timestamp = timestamp
        .ok_or_else(|| AppError::WebhookSignature("missing or invalid timestamp".to_string()))?;
    if signatures.is_empty() {
        return Err(AppError::WebhookSignature("no v1 signature".to_string()));
    }
    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

/// Verifies the header signature over `"{t}.{payload}"`. The timestamp must
/// fall within `tolerance_secs` of `now_unix`; comparison happens through the
/// Mac verifier, which is constant-time.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now_unix: i64,
) -> Result<(), AppError> {
    let parsed = parse_signature_header(header)?;

    if (now_unix - parsed.timestamp).abs() > tolerance_secs {
        return Err(AppError::WebhookSignature(
            "timestamp outside tolerance".to_string(),
        ));
    }

    for candidate in &parsed.signatures {
        let Ok(candidate_bytes) = hex::decode(candidate) else {
            continue;
        };
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|_| AppError::WebhookSignature("invalid endpoint secret".to_string()))?;
        mac.update(parsed.timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        if mac.verify_slice(&candidate_bytes).is_ok() {
            return Ok(());
        }
    }

    Err(AppError::WebhookSignature("signature mismatch".to_string()))
}

/// Signs `"{t}.{payload}"` the way the provider does. Test constructor for
/// webhook payloads.
#[cfg(test)]
pub fn sign_payload(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: EventData,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventData {
    #[serde(default)]
    pub object: serde_json::Value,
}

/// Handles a verified event. The two subscription events are acknowledged and
/// logged; every other type is acknowledged without action so the provider
/// does not retry it.
pub fn dispatch_event(event: &WebhookEvent) {
    match event.event_type.as_str() {
        CHECKOUT_SESSION_COMPLETED => {
            let subscription = event
                .data
                .object
                .get("subscription")
                .and_then(|v| v.as_str())
                .unwrap_or("none");
            info!("checkout session completed (subscription: {subscription})");
        }
        SUBSCRIPTION_DELETED => {
            let id = event
                .data
                .object
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");
            info!("subscription deleted: {id}");
        }
        other => {
            debug!("ignoring webhook event type {other}");
        }
    }
}
