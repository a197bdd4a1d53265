//! Route handlers for the billing boundary.

use std::collections::HashMap;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::billing::checkout::{CheckoutMode, CheckoutParams};
use crate::billing::webhook::{dispatch_event, verify_signature, WebhookEvent};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCheckoutRequest {
    pub price_id: String,
    #[serde(default)]
    pub mode: CheckoutMode,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct CreateCheckoutResponse {
    pub session_id: String,
}

/// POST /api/v1/billing/checkout-session
///
/// Creates a hosted checkout session and returns its id for the client-side
/// redirect. Success and cancel URLs point back at the configured base URL.
pub async fn handle_create_checkout(
    State(state): State<AppState>,
    Json(request): Json<CreateCheckoutRequest>,
) -> Result<Json<CreateCheckoutResponse>, AppError> {
    if request.price_id.trim().is_empty() {
        return Err(AppError::Validation("price_id cannot be empty".to_string()));
    }

    let mut metadata: Vec<(String, String)> = request.metadata.into_iter().collect();
    metadata.sort();

    let params = CheckoutParams {
        price_id: request.price_id,
        mode: request.mode,
        success_url: format!(
            "{}/success?session_id={{CHECKOUT_SESSION_ID}}",
            state.config.base_url
        ),
        cancel_url: format!("{}/cancel", state.config.base_url),
        metadata,
    };

    let session_id = state.billing.create_session(&params).await?;
    info!("created checkout session {session_id}");
    Ok(Json(CreateCheckoutResponse { session_id }))
}

/// POST /api/v1/billing/webhooks/stripe
///
/// Public route; the signature is the authentication. The raw body is
/// verified before any JSON parsing, and a bad signature returns 400 so the
/// provider retries later.
pub async fn handle_stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::WebhookSignature("missing Stripe-Signature header".to_string()))?;

    verify_signature(
        &body,
        signature,
        &state.config.stripe_webhook_secret,
        state.config.webhook_tolerance_secs,
        Utc::now().timestamp(),
    )?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::WebhookSignature(format!("malformed event payload: {e}")))?;
    dispatch_event(&event);

    Ok(StatusCode::OK)
}
