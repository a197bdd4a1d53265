//! Checkout-session creation against the payment provider.
//!
//! The provider's API is form-encoded with bracketed array/map keys. Only the
//! session id comes back to the client; the hosted checkout flow happens
//! entirely on the provider's side.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::errors::AppError;

const CHECKOUT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutMode {
    #[default]
    Payment,
    Subscription,
}

impl CheckoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutMode::Payment => "payment",
            CheckoutMode::Subscription => "subscription",
        }
    }
}

/// Everything a checkout session is created from. Success and cancel URLs
/// are built by the handler from the configured base URL.
#[derive(Debug, Clone)]
pub struct CheckoutParams {
    pub price_id: String,
    pub mode: CheckoutMode,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: Vec<(String, String)>,
}

#[derive(Debug, Deserialize)]
struct CheckoutSessionObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Thin client for the provider's checkout-sessions endpoint. Failures map to
/// [`AppError::Payment`]; nothing local is mutated on failure.
#[derive(Clone)]
pub struct CheckoutClient {
    client: Client,
    api_url: String,
    secret_key: String,
}

impl CheckoutClient {
    pub fn new(api_url: String, secret_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(CHECKOUT_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_url,
            secret_key,
        }
    }

    /// Creates a hosted checkout session and returns its id.
    pub async fn create_session(&self, params: &CheckoutParams) -> Result<String, AppError> {
        let mut form: Vec<(String, String)> = vec![
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("line_items[0][price]".to_string(), params.price_id.clone()),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            ("mode".to_string(), params.mode.as_str().to_string()),
            ("success_url".to_string(), params.success_url.clone()),
            ("cancel_url".to_string(), params.cancel_url.clone()),
        ];
        for (key, value) in &params.metadata {
            form.push((format!("metadata[{key}]"), value.clone()));
        }

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.api_url))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::Payment(format!("checkout request failed: {e}")))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let message = serde_json::from_str::<ProviderError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(AppError::Payment(format!(
                "provider returned {status}: {message}"
            )));
        }

        let session: CheckoutSessionObject = serde_json::from_str(&body)
            .map_err(|e| AppError::Payment(format!("malformed checkout response: {e}")))?;
        Ok(session.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn params() -> CheckoutParams {
        CheckoutParams {
            price_id: "price_123".to_string(),
            mode: CheckoutMode::Subscription,
            success_url: "http://localhost:3000/success?session_id={CHECKOUT_SESSION_ID}"
                .to_string(),
            cancel_url: "http://localhost:3000/cancel".to_string(),
            metadata: vec![("user_id".to_string(), "alice".to_string())],
        }
    }

    #[tokio::test]
    async fn test_create_session_returns_id() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/checkout/sessions")
                    .header("authorization", "Bearer sk_test_123")
                    .body_contains("line_items%5B0%5D%5Bprice%5D=price_123")
                    .body_contains("mode=subscription")
                    .body_contains("metadata%5Buser_id%5D=alice");
                then.status(200).json_body(json!({"id": "cs_test_abc"}));
            })
            .await;

        let client = CheckoutClient::new(server.base_url(), "sk_test_123".to_string());
        let session_id = client.create_session(&params()).await.unwrap();
        assert_eq!(session_id, "cs_test_abc");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_provider_failure_maps_to_payment_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/checkout/sessions");
                then.status(400)
                    .json_body(json!({"error": {"message": "No such price: price_123"}}));
            })
            .await;

        let client = CheckoutClient::new(server.base_url(), "sk_test_123".to_string());
        let err = client.create_session(&params()).await.unwrap_err();
        match err {
            AppError::Payment(message) => assert!(message.contains("No such price")),
            other => panic!("expected Payment error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_response_maps_to_payment_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/checkout/sessions");
                then.status(200).body("not json");
            })
            .await;

        let client = CheckoutClient::new(server.base_url(), "sk_test_123".to_string());
        let err = client.create_session(&params()).await.unwrap_err();
        assert!(matches!(err, AppError::Payment(_)));
    }

    #[test]
    fn test_mode_defaults_to_payment() {
        assert_eq!(CheckoutMode::default(), CheckoutMode::Payment);
        let mode: CheckoutMode = serde_json::from_str("\"subscription\"").unwrap();
        assert_eq!(mode, CheckoutMode::Subscription);
    }
}
