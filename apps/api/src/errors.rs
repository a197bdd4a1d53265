use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// None of these are fatal to the process; each is scoped to the request that
/// triggered it. The auth gate on protected routes is a redirect handled in
/// middleware and never passes through here.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Payment error: {0}")]
    Payment(String),

    #[error("Webhook signature rejected: {0}")]
    WebhookSignature(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Access denied".to_string(),
            ),
            AppError::Generation(msg) => {
                tracing::error!("Generation error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_ERROR",
                    "Content generation failed; existing content is unchanged".to_string(),
                )
            }
            AppError::Payment(msg) => {
                tracing::error!("Payment error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "PAYMENT_ERROR",
                    "Checkout could not be created".to_string(),
                )
            }
            AppError::WebhookSignature(msg) => (
                StatusCode::BAD_REQUEST,
                "WEBHOOK_SIGNATURE",
                format!("Webhook Error: {msg}"),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
