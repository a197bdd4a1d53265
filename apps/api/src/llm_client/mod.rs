//! LLM client: the single point of entry for all completion-provider calls.
//!
//! ARCHITECTURAL RULE: no other module may call the provider directly. Both
//! the section generator and the chat assistant go through this module, so
//! there is exactly one place where the wire contract lives.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("provider returned no content")]
    EmptyContent,
}

/// One turn of a conversation, in the provider's `{role, content}` shape.
/// Chat requests pass these through verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Chat-completions client shared by every feature that talks to the
/// provider. No retries: a failure surfaces immediately so callers can leave
/// existing content untouched, and the request timeout bounds how long a
/// section stays reserved.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_url: String, api_key: String, model: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            api_url,
            api_key,
            model,
        }
    }

    /// Sends one chat-completions request and returns the assistant text from
    /// the first choice, trimmed.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, LlmError> {
        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages,
            max_tokens,
            temperature,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            // The provider wraps failures as {"error": {"message": ...}}
            let message = serde_json::from_str::<ProviderError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body)?;
        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyContent)?;

        debug!("chat completion succeeded ({} chars)", text.len());

        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> LlmClient {
        LlmClient::new(
            server.url("/v1/chat/completions"),
            "test-key".to_string(),
            "gpt-3.5-turbo".to_string(),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_complete_returns_trimmed_first_choice() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("authorization", "Bearer test-key")
                    .json_body_partial(
                        r#"{"model":"gpt-3.5-turbo","max_tokens":500,"temperature":0.7}"#,
                    );
                then.status(200).json_body(json!({
                    "choices": [
                        {"message": {"role": "assistant", "content": "  Generated summary.  "}}
                    ]
                }));
            })
            .await;

        let client = client_for(&server);
        let text = client
            .complete(&[ChatMessage::user("write a summary")], 500, 0.7)
            .await
            .unwrap();

        assert_eq!(text, "Generated summary.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_surfaces_provider_error_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(429)
                    .json_body(json!({"error": {"message": "Rate limit reached"}}));
            })
            .await;

        let client = client_for(&server);
        let err = client
            .complete(&[ChatMessage::user("hi")], 500, 0.7)
            .await
            .unwrap_err();

        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Rate limit reached");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_rejects_empty_choices() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200).json_body(json!({"choices": []}));
            })
            .await;

        let client = client_for(&server);
        let err = client
            .complete(&[ChatMessage::user("hi")], 500, 0.7)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[tokio::test]
    async fn test_complete_rejects_malformed_payload() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200).body("not json");
            })
            .await;

        let client = client_for(&server);
        let err = client
            .complete(&[ChatMessage::user("hi")], 500, 0.7)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }
}
