//! Chat assistant: forwards a conversation to the completion provider and
//! returns the assistant turn. Conversation history lives on the client; the
//! server holds no chat state.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::ChatMessage;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: ChatMessage,
}

/// POST /api/v1/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.messages.is_empty() {
        return Err(AppError::Validation("messages cannot be empty".to_string()));
    }

    let content = state
        .llm
        .complete(
            &request.messages,
            state.config.chat_max_tokens,
            state.config.generation_temperature,
        )
        .await
        .map_err(|e| AppError::Generation(format!("Chat completion failed: {e}")))?;

    Ok(Json(ChatResponse {
        message: ChatMessage {
            role: "assistant".to_string(),
            content,
        },
    }))
}
