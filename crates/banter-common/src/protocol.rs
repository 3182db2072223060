//! Wire bodies for the chat-completion and health endpoints.

use serde::{Deserialize, Serialize};

use crate::types::{Message, Role};

/// One role/content pair as sent to the backend. History is flattened to
/// plain text before it leaves the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: Role,
    pub content: String,
}

impl From<&Message> for WireMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.role,
            content: msg.content.wire_text().to_string(),
        }
    }
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<WireMessage>,
}

/// Response body of `POST /api/chat`.
///
/// The server reports soft failures (model runtime down, generation
/// timeout) with HTTP 200 and `error: true`, carrying an operator-facing
/// message in `content` so the client can render it like any reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default)]
    pub error: bool,
}

/// Response body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub provider: String,
    pub ollama_running: bool,
    pub model: String,
    pub available_models: Vec<String>,
}
