//! HTTP surface: the chat-completion endpoint and the health probe.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use banter_common::{ChatRequest, ChatResponse, HealthResponse};

use crate::ollama::{OllamaClient, OllamaError};
use crate::prompt::messages_to_prompt;

pub const SERVICE_NAME: &str = "banter-server";

pub struct AppState {
    pub ollama: OllamaClient,
}

pub fn router(state: Arc<AppState>) -> Router {
    // Wildcard CORS: the browser client is served from a different port.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods(Any);

    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/health", get(health))
        .layer(cors)
        .with_state(state)
}

/// `POST /api/chat` — one completion for the submitted history.
///
/// Model-runtime failures come back as HTTP 200 with `error: true` and a
/// readable message in `content`, so the client renders them like any
/// other assistant reply.
async fn chat(State(state): State<Arc<AppState>>, Json(req): Json<ChatRequest>) -> Response {
    if req.messages.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Messages array required" })),
        )
            .into_response();
    }

    let prompt = messages_to_prompt(&req.messages);
    let model = state.ollama.model().to_string();

    match state.ollama.generate(&prompt).await {
        Ok(content) => {
            info!(turns = req.messages.len(), "Completion served");
            Json(ChatResponse {
                content,
                model,
                provider: Some("ollama".into()),
                error: false,
            })
            .into_response()
        }
        Err(err) => {
            error!(error = %err, "Ollama call failed");
            Json(ChatResponse {
                content: friendly_error(&err),
                model,
                provider: None,
                error: true,
            })
            .into_response()
        }
    }
}

/// `GET /api/health` — reports whether the runtime is reachable and
/// which models it has. Never fails, even with the runtime down.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (ollama_running, available_models) = match state.ollama.list_models().await {
        Ok(models) => (true, models),
        Err(_) => (false, Vec::new()),
    };

    Json(HealthResponse {
        status: "ok".into(),
        service: SERVICE_NAME.into(),
        provider: "ollama".into(),
        ollama_running,
        model: state.ollama.model().to_string(),
        available_models,
    })
}

/// The unreachable case already reads as an instruction to the operator;
/// everything else gets a generic wrapper.
fn friendly_error(err: &OllamaError) -> String {
    match err {
        OllamaError::Unreachable => err.to_string(),
        other => format!("Local model error: {other}"),
    }
}
