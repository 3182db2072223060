use async_trait::async_trait;
use tracing::{debug, warn};

use banter_common::{ChatRequest, ChatResponse, HealthResponse, WireMessage};

use crate::{BackendError, CompletionBackend, CompletionReply};

use super::config::BackendConfig;

/// Client for the banter chat API server.
pub struct HttpBackend {
    config: BackendConfig,
    http: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .expect("failed to build HTTP client");
        Self { config, http }
    }

    /// Probe the backend's health endpoint. Informational only; chat
    /// correctness never depends on it.
    pub async fn health(&self) -> Result<HealthResponse, BackendError> {
        let response = self
            .http
            .get(self.config.health_url())
            .timeout(self.config.health_timeout)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = truncated_body(response).await;
            return Err(BackendError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }

    fn map_request_error(&self, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            return BackendError::Timeout(self.config.request_timeout);
        }
        map_send_error(err)
    }
}

#[async_trait]
impl CompletionBackend for HttpBackend {
    async fn complete(&self, messages: &[WireMessage]) -> Result<CompletionReply, BackendError> {
        let body = ChatRequest {
            messages: messages.to_vec(),
        };

        debug!(url = %self.config.chat_url(), turns = messages.len(), "Chat API request");

        let response = self
            .http
            .post(self.config.chat_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = truncated_body(response).await;
            return Err(BackendError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        if reply.error {
            // The server folds runtime failures into a 200 body so the
            // message can render like any other reply.
            warn!(model = %reply.model, "Backend reported a soft failure");
        }

        Ok(CompletionReply {
            content: reply.content,
            model: reply.model,
            provider: reply.provider,
        })
    }
}

fn map_send_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::Timeout(std::time::Duration::ZERO);
    }
    // Connection refused, DNS failure, reset — the server is not there.
    BackendError::Unreachable(err.to_string())
}

async fn truncated_body(response: reqwest::Response) -> String {
    let text = response.text().await.unwrap_or_default();
    text.chars().take(200).collect()
}
