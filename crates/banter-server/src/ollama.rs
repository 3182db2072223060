//! Client for the local Ollama runtime.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.1:8b";

const GENERATE_TIMEOUT: Duration = Duration::from_secs(60);
const TAGS_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum OllamaError {
    /// Connection to the runtime failed. The display text doubles as the
    /// operator-facing remediation hint.
    #[error("Ollama server is not running. Start it with: ollama serve")]
    Unreachable,

    #[error("Request timeout - model took too long to respond")]
    Timeout,

    #[error("Ollama API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("unexpected Ollama response: {0}")]
    Parse(String),
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TaggedModel>,
}

#[derive(Deserialize)]
struct TaggedModel {
    name: String,
}

/// Thin client over Ollama's generate and tags endpoints.
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(5))
                .build()
                .expect("failed to build HTTP client"),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One non-streaming completion, bounded at 60 seconds.
    pub async fn generate(&self, prompt: &str) -> Result<String, OllamaError> {
        let url = format!("{}/api/generate", self.base_url);
        debug!(model = %self.model, prompt_len = prompt.len(), "Ollama generate");

        let response = self
            .http
            .post(&url)
            .timeout(GENERATE_TIMEOUT)
            .json(&serde_json::json!({
                "model": self.model,
                "prompt": prompt,
                "stream": false,
            }))
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OllamaError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| OllamaError::Parse(e.to_string()))?;
        Ok(body.response)
    }

    /// Names of locally available models, for the health endpoint.
    pub async fn list_models(&self) -> Result<Vec<String>, OllamaError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .http
            .get(&url)
            .timeout(TAGS_TIMEOUT)
            .send()
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(OllamaError::Api { status, body });
        }

        let body: TagsResponse = response
            .json()
            .await
            .map_err(|e| OllamaError::Parse(e.to_string()))?;
        Ok(body.models.into_iter().map(|m| m.name).collect())
    }
}

fn map_send_error(err: reqwest::Error) -> OllamaError {
    if err.is_timeout() {
        OllamaError::Timeout
    } else {
        OllamaError::Unreachable
    }
}
