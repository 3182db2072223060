use std::time::Duration;

/// Completion backend client configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the chat API server.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Upper bound for one completion request.
    pub request_timeout: Duration,
    /// Upper bound for the health probe.
    pub health_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            health_timeout: Duration::from_secs(5),
        }
    }
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }

    pub fn health_url(&self) -> String {
        format!("{}/api/health", self.base_url.trim_end_matches('/'))
    }
}
