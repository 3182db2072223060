//! Turns a chat's history into exactly one assistant message.
//!
//! Two branches: a canned rich-panel reply for the demo trigger phrase,
//! and a completion call to the backend for everything else. Every
//! failure mode is folded into the returned message text — a turn always
//! ends with something the user can read.

use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use banter_common::{Message, Role, WireMessage};

use crate::{BackendError, CompletionBackend};

/// Panel tag returned by the canned branch.
pub const TRENDING_SUMMARY_PANEL: &str = "sharepoint-summary";

/// All of these must appear in the newest user message (lowercased,
/// trimmed) to take the canned branch.
const TRIGGER_KEYWORDS: [&str; 3] = ["summary", "trending", "sharepoint"];

#[derive(Debug, Clone)]
pub struct ResponderConfig {
    /// Artificial wait before the canned reply, so the client's loading
    /// indicator stays visible. Not a network wait.
    pub panel_delay: Duration,
    /// Upper bound on one backend turn.
    pub response_timeout: Duration,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            panel_delay: Duration::from_secs(2),
            response_timeout: Duration::from_secs(60),
        }
    }
}

/// Produces the single assistant reply for a turn. Holds no per-chat
/// state; callers append the result to the store themselves.
pub struct Responder {
    backend: Box<dyn CompletionBackend>,
    config: ResponderConfig,
}

impl Responder {
    pub fn new(backend: Box<dyn CompletionBackend>, config: ResponderConfig) -> Self {
        Self { backend, config }
    }

    /// Produce the assistant reply for `history`, which ends in the
    /// newest user message. Infallible by contract: backend failures
    /// come back as readable message text, not errors.
    pub async fn respond(&self, history: &[Message]) -> Message {
        if let Some(text) = latest_user_text(history) {
            if is_panel_trigger(&text) {
                debug!("Trigger phrase matched, returning canned panel");
                sleep(self.config.panel_delay).await;
                return Message::assistant_panel(TRENDING_SUMMARY_PANEL);
            }
        }

        let wire: Vec<WireMessage> = history.iter().map(WireMessage::from).collect();

        match timeout(self.config.response_timeout, self.backend.complete(&wire)).await {
            Ok(Ok(reply)) => {
                debug!(model = %reply.model, "Completion received");
                Message::assistant(reply.content)
            }
            Ok(Err(err)) => {
                warn!(error = %err, "Completion failed");
                Message::assistant(error_notice(&err))
            }
            Err(_) => {
                warn!(timeout = ?self.config.response_timeout, "Completion timed out");
                Message::assistant(error_notice(&BackendError::Timeout(
                    self.config.response_timeout,
                )))
            }
        }
    }
}

/// Newest user message, lowercased and trimmed for matching.
fn latest_user_text(history: &[Message]) -> Option<String> {
    history
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.wire_text().trim().to_lowercase())
}

fn is_panel_trigger(text: &str) -> bool {
    TRIGGER_KEYWORDS.iter().all(|keyword| text.contains(keyword))
}

/// Human-readable failure text, rendered exactly like a normal reply.
fn error_notice(err: &BackendError) -> String {
    match err {
        BackendError::Unreachable(_) => {
            "Sorry, I couldn't reach the chat backend. Make sure the local model \
             server is running, then send your message again."
                .to_string()
        }
        BackendError::Timeout(_) => {
            "The request timed out before the model responded. Please try again."
                .to_string()
        }
        other => format!("Error: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::CompletionReply;

    /// Records calls and returns a fixed outcome.
    struct MockBackend {
        calls: Arc<AtomicUsize>,
        seen: Arc<Mutex<Vec<WireMessage>>>,
        outcome: Outcome,
    }

    enum Outcome {
        Reply(String),
        Fail(fn() -> BackendError),
        Hang,
    }

    impl MockBackend {
        fn replying(text: &str) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                seen: Arc::new(Mutex::new(Vec::new())),
                outcome: Outcome::Reply(text.to_string()),
            }
        }

        fn failing(err: fn() -> BackendError) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                seen: Arc::new(Mutex::new(Vec::new())),
                outcome: Outcome::Fail(err),
            }
        }

        fn hanging() -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                seen: Arc::new(Mutex::new(Vec::new())),
                outcome: Outcome::Hang,
            }
        }
    }

    #[async_trait]
    impl CompletionBackend for MockBackend {
        async fn complete(
            &self,
            messages: &[WireMessage],
        ) -> Result<CompletionReply, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().extend_from_slice(messages);
            match &self.outcome {
                Outcome::Reply(text) => Ok(CompletionReply {
                    content: text.clone(),
                    model: "test-model".into(),
                    provider: Some("mock".into()),
                }),
                Outcome::Fail(make) => Err(make()),
                Outcome::Hang => {
                    sleep(Duration::from_secs(3600)).await;
                    unreachable!("hanging backend resumed")
                }
            }
        }
    }

    fn fast_config() -> ResponderConfig {
        ResponderConfig {
            panel_delay: Duration::ZERO,
            response_timeout: Duration::from_millis(100),
        }
    }

    fn responder_with(backend: MockBackend) -> (Responder, Arc<AtomicUsize>) {
        let calls = backend.calls.clone();
        (Responder::new(Box::new(backend), fast_config()), calls)
    }

    #[tokio::test]
    async fn trigger_phrase_returns_panel_without_backend_call() {
        let (responder, calls) = responder_with(MockBackend::replying("never seen"));
        let history = vec![Message::user(
            "Create a summary of what's trending across my organization in SharePoint",
        )];

        let reply = responder.respond(&history).await;

        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(
            reply.content,
            banter_common::MessageContent::rich_panel(TRENDING_SUMMARY_PANEL)
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn trigger_matches_any_order_and_case() {
        let (responder, calls) = responder_with(MockBackend::replying("never seen"));
        let history = vec![Message::user(
            "  is SHAREPOINT trending? give me a SuMmArY please  ",
        )];

        let reply = responder.respond(&history).await;
        assert!(reply.content.is_rich_panel());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_keyword_takes_backend_branch() {
        for text in [
            "what's trending in sharepoint",         // no "summary"
            "summary of sharepoint please",          // no "trending"
            "summary of what's trending this week",  // no "sharepoint"
        ] {
            let (responder, calls) = responder_with(MockBackend::replying("from backend"));
            let reply = responder.respond(&[Message::user(text)]).await;
            assert_eq!(reply.content.as_text(), Some("from backend"));
            assert_eq!(calls.load(Ordering::SeqCst), 1, "text: {text}");
        }
    }

    #[tokio::test]
    async fn success_passes_text_verbatim_and_forwards_full_history() {
        let backend = MockBackend::replying("42.");
        let seen = backend.seen.clone();
        let (responder, _) = responder_with(backend);

        let history = vec![
            Message::user("what is the answer?"),
            Message::assistant("to what?"),
            Message::user("to everything"),
        ];
        let reply = responder.respond(&history).await;

        assert_eq!(reply.content.as_text(), Some("42."));
        let forwarded = seen.lock().unwrap();
        assert_eq!(forwarded.len(), 3);
        assert_eq!(forwarded[0].content, "what is the answer?");
        assert_eq!(forwarded[2].content, "to everything");
    }

    #[tokio::test]
    async fn unreachable_backend_yields_remediation_hint() {
        let (responder, _) = responder_with(MockBackend::failing(|| {
            BackendError::Unreachable("connection refused".into())
        }));

        let reply = responder.respond(&[Message::user("hello")]).await;
        let text = reply.content.as_text().unwrap();
        assert!(text.contains("model server is running"), "got: {text}");
    }

    #[tokio::test]
    async fn hanging_backend_resolves_within_the_bound() {
        let (responder, _) = responder_with(MockBackend::hanging());

        let start = std::time::Instant::now();
        let reply = responder.respond(&[Message::user("hello")]).await;

        assert!(start.elapsed() < Duration::from_secs(5));
        let text = reply.content.as_text().unwrap();
        assert!(text.contains("timed out"), "got: {text}");
    }

    #[tokio::test]
    async fn http_failure_gets_generic_error_wrapper() {
        let (responder, _) = responder_with(MockBackend::failing(|| BackendError::Http {
            status: 500,
            body: "internal".into(),
        }));

        let reply = responder.respond(&[Message::user("hello")]).await;
        let text = reply.content.as_text().unwrap();
        assert!(text.starts_with("Error:"), "got: {text}");
        assert!(text.contains("500"));
    }

    #[tokio::test]
    async fn turn_always_ends_with_an_assistant_message() {
        let (responder, _) = responder_with(MockBackend::failing(|| {
            BackendError::Parse("bad json".into())
        }));
        let reply = responder.respond(&[Message::user("hello")]).await;
        assert_eq!(reply.role, Role::Assistant);
    }
}
