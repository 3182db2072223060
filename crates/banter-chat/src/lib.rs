//! Conversation engine for banter.
//!
//! Provides the in-memory session store (chats + message history), the
//! responder that turns a chat's history into exactly one assistant
//! reply (canned rich-panel branch or a backend completion call with a
//! bounded wait), and the turn-driving service that ties the two
//! together with per-chat serialization.

pub mod backend;
pub mod responder;
pub mod service;
pub mod session;

use std::time::Duration;

use async_trait::async_trait;

use banter_common::{ChatId, WireMessage};

pub use backend::{BackendConfig, HttpBackend};
pub use responder::{Responder, ResponderConfig, TRENDING_SUMMARY_PANEL};
pub use service::ChatService;
pub use session::{Chat, ChatSummary, SessionStore, StoreEvent};

/// A successful completion from the backend.
#[derive(Debug, Clone)]
pub struct CompletionReply {
    pub content: String,
    pub model: String,
    pub provider: Option<String>,
}

/// The chat-completion backend seam. The production implementation is
/// [`HttpBackend`]; tests substitute mocks.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, messages: &[WireMessage]) -> Result<CompletionReply, BackendError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Connection refused or request never left — the server process is
    /// most likely not running.
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    #[error("backend request timed out after {0:?}")]
    Timeout(Duration),

    #[error("backend returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("backend response could not be parsed: {0}")]
    Parse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unknown chat id: {0}")]
    UnknownChat(ChatId),
}

#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A turn is already in flight for this chat; resend once it settles.
    #[error("chat {0} is busy with another turn")]
    ChatBusy(ChatId),

    #[error("message text is empty")]
    EmptyMessage,
}
