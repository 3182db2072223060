use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use banter_common::{ChatId, Message};

use crate::StoreError;

use super::events::StoreEvent;

/// Titles are cut to this many characters, with an ellipsis appended.
const TITLE_MAX_CHARS: usize = 40;

const EVENT_CAPACITY: usize = 64;

/// One conversation: a derived title plus append-only message history.
#[derive(Debug, Clone, Serialize)]
pub struct Chat {
    pub id: ChatId,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

/// Listing entry for the chat sidebar, newest chat first.
#[derive(Debug, Clone, Serialize)]
pub struct ChatSummary {
    pub id: ChatId,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

struct Inner {
    /// Newest chat first.
    chats: Vec<Chat>,
    current: Option<ChatId>,
}

/// Owner of all conversation state. Cheap to clone; all clones share the
/// same session. Mutation goes exclusively through this handle so that
/// subscribers observe every change.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<Inner>>,
    events: broadcast::Sender<StoreEvent>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(RwLock::new(Inner {
                chats: Vec::new(),
                current: None,
            })),
            events,
        }
    }

    /// Subscribe to state changes. Slow receivers may observe lag, never
    /// reordered events.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Create a chat containing exactly `first_message`, insert it at the
    /// front of the list, and make it current. Always succeeds.
    pub async fn create_chat(&self, first_message: Message) -> ChatId {
        let id = ChatId::new();
        let title = derive_title(first_message.content.wire_text());

        let mut inner = self.inner.write().await;
        inner.chats.insert(
            0,
            Chat {
                id: id.clone(),
                title: title.clone(),
                messages: vec![first_message],
                created_at: Utc::now(),
            },
        );
        inner.current = Some(id.clone());
        drop(inner);

        debug!(chat = %id, %title, "Chat created");
        let _ = self.events.send(StoreEvent::ChatCreated {
            chat_id: id.clone(),
            title,
        });
        let _ = self.events.send(StoreEvent::SelectionChanged {
            current: Some(id.clone()),
        });
        id
    }

    /// Make `id` the current chat. Unknown ids are a contract violation
    /// and fail loudly rather than leaving the selection dangling.
    pub async fn select_chat(&self, id: &ChatId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.chats.iter().any(|c| &c.id == id) {
            return Err(StoreError::UnknownChat(id.clone()));
        }
        inner.current = Some(id.clone());
        drop(inner);

        let _ = self.events.send(StoreEvent::SelectionChanged {
            current: Some(id.clone()),
        });
        Ok(())
    }

    /// Return to the empty landing state. No chat is deleted.
    pub async fn deselect_chat(&self) {
        let mut inner = self.inner.write().await;
        inner.current = None;
        drop(inner);

        let _ = self
            .events
            .send(StoreEvent::SelectionChanged { current: None });
    }

    /// Append `message` to the named chat's history.
    pub async fn append_message(&self, id: &ChatId, message: Message) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let chat = inner
            .chats
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| StoreError::UnknownChat(id.clone()))?;
        chat.messages.push(message);
        let snapshot = chat.messages.clone();
        drop(inner);

        let _ = self.events.send(StoreEvent::MessageAppended {
            chat_id: id.clone(),
            messages: snapshot,
        });
        Ok(())
    }

    /// Snapshot of a chat's history in append order. An unknown id yields
    /// an empty list — "no such conversation" is a normal read state,
    /// unlike targeted mutation.
    pub async fn messages(&self, id: &ChatId) -> Vec<Message> {
        let inner = self.inner.read().await;
        inner
            .chats
            .iter()
            .find(|c| &c.id == id)
            .map(|c| c.messages.clone())
            .unwrap_or_default()
    }

    /// History of the current chat, or empty when nothing is selected.
    pub async fn current_messages(&self) -> Vec<Message> {
        let inner = self.inner.read().await;
        match &inner.current {
            Some(id) => inner
                .chats
                .iter()
                .find(|c| &c.id == id)
                .map(|c| c.messages.clone())
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    pub async fn current(&self) -> Option<ChatId> {
        self.inner.read().await.current.clone()
    }

    /// All chats, newest first.
    pub async fn chats(&self) -> Vec<ChatSummary> {
        let inner = self.inner.read().await;
        inner
            .chats
            .iter()
            .map(|c| ChatSummary {
                id: c.id.clone(),
                title: c.title.clone(),
                created_at: c.created_at,
            })
            .collect()
    }

    /// Full snapshot of one chat, for rendering.
    pub async fn chat(&self, id: &ChatId) -> Option<Chat> {
        let inner = self.inner.read().await;
        inner.chats.iter().find(|c| &c.id == id).cloned()
    }

    pub async fn title(&self, id: &ChatId) -> Option<String> {
        let inner = self.inner.read().await;
        inner
            .chats
            .iter()
            .find(|c| &c.id == id)
            .map(|c| c.title.clone())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// First message verbatim if it fits, otherwise the first
/// `TITLE_MAX_CHARS` characters plus an ellipsis.
fn derive_title(first_message: &str) -> String {
    if first_message.chars().count() <= TITLE_MAX_CHARS {
        return first_message.to_string();
    }
    let mut title: String = first_message.chars().take(TITLE_MAX_CHARS).collect();
    title.push_str("...");
    title
}
