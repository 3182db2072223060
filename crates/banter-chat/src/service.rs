//! Turn driver: wires the session store and responder together.
//!
//! One `send` call is one turn: create-or-append the user message, ask
//! the responder for the reply, append it. Turns on the same chat are
//! serialized with a busy flag so overlapping sends cannot interleave a
//! chat's history; turns on different chats run independently.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use banter_common::{ChatId, Message};

use crate::responder::Responder;
use crate::session::SessionStore;
use crate::TurnError;

/// Clears the per-chat busy flag on drop, so the flag is released even
/// if the turn future is cancelled mid-await.
struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl BusyGuard {
    fn acquire(flag: Arc<AtomicBool>) -> Option<Self> {
        if flag
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return None;
        }
        Some(Self { flag })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Front door for sending turns. Cheap to clone; clones share the same
/// store, responder, and busy flags.
#[derive(Clone)]
pub struct ChatService {
    store: SessionStore,
    responder: Arc<Responder>,
    busy: Arc<Mutex<HashMap<ChatId, Arc<AtomicBool>>>>,
}

impl ChatService {
    pub fn new(store: SessionStore, responder: Responder) -> Self {
        Self {
            store,
            responder: Arc::new(responder),
            busy: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Run one turn. With `chat = None` a new chat is created from the
    /// user message (and becomes current); otherwise the message is
    /// appended to the named chat. Returns the chat id the turn ran in.
    ///
    /// Fails fast with [`TurnError::ChatBusy`] if the chat already has a
    /// turn in flight.
    pub async fn send(&self, chat: Option<&ChatId>, text: &str) -> Result<ChatId, TurnError> {
        if text.trim().is_empty() {
            return Err(TurnError::EmptyMessage);
        }

        let user_message = Message::user(text);

        let (id, _guard) = match chat {
            None => {
                let id = self.store.create_chat(user_message).await;
                let guard = self
                    .acquire_busy(&id)
                    .ok_or_else(|| TurnError::ChatBusy(id.clone()))?;
                (id, guard)
            }
            Some(id) => {
                let guard = self
                    .acquire_busy(id)
                    .ok_or_else(|| TurnError::ChatBusy(id.clone()))?;
                self.store.append_message(id, user_message).await?;
                (id.clone(), guard)
            }
        };

        debug!(chat = %id, "Turn started");

        let history = self.store.messages(&id).await;
        let reply = self.responder.respond(&history).await;
        self.store.append_message(&id, reply).await?;

        debug!(chat = %id, "Turn finished");
        Ok(id)
    }

    fn acquire_busy(&self, id: &ChatId) -> Option<BusyGuard> {
        let flag = {
            let mut map = self.busy.lock().expect("busy map poisoned");
            map.entry(id.clone()).or_default().clone()
        };
        BusyGuard::acquire(flag)
    }
}
