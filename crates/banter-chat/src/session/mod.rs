//! In-memory session state: the set of chats, the current selection,
//! and append-only message history with change notification.

mod events;
mod store;

pub use events::StoreEvent;
pub use store::{Chat, ChatSummary, SessionStore};
