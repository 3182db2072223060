use banter_common::{ChatId, Message};

/// Change notification emitted by the session store. `MessageAppended`
/// carries the updated history snapshot so observers never have to read
/// back through the store to stay consistent.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    ChatCreated {
        chat_id: ChatId,
        title: String,
    },
    MessageAppended {
        chat_id: ChatId,
        messages: Vec<Message>,
    },
    SelectionChanged {
        current: Option<ChatId>,
    },
}
