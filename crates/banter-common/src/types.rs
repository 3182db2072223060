use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Message payload. Most messages are plain text; a small set of
/// assistant replies instead carry an opaque panel tag that selects a
/// specially-rendered view on the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MessageContent {
    Text { value: String },
    RichPanel { panel_id: String },
}

impl MessageContent {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    pub fn rich_panel(panel_id: impl Into<String>) -> Self {
        Self::RichPanel {
            panel_id: panel_id.into(),
        }
    }

    /// The text form sent over the wire when this message is part of a
    /// resent history. Panels flatten to their tag; the backend treats
    /// the tag as opaque prose.
    pub fn wire_text(&self) -> &str {
        match self {
            Self::Text { value } => value,
            Self::RichPanel { panel_id } => panel_id,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { value } => Some(value),
            Self::RichPanel { .. } => None,
        }
    }

    pub fn is_rich_panel(&self) -> bool {
        matches!(self, Self::RichPanel { .. })
    }
}

/// A single conversation turn entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::text(text),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::text(text),
        }
    }

    pub fn assistant_panel(panel_id: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::rich_panel(panel_id),
        }
    }
}
