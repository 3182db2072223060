//! Shared data and wire types for banter.
//!
//! Everything that crosses the client/server boundary lives here:
//! chat identifiers, message roles and content, and the request/response
//! bodies of the chat and health endpoints.

pub mod id;
pub mod protocol;
pub mod types;

pub use id::{new_id, ChatId};
pub use protocol::{ChatRequest, ChatResponse, HealthResponse, WireMessage};
pub use types::{Message, MessageContent, Role};
