//! Chat-completion proxy for a local Ollama runtime.
//!
//! `POST /api/chat` renders the submitted history under a fixed persona
//! prompt and asks Ollama for one non-streaming completion.
//! `GET /api/health` reports whether the runtime is reachable and which
//! models it has. Runtime failures are folded into 200 responses with
//! `error: true` so clients can render them as ordinary replies.

pub mod ollama;
pub mod prompt;
pub mod routes;
