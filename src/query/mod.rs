//! # Query Module
//!
//! The request/response cycle behind the input box.
//!
//! ## Lifecycle
//!
//! ```text
//! IDLE --submit() [valid input]--> SENDING --ok-->  IDLE (display = rendered answer)
//!                                          --err--> IDLE (display = error message)
//! IDLE    --submit() [blank input]--> IDLE    (ignored)
//! SENDING --submit()-----------------> SENDING (ignored)
//! ```
//!
//! ## Failures
//!
//! Transport errors, non-2xx statuses and unexpected response bodies are all
//! shown to the user as the same [`ERROR_MESSAGE`]. The specific
//! [`QueryError`] is only logged.

mod client;
mod controller;
mod prompt;

pub use client::{CompletionClient, QueryError, ReqwestCompletionClient};
pub use controller::{DisplayContent, QueryController};
pub use prompt::{
    ChatMessage, ChatRequest, ChatResponse, Role, DEFAULT_ENDPOINT, ERROR_MESSAGE, PERSONA_PREFIX,
    SYSTEM_PROMPT,
};
