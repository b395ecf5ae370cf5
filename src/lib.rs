//! Naval TUI - ask a question, get an answer in Naval's voice
//!
//! This library provides the pieces of the single-view terminal app: the
//! query lifecycle against a chat-completion endpoint, markdown rendering of
//! the answer, and the portrait's entrance animations.

pub mod animation;
pub mod markdown;
pub mod query;
pub mod ui;
