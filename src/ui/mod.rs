//! # UI Module
//!
//! The single terminal view and its state.
//!
//! ## Components
//!
//! - [`App`] - view state: query controller, animations, theme, scroll
//! - [`mod@render`] - drawing functions
//! - [`portrait`] - stroke geometry for the animated portrait
//! - [`theme`] / [`config`] - colours and the persisted theme choice
//!
//! ## Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                    Header                       │
//! │                                                 │
//! │                   Portrait                      │
//! │             (strokes draw themselves)           │
//! │                                                 │
//! │        ╭──────── seek wisdom here ────────╮     │
//! │        ╰─────────────────────── ⏎ send ───╯     │
//! │                  ⠁ thinking                     │
//! │ ─────────────────────────────────────────────── │
//! │                    Answer                       │
//! │                                                 │
//! │                    Footer                       │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod config;
pub mod portrait;
pub mod render;
pub mod theme;

pub use app::{Action, App, OutputViewport};
pub use render::render;
