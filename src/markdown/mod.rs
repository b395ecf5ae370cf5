//! # Markdown Rendering
//!
//! Completions arrive as markdown from a remote service and are treated as
//! untrusted. Two renderers share one parser configuration:
//!
//! - [`to_html`] produces sanitized HTML markup (raw HTML escaped, unsafe
//!   link schemes dropped). This is the canonical rendered form stored in the
//!   query controller's display slot.
//! - [`to_lines`] produces styled ratatui lines for the terminal output panel.

mod html;
mod terminal;

pub use html::{is_safe_url, to_html};
pub use terminal::{to_lines, MarkdownStyles};

use pulldown_cmark::Options;

fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}
