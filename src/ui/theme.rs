//! # Theme System
//!
//! Colour roles for the view. Rendering code reads fields from the active
//! [`Theme`] rather than hardcoding `ratatui::style::Color` values, so the
//! theme can be cycled at runtime with `Ctrl+T`.
//!
//! ## Built-in Themes
//!
//! - **Catppuccin Mocha** (default)
//! - **Catppuccin Latte** - the light Catppuccin flavour
//! - **Gruvbox Dark**
//! - **Nord**

use ratatui::style::{Color, Modifier, Style};

use crate::markdown::MarkdownStyles;

/// All colours used by the view, grouped by role.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Human-readable name, also the value persisted in the config file.
    pub name: &'static str,

    pub bg: Color,
    /// Body text, including the rendered answer.
    pub fg: Color,
    /// Hints, footer, placeholder text.
    pub fg_dim: Color,

    /// Header, focused borders, links.
    pub accent: Color,
    /// Headings and inline code in answers.
    pub secondary: Color,

    /// Face outline, neck and features of the portrait.
    pub stroke: Color,
    /// The two construction strokes behind the face.
    pub stroke_muted: Color,

    /// Input box background.
    pub input_bg: Color,
    /// Failure message.
    pub error: Color,
}

impl Theme {
    /// All built-in themes, in cycling order.
    pub fn all() -> &'static [Theme] {
        &BUILT_IN_THEMES
    }

    /// Find a built-in theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<&'static Theme> {
        BUILT_IN_THEMES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn default_theme() -> &'static Theme {
        &BUILT_IN_THEMES[0]
    }

    /// The theme after this one, wrapping around.
    pub fn next(&self) -> &'static Theme {
        let index = BUILT_IN_THEMES
            .iter()
            .position(|t| t.name == self.name)
            .map_or(0, |i| (i + 1) % BUILT_IN_THEMES.len());
        &BUILT_IN_THEMES[index]
    }

    /// Markdown styles for answers rendered in the output panel.
    pub fn markdown_styles(&self) -> MarkdownStyles {
        MarkdownStyles {
            text: Style::default().fg(self.fg),
            heading: Style::default()
                .fg(self.secondary)
                .add_modifier(Modifier::BOLD),
            emphasis: Style::default().add_modifier(Modifier::ITALIC),
            strong: Style::default().add_modifier(Modifier::BOLD),
            strikethrough: Style::default().add_modifier(Modifier::CROSSED_OUT),
            code: Style::default().fg(self.secondary),
            code_block: Style::default().fg(self.fg_dim),
            link: Style::default()
                .fg(self.accent)
                .add_modifier(Modifier::UNDERLINED),
            list_marker: Style::default().fg(self.accent),
            blockquote: Style::default()
                .fg(self.fg_dim)
                .add_modifier(Modifier::ITALIC),
            rule: Style::default().fg(self.fg_dim),
        }
    }
}

static BUILT_IN_THEMES: [Theme; 4] = [
    Theme {
        name: "Catppuccin Mocha",
        bg: Color::Rgb(30, 30, 46),              // base
        fg: Color::Rgb(205, 214, 244),           // text
        fg_dim: Color::Rgb(108, 112, 134),       // overlay0
        accent: Color::Rgb(137, 180, 250),       // blue
        secondary: Color::Rgb(249, 226, 175),    // yellow
        stroke: Color::Rgb(205, 214, 244),       // text
        stroke_muted: Color::Rgb(147, 153, 178), // overlay2
        input_bg: Color::Rgb(49, 50, 68),        // surface0
        error: Color::Rgb(243, 139, 168),        // red
    },
    Theme {
        name: "Catppuccin Latte",
        bg: Color::Rgb(239, 241, 245),           // base
        fg: Color::Rgb(76, 79, 105),             // text
        fg_dim: Color::Rgb(156, 160, 176),       // overlay0
        accent: Color::Rgb(30, 102, 245),        // blue
        secondary: Color::Rgb(223, 142, 29),     // yellow
        stroke: Color::Rgb(76, 79, 105),         // text
        stroke_muted: Color::Rgb(124, 127, 147), // overlay2
        input_bg: Color::Rgb(204, 208, 218),     // surface0
        error: Color::Rgb(210, 15, 57),          // red
    },
    Theme {
        name: "Gruvbox Dark",
        bg: Color::Rgb(40, 40, 40),
        fg: Color::Rgb(235, 219, 178),
        fg_dim: Color::Rgb(146, 131, 116),
        accent: Color::Rgb(131, 165, 152),
        secondary: Color::Rgb(250, 189, 47),
        stroke: Color::Rgb(235, 219, 178),
        stroke_muted: Color::Rgb(168, 153, 132),
        input_bg: Color::Rgb(60, 56, 54),
        error: Color::Rgb(251, 73, 52),
    },
    Theme {
        name: "Nord",
        bg: Color::Rgb(46, 52, 64),
        fg: Color::Rgb(216, 222, 233),
        fg_dim: Color::Rgb(76, 86, 106),
        accent: Color::Rgb(136, 192, 208),
        secondary: Color::Rgb(235, 203, 139),
        stroke: Color::Rgb(236, 239, 244),
        stroke_muted: Color::Rgb(129, 161, 193),
        input_bg: Color::Rgb(59, 66, 82),
        error: Color::Rgb(191, 97, 106),
    },
];
