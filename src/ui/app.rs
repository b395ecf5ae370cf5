use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::animation::AnimationSequencer;
use crate::markdown;
use crate::query::{DisplayContent, QueryController};
use crate::ui::theme::Theme;

/// Lines moved per `PageUp` / `PageDown`.
const PAGE_SCROLL: u16 = 10;

/// What a key press asked the event loop to do beyond updating state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Submitted,
    ThemeChanged,
    Quit,
}

/// Inner size of the output panel, as last laid out by the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputViewport {
    pub width: u16,
    pub height: u16,
}

pub struct App {
    pub query: QueryController,
    pub animation: AnimationSequencer,
    pub theme: &'static Theme,
    /// First wrapped row shown in the output panel.
    pub output_scroll: u16,
    pub should_quit: bool,
    output_lines: Vec<Line<'static>>,
    output_viewport: OutputViewport,
}

impl App {
    /// Create the view and start its entrance animations at `now`.
    pub fn new(query: QueryController, theme: &'static Theme, now: Instant) -> Self {
        let mut animation = AnimationSequencer::new();
        animation.mount(now);
        Self {
            query,
            animation,
            theme,
            output_scroll: 0,
            should_quit: false,
            output_lines: Vec::new(),
            output_viewport: OutputViewport::default(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Action {
        if key.kind == KeyEventKind::Release {
            return Action::None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => self.quit(),
            KeyCode::Char('c') if ctrl => self.quit(),
            KeyCode::Char('t') if ctrl => {
                self.cycle_theme();
                Action::ThemeChanged
            }
            KeyCode::Char('u') if ctrl => {
                self.query.clear_input();
                Action::None
            }
            KeyCode::Enter => {
                if self.submit(now) {
                    Action::Submitted
                } else {
                    Action::None
                }
            }
            KeyCode::Backspace => {
                self.query.pop_char();
                Action::None
            }
            KeyCode::Up => {
                self.scroll_output_up(1);
                Action::None
            }
            KeyCode::Down => {
                self.scroll_output_down(1);
                Action::None
            }
            KeyCode::PageUp => {
                self.scroll_output_up(PAGE_SCROLL);
                Action::None
            }
            KeyCode::PageDown => {
                self.scroll_output_down(PAGE_SCROLL);
                Action::None
            }
            KeyCode::Char(c) if !ctrl => {
                self.query.push_char(c);
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Insert pasted text at the end of the input. Newlines become spaces.
    pub fn handle_paste(&mut self, text: &str) {
        let mut input = self.query.input().to_string();
        input.extend(text.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }));
        self.query.update_input(input);
    }

    fn quit(&mut self) -> Action {
        self.should_quit = true;
        Action::Quit
    }

    pub fn submit(&mut self, now: Instant) -> bool {
        if !self.query.submit() {
            return false;
        }
        self.output_scroll = 0;
        self.refresh_output();
        self.animation.output.hide();
        self.animation.sync_busy(self.query.is_busy(), now);
        true
    }

    /// Advance per-frame state: settle a finished request and keep the
    /// spinner in step with the busy flag.
    pub fn tick(&mut self, now: Instant) {
        if self.query.poll() {
            self.refresh_output();
            self.animation.output.show(now);
        }
        self.animation.sync_busy(self.query.is_busy(), now);
    }

    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.refresh_output();
    }

    /// Whether the send hint should be shown.
    pub fn show_send_hint(&self) -> bool {
        self.query.can_submit()
    }

    /// The output slot as styled lines, empty when nothing is displayed.
    pub fn output_lines(&self) -> &[Line<'static>] {
        &self.output_lines
    }

    /// Re-render the output slot. Runs when the display or the theme changes,
    /// not per frame.
    fn refresh_output(&mut self) {
        self.output_lines = match self.query.display() {
            Some(DisplayContent::Rendered { markdown, .. }) => {
                markdown::to_lines(markdown, &self.theme.markdown_styles())
            }
            Some(DisplayContent::Failed { message }) => vec![Line::from(Span::styled(
                message.clone(),
                Style::default().fg(self.theme.error),
            ))],
            None => Vec::new(),
        };
        self.clamp_output_scroll();
    }

    pub fn output_viewport(&self) -> OutputViewport {
        self.output_viewport
    }

    /// Record the output panel's inner size so scrolling can stop at the
    /// last wrapped row.
    pub fn set_output_viewport(&mut self, viewport: OutputViewport) {
        if self.output_viewport != viewport {
            self.output_viewport = viewport;
            self.clamp_output_scroll();
        }
    }

    /// Rows the output occupies once wrapped to the viewport width.
    ///
    /// Before the first layout the width is unknown and every line counts
    /// as one row.
    pub fn output_rows(&self) -> usize {
        if self.output_viewport.width == 0 {
            return self.output_lines.len();
        }
        Paragraph::new(self.output_lines.clone())
            .wrap(Wrap { trim: false })
            .line_count(self.output_viewport.width)
    }

    fn max_output_scroll(&self) -> u16 {
        let visible = if self.output_viewport.height == 0 {
            1
        } else {
            usize::from(self.output_viewport.height)
        };
        u16::try_from(self.output_rows().saturating_sub(visible)).unwrap_or(u16::MAX)
    }

    fn clamp_output_scroll(&mut self) {
        self.output_scroll = self.output_scroll.min(self.max_output_scroll());
    }

    pub fn scroll_output_up(&mut self, lines: u16) {
        self.output_scroll = self.output_scroll.saturating_sub(lines);
    }

    pub fn scroll_output_down(&mut self, lines: u16) {
        self.output_scroll = self
            .output_scroll
            .saturating_add(lines)
            .min(self.max_output_scroll());
    }

    /// True while something on screen moves, so the loop should redraw fast.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.query.is_busy() || self.animation.is_animating(now)
    }
}
