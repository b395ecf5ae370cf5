use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Parser, Tag};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use tracing::trace;

use super::html::is_safe_url;

const RULE_WIDTH: usize = 40;

/// Styles applied to markdown elements in the output panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkdownStyles {
    pub text: Style,
    pub heading: Style,
    pub emphasis: Style,
    pub strong: Style,
    pub strikethrough: Style,
    pub code: Style,
    pub code_block: Style,
    pub link: Style,
    pub list_marker: Style,
    pub blockquote: Style,
    pub rule: Style,
}

impl Default for MarkdownStyles {
    fn default() -> Self {
        Self {
            text: Style::default(),
            heading: Style::default().add_modifier(Modifier::BOLD),
            emphasis: Style::default().add_modifier(Modifier::ITALIC),
            strong: Style::default().add_modifier(Modifier::BOLD),
            strikethrough: Style::default().add_modifier(Modifier::CROSSED_OUT),
            code: Style::default().add_modifier(Modifier::DIM),
            code_block: Style::default().add_modifier(Modifier::DIM),
            link: Style::default().add_modifier(Modifier::UNDERLINED),
            list_marker: Style::default(),
            blockquote: Style::default().add_modifier(Modifier::ITALIC),
            rule: Style::default().add_modifier(Modifier::DIM),
        }
    }
}

/// Convert markdown into styled lines for a ratatui `Paragraph`.
///
/// Raw HTML is shown as literal text; nothing in the input is interpreted
/// by the terminal beyond the styles set here.
pub fn to_lines(markdown: &str, styles: &MarkdownStyles) -> Vec<Line<'static>> {
    let mut writer = LineWriter::new(styles);
    for event in Parser::new_ext(markdown, super::parser_options()) {
        writer.handle_event(event);
    }
    writer.lines
}

struct LineWriter<'s> {
    styles: &'s MarkdownStyles,
    lines: Vec<Line<'static>>,
    /// Stack of inline styles; the effective style is all of them patched together.
    inline_styles: Vec<Style>,
    /// Spans prepended to every new line (block quote bars).
    line_prefixes: Vec<Span<'static>>,
    list_indices: Vec<Option<u64>>,
    link: Option<String>,
    needs_newline: bool,
    in_code_block: bool,
    /// Set right after a list marker so a following paragraph continues the line.
    item_open: bool,
    /// Open paragraphs, headings and table cells; HTML inside them is inline.
    inline_depth: usize,
    /// Inside a run of block-level HTML lines.
    html_block: bool,
    table_cell: usize,
}

impl<'s> LineWriter<'s> {
    fn new(styles: &'s MarkdownStyles) -> Self {
        Self {
            styles,
            lines: Vec::new(),
            inline_styles: Vec::new(),
            line_prefixes: Vec::new(),
            list_indices: Vec::new(),
            link: None,
            needs_newline: false,
            in_code_block: false,
            item_open: false,
            inline_depth: 0,
            html_block: false,
            table_cell: 0,
        }
    }

    fn handle_event(&mut self, event: Event<'_>) {
        if !matches!(event, Event::Html(_)) {
            self.html_block = false;
        }
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(text),
            Event::Code(code) => {
                self.item_open = false;
                self.push_span(Span::styled(code.into_string(), self.styles.code));
            }
            Event::Html(raw) => self.html(&raw),
            Event::FootnoteReference(name) => {
                self.push_span(Span::styled(format!("[^{name}]"), self.current_style()));
            }
            Event::SoftBreak => self.push_span(Span::raw(" ")),
            Event::HardBreak => self.push_line(Line::default()),
            Event::Rule => {
                self.blank_line_if_needed();
                self.push_line(Line::from(Span::styled(
                    "─".repeat(RULE_WIDTH),
                    self.styles.rule,
                )));
                self.needs_newline = true;
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.push_span(Span::styled(marker, self.styles.list_marker));
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.inline_depth += 1;
                if self.item_open {
                    return;
                }
                self.blank_line_if_needed();
                self.push_line(Line::default());
            }
            Tag::Heading(level, _, _) => {
                self.inline_depth += 1;
                self.blank_line_if_needed();
                let hashes = "#".repeat(heading_depth(level));
                self.push_line(Line::from(Span::styled(
                    format!("{hashes} "),
                    self.styles.heading,
                )));
                self.inline_styles.push(self.styles.heading);
            }
            Tag::BlockQuote => {
                self.blank_line_if_needed();
                self.line_prefixes
                    .push(Span::styled("│ ", self.styles.blockquote));
                self.inline_styles.push(self.styles.blockquote);
            }
            Tag::CodeBlock(kind) => {
                self.blank_line_if_needed();
                if let CodeBlockKind::Fenced(lang) = kind {
                    trace!(lang = %lang, "code block");
                }
                self.in_code_block = true;
            }
            Tag::List(start) => {
                if self.list_indices.is_empty() {
                    self.blank_line_if_needed();
                }
                self.list_indices.push(start);
            }
            Tag::Item => self.start_item(),
            Tag::FootnoteDefinition(name) => {
                self.blank_line_if_needed();
                self.push_line(Line::from(Span::styled(
                    format!("[^{name}]: "),
                    self.styles.rule,
                )));
            }
            Tag::Table(_) => self.blank_line_if_needed(),
            Tag::TableHead | Tag::TableRow => {
                self.table_cell = 0;
                self.push_line(Line::default());
            }
            Tag::TableCell => {
                self.inline_depth += 1;
                if self.table_cell > 0 {
                    self.push_span(Span::styled(" │ ", self.styles.rule));
                }
                self.table_cell += 1;
            }
            Tag::Emphasis => self.inline_styles.push(self.styles.emphasis),
            Tag::Strong => self.inline_styles.push(self.styles.strong),
            Tag::Strikethrough => self.inline_styles.push(self.styles.strikethrough),
            Tag::Link(_, dest, _) => {
                self.inline_styles.push(self.styles.link);
                self.link = Some(dest.into_string());
            }
            Tag::Image(_, _, _) => {
                self.push_span(Span::styled("[image: ", self.styles.rule));
            }
        }
    }

    fn end_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.inline_depth = self.inline_depth.saturating_sub(1);
                self.needs_newline = true;
            }
            Tag::Heading(..) => {
                self.inline_depth = self.inline_depth.saturating_sub(1);
                self.inline_styles.pop();
                self.needs_newline = true;
            }
            Tag::BlockQuote => {
                self.line_prefixes.pop();
                self.inline_styles.pop();
                self.needs_newline = true;
            }
            Tag::CodeBlock(_) => {
                self.in_code_block = false;
                self.needs_newline = true;
            }
            Tag::List(_) => {
                self.list_indices.pop();
                self.needs_newline = true;
            }
            Tag::Item => self.item_open = false,
            Tag::Table(_) | Tag::FootnoteDefinition(_) => self.needs_newline = true,
            Tag::Emphasis | Tag::Strong | Tag::Strikethrough => {
                self.inline_styles.pop();
            }
            Tag::Link(..) => {
                self.inline_styles.pop();
                if let Some(dest) = self.link.take() {
                    if is_safe_url(&dest) && !dest.starts_with('#') {
                        self.push_span(Span::styled(format!(" <{dest}>"), self.styles.rule));
                    }
                }
            }
            Tag::Image(..) => self.push_span(Span::styled("]", self.styles.rule)),
            Tag::TableCell => self.inline_depth = self.inline_depth.saturating_sub(1),
            Tag::TableHead | Tag::TableRow => {}
        }
    }

    /// Raw HTML is kept as literal text. Block-level HTML arrives one line
    /// per event and gets a line of its own; inline HTML joins the current line.
    fn html(&mut self, raw: &str) {
        self.item_open = false;
        let block = self.inline_depth == 0 && (self.html_block || raw.ends_with('\n'));
        if !block {
            for (i, part) in raw.split('\n').enumerate() {
                if i > 0 {
                    self.push_line(Line::default());
                }
                if !part.is_empty() {
                    self.push_span(Span::styled(part.to_string(), self.current_style()));
                }
            }
            return;
        }

        if !self.html_block {
            self.blank_line_if_needed();
            self.html_block = true;
        }
        for part in raw.trim_end_matches('\n').split('\n') {
            self.push_line(Line::from(Span::styled(part.to_string(), self.current_style())));
        }
        self.needs_newline = true;
    }

    fn start_item(&mut self) {
        let depth = self.list_indices.len().saturating_sub(1);
        let marker = match self.list_indices.last_mut() {
            Some(Some(index)) => {
                let marker = format!("{index}. ");
                *index += 1;
                marker
            }
            _ => "• ".to_string(),
        };
        self.needs_newline = false;
        self.push_line(Line::from(vec![
            Span::raw("  ".repeat(depth)),
            Span::styled(marker, self.styles.list_marker),
        ]));
        self.item_open = true;
    }

    fn text(&mut self, text: CowStr<'_>) {
        self.item_open = false;
        if self.in_code_block {
            for line in text.lines() {
                self.push_line(Line::from(Span::styled(
                    format!("    {line}"),
                    self.styles.code_block,
                )));
            }
            return;
        }
        self.push_span(Span::styled(text.into_string(), self.current_style()));
    }

    fn current_style(&self) -> Style {
        self.inline_styles
            .iter()
            .fold(self.styles.text, |acc, style| acc.patch(*style))
    }

    fn blank_line_if_needed(&mut self) {
        if self.needs_newline {
            self.push_line(Line::default());
            self.needs_newline = false;
        }
    }

    fn push_line(&mut self, line: Line<'static>) {
        let mut spans = self.line_prefixes.clone();
        spans.extend(line.spans);
        self.lines.push(Line::from(spans));
    }

    fn push_span(&mut self, span: Span<'static>) {
        if self.lines.is_empty() {
            self.push_line(Line::default());
        }
        if let Some(line) = self.lines.last_mut() {
            line.spans.push(span);
        }
    }
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
