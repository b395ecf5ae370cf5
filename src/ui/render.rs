use std::time::Instant;

use crate::animation::{Appearance, Element};
use crate::ui::app::{App, OutputViewport};
use crate::ui::portrait;
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, BorderType, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};

const PLACEHOLDER: &str = "seek wisdom here";
const INPUT_HEIGHT: u16 = 3;
/// Rows the input box travels while rising into place.
const INPUT_RISE_ROWS: f64 = 3.0;
/// Rows the output panel travels while revealing.
const OUTPUT_RISE_ROWS: f64 = 2.0;

pub fn render(frame: &mut Frame, app: &App) {
    render_at(frame, app, Instant::now());
}

/// Draw the view as it looks at `now`.
pub fn render_at(frame: &mut Frame, app: &App, now: Instant) {
    let theme = app.theme;
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.bg).fg(theme.fg)),
        frame.area(),
    );

    let chunks = split(frame.area());

    render_header(frame, theme, chunks[0]);
    render_portrait(frame, app, now, chunks[1]);
    render_spinner(frame, app, now, chunks[3]);
    render_output(frame, app, now, chunks[4]);
    // Drawn after the spinner and output so it rises over them.
    render_input(frame, app, now, chunks[2]);
    render_footer(frame, app, chunks[5]);
}

fn split(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // Header
            Constraint::Percentage(40),       // Portrait
            Constraint::Length(INPUT_HEIGHT), // Input
            Constraint::Length(1),            // Spinner
            Constraint::Min(0),               // Output
            Constraint::Length(1),            // Footer
        ])
        .split(area)
}

/// The output panel's area once fully revealed, border included.
fn output_panel(area: Rect) -> Rect {
    centered(area, area.width.min(90))
}

/// Inner size of the output panel for a frame of size `area`.
pub fn output_viewport(area: Rect) -> OutputViewport {
    let panel = output_panel(split(area)[4]);
    OutputViewport {
        width: panel.width,
        // One row goes to the top border.
        height: panel.height.saturating_sub(1),
    }
}

fn render_header(frame: &mut Frame, theme: &Theme, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "naval",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ·  ask and listen", Style::default().fg(theme.fg_dim)),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(header, area);
}

fn render_portrait(frame: &mut Frame, app: &App, now: Instant, area: Rect) {
    let theme = app.theme;
    // Keep the portrait roughly in proportion; braille cells are 2x4 dots.
    let width = area.height.saturating_mul(2).min(area.width);
    let area = centered(area, width);

    let strokes: Vec<(Color, Vec<portrait::Segment>)> = Element::ALL
        .iter()
        .filter_map(|&element| {
            let points = portrait::stroke(element)?;
            let look = app.animation.appearance(element, now);
            let color = if portrait::is_muted(element) {
                theme.stroke_muted
            } else {
                theme.stroke
            };
            Some((color, portrait::partial_path(points, look.path_length)))
        })
        .collect();

    let canvas = Canvas::default()
        .background_color(theme.bg)
        .marker(Marker::Braille)
        .x_bounds([0.0, portrait::WIDTH])
        .y_bounds([0.0, portrait::HEIGHT])
        .paint(move |ctx| {
            for (color, segments) in &strokes {
                for &((x1, y1), (x2, y2)) in segments {
                    ctx.draw(&CanvasLine::new(x1, y1, x2, y2, *color));
                }
            }
        });
    frame.render_widget(canvas, area);
}

fn render_input(frame: &mut Frame, app: &App, now: Instant, area: Rect) {
    let theme = app.theme;
    let look = app.animation.appearance(Element::InputBox, now);
    if look.opacity <= 0.0 {
        return;
    }
    let area = lowered(
        centered(area, area.width.min(60)),
        rows_for(look, 100.0, INPUT_RISE_ROWS),
        frame.area(),
    );
    if area.height == 0 {
        return;
    }

    let busy = app.query.is_busy();
    let input = app.query.input();
    let inner_width = usize::from(area.width.saturating_sub(2));
    let window = InputWindow::new(input, inner_width);
    let (text, text_color) = if input.is_empty() {
        (PLACEHOLDER.to_string(), theme.fg_dim)
    } else {
        (window.text.clone(), if busy { theme.fg_dim } else { theme.fg })
    };
    let border = if busy { theme.fg_dim } else { theme.accent };

    let mut title = Vec::new();
    if app.show_send_hint() {
        title.push(Span::styled(" ⏎ send ", Style::default().fg(theme.accent)));
    }

    let alignment = if window.overflows {
        Alignment::Left
    } else {
        Alignment::Center
    };
    let paragraph = Paragraph::new(Span::styled(
        text,
        Style::default().fg(blend(theme.input_bg, text_color, look.opacity)),
    ))
    .alignment(alignment)
    .style(Style::default().bg(theme.input_bg))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(blend(theme.bg, border, look.opacity)))
            .title_bottom(Line::from(title).alignment(Alignment::Right)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);

    if !busy && area.height == INPUT_HEIGHT && inner_width > 0 {
        let column = u16::try_from(window.cursor).unwrap_or(u16::MAX);
        let x = (area.x + 1).saturating_add(column);
        frame.set_cursor_position(Position::new(x, area.y + 1));
    }
}

/// The visible slice of the input and where the cursor sits in it.
///
/// Short input is centred with the cursor after its last character. Longer
/// input scrolls so its tail stays in view, leaving one cell for the cursor.
#[derive(Debug, PartialEq, Eq)]
struct InputWindow {
    text: String,
    /// Column of the cursor inside the box, 0-based.
    cursor: usize,
    overflows: bool,
}

impl InputWindow {
    fn new(input: &str, width: usize) -> Self {
        let len = input.chars().count();
        if len < width {
            return Self {
                text: input.to_string(),
                cursor: (width - len) / 2 + len,
                overflows: false,
            };
        }
        let shown = width.saturating_sub(1);
        Self {
            text: input.chars().skip(len - shown).collect(),
            cursor: shown,
            overflows: true,
        }
    }
}

fn render_spinner(frame: &mut Frame, app: &App, now: Instant, area: Rect) {
    let Some(glyph) = app.animation.spinner.frame_at(now) else {
        return;
    };
    let line = Line::from(vec![
        Span::styled(glyph, Style::default().fg(app.theme.accent)),
        Span::styled(" thinking", Style::default().fg(app.theme.fg_dim)),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_output(frame: &mut Frame, app: &App, now: Instant, area: Rect) {
    let theme = app.theme;
    let lines = app.output_lines();
    if lines.is_empty() {
        return;
    }
    let look = app.animation.output.appearance_at(now);
    let area = lowered(
        output_panel(area),
        rows_for(look, 20.0, OUTPUT_RISE_ROWS),
        area,
    );
    if area.height == 0 {
        return;
    }

    let lines: Vec<Line> = lines
        .iter()
        .cloned()
        .map(|line| fade_line(line, theme, look.opacity))
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(blend(theme.bg, theme.fg_dim, look.opacity))),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.output_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = if app.query.is_busy() {
        "waiting for an answer…  [Esc] Quit"
    } else if app.show_send_hint() {
        "[Enter] Send  [Ctrl+U] Clear  [↑↓/PgUp/PgDn] Scroll  [Ctrl+T] Theme  [Esc] Quit"
    } else {
        "Type a question  [↑↓/PgUp/PgDn] Scroll  [Ctrl+T] Theme  [Esc] Quit"
    };

    let footer = Paragraph::new(help_text)
        .style(Style::default().fg(app.theme.fg_dim))
        .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

/// Shift `area` down by `rows`, clipped to `bounds`.
fn lowered(area: Rect, rows: u16, bounds: Rect) -> Rect {
    let y = area.y.saturating_add(rows);
    let bottom = bounds.y.saturating_add(bounds.height);
    let height = area.height.min(bottom.saturating_sub(y));
    Rect { y, height, ..area }
}

fn rows_for(look: Appearance, full_offset: f64, full_rows: f64) -> u16 {
    if full_offset <= 0.0 {
        return 0;
    }
    (look.offset_y / full_offset * full_rows).round().clamp(0.0, f64::from(u16::MAX)) as u16
}

fn fade_line(line: Line<'static>, theme: &Theme, opacity: f64) -> Line<'static> {
    if opacity >= 1.0 {
        return line;
    }
    let spans = line
        .spans
        .into_iter()
        .map(|span| {
            let fg = span.style.fg.unwrap_or(theme.fg);
            let style = span.style.fg(blend(theme.bg, fg, opacity));
            Span::styled(span.content, style)
        })
        .collect::<Vec<_>>();
    Line::from(spans)
}

/// Approximate opacity by mixing two colours; `t = 0` is `from`.
pub fn blend(from: Color, to: Color, t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let mix = |a: u8, b: u8| {
                (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
            };
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ if t < 0.5 => from,
        _ => to,
    }
}
