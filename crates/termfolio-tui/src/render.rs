//! Pure view/render functions for the TUI.
//!
//! Functions here take state by immutable reference, draw to a ratatui
//! `Frame`, and never mutate state or return effects. The line builders are
//! public so they can be checked without a terminal.

use std::mem;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use termfolio_core::line::Line as TranscriptLine;
use termfolio_core::session::{Phase, Session};
use unicode_width::UnicodeWidthChar;

use crate::state::AppState;
use crate::theme::Theme;

/// Height of the status line below the input.
const STATUS_HEIGHT: u16 = 1;

/// Horizontal margin for the whole UI (left and right).
pub const MARGIN: u16 = 1;

/// Glyph drawn after the last revealed character.
const CARET: &str = "▌";

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let inner = Rect {
        x: area.x + MARGIN,
        y: area.y,
        width: area.width.saturating_sub(MARGIN * 2),
        height: area.height,
    };
    let width = usize::from(inner.width);

    let input_rows = input_lines(&app.session, &app.theme, width);
    let input_height = input_height(input_rows.len(), inner.height);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),                // Transcript
            Constraint::Length(input_height),  // Prompt + input
            Constraint::Length(STATUS_HEIGHT), // Status line
        ])
        .split(inner);

    let rows = transcript_lines(&app.session, &app.theme, width, app.caret_visible());
    let visible = visible_window(rows, usize::from(chunks[0].height), app.scroll_offset);
    frame.render_widget(Paragraph::new(visible), chunks[0]);

    // Keep the tail of a long input visible.
    let skip = input_rows.len().saturating_sub(usize::from(input_height));
    let cursor = input_cursor(&input_rows, chunks[1], skip);
    frame.render_widget(
        Paragraph::new(input_rows.into_iter().skip(skip).collect::<Vec<_>>()),
        chunks[1],
    );
    if let Some(position) = cursor {
        frame.set_cursor_position(position);
    }

    frame.render_widget(Paragraph::new(status_line(app)), chunks[2]);
}

/// Rows given to the prompt, leaving at least one row for the transcript.
fn input_height(rows: usize, height: u16) -> u16 {
    let max_input = height.saturating_sub(STATUS_HEIGHT + 1).max(1);
    u16::try_from(rows).unwrap_or(u16::MAX).min(max_input)
}

/// Largest `scroll_offset` that still shows a full page of transcript at the
/// current viewport size.
pub fn max_scroll(app: &AppState) -> usize {
    let (width, height) = app.viewport;
    let width = usize::from(width.saturating_sub(MARGIN * 2));
    let input_rows = input_lines(&app.session, &app.theme, width).len();
    let transcript_height = height
        .saturating_sub(input_height(input_rows, height) + STATUS_HEIGHT)
        .max(1);
    transcript_lines(&app.session, &app.theme, width, app.caret_visible())
        .len()
        .saturating_sub(usize::from(transcript_height))
}

/// Builds the wrapped transcript rows for every line in the session.
///
/// Each line paints its revealed content only. The line being revealed gets
/// a caret after its last character when `caret_visible` is set.
pub fn transcript_lines(
    session: &Session,
    theme: &Theme,
    width: usize,
    caret_visible: bool,
) -> Vec<Line<'static>> {
    let active = session.active_line();
    let mut out = Vec::new();
    for line in session.lines() {
        let show_caret = caret_visible && active == Some(line.id());
        for row in logical_rows(line, theme, show_caret) {
            out.extend(wrap_spans(row, width));
        }
    }
    out
}

/// Splits a transcript line's revealed segments into rows at `\n`.
fn logical_rows(line: &TranscriptLine, theme: &Theme, caret: bool) -> Vec<Vec<Span<'static>>> {
    let mut rows = vec![Vec::new()];
    for segment in line.revealed_content() {
        let style = theme.segment_style(segment, line.kind());
        for (idx, part) in segment.text.split('\n').enumerate() {
            if idx > 0 {
                rows.push(Vec::new());
            }
            if !part.is_empty() {
                let text = part.replace('\t', "    ");
                if let Some(row) = rows.last_mut() {
                    row.push(Span::styled(text, style));
                }
            }
        }
    }
    if caret && let Some(row) = rows.last_mut() {
        row.push(Span::styled(CARET, theme.caret_style()));
    }
    rows
}

/// Wraps one row of spans to `width` display columns.
///
/// Breaks between characters (no word wrapping), the way a terminal does.
/// Always returns at least one line.
pub fn wrap_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut row: Vec<Span<'static>> = Vec::new();
    let mut row_width = 0;

    for span in spans {
        let style = span.style;
        let mut chunk = String::new();
        for ch in span.content.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if row_width > 0 && row_width + ch_width > width {
                if !chunk.is_empty() {
                    row.push(Span::styled(mem::take(&mut chunk), style));
                }
                lines.push(Line::from(mem::take(&mut row)));
                row_width = 0;
            }
            chunk.push(ch);
            row_width += ch_width;
        }
        if !chunk.is_empty() {
            row.push(Span::styled(chunk, style));
        }
    }
    lines.push(Line::from(row));
    lines
}

/// Prompt followed by the pending input, wrapped.
pub fn input_lines(session: &Session, theme: &Theme, width: usize) -> Vec<Line<'static>> {
    let spans = vec![
        Span::styled(session.prompt().to_string(), theme.prompt_style()),
        Span::raw(" "),
        Span::raw(session.pending_input().to_string()),
    ];
    wrap_spans(spans, width)
}

/// Terminal cursor position at the end of the input.
fn input_cursor(rows: &[Line<'static>], area: Rect, skip: usize) -> Option<Position> {
    let last = rows.len().checked_sub(1)?;
    let row = u16::try_from(last.checked_sub(skip)?).ok()?;
    let col = u16::try_from(rows[last].width()).ok()?;
    if row >= area.height {
        return None;
    }
    Some(Position {
        x: area.x + col.min(area.width.saturating_sub(1)),
        y: area.y + row,
    })
}

/// Slices the rows that fit in `height`, `offset` rows above the bottom.
///
/// Pads at the top when the transcript is shorter than the viewport so
/// output sits right above the prompt.
pub fn visible_window(
    rows: Vec<Line<'static>>,
    height: usize,
    offset: usize,
) -> Vec<Line<'static>> {
    let total = rows.len();
    if total <= height {
        let mut padded = vec![Line::default(); height - total];
        padded.extend(rows);
        return padded;
    }

    let offset = offset.min(total - height);
    let end = total - offset;
    rows.into_iter().skip(end - height).take(height).collect()
}

/// Status text below the input.
pub fn status_line(app: &AppState) -> Line<'static> {
    let muted = app.theme.muted_style();
    let mut spans = match app.session.phase() {
        Phase::Idle => vec![
            Span::styled("Enter", muted),
            Span::raw(" run  "),
            Span::styled("↑/↓", muted),
            Span::raw(" history  "),
            Span::styled("PgUp/PgDn", muted),
            Span::raw(" scroll  "),
            Span::styled("Ctrl+C", muted),
            Span::raw(" quit"),
        ],
        Phase::Dispatching => vec![Span::styled("resolving…", muted)],
        Phase::Revealing(job) if job.remaining() > 0 => vec![Span::styled(
            format!("typing… ({} more lines)", job.remaining()),
            muted,
        )],
        Phase::Revealing(_) => vec![Span::styled("typing…", muted)],
    };
    let offset = app.scroll_offset.min(max_scroll(app));
    if offset > 0 {
        spans.push(Span::styled(format!("  [scrolled up {offset} rows]"), muted));
    }
    Line::from(spans)
}

/// Plain text of a rendered row (for tests and logging).
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use termfolio_core::commands::{CommandOutput, CommandRegistry, Dispatcher};
    use termfolio_core::config::Config;
    use termfolio_core::content::Portfolio;
    use termfolio_core::session::SessionOptions;

    use super::*;

    fn session() -> Session {
        Session::new(SessionOptions::from_config(
            &Config::default(),
            &Portfolio::builtin(),
        ))
    }

    fn texts(lines: &[Line<'static>]) -> Vec<String> {
        lines.iter().map(line_text).collect()
    }

    #[test]
    fn test_welcome_banner_renders_two_rows() {
        let rows = transcript_lines(&session(), &Theme::default(), 80, true);
        let rows = texts(&rows);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("Jordan Avery"));
        assert!(rows[1].contains("help"));
    }

    #[test]
    fn test_wrap_breaks_by_display_width() {
        let rows = wrap_spans(vec![Span::raw("hello world")], 5);
        assert_eq!(texts(&rows), ["hello", " worl", "d"]);

        let wide = wrap_spans(vec![Span::raw("🦀🦀🦀")], 4);
        assert_eq!(texts(&wide), ["🦀🦀", "🦀"]);
        assert!(wide.iter().all(|l| l.width() <= 4));
    }

    #[test]
    fn test_wrap_keeps_span_styles_across_breaks() {
        let theme = Theme::default();
        let rows = wrap_spans(
            vec![
                Span::styled("abc", theme.prompt_style()),
                Span::raw("def"),
            ],
            4,
        );
        assert_eq!(texts(&rows), ["abcd", "ef"]);
        assert_eq!(rows[0].spans[0].style, theme.prompt_style());
        assert_eq!(rows[1].spans[0].content, "ef");
    }

    #[test]
    fn test_wrap_of_nothing_is_one_empty_row() {
        let rows = wrap_spans(Vec::new(), 10);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].width(), 0);
    }

    #[test]
    fn test_caret_follows_the_revealing_line() {
        let mut registry = CommandRegistry::new();
        registry.register("hi", "greet", |_, _| Ok(CommandOutput::ok("hello")));
        let dispatcher = Dispatcher::new(registry, Arc::new(Portfolio::builtin()));
        let mut session = session();
        session.submit("hi", &dispatcher);
        session.tick();
        session.tick();

        let theme = Theme::default();
        let shown = texts(&transcript_lines(&session, &theme, 80, true));
        assert_eq!(shown.last().map(String::as_str), Some("he▌"));
        let hidden = texts(&transcript_lines(&session, &theme, 80, false));
        assert_eq!(hidden.last().map(String::as_str), Some("he"));

        session.finish_reveal();
        let done = texts(&transcript_lines(&session, &theme, 80, true));
        assert_eq!(done.last().map(String::as_str), Some("hello"));
    }

    #[test]
    fn test_formatted_newlines_become_rows() {
        let dispatcher = Dispatcher::new(CommandRegistry::builtin(), Arc::new(Portfolio::builtin()));
        let mut session = session();
        session.submit("projects", &dispatcher);
        session.finish_reveal();

        let rows = texts(&transcript_lines(&session, &Theme::default(), 120, false));
        assert!(rows.iter().any(|r| r == "MY PROJECTS"));
        assert!(rows.iter().any(|r| r.trim() == "https://github.com/jordanavery/tinykv"));
    }

    #[test]
    fn test_input_line_shows_prompt_and_pending_text() {
        let mut session = session();
        session.set_pending_input("projects");
        let rows = input_lines(&session, &Theme::default(), 80);
        assert_eq!(texts(&rows), ["guest@portfolio:~$ projects"]);
    }

    #[test]
    fn test_visible_window_pads_and_scrolls() {
        let rows: Vec<Line<'static>> = (0..5).map(|i| Line::from(i.to_string())).collect();

        let padded = visible_window(rows.clone(), 7, 0);
        assert_eq!(texts(&padded), ["", "", "0", "1", "2", "3", "4"]);

        let bottom = visible_window(rows.clone(), 2, 0);
        assert_eq!(texts(&bottom), ["3", "4"]);

        let scrolled = visible_window(rows.clone(), 2, 1);
        assert_eq!(texts(&scrolled), ["2", "3"]);

        let clamped = visible_window(rows, 2, 99);
        assert_eq!(texts(&clamped), ["0", "1"]);
    }
}
