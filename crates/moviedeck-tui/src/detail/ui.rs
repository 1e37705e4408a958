//! TUI rendering logic for the detail view.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::state::DetailState;
use super::summary_fields;

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_owned(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Draws the detail view. Returns the body height for scroll paging.
///
/// Clamps `state.scroll` to the wrapped body length.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, area: Rect, state: &mut DetailState, language: &str) -> u16 {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // body
            Constraint::Length(3), // footer
        ])
        .split(area);

    let title = state.details().map_or_else(
        || String::from(" Movie "),
        |details| format!(" {} ({}) ", details.title, details.id),
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Cyan));

    let lines = if state.show_raw {
        raw_lines(state)
    } else {
        body_lines(state, language)
    };
    let inner = block.inner(chunks[0]);
    let body = Paragraph::new(lines).wrap(Wrap { trim: false });
    state.fit_scroll(body.line_count(inner.width), inner.height);
    let body = body.block(block).scroll((state.scroll, 0));
    frame.render_widget(body, chunks[0]);

    draw_footer(frame, chunks[1], state);

    chunks[0].height
}

/// Rendered view: summary, overview, cast, trailers.
fn body_lines(state: &DetailState, language: &str) -> Vec<Line<'static>> {
    let Some(details) = state.details() else {
        let mut lines = vec![Line::from("Loading...")];
        if let Some(failure) = state.core_failure() {
            lines.push(Line::from(Span::styled(
                format!("Failed to load movie: {failure}  (R: retry)"),
                Style::default().fg(Color::Red),
            )));
        }
        return lines;
    };

    let mut lines: Vec<Line<'static>> = summary_fields(details, language)
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label:<15}"), Style::default().fg(Color::Cyan)),
                Span::raw(value),
            ])
        })
        .collect();

    if let Some(tagline) = details.tagline.as_ref().filter(|t| !t.is_empty()) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            tagline.clone(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }

    lines.push(Line::from(""));
    lines.push(heading("Overview"));
    lines.push(Line::from(
        details
            .overview
            .clone()
            .filter(|o| !o.is_empty())
            .unwrap_or_else(|| String::from("-")),
    ));

    lines.push(Line::from(""));
    lines.push(heading("Cast"));
    if state.displayed_cast().is_empty() {
        lines.push(Line::from("-"));
    }
    for member in state.displayed_cast() {
        lines.push(Line::from(format!("  {}", member.credit_line())));
    }

    lines.push(Line::from(""));
    lines.push(heading("Trailers"));
    if state.displayed_trailers().is_empty() {
        lines.push(Line::from("-"));
    }
    for (idx, video) in state.displayed_trailers().iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  [{}] ", idx.saturating_add(1)),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(format!("{}  ", video.name)),
            Span::styled(video.embed_url(), Style::default().fg(Color::DarkGray)),
        ]));
    }

    lines
}

/// Merged raw record as pretty JSON.
fn raw_lines(state: &DetailState) -> Vec<Line<'static>> {
    let Some(aggregate) = state.aggregate() else {
        return vec![Line::from("Loading...")];
    };
    match aggregate.to_pretty_json() {
        Ok(json) => json.lines().map(|l| Line::from(l.to_owned())).collect(),
        Err(err) => vec![Line::from(format!("{err:#}"))],
    }
}

/// Draws the key hints and any part failures.
fn draw_footer(frame: &mut Frame, area: Rect, state: &DetailState) {
    let mut spans = vec![Span::raw(
        "Esc: back  \u{2191}\u{2193}/j/k: scroll  1-3: trailer  p: poster  r: raw  R: reload  q: quit",
    )];
    if !state.is_complete() {
        spans.push(Span::styled(
            "  loading...",
            Style::default().fg(Color::Yellow),
        ));
    }
    for (label, failure) in state.failures() {
        spans.push(Span::styled(
            format!("  {label}: {failure}"),
            Style::default().fg(Color::Red),
        ));
    }

    let footer = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
