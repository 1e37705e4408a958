//! TUI rendering logic for the catalog.

use moviedeck_api::tmdb::MovieList;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, Tabs, Wrap};

use super::state::{CatalogState, InputMode, LoadState};
use crate::format::{fmt_rating, fmt_thousands, release_year};

/// Draws the catalog UI. Returns the result grid height for page size calculation.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, area: Rect, state: &mut CatalogState, status: Option<&str>) -> u16 {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search + filters
            Constraint::Min(5),    // results
            Constraint::Length(3), // footer
        ])
        .split(area);

    draw_header(frame, chunks[0], state);
    draw_results(frame, chunks[1], state);
    draw_footer(frame, chunks[2], state, status);

    chunks[1].height
}

/// Draws the search box and the filter tabs.
#[allow(clippy::indexing_slicing)]
fn draw_header(frame: &mut Frame, area: Rect, state: &CatalogState) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let search_style = if state.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(state.search().to_owned())
        .style(search_style)
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(search, header_chunks[0]);

    // Filters are inactive while a search drives the grid.
    let tab_style = if state.is_searching() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    let selected = MovieList::ALL
        .iter()
        .position(|list| *list == state.filter())
        .unwrap_or(0);
    let tabs = Tabs::new(MovieList::ALL.iter().map(|list| list.label()))
        .select(selected)
        .style(tab_style)
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL).title(" Filter: Tab "));
    frame.render_widget(tabs, header_chunks[1]);
}

/// Draws the result grid, or the loading/failure/empty message in its place.
fn draw_results(frame: &mut Frame, area: Rect, state: &mut CatalogState) {
    let title = if state.is_searching() {
        format!(" Search: {} ", state.search().trim())
    } else {
        format!(" {} ", state.filter().label())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Cyan));

    let message = match state.load_state() {
        LoadState::Idle | LoadState::Loading => Some(Line::from("Loading...")),
        LoadState::Failed(failure) => Some(Line::from(vec![
            Span::styled("Failed to load movies: ", Style::default().fg(Color::Red)),
            Span::raw(failure.reason.clone()),
            Span::raw("  (r: retry)"),
        ])),
        LoadState::Ready if state.results().is_empty() => Some(Line::from("No movies found.")),
        LoadState::Ready => None,
    };
    if let Some(message) = message {
        let paragraph = Paragraph::new(message)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec!["Title", "Year", "Rating", "Votes", "ID"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = state
        .results()
        .iter()
        .map(|movie| {
            let style = if movie.poster_path.is_some() {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Row::new(vec![
                movie.title.clone(),
                release_year(movie.release_date.as_deref())
                    .map_or_else(|| String::from("--"), |y| y.to_string()),
                fmt_rating(movie.vote_average),
                fmt_thousands(u64::from(movie.vote_count), ','),
                movie.id.to_string(),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(20),    // Title
        Constraint::Length(6),  // Year
        Constraint::Length(7),  // Rating
        Constraint::Length(9),  // Votes
        Constraint::Length(10), // ID
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

/// Draws the pager and key hints.
fn draw_footer(frame: &mut Frame, area: Rect, state: &CatalogState, status: Option<&str>) {
    let enabled = Style::default().fg(Color::Cyan);
    let disabled = Style::default().fg(Color::DarkGray);

    let total = state
        .last_page()
        .map_or_else(|| String::from("?"), |last| last.to_string());
    let mut spans = vec![
        Span::styled(
            "\u{2190} Previous",
            if state.can_previous() { enabled } else { disabled },
        ),
        Span::raw(format!("  Page {} of {total}  ", state.page())),
        Span::styled(
            "Next \u{2192}",
            if state.can_next() { enabled } else { disabled },
        ),
    ];

    match state.input_mode {
        InputMode::Search => {
            spans.push(Span::raw("  |  Type to search | Esc: clear | Enter: done"));
        }
        InputMode::Normal => spans.push(Span::raw(
            "  |  \u{2191}\u{2193}/j/k: move  Enter: open  /: search  Tab: filter  r: reload  q: quit",
        )),
    }

    if let Some(status) = status {
        spans.push(Span::styled(
            format!("  {status}"),
            Style::default().fg(Color::Yellow),
        ));
    }

    let footer = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
