//! Movie detail view: core record, cast, and trailers joined for one id.

/// Detail state types.
pub mod state;
pub(crate) mod ui;

use crossterm::event::{KeyCode, KeyModifiers};
use moviedeck_api::tmdb::MovieDetails;

use crate::format::{fmt_rating, fmt_release_date, fmt_revenue};

pub use self::state::{
    CAST_DISPLAY_LIMIT, DetailPart, DetailState, DetailTicket, Slot, TRAILER_DISPLAY_LIMIT,
};

/// What the event loop should do after a detail key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailAction {
    /// Stay on the detail view.
    None,
    /// Exit the browser.
    Quit,
    /// Pop back to the previous route.
    Back,
    /// Open a URL in the system browser.
    OpenUrl(String),
    /// Reissue the three fetches.
    Reload,
}

/// Labeled summary lines for the rendered view and the `show` command.
#[must_use]
pub fn summary_fields(details: &MovieDetails, language: &str) -> Vec<(&'static str, String)> {
    let mut fields = vec![("Title", details.title.clone())];
    if let Some(original) = details
        .original_title
        .as_ref()
        .filter(|original| **original != details.title)
    {
        fields.push(("Original title", original.clone()));
    }
    fields.push((
        "Release date",
        fmt_release_date(details.release_date.as_deref(), language),
    ));
    fields.push((
        "Rating",
        format!(
            "{} ({} votes)",
            fmt_rating(details.vote_average),
            details.vote_count
        ),
    ));
    fields.push(("Popularity", format!("{:.1}", details.popularity)));
    fields.push(("Revenue", fmt_revenue(details.revenue, language)));
    if let Some(runtime) = details.runtime.filter(|minutes| *minutes > 0) {
        fields.push(("Runtime", format!("{runtime} min")));
    }
    if !details.genres.is_empty() {
        let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
        fields.push(("Genres", genres.join(", ")));
    }
    fields
}

/// Handles a key press on the detail view.
pub fn handle_key(
    state: &mut DetailState,
    key: KeyCode,
    modifiers: KeyModifiers,
    page_size: u16,
) -> DetailAction {
    match key {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => DetailAction::Quit,
        KeyCode::Char('q') => DetailAction::Quit,
        KeyCode::Esc | KeyCode::Backspace => DetailAction::Back,
        KeyCode::Char('R') => DetailAction::Reload,
        KeyCode::Char('r') => {
            state.toggle_raw();
            DetailAction::None
        }
        KeyCode::Char('p') => state
            .details()
            .and_then(MovieDetails::poster_url)
            .map_or(DetailAction::None, DetailAction::OpenUrl),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c
                .to_digit(10)
                .and_then(|digit| usize::try_from(digit).ok())
                .and_then(|digit| digit.checked_sub(1));
            index
                .and_then(|idx| state.displayed_trailers().get(idx))
                .map_or(DetailAction::None, |video| {
                    DetailAction::OpenUrl(video.embed_url())
                })
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.scroll_up(1);
            DetailAction::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.scroll_down(1);
            DetailAction::None
        }
        KeyCode::PageUp => {
            state.scroll_up(page_size);
            DetailAction::None
        }
        KeyCode::PageDown => {
            state.scroll_down(page_size);
            DetailAction::None
        }
        _ => DetailAction::None,
    }
}
