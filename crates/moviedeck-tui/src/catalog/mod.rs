//! Catalog view: filter tabs, search box, and a paginated result grid.

/// Catalog state types.
pub mod state;
pub(crate) mod ui;

use crossterm::event::{KeyCode, KeyModifiers};

pub use self::state::{CatalogRequest, CatalogState, CatalogTicket, InputMode, LoadState};

/// What the event loop should do after a catalog key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogAction {
    /// Stay on the catalog.
    None,
    /// Exit the browser.
    Quit,
    /// Open the detail route for a movie.
    Open(u64),
}

/// Handles a key press on the catalog.
pub fn handle_key(
    state: &mut CatalogState,
    key: KeyCode,
    modifiers: KeyModifiers,
    page_size: usize,
) -> CatalogAction {
    if modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
        return CatalogAction::Quit;
    }
    match state.input_mode {
        InputMode::Search => handle_search_input(state, key),
        InputMode::Normal => return handle_normal_input(state, key, page_size),
    }
    CatalogAction::None
}

/// Handles key input in search mode.
fn handle_search_input(state: &mut CatalogState, key: KeyCode) {
    match key {
        KeyCode::Esc => {
            state.clear_search();
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => state.search_pop(),
        KeyCode::Char(c) => state.search_push(c),
        _ => {}
    }
}

/// Handles key input in normal mode.
fn handle_normal_input(state: &mut CatalogState, key: KeyCode, page_size: usize) -> CatalogAction {
    match key {
        KeyCode::Char('q') => return CatalogAction::Quit,
        KeyCode::Enter => {
            if let Some(movie) = state.selected_movie() {
                return CatalogAction::Open(movie.id);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(),
        KeyCode::PageUp => state.rows_up(page_size),
        KeyCode::PageDown => state.rows_down(page_size),
        KeyCode::Left | KeyCode::Char('h') => state.previous_page(),
        KeyCode::Right | KeyCode::Char('l') => state.next_page(),
        KeyCode::Tab => state.next_filter(),
        KeyCode::BackTab => state.previous_filter(),
        KeyCode::Char('/') => state.input_mode = InputMode::Search,
        KeyCode::Esc => state.clear_search(),
        KeyCode::Char('r') => state.refresh(),
        _ => {}
    }
    CatalogAction::None
}
