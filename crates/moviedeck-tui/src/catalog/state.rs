//! Catalog view state: filter, search, and pagination driving one request
//! at a time.

use moviedeck_api::tmdb::{MAX_PAGE, MovieList, MoviePage, MovieSummary, ResourcePath};
use ratatui::widgets::TableState;

use crate::fetch::{FetchFailure, FetchOutcome};

/// Request descriptor derived from the catalog state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRequest {
    /// A category list page.
    List {
        /// Category.
        list: MovieList,
        /// 1-based page.
        page: u32,
    },
    /// A search results page.
    Search {
        /// Trimmed, non-empty query.
        query: String,
        /// 1-based page.
        page: u32,
    },
}

impl CatalogRequest {
    /// Returns the requested page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        match self {
            Self::List { page, .. } | Self::Search { page, .. } => *page,
        }
    }

    /// Returns `true` when both requests page through the same result set.
    #[must_use]
    pub fn same_source(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::List { list: a, .. }, Self::List { list: b, .. }) => a == b,
            (Self::Search { query: a, .. }, Self::Search { query: b, .. }) => a == b,
            _ => false,
        }
    }

    /// Returns the resource this request targets.
    #[must_use]
    pub const fn resource(&self) -> ResourcePath {
        match self {
            Self::List { list, .. } => ResourcePath::List(*list),
            Self::Search { .. } => ResourcePath::SearchMovie,
        }
    }
}

/// A catalog request tagged with the epoch it was issued in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTicket {
    /// Epoch at issue time; only the latest epoch is applied.
    pub epoch: u64,
    /// The request to run.
    pub request: CatalogRequest,
}

/// Load state of the result grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The latest request succeeded (results may be empty).
    Ready,
    /// The latest request failed; results are empty.
    Failed(FetchFailure),
}

/// Input mode for the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    #[default]
    Normal,
    /// Search text input mode.
    Search,
}

/// State for the catalog view.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogState {
    filter: MovieList,
    search: String,
    page: u32,
    total_pages: Option<u32>,
    /// Request whose response reported `total_pages`.
    paged: Option<CatalogRequest>,
    total_results: u32,
    results: Vec<MovieSummary>,
    load_state: LoadState,
    epoch: u64,
    issued: Option<CatalogRequest>,
    /// Table state for the result grid (handles selection and scroll).
    pub table_state: TableState,
    /// Current input mode.
    pub input_mode: InputMode,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            filter: MovieList::default(),
            search: String::new(),
            page: 1,
            total_pages: None,
            paged: None,
            total_results: 0,
            results: Vec::new(),
            load_state: LoadState::Idle,
            epoch: 0,
            issued: None,
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
        }
    }
}

impl CatalogState {
    /// Creates a catalog on the default filter, page 1, no search.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Active filter.
    #[must_use]
    pub const fn filter(&self) -> MovieList {
        self.filter
    }

    /// Raw search text as typed.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Returns `true` when the search text drives the request.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        !self.search.trim().is_empty()
    }

    /// Current 1-based page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Last reachable page, once a response for the current list or query
    /// has been applied.
    ///
    /// Clamped to `1..=MAX_PAGE`.
    #[must_use]
    pub fn last_page(&self) -> Option<u32> {
        let paged = self.paged.as_ref()?;
        if !paged.same_source(&self.request()) {
            return None;
        }
        self.total_pages.map(|total| total.clamp(1, MAX_PAGE))
    }

    /// Total result count reported by the last response.
    #[must_use]
    pub const fn total_results(&self) -> u32 {
        self.total_results
    }

    /// Movies of the current page.
    #[must_use]
    pub fn results(&self) -> &[MovieSummary] {
        &self.results
    }

    /// Current load state.
    #[must_use]
    pub const fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Returns `true` while a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.load_state, LoadState::Loading)
    }

    /// Current request epoch.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Derives the request for the current state.
    ///
    /// A non-empty search always wins over the filter.
    #[must_use]
    pub fn request(&self) -> CatalogRequest {
        let query = self.search.trim();
        if query.is_empty() {
            CatalogRequest::List {
                list: self.filter,
                page: self.page,
            }
        } else {
            CatalogRequest::Search {
                query: String::from(query),
                page: self.page,
            }
        }
    }

    /// Issues a ticket when the derived request differs from the last
    /// issued one.
    ///
    /// Several state changes between two calls collapse into one request.
    pub fn sync(&mut self) -> Option<CatalogTicket> {
        let request = self.request();
        if self.issued.as_ref() == Some(&request) {
            return None;
        }
        self.epoch = self.epoch.wrapping_add(1);
        self.issued = Some(request.clone());
        self.load_state = LoadState::Loading;
        Some(CatalogTicket {
            epoch: self.epoch,
            request,
        })
    }

    /// Forces the next `sync` to reissue the current request.
    pub fn refresh(&mut self) {
        self.issued = None;
    }

    /// Applies a response. Returns `false` when the ticket is stale.
    pub fn complete(&mut self, ticket: &CatalogTicket, outcome: FetchOutcome<MoviePage>) -> bool {
        if ticket.epoch != self.epoch {
            tracing::debug!(
                stale_epoch = ticket.epoch,
                current_epoch = self.epoch,
                "discarding stale catalog response"
            );
            return false;
        }

        match outcome {
            Ok(page) => {
                self.results = page.results;
                self.total_pages = Some(page.total_pages);
                self.paged = Some(ticket.request.clone());
                self.total_results = page.total_results;
                self.load_state = LoadState::Ready;
                if let Some(last) = self.last_page()
                    && self.page > last
                {
                    self.page = last;
                }
            }
            Err(failure) => {
                tracing::warn!(reason = %failure, request = ?ticket.request, "failed to load movies");
                self.results.clear();
                self.total_pages = None;
                self.paged = None;
                self.total_results = 0;
                self.load_state = LoadState::Failed(failure);
            }
        }
        self.select_first_row();
        true
    }

    /// Switches the filter. Resets the page to 1 when it changes.
    pub fn set_filter(&mut self, filter: MovieList) {
        if self.filter != filter {
            self.filter = filter;
            self.reset_paging();
        }
    }

    /// Cycles to the next filter.
    pub fn next_filter(&mut self) {
        self.set_filter(self.filter.next());
    }

    /// Cycles to the previous filter.
    pub fn previous_filter(&mut self) {
        self.set_filter(self.filter.previous());
    }

    /// Replaces the search text. Resets the page to 1 when it changes.
    pub fn set_search(&mut self, search: String) {
        if self.search != search {
            self.search = search;
            self.reset_paging();
        }
    }

    /// Appends a character to the search text.
    pub fn search_push(&mut self, ch: char) {
        let mut search = self.search.clone();
        search.push(ch);
        self.set_search(search);
    }

    /// Removes the last character from the search text.
    pub fn search_pop(&mut self) {
        let mut search = self.search.clone();
        search.pop();
        self.set_search(search);
    }

    /// Clears the search text.
    pub fn clear_search(&mut self) {
        self.set_search(String::new());
    }

    /// Returns `true` when a next page exists.
    #[must_use]
    pub fn can_next(&self) -> bool {
        self.last_page().is_some_and(|last| self.page < last)
    }

    /// Returns `true` when a previous page exists.
    #[must_use]
    pub const fn can_previous(&self) -> bool {
        self.page > 1
    }

    /// Moves to the next page, if any.
    pub fn next_page(&mut self) {
        if self.can_next() {
            self.page = self.page.saturating_add(1);
        }
    }

    /// Moves to the previous page, if any.
    pub fn previous_page(&mut self) {
        if self.can_previous() {
            self.page = self.page.saturating_sub(1);
        }
    }

    /// Returns the row cursor position.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    /// Returns the movie under the cursor (if any).
    #[must_use]
    pub fn selected_movie(&self) -> Option<&MovieSummary> {
        self.table_state
            .selected()
            .and_then(|idx| self.results.get(idx))
    }

    /// Moves cursor up.
    pub fn move_up(&mut self) {
        let current = self.cursor();
        if current > 0 {
            self.table_state.select(Some(current.saturating_sub(1)));
        }
    }

    /// Moves cursor down.
    pub fn move_down(&mut self) {
        let next = self.cursor().saturating_add(1);
        if next < self.results.len() {
            self.table_state.select(Some(next));
        }
    }

    /// Scrolls up by a page of rows.
    pub fn rows_up(&mut self, page_size: usize) {
        if !self.results.is_empty() {
            let current = self.cursor();
            self.table_state
                .select(Some(current.saturating_sub(page_size)));
        }
    }

    /// Scrolls down by a page of rows.
    pub fn rows_down(&mut self, page_size: usize) {
        if !self.results.is_empty() {
            let max = self.results.len().saturating_sub(1);
            let current = self.cursor();
            self.table_state
                .select(Some(current.saturating_add(page_size).min(max)));
        }
    }

    fn reset_paging(&mut self) {
        self.page = 1;
    }

    fn select_first_row(&mut self) {
        if self.results.is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(0));
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};

    use super::*;
    use crate::fetch::testing::{batman_page, empty_page, now_playing_page};

    /// Issues the pending request and applies `page` to it.
    fn load(state: &mut CatalogState, page: MoviePage) -> CatalogTicket {
        let ticket = state.sync().unwrap();
        assert!(state.complete(&ticket, Ok(page)));
        ticket
    }

    #[test]
    fn test_initial_request_is_now_playing_page_1() {
        // Arrange
        let mut state = CatalogState::new();

        // Act
        let ticket = state.sync().unwrap();

        // Assert
        assert_eq!(
            ticket.request,
            CatalogRequest::List {
                list: MovieList::NowPlaying,
                page: 1
            }
        );
        assert!(state.is_loading());
        assert_eq!(ticket.request.resource().path(), "movie/now_playing");
    }

    #[test]
    fn test_first_page_enables_next_only() {
        // Arrange
        let mut state = CatalogState::new();

        // Act
        load(&mut state, now_playing_page());

        // Assert
        assert_eq!(state.results().len(), 20);
        assert_eq!(state.load_state(), &LoadState::Ready);
        assert!(!state.can_previous());
        assert!(state.can_next());
        assert_eq!(state.selected_movie().unwrap().id, state.results()[0].id);
    }

    #[test]
    fn test_every_filter_maps_to_its_endpoint() {
        // Arrange
        let mut state = CatalogState::new();

        for list in MovieList::ALL {
            // Act
            state.set_filter(list);

            // Assert
            assert_eq!(state.request(), CatalogRequest::List { list, page: 1 });
        }
    }

    #[test]
    fn test_search_supersedes_filter() {
        // Arrange
        let mut state = CatalogState::new();
        state.set_filter(MovieList::Popular);
        load(&mut state, now_playing_page());

        // Act
        for ch in "batman".chars() {
            state.search_push(ch);
        }
        let ticket = state.sync().unwrap();

        // Assert
        assert_eq!(
            ticket.request,
            CatalogRequest::Search {
                query: String::from("batman"),
                page: 1
            }
        );
        assert_eq!(ticket.request.resource().path(), "search/movie");
    }

    #[test]
    fn test_whitespace_search_falls_back_to_filter() {
        // Arrange
        let mut state = CatalogState::new();

        // Act
        state.set_search(String::from("   "));

        // Assert
        assert!(!state.is_searching());
        assert_eq!(
            state.request(),
            CatalogRequest::List {
                list: MovieList::NowPlaying,
                page: 1
            }
        );
    }

    #[test]
    fn test_filter_change_resets_page_with_single_request() {
        // Arrange
        let mut state = CatalogState::new();
        load(&mut state, now_playing_page());
        state.next_page();
        state.next_page();
        load(&mut state, now_playing_page());
        assert_eq!(state.page(), 3);

        // Act
        state.set_filter(MovieList::TopRated);
        let ticket = state.sync().unwrap();

        // Assert
        assert_eq!(
            ticket.request,
            CatalogRequest::List {
                list: MovieList::TopRated,
                page: 1
            }
        );
        assert!(state.sync().is_none(), "one request per logical change");
    }

    #[test]
    fn test_search_change_resets_page() {
        // Arrange
        let mut state = CatalogState::new();
        state.set_search(String::from("batman"));
        load(&mut state, batman_page());
        state.next_page();
        assert_eq!(state.page(), 2);

        // Act
        state.search_pop();

        // Assert
        assert_eq!(state.page(), 1);
        assert_eq!(
            state.sync().unwrap().request,
            CatalogRequest::Search {
                query: String::from("batma"),
                page: 1
            }
        );
    }

    #[test]
    fn test_filter_change_during_search_keeps_known_total() {
        // Arrange
        let mut state = CatalogState::new();
        state.set_search(String::from("batman"));
        load(&mut state, batman_page());

        // Act
        state.set_filter(MovieList::Popular);

        // Assert
        assert!(state.sync().is_none());
        assert_eq!(state.last_page(), Some(3));
        assert!(state.can_next());
    }

    #[test]
    fn test_whitespace_edits_keep_known_total() {
        // Arrange
        let mut state = CatalogState::new();
        load(&mut state, now_playing_page());
        let mut searching = CatalogState::new();
        searching.set_search(String::from("batman"));
        load(&mut searching, batman_page());

        // Act
        state.search_push(' ');
        searching.search_push(' ');

        // Assert
        assert!(state.sync().is_none());
        assert_eq!(state.last_page(), Some(500));
        assert!(state.can_next());
        assert!(searching.sync().is_none());
        assert_eq!(searching.last_page(), Some(3));
        assert!(searching.can_next());
    }

    #[test]
    fn test_new_source_hides_previous_total_until_loaded() {
        // Arrange
        let mut state = CatalogState::new();
        load(&mut state, now_playing_page());

        // Act
        state.set_search(String::from("batman"));

        // Assert
        assert_eq!(state.last_page(), None);
        assert!(!state.can_next());
        load(&mut state, batman_page());
        assert_eq!(state.last_page(), Some(3));
    }

    #[test]
    fn test_unchanged_filter_does_not_refetch() {
        // Arrange
        let mut state = CatalogState::new();
        load(&mut state, now_playing_page());

        // Act
        state.set_filter(MovieList::NowPlaying);

        // Assert
        assert!(state.sync().is_none());
    }

    #[test]
    fn test_paging_stays_within_bounds() {
        // Arrange
        let mut state = CatalogState::new();
        state.set_search(String::from("batman"));

        // Act & Assert: unknown total keeps next disabled
        state.next_page();
        assert_eq!(state.page(), 1);

        load(&mut state, batman_page());
        state.previous_page();
        assert_eq!(state.page(), 1);

        for _ in 0..10 {
            state.next_page();
        }
        assert_eq!(state.page(), 3);
        assert!(!state.can_next());
        assert!(state.can_previous());
    }

    #[test]
    fn test_total_pages_clamped_to_api_limit() {
        // Arrange
        let mut state = CatalogState::new();
        let mut page = now_playing_page();
        page.total_pages = 42_000;

        // Act
        load(&mut state, page);

        // Assert
        assert_eq!(state.last_page(), Some(MAX_PAGE));
    }

    #[test]
    fn test_empty_results_keep_page_one_valid() {
        // Arrange
        let mut state = CatalogState::new();
        state.set_search(String::from("zzzzzz"));

        // Act
        load(&mut state, empty_page());

        // Assert
        assert_eq!(state.load_state(), &LoadState::Ready);
        assert!(state.results().is_empty());
        assert_eq!(state.page(), 1);
        assert!(!state.can_next());
        assert!(state.selected_movie().is_none());
    }

    #[test]
    fn test_page_clamped_when_total_shrinks() {
        // Arrange
        let mut state = CatalogState::new();
        load(&mut state, now_playing_page());
        state.next_page();
        state.next_page();
        state.next_page();
        let ticket = state.sync().unwrap();
        let mut shrunk = now_playing_page();
        shrunk.total_pages = 2;

        // Act
        state.complete(&ticket, Ok(shrunk));

        // Assert
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        // Arrange
        let mut state = CatalogState::new();
        let old = state.sync().unwrap();
        state.set_filter(MovieList::Popular);
        let _ = state.sync().unwrap();
        state.search_push('x');
        let current = state.sync().unwrap();

        // Act
        let applied_old = state.complete(&old, Ok(now_playing_page()));

        // Assert
        assert!(!applied_old);
        assert!(state.is_loading());
        assert!(state.results().is_empty());
        assert!(state.complete(&current, Ok(batman_page())));
        assert_eq!(state.results().len(), 5);
    }

    #[test]
    fn test_failure_is_distinct_from_empty_results() {
        // Arrange
        let mut state = CatalogState::new();
        load(&mut state, now_playing_page());
        state.next_page();
        let ticket = state.sync().unwrap();

        // Act
        state.complete(&ticket, Err(FetchFailure::new("connection refused")));

        // Assert
        assert_eq!(
            state.load_state(),
            &LoadState::Failed(FetchFailure::new("connection refused"))
        );
        assert!(!state.is_loading());
        assert!(state.results().is_empty());
        assert!(!state.can_next());
    }

    #[test]
    fn test_failure_is_logged_as_warning() {
        // Arrange
        let mut state = CatalogState::new();
        let ticket = state.sync().unwrap();
        let (subscriber, handle) = subscriber::mock()
            .event(
                expect::event()
                    .at_level(tracing::Level::WARN)
                    .with_fields(expect::msg("failed to load movies")),
            )
            .only()
            .run_with_handle();

        // Act
        with_default(subscriber, || {
            state.complete(&ticket, Err(FetchFailure::new("timeout")));
        });

        // Assert
        handle.assert_finished();
    }

    #[test]
    fn test_refresh_reissues_same_request() {
        // Arrange
        let mut state = CatalogState::new();
        let first = load(&mut state, now_playing_page());

        // Act
        state.refresh();
        let second = state.sync().unwrap();

        // Assert
        assert_eq!(second.request, first.request);
        assert!(second.epoch > first.epoch);
    }

    #[test]
    fn test_cursor_navigation() {
        // Arrange
        let mut state = CatalogState::new();
        load(&mut state, batman_page());

        // Act & Assert
        state.move_up();
        assert_eq!(state.cursor(), 0);
        state.move_down();
        assert_eq!(state.cursor(), 1);
        state.rows_down(10);
        assert_eq!(state.cursor(), 4);
        state.move_down();
        assert_eq!(state.cursor(), 4);
        state.rows_up(10);
        assert_eq!(state.cursor(), 0);
    }
}
