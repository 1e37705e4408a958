//! Browser main loop: route stack, view dispatch, and fetch plumbing.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use moviedeck_api::tmdb::TmdbApi;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::catalog::{self, CatalogAction, CatalogState};
use crate::detail::{self, DetailAction, DetailState};
use crate::fetch::{Dispatcher, FetchEvent};
use crate::route::Route;

/// Upper bound on how long the loop waits for a fetch before polling keys.
const TICK: Duration = Duration::from_millis(50);

/// Browser state shared by both views.
struct App<A> {
    routes: Vec<Route>,
    catalog: CatalogState,
    detail: DetailState,
    dispatcher: Dispatcher<A>,
    language: String,
    status: Option<String>,
    page_size: u16,
}

impl<A: TmdbApi + Sync + 'static> App<A> {
    fn new(dispatcher: Dispatcher<A>, language: String, start: Route) -> Self {
        let mut routes = vec![Route::Catalog];
        if start != Route::Catalog {
            routes.push(start);
        }
        Self {
            routes,
            catalog: CatalogState::new(),
            detail: DetailState::default(),
            dispatcher,
            language,
            status: None,
            page_size: 10,
        }
    }

    fn route(&self) -> Route {
        self.routes.last().copied().unwrap_or_default()
    }

    /// Issues the fetches the active view's state calls for.
    fn sync(&mut self) {
        match self.route() {
            Route::Catalog => {
                if let Some(ticket) = self.catalog.sync() {
                    self.dispatcher.fetch_catalog(ticket);
                }
            }
            Route::Movie(movie_id) => {
                if let Some(ticket) = self.detail.open(movie_id) {
                    self.dispatcher.fetch_detail(ticket);
                }
            }
        }
    }

    fn handle_fetch(&mut self, event: FetchEvent) {
        match event {
            FetchEvent::Catalog { ticket, outcome } => {
                self.catalog.complete(&ticket, outcome);
            }
            FetchEvent::Detail { ticket, part } => {
                self.detail.apply(ticket, part);
            }
        }
    }

    /// Handles a key press. Returns `true` to exit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.status = None;
        match self.route() {
            Route::Catalog => {
                let page_size = usize::from(self.page_size.saturating_sub(4));
                match catalog::handle_key(&mut self.catalog, key.code, key.modifiers, page_size) {
                    CatalogAction::Quit => return true,
                    CatalogAction::Open(movie_id) => self.push(Route::Movie(movie_id)),
                    CatalogAction::None => {}
                }
            }
            Route::Movie(_) => {
                let page_size = self.page_size.saturating_sub(2);
                match detail::handle_key(&mut self.detail, key.code, key.modifiers, page_size) {
                    DetailAction::Quit => return true,
                    DetailAction::Back => self.back(),
                    DetailAction::OpenUrl(url) => self.open_url(&url),
                    DetailAction::Reload => {
                        if let Some(ticket) = self.detail.reload() {
                            self.dispatcher.fetch_detail(ticket);
                        }
                    }
                    DetailAction::None => {}
                }
            }
        }
        false
    }

    fn push(&mut self, route: Route) {
        tracing::debug!(%route, "navigating");
        self.routes.push(route);
    }

    fn back(&mut self) {
        if self.routes.len() > 1 {
            self.routes.pop();
        }
        tracing::debug!(route = %self.route(), "navigating back");
    }

    fn open_url(&mut self, url: &str) {
        match open::that(url) {
            Ok(()) => self.status = Some(format!("opened {url}")),
            Err(err) => {
                tracing::warn!(url, error = %err, "failed to open URL");
                self.status = Some(format!("failed to open {url}: {err}"));
            }
        }
    }

    #[allow(clippy::indexing_slicing)]
    fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(8)])
            .split(frame.area());

        let route = self.route();
        let header = Line::from(vec![
            Span::styled(
                " moviedeck ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" {route}  [{}]", self.language)),
        ]);
        frame.render_widget(Paragraph::new(header), chunks[0]);

        self.page_size = match route {
            Route::Catalog => {
                catalog::ui::draw(frame, chunks[1], &mut self.catalog, self.status.as_deref())
            }
            Route::Movie(_) => detail::ui::draw(frame, chunks[1], &mut self.detail, &self.language),
        };
    }
}

/// Runs the interactive browser starting at `start`.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails. Fetch
/// failures are shown in the views and never end the session.
pub async fn run_browser<A: TmdbApi + Sync + 'static>(
    api: Arc<A>,
    language: String,
    start: Route,
) -> Result<()> {
    let (dispatcher, mut rx) = Dispatcher::new(api);
    let mut app = App::new(dispatcher, language, start);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut app, &mut rx).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
async fn run_event_loop<A: TmdbApi + Sync + 'static>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<A>,
    rx: &mut UnboundedReceiver<FetchEvent>,
) -> Result<()> {
    loop {
        app.sync();

        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw TUI")?;

        tokio::select! {
            Some(event) = rx.recv() => app.handle_fetch(event),
            () = tokio::time::sleep(TICK) => {}
        }

        while event::poll(Duration::ZERO).context("failed to poll events")? {
            if let Event::Key(key) = event::read().context("failed to read event")?
                && key.kind == KeyEventKind::Press
                && app.handle_key(key)
            {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::catalog::LoadState;
    use crate::fetch::testing::FakeApi;

    fn app(api: &Arc<FakeApi>, start: Route) -> (App<FakeApi>, UnboundedReceiver<FetchEvent>) {
        let (dispatcher, rx) = Dispatcher::new(Arc::clone(api));
        (App::new(dispatcher, String::from("pt-BR"), start), rx)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// Syncs and applies `count` fetch events.
    async fn settle(app: &mut App<FakeApi>, rx: &mut UnboundedReceiver<FetchEvent>, count: usize) {
        app.sync();
        for _ in 0..count {
            let event = rx.recv().await.unwrap();
            app.handle_fetch(event);
        }
    }

    fn render(app: &mut App<FakeApi>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[tokio::test]
    async fn test_catalog_loads_now_playing_on_start() {
        // Arrange
        let api = Arc::new(FakeApi::default());
        let (mut app, mut rx) = app(&api, Route::Catalog);

        // Act
        settle(&mut app, &mut rx, 1).await;

        // Assert
        assert_eq!(api.calls(), vec![String::from("now-playing:1")]);
        assert_eq!(app.catalog.results().len(), 20);
        assert!(render(&mut app).contains("Page 1 of 500"));
    }

    #[tokio::test]
    async fn test_filter_change_issues_single_fetch() {
        // Arrange
        let api = Arc::new(FakeApi::default());
        let (mut app, mut rx) = app(&api, Route::Catalog);
        settle(&mut app, &mut rx, 1).await;
        app.handle_key(key(KeyCode::Right));
        settle(&mut app, &mut rx, 1).await;

        // Act
        app.handle_key(key(KeyCode::Tab));
        settle(&mut app, &mut rx, 1).await;
        app.sync();

        // Assert
        assert_eq!(
            api.calls(),
            vec![
                String::from("now-playing:1"),
                String::from("now-playing:2"),
                String::from("popular:1"),
            ]
        );
    }

    #[tokio::test]
    async fn test_movie_route_issues_three_fetches() {
        // Arrange
        let api = Arc::new(FakeApi::default());
        let (mut app, mut rx) = app(&api, "/movie/27205".parse().unwrap());

        // Act
        settle(&mut app, &mut rx, 3).await;

        // Assert
        let mut calls = api.calls();
        calls.sort();
        assert_eq!(
            calls,
            vec![
                String::from("credits:27205"),
                String::from("movie:27205"),
                String::from("videos:27205"),
            ]
        );
        assert!(app.detail.is_complete());
        assert_eq!(app.detail.displayed_cast().len(), 10);
        assert_eq!(app.detail.displayed_trailers().len(), 3);
        let screen = render(&mut app);
        assert!(screen.contains("A Origem"));
        assert!(screen.contains("R$ 839.030.630"));
    }

    #[tokio::test]
    async fn test_open_and_back_keeps_catalog_state() {
        // Arrange
        let api = Arc::new(FakeApi::default());
        let (mut app, mut rx) = app(&api, Route::Catalog);
        settle(&mut app, &mut rx, 1).await;
        app.handle_key(key(KeyCode::Down));
        let selected = app.catalog.selected_movie().unwrap().id;

        // Act
        app.handle_key(key(KeyCode::Enter));
        settle(&mut app, &mut rx, 3).await;
        let on_detail = app.route();
        app.handle_key(key(KeyCode::Esc));
        app.sync();

        // Assert
        assert_eq!(on_detail, Route::Movie(selected));
        assert_eq!(app.route(), Route::Catalog);
        assert_eq!(app.catalog.cursor(), 1);
        assert_eq!(app.catalog.load_state(), &LoadState::Ready);
        assert_eq!(api.calls().len(), 4, "no catalog refetch after back");
    }

    #[tokio::test]
    async fn test_failed_catalog_fetch_is_shown() {
        // Arrange
        let api = Arc::new(FakeApi {
            fail: true,
            ..FakeApi::default()
        });
        let (mut app, mut rx) = app(&api, Route::Catalog);

        // Act
        settle(&mut app, &mut rx, 1).await;

        // Assert
        assert!(matches!(app.catalog.load_state(), LoadState::Failed(_)));
        assert!(render(&mut app).contains("connection refused"));
    }

    #[tokio::test]
    async fn test_detail_page_down_keeps_last_trailer_visible() {
        // Arrange
        let api = Arc::new(FakeApi::default());
        let (mut app, mut rx) = app(&api, Route::Movie(27_205));
        settle(&mut app, &mut rx, 3).await;
        render(&mut app);

        // Act
        for _ in 0..20 {
            app.handle_key(key(KeyCode::PageDown));
        }
        let screen = render(&mut app);

        // Assert
        let last = app.detail.displayed_trailers().last().unwrap().name.clone();
        assert!(screen.contains(&last));
        assert!(app.detail.scroll < 40);
    }

    #[tokio::test]
    async fn test_quit_from_detail() {
        // Arrange
        let api = Arc::new(FakeApi::default());
        let (mut app, _rx) = app(&api, Route::Movie(27_205));

        // Act & Assert
        assert!(app.handle_key(key(KeyCode::Char('q'))));
    }
}
