//! Fetch dispatch: runs API calls as tokio tasks and reports outcomes
//! back to the UI loop through an unbounded channel.

use std::fmt;
use std::sync::Arc;

use moviedeck_api::tmdb::{MoviePage, SearchMovieParams, TmdbApi};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::AbortHandle;

use crate::catalog::{CatalogRequest, CatalogTicket};
use crate::detail::{DetailPart, DetailTicket};

/// Why a fetch produced no data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// Human-readable cause, including the error chain.
    pub reason: String,
}

impl FetchFailure {
    /// Creates a failure with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<anyhow::Error> for FetchFailure {
    fn from(err: anyhow::Error) -> Self {
        Self::new(format!("{err:#}"))
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

/// Result of a single fetch as seen by the views.
pub type FetchOutcome<T> = Result<T, FetchFailure>;

/// A completed fetch, tagged with the ticket it was issued for.
#[derive(Debug)]
pub enum FetchEvent {
    /// A catalog page arrived (or failed).
    Catalog {
        /// Ticket the request was issued with.
        ticket: CatalogTicket,
        /// Fetched page or failure.
        outcome: FetchOutcome<MoviePage>,
    },
    /// One of the three detail parts arrived (or failed).
    Detail {
        /// Ticket the request was issued with.
        ticket: DetailTicket,
        /// The part that completed.
        part: DetailPart,
    },
}

/// Spawns fetch tasks and aborts the ones a newer ticket supersedes.
pub struct Dispatcher<A> {
    api: Arc<A>,
    tx: UnboundedSender<FetchEvent>,
    catalog_task: Option<AbortHandle>,
    detail_tasks: Vec<AbortHandle>,
}

impl<A> fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("catalog_in_flight", &self.catalog_task.is_some())
            .field("detail_in_flight", &self.detail_tasks.len())
            .finish_non_exhaustive()
    }
}

/// Sends an event, ignoring a closed receiver (the UI is shutting down).
fn deliver(tx: &UnboundedSender<FetchEvent>, event: FetchEvent) {
    if tx.send(event).is_err() {
        tracing::debug!("fetch receiver closed, dropping result");
    }
}

impl<A: TmdbApi + Sync + 'static> Dispatcher<A> {
    /// Creates a dispatcher and the receiver its events arrive on.
    #[must_use]
    pub fn new(api: Arc<A>) -> (Self, UnboundedReceiver<FetchEvent>) {
        let (tx, rx) = unbounded_channel();
        let dispatcher = Self {
            api,
            tx,
            catalog_task: None,
            detail_tasks: Vec::new(),
        };
        (dispatcher, rx)
    }

    /// Issues the catalog request carried by `ticket`.
    ///
    /// Any catalog fetch still in flight is aborted.
    pub fn fetch_catalog(&mut self, ticket: CatalogTicket) {
        if let Some(previous) = self.catalog_task.take() {
            previous.abort();
        }

        tracing::debug!(epoch = ticket.epoch, request = ?ticket.request, "dispatching catalog fetch");

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let result = match &ticket.request {
                CatalogRequest::List { list, page } => api.movie_list(*list, *page).await,
                CatalogRequest::Search { query, page } => {
                    let params = SearchMovieParams::new(query.clone()).page(*page);
                    api.search_movie(&params).await
                }
            };
            let outcome = result.map_err(FetchFailure::from);
            deliver(&tx, FetchEvent::Catalog { ticket, outcome });
        });
        self.catalog_task = Some(handle.abort_handle());
    }

    /// Issues the core, credits, and videos requests for `ticket`
    /// concurrently.
    ///
    /// Detail fetches still in flight for a previous ticket are aborted.
    pub fn fetch_detail(&mut self, ticket: DetailTicket) {
        for previous in self.detail_tasks.drain(..) {
            previous.abort();
        }

        tracing::debug!(movie_id = ticket.movie_id, epoch = ticket.epoch, "dispatching detail fetches");
        let movie_id = ticket.movie_id;

        let (api, tx) = (Arc::clone(&self.api), self.tx.clone());
        let core = tokio::spawn(async move {
            let outcome = api
                .movie_details(movie_id)
                .await
                .map(Box::new)
                .map_err(FetchFailure::from);
            let part = DetailPart::Core(outcome);
            deliver(&tx, FetchEvent::Detail { ticket, part });
        });

        let (api, tx) = (Arc::clone(&self.api), self.tx.clone());
        let credits = tokio::spawn(async move {
            let outcome = api
                .movie_credits(movie_id)
                .await
                .map(|credits| credits.cast)
                .map_err(FetchFailure::from);
            let part = DetailPart::Cast(outcome);
            deliver(&tx, FetchEvent::Detail { ticket, part });
        });

        let (api, tx) = (Arc::clone(&self.api), self.tx.clone());
        let videos = tokio::spawn(async move {
            let outcome = api
                .movie_videos(movie_id)
                .await
                .map(|videos| videos.results)
                .map_err(FetchFailure::from);
            let part = DetailPart::Trailers(outcome);
            deliver(&tx, FetchEvent::Detail { ticket, part });
        });

        self.detail_tasks = vec![
            core.abort_handle(),
            credits.abort_handle(),
            videos.abort_handle(),
        ];
    }
}
