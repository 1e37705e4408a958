//! Detail view state: joins the core record, cast, and trailers for one
//! movie, keyed by id and epoch.

use moviedeck_api::tmdb::{CastMember, MovieAggregate, MovieDetails, Video};

use crate::fetch::{FetchFailure, FetchOutcome};

/// Cast entries shown on the detail view.
pub const CAST_DISPLAY_LIMIT: usize = 10;

/// Trailers shown on the detail view.
pub const TRAILER_DISPLAY_LIMIT: usize = 3;

/// Identifies the detail fetches issued for one movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailTicket {
    /// Movie the fetches target.
    pub movie_id: u64,
    /// Epoch at issue time.
    pub epoch: u64,
}

/// One completed detail fetch.
#[derive(Debug)]
pub enum DetailPart {
    /// `movie/{id}`.
    Core(FetchOutcome<Box<MovieDetails>>),
    /// `movie/{id}/credits`.
    Cast(FetchOutcome<Vec<CastMember>>),
    /// `movie/{id}/videos`.
    Trailers(FetchOutcome<Vec<Video>>),
}

/// Resolution of a single part.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Slot<T> {
    /// Not arrived yet.
    #[default]
    Pending,
    /// Arrived.
    Loaded(T),
    /// Fetch failed.
    Failed(FetchFailure),
}

impl<T> Slot<T> {
    const fn is_resolved(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    const fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            Self::Pending | Self::Failed(_) => None,
        }
    }

    const fn failure(&self) -> Option<&FetchFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            Self::Pending | Self::Loaded(_) => None,
        }
    }
}

impl<T> From<FetchOutcome<T>> for Slot<T> {
    fn from(outcome: FetchOutcome<T>) -> Self {
        match outcome {
            Ok(value) => Self::Loaded(value),
            Err(failure) => Self::Failed(failure),
        }
    }
}

/// State for the detail view.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct DetailState {
    movie_id: Option<u64>,
    epoch: u64,
    core: Slot<Box<MovieDetails>>,
    cast: Slot<Vec<CastMember>>,
    trailers: Slot<Vec<Video>>,
    /// Show the merged raw record instead of the rendered view.
    pub show_raw: bool,
    /// Vertical scroll offset.
    pub scroll: u16,
    max_scroll: u16,
}

impl DetailState {
    /// Movie currently shown.
    #[must_use]
    pub const fn movie_id(&self) -> Option<u64> {
        self.movie_id
    }

    /// Switches to `movie_id`. Returns a ticket when fetches must be issued.
    ///
    /// Re-opening the movie already shown is a no-op.
    pub fn open(&mut self, movie_id: u64) -> Option<DetailTicket> {
        if self.movie_id == Some(movie_id) {
            return None;
        }
        self.movie_id = Some(movie_id);
        self.show_raw = false;
        Some(self.reset())
    }

    /// Reissues the fetches for the current movie.
    pub fn reload(&mut self) -> Option<DetailTicket> {
        self.movie_id?;
        Some(self.reset())
    }

    fn reset(&mut self) -> DetailTicket {
        self.epoch = self.epoch.wrapping_add(1);
        self.core = Slot::Pending;
        self.cast = Slot::Pending;
        self.trailers = Slot::Pending;
        self.scroll = 0;
        DetailTicket {
            movie_id: self.movie_id.unwrap_or_default(),
            epoch: self.epoch,
        }
    }

    /// Returns `true` when `ticket` targets the movie and epoch shown now.
    #[must_use]
    pub fn is_current(&self, ticket: DetailTicket) -> bool {
        self.movie_id == Some(ticket.movie_id) && self.epoch == ticket.epoch
    }

    /// Applies a completed part. Returns `false` when the ticket is stale.
    pub fn apply(&mut self, ticket: DetailTicket, part: DetailPart) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                movie_id = ticket.movie_id,
                stale_epoch = ticket.epoch,
                current_epoch = self.epoch,
                "discarding stale detail response"
            );
            return false;
        }

        match part {
            DetailPart::Core(outcome) => {
                if let Err(failure) = &outcome {
                    tracing::warn!(movie_id = ticket.movie_id, reason = %failure, "failed to load movie");
                }
                self.core = outcome.into();
            }
            DetailPart::Cast(outcome) => {
                if let Err(failure) = &outcome {
                    tracing::warn!(movie_id = ticket.movie_id, reason = %failure, "failed to load cast");
                }
                self.cast = outcome.into();
            }
            DetailPart::Trailers(outcome) => {
                if let Err(failure) = &outcome {
                    tracing::warn!(movie_id = ticket.movie_id, reason = %failure, "failed to load trailers");
                }
                self.trailers = outcome.into();
            }
        }
        true
    }

    /// Returns `true` once the core record has arrived.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.core, Slot::Loaded(_))
    }

    /// Returns `true` once all three parts resolved (loaded or failed).
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.core.is_resolved() && self.cast.is_resolved() && self.trailers.is_resolved()
    }

    /// Core record, if arrived.
    #[must_use]
    pub fn details(&self) -> Option<&MovieDetails> {
        self.core.loaded().map(|details| details.as_ref())
    }

    /// Full cast list (empty until resolved).
    #[must_use]
    pub fn cast(&self) -> &[CastMember] {
        self.cast.loaded().map_or(&[], Vec::as_slice)
    }

    /// Full trailer list (empty until resolved).
    #[must_use]
    pub fn trailers(&self) -> &[Video] {
        self.trailers.loaded().map_or(&[], Vec::as_slice)
    }

    /// Cast entries to display.
    #[must_use]
    pub fn displayed_cast(&self) -> &[CastMember] {
        let cast = self.cast();
        cast.get(..CAST_DISPLAY_LIMIT).unwrap_or(cast)
    }

    /// Trailers to display.
    #[must_use]
    pub fn displayed_trailers(&self) -> &[Video] {
        let trailers = self.trailers();
        trailers.get(..TRAILER_DISPLAY_LIMIT).unwrap_or(trailers)
    }

    /// Failure of the core fetch, if any.
    #[must_use]
    pub const fn core_failure(&self) -> Option<&FetchFailure> {
        self.core.failure()
    }

    /// Failures of all parts, labeled.
    #[must_use]
    pub fn failures(&self) -> Vec<(&'static str, &FetchFailure)> {
        [
            ("movie", self.core.failure()),
            ("cast", self.cast.failure()),
            ("trailers", self.trailers.failure()),
        ]
        .into_iter()
        .filter_map(|(label, failure)| failure.map(|f| (label, f)))
        .collect()
    }

    /// Merged record: core fields plus cast and trailers.
    ///
    /// `None` until the core record arrives.
    #[must_use]
    pub fn aggregate(&self) -> Option<MovieAggregate> {
        let details = self.details()?.clone();
        Some(
            MovieAggregate::new(details)
                .with_cast(self.cast().to_vec())
                .with_trailers(self.trailers().to_vec()),
        )
    }

    /// Toggles the raw record view.
    pub fn toggle_raw(&mut self) {
        self.show_raw = !self.show_raw;
        self.scroll = 0;
    }

    /// Scrolls up by `lines`.
    pub const fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Scrolls down by `lines`, stopping once the last row is visible.
    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines).min(self.max_scroll);
    }

    /// Records the rendered body size and pulls `scroll` back into range.
    pub fn fit_scroll(&mut self, content_rows: usize, viewport_rows: u16) {
        let rows = u16::try_from(content_rows).unwrap_or(u16::MAX);
        self.max_scroll = rows.saturating_sub(viewport_rows);
        self.scroll = self.scroll.min(self.max_scroll);
    }
}
