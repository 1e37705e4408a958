//! Logical resource paths on the TMDB API.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Highest page number TMDB accepts on list and search endpoints.
pub const MAX_PAGE: u32 = 500;

/// Movie category lists offered by TMDB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovieList {
    /// Movies currently in theatres.
    #[default]
    NowPlaying,
    /// Movies ordered by popularity.
    Popular,
    /// Movies ordered by rating.
    TopRated,
}

impl MovieList {
    /// All lists in display order.
    pub const ALL: [Self; 3] = [Self::NowPlaying, Self::Popular, Self::TopRated];

    /// Returns the CLI / config spelling (`now-playing`, ...).
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::NowPlaying => "now-playing",
            Self::Popular => "popular",
            Self::TopRated => "top-rated",
        }
    }

    /// Returns the human-readable heading.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NowPlaying => "Now Playing",
            Self::Popular => "Popular",
            Self::TopRated => "Top Rated",
        }
    }

    /// Returns the next list, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::NowPlaying => Self::Popular,
            Self::Popular => Self::TopRated,
            Self::TopRated => Self::NowPlaying,
        }
    }

    /// Returns the previous list, wrapping around.
    #[must_use]
    pub const fn previous(self) -> Self {
        match self {
            Self::NowPlaying => Self::TopRated,
            Self::Popular => Self::NowPlaying,
            Self::TopRated => Self::Popular,
        }
    }

    const fn endpoint(self) -> &'static str {
        match self {
            Self::NowPlaying => "movie/now_playing",
            Self::Popular => "movie/popular",
            Self::TopRated => "movie/top_rated",
        }
    }
}

impl fmt::Display for MovieList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for MovieList {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "now-playing" | "now_playing" => Ok(Self::NowPlaying),
            "popular" => Ok(Self::Popular),
            "top-rated" | "top_rated" => Ok(Self::TopRated),
            other => bail!("unknown movie list: {other} (expected now-playing, popular or top-rated)"),
        }
    }
}

/// A resource on the TMDB API, relative to the versioned base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourcePath {
    /// One of the category lists.
    List(MovieList),
    /// Free-text movie search.
    SearchMovie,
    /// Core movie record.
    Movie(u64),
    /// Cast and crew of a movie.
    Credits(u64),
    /// Videos (trailers, teasers, ...) of a movie.
    Videos(u64),
}

impl ResourcePath {
    /// Returns the relative URL path (no leading slash).
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::List(list) => String::from(list.endpoint()),
            Self::SearchMovie => String::from("search/movie"),
            Self::Movie(id) => format!("movie/{id}"),
            Self::Credits(id) => format!("movie/{id}/credits"),
            Self::Videos(id) => format!("movie/{id}/videos"),
        }
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
