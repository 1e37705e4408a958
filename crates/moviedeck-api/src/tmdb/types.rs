//! TMDB API response types and search parameters.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::media::{poster_url, trailer_embed_url};

// --- Movie lists and search ---

/// One page of movie results.
///
/// Shared by `movie/now_playing`, `movie/popular`, `movie/top_rated`
/// and `search/movie`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MoviePage {
    /// Current page number.
    pub page: u32,
    /// Movies on this page, in server order.
    #[serde(default)]
    pub results: Vec<MovieSummary>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

/// A movie entry in a list or search page.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MovieSummary {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Release date (YYYY-MM-DD, may be empty).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl MovieSummary {
    /// Full poster URL, if the movie has a poster.
    #[must_use]
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path.as_deref().map(poster_url)
    }
}

// --- Movie details ---

/// Response from the `movie/{movie_id}` endpoint.
///
/// Fields not modelled here are kept in `extra` so the raw record can be
/// re-serialized for inspection.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MovieDetails {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Release date (YYYY-MM-DD).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Box office revenue in US dollars (0 when unknown).
    #[serde(default)]
    pub revenue: u64,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Tagline.
    #[serde(default)]
    pub tagline: Option<String>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Remaining fields of the raw record.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MovieDetails {
    /// Full poster URL, if the movie has a poster.
    #[must_use]
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path.as_deref().map(poster_url)
    }
}

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

// --- Credits ---

/// Response from the `movie/{movie_id}/credits` endpoint (cast only).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Credits {
    /// TMDB movie ID.
    #[serde(default)]
    pub id: u64,
    /// Cast in billing order.
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

/// A single cast entry.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CastMember {
    /// TMDB person ID.
    pub id: u64,
    /// Actor name.
    pub name: String,
    /// Character played.
    #[serde(default)]
    pub character: Option<String>,
    /// Billing order.
    #[serde(default)]
    pub order: Option<u32>,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
    /// Remaining fields of the raw entry.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CastMember {
    /// Formats the entry as `"name as character"`.
    ///
    /// Falls back to the bare name when the character is unknown.
    #[must_use]
    pub fn credit_line(&self) -> String {
        match self.character.as_deref().map(str::trim) {
            Some(character) if !character.is_empty() => format!("{} as {character}", self.name),
            _ => self.name.clone(),
        }
    }
}

// --- Videos ---

/// Response from the `movie/{movie_id}/videos` endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Videos {
    /// TMDB movie ID.
    #[serde(default)]
    pub id: u64,
    /// Videos in server order.
    #[serde(default)]
    pub results: Vec<Video>,
}

/// A single video entry.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Video {
    /// TMDB video ID.
    pub id: String,
    /// Video key on the hosting site.
    pub key: String,
    /// Video name.
    pub name: String,
    /// Hosting site (e.g. "`YouTube`").
    #[serde(default)]
    pub site: Option<String>,
    /// Video type (e.g. "Trailer", "Teaser").
    #[serde(rename = "type", default)]
    pub video_type: Option<String>,
    /// Remaining fields of the raw entry.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Video {
    /// Embeddable player URL for this video.
    #[must_use]
    pub fn embed_url(&self) -> String {
        trailer_embed_url(&self.key)
    }
}

// --- Aggregate ---

/// A movie's core record joined with its cast and trailers.
///
/// Serializes as the core record's fields plus `cast` and `trailers`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieAggregate {
    /// Core record.
    #[serde(flatten)]
    pub details: MovieDetails,
    /// Cast entries (empty until resolved).
    pub cast: Vec<CastMember>,
    /// Trailer entries (empty until resolved).
    pub trailers: Vec<Video>,
}

impl MovieAggregate {
    /// Creates an aggregate with empty cast and trailers.
    #[must_use]
    pub const fn new(details: MovieDetails) -> Self {
        Self {
            details,
            cast: Vec::new(),
            trailers: Vec::new(),
        }
    }

    /// Sets the cast list.
    #[must_use]
    pub fn with_cast(mut self, cast: Vec<CastMember>) -> Self {
        self.cast = cast;
        self
    }

    /// Sets the trailer list.
    #[must_use]
    pub fn with_trailers(mut self, trailers: Vec<Video>) -> Self {
        self.trailers = trailers;
        self
    }

    /// Renders the merged record as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize movie aggregate")
    }
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[allow(dead_code)]
    #[serde(default)]
    pub success: bool,
}

// --- Search Parameters ---

/// Parameters for the `search/movie` endpoint.
///
/// Credentials and language come from the client and are not repeated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMovieParams {
    /// Search query (required).
    pub query: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Filter by release year.
    pub year: Option<u32>,
    /// Include adult content.
    pub include_adult: bool,
}

impl SearchMovieParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            year: None,
            include_adult: false,
        }
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the year filter.
    #[must_use]
    pub const fn year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    /// Builds the caller-side query parameters.
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("query", self.query.clone()),
            ("page", self.page.to_string()),
            ("include_adult", self.include_adult.to_string()),
        ];
        if let Some(year) = self.year {
            query.push(("year", year.to_string()));
        }
        query
    }
}
