//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 movie endpoints
//! and retrieves listing, search, detail, credit, and video data.

mod api;
mod client;
mod media;
mod resource;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_LANGUAGE, TmdbClient, TmdbClientBuilder};
pub use media::{IMAGE_BASE_URL, TRAILER_EMBED_BASE_URL, poster_url, trailer_embed_url};
pub use resource::{MAX_PAGE, MovieList, ResourcePath};
pub use types::{
    CastMember, Credits, Genre, MovieAggregate, MovieDetails, MoviePage, MovieSummary,
    SearchMovieParams, Video, Videos,
};
