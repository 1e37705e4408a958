//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::resource::MovieList;
use super::types::{Credits, MovieDetails, MoviePage, SearchMovieParams, Videos};

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait,
/// which is what the UI's spawned fetch tasks require.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches one page of a category list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_list(&self, list: MovieList, page: u32) -> Result<MoviePage>;

    /// Searches for movies.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_movie(&self, params: &SearchMovieParams) -> Result<MoviePage>;

    /// Fetches the core movie record.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetails>;

    /// Fetches the cast of a movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_credits(&self, movie_id: u64) -> Result<Credits>;

    /// Fetches the videos of a movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_videos(&self, movie_id: u64) -> Result<Videos>;
}
