//! API client library for moviedeck.
//!
//! Provides the TMDB v3 data-access client used by the catalog and
//! detail views.

/// TMDB API client.
pub mod tmdb;
