//! Poster and trailer URL construction.

/// Image host prefix for posters (500px wide rendition).
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Embed prefix for `YouTube` trailers.
pub const TRAILER_EMBED_BASE_URL: &str = "https://www.youtube.com/embed/";

/// Builds the poster URL for a TMDB image path (e.g. `/abc.jpg`).
#[must_use]
pub fn poster_url(poster_path: &str) -> String {
    format!("{IMAGE_BASE_URL}{poster_path}")
}

/// Builds the embeddable player URL for a video key.
#[must_use]
pub fn trailer_embed_url(key: &str) -> String {
    format!("{TRAILER_EMBED_BASE_URL}{key}")
}
