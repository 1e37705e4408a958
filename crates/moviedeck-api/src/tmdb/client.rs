//! `TmdbClient` - TMDB API client implementation.

use std::fmt;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::TmdbApi;
use super::resource::{MovieList, ResourcePath};
use super::types::{
    Credits, MovieDetails, MoviePage, SearchMovieParams, TmdbErrorResponse, Videos,
};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default response language.
pub const DEFAULT_LANGUAGE: &str = "pt-BR";

/// TMDB API client.
///
/// Every request carries the fixed `api_key` and `language` parameters
/// given at construction. No retries and no caching.
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// v3 API key, sent as the `api_key` query parameter.
    api_key: String,
    /// Response language, sent as the `language` query parameter.
    language: String,
}

impl fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.base_url.as_str())
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    language: Option<String>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            language: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language (default: `pt-BR`).
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or empty.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_key = self.api_key.context("api_key is required")?;
        if api_key.trim().is_empty() {
            bail!("api_key must not be empty");
        }
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_key,
            language: self
                .language
                .unwrap_or_else(|| String::from(DEFAULT_LANGUAGE)),
        })
    }
}

/// Merges fixed parameters under caller parameters.
///
/// A caller entry replaces every fixed entry with the same key.
fn merge_query<'a>(
    fixed: &[(&'a str, String)],
    caller: &[(&'a str, String)],
) -> Vec<(&'a str, String)> {
    let mut merged: Vec<(&str, String)> = fixed
        .iter()
        .filter(|(key, _)| !caller.iter().any(|(k, _)| k == key))
        .cloned()
        .collect();
    merged.extend(caller.iter().cloned());
    merged
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Returns the configured response language.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Fetches and decodes JSON for a resource.
    ///
    /// The fixed `api_key` and `language` parameters are merged under
    /// `query`; caller entries win on key collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the body cannot be decoded as `T`.
    #[instrument(skip_all, fields(resource = %resource))]
    pub async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        resource: &ResourcePath,
        query: &[(&str, String)],
    ) -> Result<T> {
        let path = resource.path();
        let url = self
            .base_url
            .join(&path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let fixed = [
            ("api_key", self.api_key.clone()),
            ("language", self.language.clone()),
        ];
        let query = merge_query(&fixed, query);

        let request = self
            .http_client
            .get(url)
            .query(&query)
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;

        tracing::debug!(path = %path, language = %self.language, "TMDB API request");

        let result = self.http_client.execute(request).await;
        let response = result.with_context(|| format!("request failed: {path}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                bail!(
                    "TMDB API error (HTTP {}): code={}, message={}",
                    status,
                    error_response.status_code,
                    error_response.status_message,
                );
            }
            bail!("TMDB API error (HTTP {status}): {body}");
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        let parsed = raw_result.with_context(|| format!("failed to decode JSON response: {path}"))?;
        Ok(parsed)
    }
}

impl TmdbApi for TmdbClient {
    #[instrument(skip_all, fields(list = %list, page = page))]
    async fn movie_list(&self, list: MovieList, page: u32) -> Result<MoviePage> {
        let query = [("page", page.to_string())];
        self.fetch(&ResourcePath::List(list), &query).await
    }

    #[instrument(skip_all, fields(page = params.page))]
    async fn search_movie(&self, params: &SearchMovieParams) -> Result<MoviePage> {
        let query = params.to_query();
        self.fetch(&ResourcePath::SearchMovie, &query).await
    }

    #[instrument(skip_all, fields(movie_id = movie_id))]
    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetails> {
        self.fetch(&ResourcePath::Movie(movie_id), &[]).await
    }

    #[instrument(skip_all, fields(movie_id = movie_id))]
    async fn movie_credits(&self, movie_id: u64) -> Result<Credits> {
        self.fetch(&ResourcePath::Credits(movie_id), &[]).await
    }

    #[instrument(skip_all, fields(movie_id = movie_id))]
    async fn movie_videos(&self, movie_id: u64) -> Result<Videos> {
        self.fetch(&ResourcePath::Videos(movie_id), &[]).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(mock_server: &MockServer) -> TmdbClient {
        let base_url = format!("{}/3/", mock_server.uri());
        TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_api_key() {
        // Arrange & Act
        let result = TmdbClient::builder().user_agent("test/0.0.0").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("api_key is required")
        );
    }

    #[test]
    fn test_builder_rejects_blank_api_key() {
        // Arrange & Act
        let result = TmdbClient::builder()
            .api_key("   ")
            .user_agent("test/0.0.0")
            .build();

        // Assert
        assert!(result.unwrap_err().to_string().contains("must not be empty"));
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = TmdbClient::builder().api_key("test-key").build();

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_defaults() {
        // Arrange & Act
        let client = TmdbClient::builder()
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(client.language(), "pt-BR");
    }

    #[test]
    fn test_debug_hides_api_key() {
        // Arrange
        let client = TmdbClient::builder()
            .api_key("super-secret")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Act
        let debug = format!("{client:?}");

        // Assert
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("pt-BR"));
    }

    #[test]
    fn test_merge_query_caller_wins() {
        // Arrange
        let fixed = [
            ("api_key", String::from("k")),
            ("language", String::from("pt-BR")),
        ];
        let caller = [
            ("language", String::from("en-US")),
            ("page", String::from("3")),
        ];

        // Act
        let merged = merge_query(&fixed, &caller);

        // Assert
        assert_eq!(
            merged,
            vec![
                ("api_key", String::from("k")),
                ("language", String::from("en-US")),
                ("page", String::from("3")),
            ]
        );
    }

    #[tokio::test]
    async fn test_movie_list_via_http() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/now_playing_page1.json");

        Mock::given(method("GET"))
            .and(path("/3/movie/now_playing"))
            .and(query_param("api_key", "test-key"))
            .and(query_param("language", "pt-BR"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let page = client.movie_list(MovieList::NowPlaying, 1).await.unwrap();

        // Assert
        assert_eq!(page.results.len(), 20);
        assert_eq!(page.total_pages, 500);
    }

    #[tokio::test]
    async fn test_each_list_hits_its_endpoint() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_movie_empty.json");

        for endpoint in ["/3/movie/popular", "/3/movie/top_rated"] {
            Mock::given(method("GET"))
                .and(path(endpoint))
                .and(query_param("page", "7"))
                .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
                .expect(1)
                .mount(&mock_server)
                .await;
        }

        let client = client_for(&mock_server);

        // Act & Assert (mock expect(1) verifies each endpoint was called once)
        client.movie_list(MovieList::Popular, 7).await.unwrap();
        client.movie_list(MovieList::TopRated, 7).await.unwrap();
    }

    #[tokio::test]
    async fn test_search_movie_via_http() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_movie_batman.json");

        Mock::given(method("GET"))
            .and(path("/3/search/movie"))
            .and(query_param("query", "batman"))
            .and(query_param("page", "2"))
            .and(query_param("language", "pt-BR"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let params = SearchMovieParams::new("batman").page(2);

        // Act
        let page = client.search_movie(&params).await.unwrap();

        // Assert
        assert_eq!(page.results[0].title, "Batman");
        assert_eq!(page.total_results, 52);
    }

    #[tokio::test]
    async fn test_detail_endpoints_via_http() {
        // Arrange
        let mock_server = MockServer::start().await;

        let fixtures = [
            (
                "/3/movie/27205",
                include_str!("../../../../fixtures/tmdb/movie_27205.json"),
            ),
            (
                "/3/movie/27205/credits",
                include_str!("../../../../fixtures/tmdb/movie_27205_credits.json"),
            ),
            (
                "/3/movie/27205/videos",
                include_str!("../../../../fixtures/tmdb/movie_27205_videos.json"),
            ),
        ];
        for (endpoint, body) in fixtures {
            Mock::given(method("GET"))
                .and(path(endpoint))
                .and(query_param("api_key", "test-key"))
                .and(query_param("language", "pt-BR"))
                .respond_with(ResponseTemplate::new(200).set_body_string(body))
                .expect(1)
                .mount(&mock_server)
                .await;
        }

        let client = client_for(&mock_server);

        // Act
        let details = client.movie_details(27_205).await.unwrap();
        let credits = client.movie_credits(27_205).await.unwrap();
        let videos = client.movie_videos(27_205).await.unwrap();

        // Assert
        assert_eq!(details.title, "A Origem");
        assert_eq!(credits.cast.len(), 12);
        assert_eq!(credits.cast[0].name, "Leonardo DiCaprio");
        assert_eq!(videos.results.len(), 5);
        assert_eq!(videos.results[0].video_type.as_deref(), Some("Trailer"));
    }

    #[tokio::test]
    async fn test_http_error_returns_tmdb_error() {
        // Arrange
        let mock_server = MockServer::start().await;
        let error_body = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string(error_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let result = client.movie_details(1).await;

        // Assert
        let err = result.unwrap_err().to_string();
        assert!(err.contains("TMDB API error"));
        assert!(err.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_http_error_with_plain_body() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let result = client.movie_list(MovieList::Popular, 1).await;

        // Assert
        let err = result.unwrap_err().to_string();
        assert!(err.contains("HTTP 502"));
        assert!(err.contains("bad gateway"));
    }

    #[tokio::test]
    async fn test_http_429_is_not_retried() {
        // Arrange
        let mock_server = MockServer::start().await;
        let error_body = r#"{"status_code":25,"status_message":"Your request count is over the allowed limit.","success":false}"#;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string(error_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let result = client.movie_list(MovieList::NowPlaying, 1).await;

        // Assert
        assert!(result.unwrap_err().to_string().contains("over the allowed limit"));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_an_error() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let result = client.movie_videos(27_205).await;

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("failed to decode JSON response")
        );
    }
}
