//! TMDB (The Movie Database) API provider
//!
//! Reads movie details from `GET /movie/{id}` and exposes the `poster_path`
//! field. The response body is untrusted: missing fields, `null`, non-JSON
//! bodies and error statuses are all expected.

use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{MovieId, TmdbMovieDetails},
    services::providers::MetadataProvider,
};

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    /// Creates a provider whose requests give up after `timeout`
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
        })
    }

    fn movie_url(&self, movie_id: MovieId) -> String {
        format!("{}/movie/{}", self.api_url.trim_end_matches('/'), movie_id)
    }

    fn parse_details(body: &str) -> AppResult<TmdbMovieDetails> {
        serde_json::from_str(body)
            .map_err(|e| AppError::ExternalApi(format!("Malformed movie details: {}", e)))
    }
}

/// Drops the request URL from transport errors; it carries the API key
fn redact_url(e: reqwest::Error) -> AppError {
    AppError::HttpClient(e.without_url())
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_poster_path(&self, movie_id: MovieId) -> AppResult<Option<String>> {
        let response = self
            .http_client
            .get(self.movie_url(movie_id))
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(redact_url)?;

        let status = response.status();
        let body = response.text().await.map_err(redact_url)?;

        if !status.is_success() {
            return Err(AppError::ExternalApi(format!(
                "API returned status {}: {}",
                status, body
            )));
        }

        let details = Self::parse_details(&body)?;

        tracing::debug!(
            movie_id = %movie_id,
            has_poster = details.poster_path.is_some(),
            provider = self.name(),
            "Movie details fetched"
        );

        Ok(details.poster_path)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
