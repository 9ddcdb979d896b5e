//! Movie metadata provider abstraction
//!
//! The poster resolver only needs one thing from a metadata source: the
//! relative poster path for a movie id.

use crate::{error::AppResult, models::MovieId};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch the poster path for a movie
    ///
    /// Returns `Ok(None)` when the provider knows the movie but has no poster
    /// for it. Transport failures, error statuses and undecodable bodies are
    /// reported as errors.
    async fn fetch_poster_path(&self, movie_id: MovieId) -> AppResult<Option<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
