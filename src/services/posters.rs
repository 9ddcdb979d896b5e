use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    models::{MovieId, PosterCacheEntry},
    services::providers::MetadataProvider,
};

/// Returned when the provider has no poster for a movie
pub const NO_POSTER_PLACEHOLDER: &str =
    "https://via.placeholder.com/500x750?text=No+Poster+Available";

/// Returned when the provider could not be reached or answered with garbage
pub const ERROR_PLACEHOLDER: &str =
    "https://via.placeholder.com/500x750?text=Error+Loading+Poster";

/// Append-only, process-lifetime memo of resolved poster URLs.
///
/// Only successful resolutions are stored. Entries are never evicted.
#[derive(Clone, Default)]
pub struct PosterCache {
    entries: Arc<RwLock<HashMap<MovieId, PosterCacheEntry>>>,
}

impl PosterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, movie_id: MovieId) -> Option<PosterCacheEntry> {
        self.entries.read().await.get(&movie_id).cloned()
    }

    /// Stores an entry unless one is already present; the first writer wins
    pub async fn insert(&self, entry: PosterCacheEntry) -> PosterCacheEntry {
        let mut entries = self.entries.write().await;
        entries.entry(entry.movie_id).or_insert(entry).clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Translates movie ids into displayable poster URLs
#[derive(Clone)]
pub struct PosterResolver {
    provider: Arc<dyn MetadataProvider>,
    cache: PosterCache,
    image_base_url: String,
}

impl PosterResolver {
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        cache: PosterCache,
        image_base_url: String,
    ) -> Self {
        Self {
            provider,
            cache,
            image_base_url,
        }
    }

    pub fn cache(&self) -> &PosterCache {
        &self.cache
    }

    /// Resolves the poster URL for a movie.
    ///
    /// Never fails: a missing poster or a failed lookup yields a placeholder.
    /// Placeholders are not cached, so a later call retries the provider.
    pub async fn resolve(&self, movie_id: MovieId) -> String {
        if let Some(entry) = self.cache.get(movie_id).await {
            tracing::debug!(movie_id = %movie_id, "Poster cache hit");
            return entry.resolved_url;
        }

        tracing::debug!(movie_id = %movie_id, "Poster cache miss");

        match self.provider.fetch_poster_path(movie_id).await {
            Ok(Some(path)) if !path.trim().is_empty() => {
                let entry = PosterCacheEntry {
                    movie_id,
                    resolved_url: self.image_url(&path),
                    fetched_at: Utc::now(),
                };
                self.cache.insert(entry).await.resolved_url
            }
            Ok(_) => {
                tracing::info!(
                    movie_id = %movie_id,
                    provider = self.provider.name(),
                    "No poster available"
                );
                NO_POSTER_PLACEHOLDER.to_string()
            }
            Err(e) => {
                tracing::warn!(
                    movie_id = %movie_id,
                    provider = self.provider.name(),
                    error = %e,
                    "Poster fetch failed"
                );
                ERROR_PLACEHOLDER.to_string()
            }
        }
    }

    /// Resolves several posters concurrently, preserving input order
    pub async fn resolve_many(&self, movie_ids: &[MovieId]) -> Vec<String> {
        let mut tasks = Vec::with_capacity(movie_ids.len());

        for &movie_id in movie_ids {
            let resolver = self.clone();
            let task = tokio::spawn(async move { resolver.resolve(movie_id).await });
            tasks.push(task);
        }

        let mut urls = Vec::with_capacity(tasks.len());

        for task in tasks {
            match task.await {
                Ok(url) => urls.push(url),
                Err(e) => {
                    tracing::error!(error = %e, "Poster task join error");
                    urls.push(ERROR_PLACEHOLDER.to_string());
                }
            }
        }

        urls
    }

    fn image_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.image_base_url.trim_end_matches('/'),
            path.trim().trim_start_matches('/')
        )
    }
}
