use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// External catalog identifier for a movie (a TMDB movie id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub i64);

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MovieId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A catalog entry. Immutable once the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Row (and column) of this movie in the similarity matrix
    pub row_index: usize,
}

/// A memoized poster lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PosterCacheEntry {
    pub movie_id: MovieId,
    pub resolved_url: String,
    pub fetched_at: DateTime<Utc>,
}

/// A recommended movie together with its poster, as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedMovie {
    pub id: MovieId,
    pub title: String,
    pub poster_url: String,
}

/// Poster URL for a single movie id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poster {
    pub movie_id: MovieId,
    pub poster_url: String,
}

// ============================================================================
// Data Artifact Types
// ============================================================================

/// One row of the serialized movie table
#[derive(Debug, Clone, Deserialize)]
pub struct MovieRecord {
    pub id: i64,
    pub title: String,
    /// Falls back to the record's position in the table when absent
    #[serde(default)]
    pub row_index: Option<usize>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Subset of the TMDB `GET /movie/{id}` response that the service reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbMovieDetails {
    #[serde(default)]
    pub poster_path: Option<String>,
}
