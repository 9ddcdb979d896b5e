use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{models::Movie, state::AppState};

const DEFAULT_SEARCH_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
}

/// Handler for catalog title search
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<Movie>> {
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    let movies = state
        .snapshot
        .catalog
        .search(&params.q, limit)
        .into_iter()
        .cloned()
        .collect();

    Json(movies)
}
