use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{Movie, RecommendedMovie},
    services::recommendations,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<RecommendedMovie>>> {
    tracing::info!(
        request_id = %request_id,
        title = %query.title,
        "Processing recommendation request"
    );

    let movies = recommendations::recommend(
        &state.snapshot.catalog,
        &state.snapshot.matrix,
        &query.title,
    )?;

    let response = with_posters(&state, movies).await;

    tracing::info!(
        request_id = %request_id,
        results = response.len(),
        "Recommendations completed"
    );

    Ok(Json(response))
}

/// Attaches poster URLs to recommended movies, keeping recommendation order
pub async fn with_posters(state: &AppState, movies: Vec<Movie>) -> Vec<RecommendedMovie> {
    let ids: Vec<_> = movies.iter().map(|movie| movie.id).collect();
    let urls = state.posters.resolve_many(&ids).await;

    movies
        .into_iter()
        .zip(urls)
        .map(|(movie, poster_url)| RecommendedMovie {
            id: movie.id,
            title: movie.title,
            poster_url,
        })
        .collect()
}
