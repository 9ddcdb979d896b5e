use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    models::{MovieId, Poster},
    state::AppState,
};

/// Handler for a single poster lookup. Always succeeds; failures yield a placeholder.
pub async fn poster(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i64>,
) -> Json<Poster> {
    let movie_id = MovieId(movie_id);
    let poster_url = state.posters.resolve(movie_id).await;

    Json(Poster {
        movie_id,
        poster_url,
    })
}

/// Handler for the trending strip shown when nothing is selected
pub async fn trending(State(state): State<Arc<AppState>>) -> Json<Vec<Poster>> {
    Json(trending_posters(&state).await)
}

pub async fn trending_posters(state: &AppState) -> Vec<Poster> {
    let urls = state.posters.resolve_many(&state.trending).await;

    state
        .trending
        .iter()
        .zip(urls)
        .map(|(&movie_id, poster_url)| Poster {
            movie_id,
            poster_url,
        })
        .collect()
}
