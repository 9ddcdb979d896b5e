use std::sync::Arc;

use crate::{
    models::MovieId,
    services::{CatalogSnapshot, PosterResolver},
};

/// Shared application state
///
/// The catalog snapshot is read-only for the life of the process. The poster
/// resolver carries the only mutable state, its append-only cache.
#[derive(Clone)]
pub struct AppState {
    pub snapshot: Arc<CatalogSnapshot>,
    pub posters: PosterResolver,
    pub trending: Arc<Vec<MovieId>>,
}

impl AppState {
    pub fn new(snapshot: CatalogSnapshot, posters: PosterResolver, trending: Vec<MovieId>) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            posters,
            trending: Arc::new(trending),
        }
    }
}
