use std::sync::Arc;
use std::time::Duration;

use movie_recommender::{
    config::Config,
    create_router, create_unavailable_router,
    models::MovieId,
    services::{catalog, PosterCache, PosterResolver, TmdbProvider},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movie_recommender=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // On load failure every route serves the blocking error
    let app = match catalog::load(&config.movies_path, &config.similarity_path) {
        Ok(snapshot) => {
            let provider = TmdbProvider::new(
                config.tmdb_api_key.clone(),
                config.tmdb_api_url.clone(),
                Duration::from_secs(config.http_timeout_secs),
            )?;
            let posters = PosterResolver::new(
                Arc::new(provider),
                PosterCache::new(),
                config.tmdb_image_base_url.clone(),
            );
            let trending = config.trending_movie_ids.iter().copied().map(MovieId).collect();

            create_router(AppState::new(snapshot, posters, trending))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load catalog data");
            create_unavailable_router(&e)
        }
    };

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
