use std::sync::Arc;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::{AppError, DataError},
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    state::AppState,
};

pub mod movies;
pub mod pages;
pub mod posters;
pub mod recommendations;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(Arc::new(state))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", get(movies::search))
        .route("/recommendations", get(recommendations::recommend))
        .route("/posters/:movie_id", get(posters::poster))
        .route("/trending", get(posters::trending))
}

/// Router served when the catalog could not be loaded.
///
/// Every path answers 503 with the load error: the page gets a blocking error
/// screen, everything else a JSON error body.
pub fn create_unavailable_router(error: &DataError) -> Router {
    let error = error.clone();

    Router::new()
        .fallback(move |request: Request| {
            let error = error.clone();
            async move { unavailable(request, error) }
        })
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

fn unavailable(request: Request, error: DataError) -> Response {
    if request.uri().path() == "/" {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Html(pages::render_unavailable(&error.to_string())),
        )
            .into_response()
    } else {
        AppError::Data(error).into_response()
    }
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
