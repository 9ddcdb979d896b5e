use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Startup errors raised while loading the catalog and similarity matrix.
///
/// Either variant is fatal: the service cannot produce recommendations and
/// falls back to a single blocking error page.
#[derive(thiserror::Error, Debug, Clone)]
pub enum DataError {
    #[error("Unreadable data file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Inconsistent data: {0}")]
    Inconsistent(String),
}

/// Errors from a recommendation lookup
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum LookupError {
    #[error("Movie not found in catalog: {0}")]
    NotFound(String),
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("External API error: {0}")]
    ExternalApi(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Lookup(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Data(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
