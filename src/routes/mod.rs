//! Route modules for ReadLab

pub mod content;
pub mod covers;
pub mod favorites;
pub mod health;
pub mod highlights;
pub mod library;
pub mod narration;
pub mod preferences;
pub mod progress;

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// `?path=` query naming a library file
#[derive(Debug, Deserialize)]
pub struct BookQuery {
    pub path: String,
}

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/health", get(health::health_check))
        .nest("/api/v1/library", library::router())
        .nest("/api/v1/content", content::router())
        .nest("/api/v1/covers", covers::router())
        .nest("/api/v1/favorites", favorites::router())
        .nest("/api/v1/progress", progress::router())
        .nest("/api/v1/highlights", highlights::router())
        .nest("/api/v1/preferences", preferences::router())
        .nest("/api/v1/narration", narration::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Inline response for a file already read into memory
pub(crate) fn file_response(
    bytes: Vec<u8>,
    content_type: &str,
    file_name: &str,
    cache_control: &str,
) -> Result<Response> {
    let length = bytes.len();
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, length)
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", file_name.replace('"', "")),
        )
        .header(header::CACHE_CONTROL, cache_control)
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(e.to_string()))
}
