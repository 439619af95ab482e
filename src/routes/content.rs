//! Content API routes
//!
//! Endpoints:
//! - GET /api/v1/content/open?path= - Extract chapters or page images
//! - GET /api/v1/content/file?path= - Raw source file
//! - GET /api/v1/content/page?path= - One cached page image
//! - DELETE /api/v1/content/cache?path= - Drop a file's cached pages

use std::path::{Path, PathBuf};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
    routing::{delete, get},
    Json, Router,
};

use super::{file_response, BookQuery};
use crate::content::{is_image_name, ExtractionResult, SourceFile, CONTENT_CACHE_DIR};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the content router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/open", get(open_content))
        .route("/file", get(source_file))
        .route("/page", get(cached_page))
        .route("/cache", delete(clear_cache))
}

/// Open a library file
///
/// Extraction problems are reported in the body as a `failure` result, not as
/// an HTTP error.
async fn open_content(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> Result<Json<ExtractionResult>> {
    let path = state.layout().resolve(Path::new(&query.path))?;
    let result = state.loader().load(SourceFile::new(path)).await;
    if let ExtractionResult::Failure { message } = &result {
        tracing::info!("Could not open {}: {}", query.path, message);
    }
    Ok(Json(result))
}

async fn source_file(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> Result<Response> {
    let path = state.layout().resolve(Path::new(&query.path))?;
    let source = SourceFile::new(path);
    let bytes = tokio::fs::read(source.path()).await?;
    file_response(
        bytes,
        source.content_type().mime(),
        &source.file_name(),
        "private, max-age=3600",
    )
}

/// Serve a page image; only files inside the page cache are reachable
async fn cached_page(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> Result<Response> {
    let path = cached_page_path(state.loader().cache_root(), Path::new(&query.path))?;
    let bytes = tokio::fs::read(&path).await?;
    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    file_response(bytes, mime.essence_str(), &file_name, "public, max-age=86400")
}

async fn clear_cache(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> Result<StatusCode> {
    let source = SourceFile::new(&query.path);
    state.loader().cache_for(&source).clear()?;
    tracing::debug!("Cleared page cache for {}", source.file_name());
    Ok(StatusCode::NO_CONTENT)
}

fn cached_page_path(cache_root: &Path, requested: &Path) -> Result<PathBuf> {
    let not_found = || AppError::NotFound(format!("Page not found: {}", requested.display()));

    let canonical = requested.canonicalize().map_err(|_| not_found())?;
    let pages_root = cache_root
        .join(CONTENT_CACHE_DIR)
        .canonicalize()
        .map_err(|_| not_found())?;

    let name = canonical
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !canonical.starts_with(&pages_root) || !canonical.is_file() || !is_image_name(&name) {
        return Err(not_found());
    }
    Ok(canonical)
}
