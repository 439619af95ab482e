//! Cover API routes
//!
//! Endpoints:
//! - GET /api/v1/covers?path= - Stored JPEG cover, extracted on first request
//! - PUT /api/v1/covers?path= - Replace the cover with the uploaded image
//! - GET /api/v1/covers/raw?path= - First page image as stored in the archive

use std::path::{Path, PathBuf};

use axum::{
    body::Bytes,
    extract::{Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::{file_response, BookQuery};
use crate::content::SourceFile;
use crate::covers::{CoverExtractor, CoverMode};
use crate::error::{AppError, Result};
use crate::state::AppState;

const COVER_CACHE_CONTROL: &str = "public, max-age=3600";

/// Create the covers router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cover).put(upload_cover))
        .route("/raw", get(raw_cover))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CoverResponse {
    cover_path: PathBuf,
}

async fn get_cover(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> Result<Response> {
    let source = SourceFile::new(state.layout().resolve(Path::new(&query.path))?);
    let cover = CoverExtractor::cover_path(source.path());

    let extractor = state.covers().clone();
    let stem = source.stem();
    let saved = tokio::task::spawn_blocking(move || extractor.extract_and_save(&source)).await?;
    if !saved {
        return Err(AppError::NotFound(format!("No cover for {}", query.path)));
    }

    let bytes = tokio::fs::read(&cover).await?;
    file_response(
        bytes,
        "image/jpeg",
        &format!("{stem}.jpg"),
        COVER_CACHE_CONTROL,
    )
}

async fn upload_cover(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
    body: Bytes,
) -> Result<Json<CoverResponse>> {
    let path = state.layout().resolve(Path::new(&query.path))?;
    let extractor = state.covers().clone();
    let cover_path =
        tokio::task::spawn_blocking(move || extractor.save_custom_cover(&path, &mut body.as_ref()))
            .await?
            .map_err(|e| AppError::BadRequest(format!("Unusable cover image: {e}")))?;
    Ok(Json(CoverResponse { cover_path }))
}

async fn raw_cover(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> Result<Response> {
    let source = SourceFile::new(state.layout().resolve(Path::new(&query.path))?);
    let stem = source.stem();
    let extractor = state.covers().clone();
    let bytes = tokio::task::spawn_blocking(move || extractor.extract_cover(&source, CoverMode::Raw))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No cover for {}", query.path)))?;

    let format = image::guess_format(&bytes).ok();
    let mime = format.map_or("application/octet-stream", |f| f.to_mime_type());
    let extension = format
        .and_then(|f| f.extensions_str().first().copied())
        .unwrap_or("bin");
    file_response(
        bytes,
        mime,
        &format!("{stem}.{extension}"),
        COVER_CACHE_CONTROL,
    )
}
