//! Highlights API routes
//!
//! Endpoints:
//! - GET /api/v1/highlights?path=&chapter= - Highlights of a book or one chapter
//! - POST /api/v1/highlights - Create a highlight
//! - GET /api/v1/highlights/at?path=&chapter=&offset= - Highlight under an offset
//! - DELETE /api/v1/highlights/:id - Remove one highlight
//! - DELETE /api/v1/highlights?path= - Remove every highlight of a book

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use super::BookQuery;
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::stores::TextHighlight;

/// Create the highlights router
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_highlights)
                .post(create_highlight)
                .delete(clear_highlights),
        )
        .route("/at", get(highlight_at))
        .route("/:id", delete(delete_highlight))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    path: String,
    chapter: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct PositionQuery {
    path: String,
    chapter: usize,
    offset: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateHighlight {
    book_path: String,
    chapter_index: usize,
    selected_text: String,
    start_offset: usize,
    end_offset: usize,
    color: Option<String>,
}

/// List highlights for a book, optionally narrowed to one chapter
async fn list_highlights(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<TextHighlight>>> {
    let path = state.book_key(&query.path)?;
    let highlights = match query.chapter {
        Some(chapter) => state.store().highlights_for_chapter(&path, chapter)?,
        None => state.store().highlights_for_book(&path)?,
    };
    Ok(Json(highlights))
}

async fn create_highlight(
    State(state): State<AppState>,
    Json(data): Json<CreateHighlight>,
) -> Result<(StatusCode, Json<TextHighlight>)> {
    let path = state.book_key(&data.book_path)?;
    let mut highlight = TextHighlight::new(
        path,
        data.chapter_index,
        data.selected_text,
        data.start_offset,
        data.end_offset,
    )?;
    if let Some(color) = data.color {
        highlight = highlight.with_color(color);
    }
    state.store().save_highlight(highlight.clone())?;
    Ok((StatusCode::CREATED, Json(highlight)))
}

async fn highlight_at(
    State(state): State<AppState>,
    Query(query): Query<PositionQuery>,
) -> Result<Json<TextHighlight>> {
    let path = state.book_key(&query.path)?;
    state
        .store()
        .highlight_at(&path, query.chapter, query.offset)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No highlight at offset {}", query.offset)))
}

async fn delete_highlight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if !state.store().remove_highlight(id)? {
        return Err(AppError::NotFound(format!("Highlight not found: {}", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_highlights(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> Result<StatusCode> {
    let path = state.book_key(&query.path)?;
    state.store().clear_book_highlights(&path)?;
    Ok(StatusCode::NO_CONTENT)
}
