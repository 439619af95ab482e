//! Narration API routes
//!
//! The speech engine runs on the client; the server only prepares text.

use std::path::Path;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::content::{ExtractionResult, SourceFile};
use crate::error::{AppError, Result};
use crate::narration::chapter_sentences;
use crate::state::AppState;

/// Create the narration router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sentences", post(split_html))
        .route("/chapter", get(chapter_text))
}

#[derive(Debug, Deserialize)]
struct SentencesRequest {
    html: String,
}

#[derive(Debug, Deserialize)]
struct ChapterQuery {
    path: String,
    chapter: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChapterSentences {
    chapter: usize,
    chapter_count: usize,
    title: String,
    sentences: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SentencesResponse {
    sentences: Vec<String>,
}

async fn split_html(Json(request): Json<SentencesRequest>) -> Json<SentencesResponse> {
    Json(SentencesResponse {
        sentences: chapter_sentences(&request.html),
    })
}

/// Sentences of one chapter of a text book
async fn chapter_text(
    State(state): State<AppState>,
    Query(query): Query<ChapterQuery>,
) -> Result<Json<ChapterSentences>> {
    let path = state.layout().resolve(Path::new(&query.path))?;
    let (chapters, toc) = match state.loader().load(SourceFile::new(path)).await {
        ExtractionResult::TextBook { chapters, toc } => (chapters, toc),
        ExtractionResult::ImagePages { .. } => {
            return Err(AppError::BadRequest(format!(
                "{} has no text to narrate",
                query.path
            )))
        }
        ExtractionResult::Failure { message } => return Err(AppError::BadRequest(message)),
    };

    let html = chapters.get(query.chapter).ok_or_else(|| {
        AppError::NotFound(format!(
            "Chapter {} out of range (book has {})",
            query.chapter,
            chapters.len()
        ))
    })?;
    let title = toc
        .iter()
        .find(|entry| entry.index == query.chapter)
        .map(|entry| entry.title.clone())
        .unwrap_or_else(|| format!("Chapter {}", query.chapter + 1));

    Ok(Json(ChapterSentences {
        chapter: query.chapter,
        chapter_count: chapters.len(),
        title,
        sentences: chapter_sentences(html),
    }))
}
