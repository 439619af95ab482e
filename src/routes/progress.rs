//! Reading progress API routes
//!
//! Positions are page indices for comics and chapter indices for books.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::BookQuery;
use crate::error::Result;
use crate::state::AppState;

/// Create the progress router
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(get_progress).put(save_progress).delete(clear_progress),
    )
}

#[derive(Debug, Serialize, Deserialize)]
struct ProgressBody {
    path: String,
    position: usize,
}

async fn get_progress(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> Result<Json<ProgressBody>> {
    let path = state.book_key(&query.path)?;
    let position = state.store().get_progress(&path)?;
    Ok(Json(ProgressBody { path, position }))
}

async fn save_progress(
    State(state): State<AppState>,
    Json(body): Json<ProgressBody>,
) -> Result<Json<ProgressBody>> {
    let path = state.book_key(&body.path)?;
    state.store().save_progress(&path, body.position)?;
    tracing::debug!("Saved progress {} for {}", body.position, path);
    Ok(Json(ProgressBody {
        path,
        position: body.position,
    }))
}

async fn clear_progress(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> Result<StatusCode> {
    let path = state.book_key(&query.path)?;
    state.store().clear_progress(&path)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::library::Category;
    use crate::routes::tests::{body_json, get, q, send, send_json, test_app};

    #[tokio::test]
    async fn test_save_read_clear() {
        let temp_dir = TempDir::new().unwrap();
        let (app, state) = test_app(&temp_dir);
        let comic = state.layout().category_dir(Category::Comic).join("issue.cbr");
        std::fs::write(&comic, b"Rar!").unwrap();
        let uri = format!("/api/v1/progress?path={}", q(&comic));

        assert_eq!(body_json(get(&app, &uri).await).await["position"], 0);

        let response = send_json(&app, "PUT", "/api/v1/progress", json!({ "path": comic, "position": 14 })).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(get(&app, &uri).await).await["position"], 14);

        let response = send(&app, Request::delete(&uri).body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(body_json(get(&app, &uri).await).await["position"], 0);
    }
}
