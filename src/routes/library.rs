//! Library API routes
//!
//! Endpoints:
//! - GET /api/v1/library - List shelves (`category`, `favoritesOnly`, `query`)
//! - POST /api/v1/library/import - Store the request body as a new file
//! - POST /api/v1/library/rename - Rename a file, keeping its extension
//! - DELETE /api/v1/library?path= - Delete a file and its cover

use std::path::{Path, PathBuf};

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::BookQuery;
use crate::error::Result;
use crate::library::{Category, LibraryItem, ScanOptions};
use crate::state::AppState;

/// Create the library router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).delete(delete_item))
        .route("/import", post(import_file))
        .route("/rename", post(rename_file))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportQuery {
    file_name: String,
    #[serde(default)]
    category: Category,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenameRequest {
    path: String,
    new_name: String,
}

#[derive(Debug, Serialize)]
struct PathResponse {
    path: PathBuf,
}

/// List library items, extracting missing covers
async fn list_items(
    State(state): State<AppState>,
    Query(options): Query<ScanOptions>,
) -> Result<Json<Vec<LibraryItem>>> {
    let items = tokio::task::spawn_blocking(move || {
        state
            .layout()
            .scan(&options, state.store(), state.covers())
    })
    .await??;
    Ok(Json(items))
}

/// Import the raw request body into a shelf
async fn import_file(
    State(state): State<AppState>,
    Query(query): Query<ImportQuery>,
    body: Bytes,
) -> Result<(StatusCode, Json<PathResponse>)> {
    let path = tokio::task::spawn_blocking(move || {
        state
            .layout()
            .import_reader(&mut body.as_ref(), &query.file_name, query.category)
    })
    .await??;
    Ok((StatusCode::CREATED, Json(PathResponse { path })))
}

/// Rename a file; favorites and progress follow it
async fn rename_file(
    State(state): State<AppState>,
    Json(request): Json<RenameRequest>,
) -> Result<Json<PathResponse>> {
    let path = state
        .layout()
        .rename(Path::new(&request.path), &request.new_name, state.store())?;
    Ok(Json(PathResponse { path }))
}

async fn delete_item(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> Result<StatusCode> {
    state.layout().delete(Path::new(&query.path))?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tempfile::TempDir;

    use super::*;
    use crate::routes::tests::{body_json, get, q, send, send_json, test_app};
    use crate::stores::FavoritesStore;

    async fn import(app: &Router, uri: &str, bytes: &'static [u8]) -> axum::response::Response {
        send(app, Request::post(uri).body(Body::from(bytes)).unwrap()).await
    }

    #[tokio::test]
    async fn test_import_list_rename_delete() {
        let temp_dir = TempDir::new().unwrap();
        let (app, state) = test_app(&temp_dir);

        let response = import(&app, "/api/v1/library/import?fileName=Notes.pdf&category=book", b"%PDF").await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let imported = PathBuf::from(body_json(response).await["path"].as_str().unwrap());
        assert!(imported.ends_with("Books/Notes.pdf"));

        let items = body_json(get(&app, "/api/v1/library?category=book").await).await;
        assert_eq!(items.as_array().unwrap().len(), 1);
        assert_eq!(items[0]["title"], "Notes");
        assert_eq!(items[0]["contentType"], "pdf");
        let listed = PathBuf::from(items[0]["path"].as_str().unwrap());

        state.store().set_favorite(&listed.to_string_lossy(), true).unwrap();
        let response = send_json(
            &app,
            "POST",
            "/api/v1/library/rename",
            serde_json::json!({ "path": listed, "newName": "Field Notes" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let renamed = PathBuf::from(body_json(response).await["path"].as_str().unwrap());
        assert!(state.store().is_favorite(&renamed.to_string_lossy()).unwrap());

        let uri = format!("/api/v1/library?path={}", q(&renamed));
        let response = send(&app, Request::delete(uri).body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(!renamed.exists());
    }

    #[tokio::test]
    async fn test_import_rejections() {
        let temp_dir = TempDir::new().unwrap();
        let (app, _) = test_app(&temp_dir);

        let response = import(&app, "/api/v1/library/import?fileName=notes.txt", b"text").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let uri = "/api/v1/library/import?fileName=issue.cbz&category=manga";
        assert_eq!(import(&app, uri, b"zip").await.status(), StatusCode::CREATED);
        assert_eq!(import(&app, uri, b"zip").await.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_delete_outside_library_is_forbidden() {
        let temp_dir = TempDir::new().unwrap();
        let (app, _) = test_app(&temp_dir);
        let outside = temp_dir.path().join("outside.pdf");
        std::fs::write(&outside, b"%PDF").unwrap();

        let uri = format!("/api/v1/library?path={}", q(&outside));
        let response = send(&app, Request::delete(uri).body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(outside.exists());
    }
}
