//! Favorites API routes

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

/// Create the favorites router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_favorites))
        .route("/toggle", post(toggle_favorite))
}

#[derive(Debug, Deserialize)]
struct ToggleRequest {
    path: String,
}

#[derive(Debug, Serialize)]
struct FavoriteResponse {
    path: String,
    favorite: bool,
}

async fn list_favorites(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.store().favorites()?))
}

/// Flip the favorite flag of a library file
async fn toggle_favorite(
    State(state): State<AppState>,
    Json(request): Json<ToggleRequest>,
) -> Result<Json<FavoriteResponse>> {
    let path = state.book_key(&request.path)?;
    let favorite = state.store().toggle_favorite(&path)?;
    Ok(Json(FavoriteResponse { path, favorite }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::library::Category;
    use crate::routes::tests::{body_json, get, send_json, test_app};

    #[tokio::test]
    async fn test_toggle_twice() {
        let temp_dir = TempDir::new().unwrap();
        let (app, state) = test_app(&temp_dir);
        let book = state.layout().category_dir(Category::Book).join("a.pdf");
        std::fs::write(&book, b"%PDF").unwrap();

        let response = send_json(&app, "POST", "/api/v1/favorites/toggle", json!({ "path": book })).await;
        assert_eq!(body_json(response).await["favorite"], true);
        let listed = body_json(get(&app, "/api/v1/favorites").await).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let response = send_json(&app, "POST", "/api/v1/favorites/toggle", json!({ "path": book })).await;
        assert_eq!(body_json(response).await["favorite"], false);
        assert_eq!(body_json(get(&app, "/api/v1/favorites").await).await, json!([]));
    }

    #[tokio::test]
    async fn test_unknown_book_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let (app, _) = test_app(&temp_dir);
        let missing = temp_dir.path().join("library/Books/missing.pdf");

        let response = send_json(&app, "POST", "/api/v1/favorites/toggle", json!({ "path": missing })).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
