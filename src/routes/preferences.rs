//! Reader preference API routes

use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;

use crate::error::Result;
use crate::state::AppState;
use crate::stores::ReaderPreferences;

/// Create the preferences router
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_preferences).patch(update_preferences))
}

/// Partial update; absent fields are left alone
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePreferences {
    dark_theme: Option<bool>,
    font_size: Option<u32>,
}

async fn get_preferences(State(state): State<AppState>) -> Result<Json<ReaderPreferences>> {
    Ok(Json(state.store().preferences()?))
}

async fn update_preferences(
    State(state): State<AppState>,
    Json(update): Json<UpdatePreferences>,
) -> Result<Json<ReaderPreferences>> {
    let store = state.store();
    if let Some(dark) = update.dark_theme {
        store.set_dark_theme(dark)?;
    }
    if let Some(size) = update.font_size {
        store.set_font_size(size)?;
    }
    Ok(Json(store.preferences()?))
}
