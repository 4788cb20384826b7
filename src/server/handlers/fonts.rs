//! Font registry handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use std::sync::Arc;

use super::super::state::AppState;

#[derive(Debug, Serialize)]
pub struct FontList {
    pub families: Vec<String>,
}

/// Handle GET /api/fonts - list registered families.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<FontList> {
    let fonts = state.fonts.read().await;
    Json(FontList {
        families: fonts.families().into_iter().map(String::from).collect(),
    })
}

/// Handle DELETE /api/fonts/:family - unregister a family.
pub async fn remove(State(state): State<Arc<AppState>>, Path(family): Path<String>) -> StatusCode {
    if state.fonts.write().await.unregister(&family) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
