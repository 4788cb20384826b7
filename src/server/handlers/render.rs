//! Label rendering handlers.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderName, StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::LabelError;
use crate::label::LabelDocument;
use crate::pipeline::{LabelSession, render_label};
use crate::raster::PrintableBuffer;

use super::super::state::AppState;
use super::error_response;

/// Number of notices raised while rendering.
pub const NOTICES_HEADER: HeaderName = HeaderName::from_static("x-label-notices");

#[derive(Debug, Default, Deserialize)]
pub struct RenderQuery {
    /// Overlay text guide lines on the preview
    #[serde(default)]
    pub debug_lines: bool,
}

/// Handle POST /api/render - render a label document as PNG.
pub async fn png(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RenderQuery>,
    body: Bytes,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let buffer = render(&state, &body, query.debug_lines)
        .await
        .map_err(error_response)?;
    let png = buffer.to_png().map_err(error_response)?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (NOTICES_HEADER, buffer.notices.len().to_string()),
        ],
        png,
    ))
}

/// Handle POST /api/render/raster - render a label document as raster
/// transfer bytes.
pub async fn raster(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let buffer = render(&state, &body, false).await.map_err(error_response)?;
    let bytes = buffer
        .to_raster(&state.config.render.tape)
        .map_err(error_response)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (NOTICES_HEADER, buffer.notices.len().to_string()),
        ],
        bytes,
    ))
}

async fn render(
    state: &AppState,
    body: &[u8],
    debug_lines: bool,
) -> Result<PrintableBuffer, LabelError> {
    let doc: LabelDocument = serde_json::from_slice(body)?;
    let (label, ink) = doc.into_label()?;

    let mut options = state.config.render;
    options.ink = ink;
    options.debug_lines = debug_lines;

    // Decode before taking the font lock so slow downloads never hold it
    let mut session = LabelSession::new(Arc::clone(&state.loader), options);
    session.load_images(&label).await;

    let fonts = state.fonts.read().await;
    render_label(&label, &fonts, session.slots(), session.options())
}
