//! # HTTP Preview Service
//!
//! Renders label documents over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! labelstrip serve --listen 0.0.0.0:8080 --font inter=/usr/share/fonts/Inter.ttf
//! ```
//!
//! ## Routes
//!
//! | Method   | Path                  | Response                              |
//! |----------|-----------------------|---------------------------------------|
//! | `POST`   | `/api/render`         | PNG preview, `X-Label-Notices` header |
//! | `POST`   | `/api/render/raster`  | raster transfer bytes                 |
//! | `GET`    | `/api/fonts`          | `{"families": [...]}`                 |
//! | `DELETE` | `/api/fonts/:family`  | 204, or 404 for unknown families      |

mod handlers;
mod state;

pub use handlers::render::NOTICES_HEADER;
pub use state::{AppState, DEFAULT_LISTEN_ADDR, ServerConfig};

use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::LabelError;

/// Build the application router around shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/render", post(handlers::render::png))
        .route("/api/render/raster", post(handlers::render::raster))
        .route("/api/fonts", get(handlers::fonts::list))
        .route("/api/fonts/:family", delete(handlers::fonts::remove))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use std::sync::Arc;
/// use labelstrip::decode::DefaultLoader;
/// use labelstrip::fonts::FontRegistry;
/// use labelstrip::server::{AppState, ServerConfig, serve};
///
/// # async fn example() -> Result<(), labelstrip::error::LabelError> {
/// let state = AppState::new(
///     ServerConfig::default(),
///     FontRegistry::with_builtin(),
///     Arc::new(DefaultLoader::new()?),
/// );
/// serve(state).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(state: AppState) -> Result<(), LabelError> {
    let listen_addr = state.config.listen_addr.clone();
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| {
            LabelError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to bind to {}: {}", listen_addr, e),
            ))
        })?;

    info!(addr = %listen_addr, "Label preview server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
