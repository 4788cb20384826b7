//! Server state and configuration.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::decode::SourceLoader;
use crate::fonts::FontRegistry;
use crate::render::RenderOptions;

/// Default listen address for `labelstrip serve`.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Options applied to every render; the request may override ink and
    /// guide lines
    pub render: RenderOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            render: RenderOptions::default(),
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub fonts: Arc<RwLock<FontRegistry>>,
    /// Shared so decoded images are cached across requests
    pub loader: Arc<dyn SourceLoader>,
}

impl AppState {
    pub fn new(config: ServerConfig, fonts: FontRegistry, loader: Arc<dyn SourceLoader>) -> Self {
        Self {
            config,
            fonts: Arc::new(RwLock::new(fonts)),
            loader,
        }
    }
}
