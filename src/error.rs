//! # Error Types
//!
//! This module defines error types used throughout the labelstrip library.
//!
//! Only genuine failures live here. Deferred states (a font that is not
//! loaded yet, an image decode still in flight) are modelled as render
//! outcomes, and recoverable content failures are reported as
//! [`Notice`](crate::render::Notice)s so a label can always be completed.

use thiserror::Error;

/// Main error type for labelstrip operations
#[derive(Debug, Error)]
pub enum LabelError {
    /// Font data could not be loaded or parsed
    #[error("Font error: {0}")]
    Font(String),

    /// A `"<size>px <family>"` font string could not be parsed
    #[error("Invalid font specification: {0}")]
    FontSpec(String),

    /// Image processing error
    #[error("Image error: {0}")]
    Image(String),

    /// Fetching or decoding an image source failed
    #[error("Decode error: {0}")]
    Decode(String),

    /// An item with this key already exists in the label
    #[error("Duplicate item key '{0}'")]
    DuplicateKey(String),

    /// No item with this key exists in the label
    #[error("Unknown item key '{0}'")]
    UnknownKey(String),

    /// A rasterizer kept resizing its surface instead of settling on a width
    #[error("Width of item '{key}' did not converge after {passes} passes")]
    NotConverged { key: String, passes: usize },

    /// Printer raster or QR symbol encoding error
    #[error("Encode error: {0}")]
    Encode(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
