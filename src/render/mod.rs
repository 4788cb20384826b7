//! # Rendering Module
//!
//! Turns label items into two-level raster strips.
//!
//! ## Modules
//!
//! - [`surface`]: RGBA scratch buffer owned by one rasterizer at a time
//! - [`threshold`]: Reduction of a surface to ink and background
//! - [`converge`]: Bounded measure/resize/draw loop
//! - [`text`]: Text runs drawn with a registered face
//! - [`image`]: Decoded images scaled to the strip height
//! - [`qr`]: QR symbols and blank spacers
//! - [`barcode`]: One-dimensional barcodes
//! - [`placement`]: Rotation, mirroring and margins
//! - [`compositor`]: Left-to-right concatenation of item surfaces
//!
//! ## Pipeline
//!
//! ```text
//! item ──► rasterizer ──► threshold ──► placement ──┐
//! item ──► rasterizer ──► threshold ──► placement ──┼──► compose ──► strip
//! item ──► rasterizer ──► threshold ──► placement ──┘
//! ```
//!
//! ## Usage Example
//!
//! ```
//! use labelstrip::fonts::FontRegistry;
//! use labelstrip::label::InkColor;
//! use labelstrip::render::surface::RasterSurface;
//! use labelstrip::render::text::TextRasterizer;
//! use labelstrip::render::threshold::ThresholdPolicy;
//!
//! let fonts = FontRegistry::with_builtin();
//! let mut surface = RasterSurface::new(200, 68);
//! let policy = ThresholdPolicy::new(InkColor::BLACK);
//!
//! TextRasterizer::new(&fonts)
//!     .render("title", "Hi", "24px spleen", &policy, &mut surface)
//!     .unwrap();
//! assert_eq!(surface.width(), 24);
//! ```

use std::fmt;

use serde::Serialize;

use crate::label::InkColor;
use crate::printer::TapeConfig;

pub mod barcode;
pub mod compositor;
pub mod converge;
pub mod image;
pub mod placement;
pub mod qr;
pub mod surface;
pub mod text;
pub mod threshold;

pub use compositor::compose;
pub use converge::{Convergence, PassOutcome, converge};
pub use surface::RasterSurface;
pub use threshold::{ThresholdPolicy, apply_threshold};

/// Options shared by every item of one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Color written to ink pixels
    pub ink: InkColor,
    /// Collect ascent/descent guides of text items for the preview
    pub debug_lines: bool,
    pub tape: TapeConfig,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            ink: InkColor::BLACK,
            debug_lines: false,
            tape: TapeConfig::default(),
        }
    }
}

/// Why an item was drawn as a placeholder or left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Font family is not registered; the item has zero width
    FontNotReady,
    /// Font string could not be parsed; the item has zero width
    InvalidFont,
    /// Image decode has not finished; the item has zero width
    ImagePending,
    /// Image could not be fetched or decoded; a placeholder was drawn
    ImageUnavailable,
    /// QR data does not fit any symbol version; a placeholder was drawn
    QrOverflow,
    /// Barcode data is not valid for its symbology; a placeholder was drawn
    BarcodeInvalid,
    /// Item width kept changing between passes; the item has zero width
    NotConverged,
}

/// A horizontal guide line drawn over the preview only.
///
/// Coordinates are those of the surface the guide belongs to: an item
/// surface while rendering, the strip once composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuideLine {
    pub x: u32,
    pub width: u32,
    pub y: u32,
}

/// A recoverable problem with one item.
///
/// Notices never abort a render. The strip is always produced and the
/// notices tell the caller which items did not come out as described.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub key: String,
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(key: impl Into<String>, kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}
