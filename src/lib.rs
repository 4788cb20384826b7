//! # Labelstrip - Label Strip Renderer
//!
//! Labelstrip renders a horizontal strip of label items (text, images, QR
//! codes, barcodes and spacers) into a fixed-height, two-level raster for label tape
//! printers. It provides:
//!
//! - **Label model**: ordered, keyed items with per-item threshold, invert,
//!   mask, orientation and margins
//! - **Rasterizers**: text with bitmap or TrueType faces, aspect-preserving
//!   images, QR symbols, barcodes
//! - **Thresholding**: alpha and brightness reduction to ink or background
//! - **Output**: PNG previews and PackBits raster transfer for the printer
//! - **Service**: an HTTP preview API
//!
//! ## Quick Start
//!
//! ```
//! use labelstrip::{
//!     fonts::FontRegistry,
//!     decode::ImageSlots,
//!     label::{Label, LabelItem},
//!     pipeline::render_label,
//!     render::RenderOptions,
//! };
//!
//! let label = Label::from_items(vec![
//!     LabelItem::text("title", "Hi", "24px spleen"),
//!     LabelItem::spacing("gap", 10),
//! ])?;
//!
//! let fonts = FontRegistry::with_builtin();
//! let strip = render_label(&label, &fonts, &ImageSlots::new(), &RenderOptions::default())?;
//!
//! assert_eq!(strip.width(), 34);
//! assert_eq!(strip.height(), 68);
//!
//! let bytes = strip.to_raster(&RenderOptions::default().tape)?;
//! assert!(!bytes.is_empty());
//! # Ok::<(), labelstrip::LabelError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`label`] | Label items and documents |
//! | [`fonts`] | Font registry and faces |
//! | [`render`] | Rasterizers, thresholding and composition |
//! | [`decode`] | Asynchronous image loading |
//! | [`pipeline`] | Whole-label rendering |
//! | [`raster`] | Printable buffer, PNG and printer encodings |
//! | [`printer`] | Tape geometry |
//! | [`server`] | HTTP preview service |
//! | [`error`] | Error types |

pub mod decode;
pub mod error;
pub mod fonts;
pub mod label;
pub mod pipeline;
pub mod printer;
pub mod raster;
pub mod render;
pub mod server;

// Re-exports for convenience
pub use error::LabelError;
pub use label::{Label, LabelItem};
pub use printer::TapeConfig;
pub use raster::PrintableBuffer;
