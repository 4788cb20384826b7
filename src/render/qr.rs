//! # QR Codes and Spacers
//!
//! QR symbols are drawn square, as tall as the item content box, with the
//! module size chosen so the whole symbol fits:
//!
//! ```text
//! module  = floor(height / modules)
//! padding = (height - modules * module) / 2
//! ```
//!
//! Spacers are blank surfaces of a fixed width.

use image::Rgba;
use qrcode::{Color, EcLevel, QrCode};

use super::surface::RasterSurface;
use super::threshold::{ThresholdPolicy, apply_threshold};
use crate::error::LabelError;

/// Geometry of a QR symbol inside a square surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrLayout {
    /// Modules per side
    pub modules: u32,
    /// Pixels per module
    pub module_size: u32,
    /// Blank pixels before the first module, on both axes
    pub padding: u32,
}

impl QrLayout {
    pub fn new(modules: u32, height: u32) -> Option<Self> {
        let module_size = height.checked_div(modules)?;
        if module_size == 0 {
            return None;
        }
        Some(Self {
            modules,
            module_size,
            padding: (height - modules * module_size) / 2,
        })
    }
}

/// Draw `data` as a QR symbol (error correction level L) on a
/// `height × height` surface.
///
/// Fails when the data fits no symbol version, or when the symbol has
/// more modules than the surface has rows.
pub fn render_qr(data: &str, height: u32, policy: &ThresholdPolicy) -> Result<RasterSurface, LabelError> {
    let code = QrCode::with_error_correction_level(data, EcLevel::L)
        .map_err(|e| LabelError::Encode(format!("QR data does not fit: {}", e)))?;

    let modules = code.width() as u32;
    let layout = QrLayout::new(modules, height).ok_or_else(|| {
        LabelError::Encode(format!(
            "QR symbol needs {} rows, only {} available",
            modules, height
        ))
    })?;

    let mut surface = RasterSurface::new(height, height);
    let dark = Rgba([0, 0, 0, 255]);
    for qy in 0..modules {
        for qx in 0..modules {
            if code[(qx as usize, qy as usize)] != Color::Dark {
                continue;
            }
            surface.fill_rect(
                (layout.padding + qx * layout.module_size) as i64,
                (layout.padding + qy * layout.module_size) as i64,
                layout.module_size,
                layout.module_size,
                dark,
            );
        }
    }

    apply_threshold(&mut surface, &policy.uninverted());
    Ok(surface)
}

/// A blank `width × height` item, thresholded so `mask` fills it.
pub fn render_spacer(width: u32, height: u32, policy: &ThresholdPolicy) -> RasterSurface {
    let mut surface = RasterSurface::new(width, height);
    apply_threshold(&mut surface, policy);
    surface
}
