//! # Barcodes
//!
//! One-dimensional symbols encoded with barcoders. Every module is
//! [`MODULE_WIDTH`] pixels wide, every bar runs the full item height, and a
//! blank quiet zone of [`QUIET_ZONE`] modules sits on both sides:
//!
//! ```text
//! width = (QUIET_ZONE + modules + QUIET_ZONE) * MODULE_WIDTH
//! ```
//!
//! There is no human-readable text under the bars.

use barcoders::sym::code39::Code39;
use barcoders::sym::code93::Code93;
use barcoders::sym::code128::Code128;
use barcoders::sym::ean8::EAN8;
use barcoders::sym::ean13::EAN13;
use image::Rgba;

use super::surface::RasterSurface;
use super::threshold::{ThresholdPolicy, apply_threshold};
use crate::error::LabelError;
use crate::label::BarcodeType;

/// Pixels per barcode module.
pub const MODULE_WIDTH: u32 = 3;

/// Blank modules before and after the symbol.
pub const QUIET_ZONE: u32 = 10;

/// Code 128 character set selectors (A, B, C).
const CODE128_SETS: [char; 3] = ['\u{0100}', '\u{0181}', '\u{0106}'];

/// Encode `data` as bar modules, 1 for a bar and 0 for a space.
pub fn encode_modules(data: &str, code_type: BarcodeType) -> Result<Vec<u8>, LabelError> {
    if data.is_empty() {
        return Err(LabelError::Encode(format!("{} barcode has no data", code_type)));
    }
    let invalid = |e: barcoders::error::Error| {
        LabelError::Encode(format!("{} cannot encode '{}': {}", code_type, data, e))
    };

    match code_type {
        BarcodeType::Ean13 => EAN13::new(data).map(|b| b.encode()).map_err(invalid),
        BarcodeType::Ean8 => EAN8::new(data).map(|b| b.encode()).map_err(invalid),
        BarcodeType::Code39 => Code39::new(data).map(|b| b.encode()).map_err(invalid),
        BarcodeType::Code93 => Code93::new(data).map(|b| b.encode()).map_err(invalid),
        BarcodeType::Code128 => {
            let selected = if data.starts_with(CODE128_SETS) {
                data.to_string()
            } else {
                format!("{}{}", CODE128_SETS[1], data)
            };
            Code128::new(&selected).map(|b| b.encode()).map_err(invalid)
        }
    }
}

/// Draw `data` as full-height bars on a surface `height` rows tall.
pub fn render_barcode(
    data: &str,
    code_type: BarcodeType,
    height: u32,
    policy: &ThresholdPolicy,
) -> Result<RasterSurface, LabelError> {
    let modules = encode_modules(data, code_type)?;
    let width = (QUIET_ZONE * 2 + modules.len() as u32) * MODULE_WIDTH;

    let mut surface = RasterSurface::new(width, height);
    let bar = Rgba([0, 0, 0, 255]);
    for (i, _) in modules.iter().enumerate().filter(|&(_, &m)| m == 1) {
        let x = (QUIET_ZONE + i as u32) * MODULE_WIDTH;
        surface.fill_rect(x as i64, 0, MODULE_WIDTH, height, bar);
    }

    apply_threshold(&mut surface, &policy.uninverted());
    Ok(surface)
}
