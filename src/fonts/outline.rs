//! Outline (TrueType/OpenType) faces rendered with ab_glyph.
//!
//! Sizes follow the CSS convention: `size_px` is the em size, not the
//! ascent-to-descent height ab_glyph uses for its `PxScale`.

use std::path::Path;

use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use image::Rgba;

use super::TextMetrics;
use crate::error::LabelError;
use crate::render::surface::RasterSurface;

/// Coverage at or above which a pixel counts as glyph ink.
const COVERAGE_CUTOFF: f32 = 0.5;

#[derive(Clone)]
pub struct OutlineFace {
    font: FontArc,
}

impl std::fmt::Debug for OutlineFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineFace")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl OutlineFace {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, LabelError> {
        let font = FontArc::try_from_vec(data)
            .map_err(|e| LabelError::Font(format!("Invalid font data: {}", e)))?;
        Ok(Self { font })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LabelError> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| LabelError::Font(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_bytes(data)
    }

    /// ab_glyph scale whose em square is `size_px` pixels.
    fn px_scale(&self, size_px: f32) -> PxScale {
        let units_per_em = self.font.units_per_em().unwrap_or(1000.0);
        PxScale::from(size_px * self.font.height_unscaled() / units_per_em)
    }

    /// Glyph ids with their pen x positions, plus the total advance.
    fn layout(&self, text: &str, scale: PxScale) -> (Vec<(GlyphId, f32)>, f32) {
        let scaled = self.font.as_scaled(scale);
        let mut glyphs = Vec::new();
        let mut caret_x = 0.0f32;
        let mut prev: Option<GlyphId> = None;

        for ch in text.chars() {
            let glyph_id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                caret_x += scaled.kern(prev, glyph_id);
            }
            glyphs.push((glyph_id, caret_x));
            caret_x += scaled.h_advance(glyph_id);
            prev = Some(glyph_id);
        }

        (glyphs, caret_x)
    }

    pub fn measure(&self, text: &str, size_px: f32) -> TextMetrics {
        let scale = self.px_scale(size_px);
        let scaled = self.font.as_scaled(scale);
        let (glyphs, width) = self.layout(text, scale);

        let actual_ascent = glyphs
            .iter()
            .filter_map(|&(id, x)| {
                let glyph = id.with_scale_and_position(scale, point(x, 0.0));
                self.font
                    .outline_glyph(glyph)
                    .map(|outlined| -outlined.px_bounds().min.y)
            })
            .fold(0.0f32, f32::max);

        TextMetrics {
            width,
            ascent: scaled.ascent(),
            descent: -scaled.descent(),
            actual_ascent,
        }
    }

    pub fn draw(
        &self,
        text: &str,
        size_px: f32,
        origin_x: f32,
        baseline_y: f32,
        surface: &mut RasterSurface,
        color: Rgba<u8>,
    ) {
        let scale = self.px_scale(size_px);
        let (glyphs, _) = self.layout(text, scale);

        for (id, x) in glyphs {
            let glyph = id.with_scale_and_position(scale, point(origin_x + x, baseline_y));
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|px, py, coverage| {
                    if coverage >= COVERAGE_CUTOFF {
                        surface.put_pixel(
                            px as i64 + bounds.min.x as i64,
                            py as i64 + bounds.min.y as i64,
                            color,
                        );
                    }
                });
            }
        }
    }
}
