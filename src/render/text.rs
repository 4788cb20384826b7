//! # Text Rasterizer
//!
//! Measures and draws a single run of text into a fixed-height surface.
//!
//! ## Vertical layout
//!
//! ```text
//! text_height     = ascent + descent + descent
//! vertical_offset = (surface_height - text_height) / 2
//! baseline        = vertical_offset + actual_ascent + descent
//! ```
//!
//! The descent is counted twice in `text_height`. That is what the label
//! editor has always done and existing labels depend on the resulting
//! placement, so it is kept as is even though it looks like a slip.

use image::Rgba;

use super::GuideLine;
use super::converge::{Convergence, PassOutcome, converge};
use super::surface::RasterSurface;
use super::threshold::{ThresholdPolicy, apply_threshold};
use crate::error::LabelError;
use crate::fonts::{FontRegistry, TextMetrics};
use crate::label::FontSpec;

/// Width of a fresh text surface before the first measurement.
pub const INITIAL_WIDTH: u32 = 200;

/// Glyphs are drawn opaque black before thresholding.
const GLYPH_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Vertical placement of a text run inside a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLayout {
    pub text_height: f32,
    pub vertical_offset: f32,
    pub baseline: f32,
    ascent: f32,
    descent: f32,
}

impl TextLayout {
    pub fn new(metrics: &TextMetrics, surface_height: u32) -> Self {
        let text_height = metrics.ascent + metrics.descent + metrics.descent;
        let vertical_offset = (surface_height as f32 - text_height) / 2.0;
        Self {
            text_height,
            vertical_offset,
            baseline: vertical_offset + metrics.actual_ascent + metrics.descent,
            ascent: metrics.ascent,
            descent: metrics.descent,
        }
    }

    /// Rows of the four guide lines, top to bottom.
    pub fn guide_rows(&self) -> [f32; 4] {
        [
            self.vertical_offset,
            self.vertical_offset + self.descent,
            self.vertical_offset + self.ascent + self.descent,
            self.vertical_offset + self.text_height,
        ]
    }

    /// Guide rows as full-width lines, dropping rows outside the surface.
    pub fn guide_lines(&self, width: u32, height: u32) -> Vec<GuideLine> {
        self.guide_rows()
            .iter()
            .map(|row| row.round())
            .filter(|&y| y >= 0.0 && y < height as f32)
            .map(|y| GuideLine {
                x: 0,
                width,
                y: y as u32,
            })
            .collect()
    }
}

/// Renders text items using faces from a [`FontRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct TextRasterizer<'a> {
    fonts: &'a FontRegistry,
}

impl<'a> TextRasterizer<'a> {
    pub fn new(fonts: &'a FontRegistry) -> Self {
        Self { fonts }
    }

    /// Measure `text`, or `None` if the font is malformed or not loaded.
    pub fn measure(&self, text: &str, font: &str) -> Option<TextMetrics> {
        let spec: FontSpec = font.parse().ok()?;
        let face = self.fonts.face(&spec)?;
        Some(face.measure(text, spec.size_px as f32))
    }

    /// One pass: measure, resize if the width changed, otherwise draw and
    /// threshold.
    ///
    /// Text is always thresholded uninverted, whatever `policy.inverted`
    /// says.
    pub fn render_pass(
        &self,
        text: &str,
        font: &str,
        policy: &ThresholdPolicy,
        surface: &mut RasterSurface,
    ) -> PassOutcome {
        let spec: FontSpec = match font.parse() {
            Ok(spec) => spec,
            Err(e) => return PassOutcome::Skipped(e.to_string()),
        };
        let Some(face) = self.fonts.face(&spec) else {
            return PassOutcome::Deferred;
        };

        let size = spec.size_px as f32;
        let metrics = face.measure(text, size);
        let min_width = metrics.width.max(0.0).ceil() as u32;
        if surface.width() != min_width {
            let from = surface.width();
            surface.resize(min_width);
            return PassOutcome::Resized {
                from,
                to: min_width,
            };
        }

        surface.clear();
        let layout = TextLayout::new(&metrics, surface.height());
        face.draw(text, size, 0.0, layout.baseline, surface, GLYPH_COLOR);

        apply_threshold(surface, &policy.uninverted());
        PassOutcome::Drawn
    }

    /// Ascent/descent guides for `text` drawn on `surface`.
    ///
    /// Empty when the font cannot be resolved. The guides are never part of
    /// the surface itself.
    pub fn guides(&self, text: &str, font: &str, surface: &RasterSurface) -> Vec<GuideLine> {
        match self.measure(text, font) {
            Some(metrics) => TextLayout::new(&metrics, surface.height())
                .guide_lines(surface.width(), surface.height()),
            None => Vec::new(),
        }
    }

    /// Run passes until the width is stable.
    pub fn render(
        &self,
        key: &str,
        text: &str,
        font: &str,
        policy: &ThresholdPolicy,
        surface: &mut RasterSurface,
    ) -> Result<Convergence, LabelError> {
        converge(key, surface, |s| self.render_pass(text, font, policy, s))
    }
}
