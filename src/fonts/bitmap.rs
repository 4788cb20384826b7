//! Built-in bitmap faces backed by the Spleen font family.
//!
//! Bitmap faces are deterministic on every platform, which makes them the
//! reference font for tests and the glyph source for placeholders. Glyphs are
//! scaled to the requested pixel size with nearest-neighbour sampling.

use image::Rgba;
use spleen_font::{FONT_6X12, FONT_12X24, PSF2Font};

use super::TextMetrics;
use crate::render::surface::RasterSurface;

/// One fixed cell size of a bitmap family.
#[derive(Debug, Clone, Copy)]
struct Strike {
    data: &'static [u8],
    cell_width: u32,
    cell_height: u32,
    /// Rows from the top of the cell down to the baseline
    ascent: u32,
}

impl Strike {
    /// Glyph bitmap, row-major, `cell_width × cell_height`.
    fn glyph(&self, ch: char) -> Option<Vec<bool>> {
        let mut font = PSF2Font::new(self.data).ok()?;
        let utf8 = ch.to_string();
        let glyph = font.glyph_for_utf8(utf8.as_bytes())?;

        let w = self.cell_width as usize;
        let mut bits = vec![false; w * self.cell_height as usize];
        for (row_y, row) in glyph.enumerate() {
            for (col_x, on) in row.enumerate() {
                let idx = row_y * w + col_x;
                if col_x < w && idx < bits.len() {
                    bits[idx] = on;
                }
            }
        }
        Some(bits)
    }

    /// Hollow box drawn for characters the font does not cover.
    fn missing_glyph(&self) -> Vec<bool> {
        let w = self.cell_width as usize;
        let h = self.cell_height as usize;
        let top = h - self.ascent as usize;
        let mut bits = vec![false; w * h];
        for y in top..self.ascent as usize {
            for x in 1..w - 1 {
                let edge = y == top || y + 1 == self.ascent as usize || x == 1 || x + 2 == w;
                bits[y * w + x] = edge;
            }
        }
        bits
    }

    fn glyph_or_box(&self, ch: char) -> Vec<bool> {
        self.glyph(ch).unwrap_or_else(|| self.missing_glyph())
    }
}

fn spleen_6x12() -> Strike {
    Strike {
        data: &FONT_6X12[..],
        cell_width: 6,
        cell_height: 12,
        ascent: 10,
    }
}

fn spleen_12x24() -> Strike {
    Strike {
        data: &FONT_12X24[..],
        cell_width: 12,
        cell_height: 24,
        ascent: 19,
    }
}

/// A scalable bitmap face made of one or more strikes.
#[derive(Debug, Clone)]
pub struct BitmapFace {
    /// Sorted by ascending cell height
    strikes: Vec<Strike>,
}

impl BitmapFace {
    /// The Spleen family (6×12 and 12×24 strikes).
    pub fn spleen() -> Self {
        Self {
            strikes: vec![spleen_6x12(), spleen_12x24()],
        }
    }

    /// Largest strike not taller than the requested size, else the smallest.
    fn strike_for(&self, size_px: f32) -> (Strike, f32) {
        let strike = self
            .strikes
            .iter()
            .rev()
            .find(|s| s.cell_height as f32 <= size_px)
            .or_else(|| self.strikes.first())
            .copied()
            .unwrap_or_else(spleen_6x12);
        (strike, size_px / strike.cell_height as f32)
    }

    pub fn measure(&self, text: &str, size_px: f32) -> TextMetrics {
        let (strike, scale) = self.strike_for(size_px);
        let chars = text.chars().count() as f32;

        let actual_rows = text
            .chars()
            .filter_map(|ch| {
                let bits = strike.glyph_or_box(ch);
                let w = strike.cell_width as usize;
                bits.chunks(w)
                    .position(|row| row.iter().any(|&on| on))
                    .map(|top| strike.ascent as f32 - top as f32)
            })
            .fold(0.0f32, f32::max);

        TextMetrics {
            width: chars * strike.cell_width as f32 * scale,
            ascent: strike.ascent as f32 * scale,
            descent: (strike.cell_height - strike.ascent) as f32 * scale,
            actual_ascent: actual_rows * scale,
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
        let (strike, scale) = self.strike_for(size_px);
        let w = strike.cell_width as usize;
        let h = strike.cell_height as usize;
        let out_w = (strike.cell_width as f32 * scale).ceil() as i64;
        let out_h = (strike.cell_height as f32 * scale).ceil() as i64;
        let top = (baseline_y - strike.ascent as f32 * scale).round() as i64;

        for (i, ch) in text.chars().enumerate() {
            let bits = strike.glyph_or_box(ch);
            let left = (origin_x + i as f32 * strike.cell_width as f32 * scale).round() as i64;

            for dy in 0..out_h {
                let sy = ((dy as f32 + 0.5) / scale) as usize;
                if sy >= h {
                    continue;
                }
                for dx in 0..out_w {
                    let sx = ((dx as f32 + 0.5) / scale) as usize;
                    if sx < w && bits[sy * w + sx] {
                        surface.put_pixel(left + dx, top + dy, color);
                    }
                }
            }
        }
    }
}
