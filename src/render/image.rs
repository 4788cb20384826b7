//! # Image Rasterizer
//!
//! Scales a decoded image to the strip height, keeping its aspect ratio,
//! and thresholds it with the item's full policy (including `inverted`).
//!
//! Images that cannot be fetched or decoded get a fixed-width placeholder
//! with a question mark so the strip still shows where they belong.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba};

use super::converge::{Convergence, PassOutcome, converge};
use super::surface::RasterSurface;
use super::threshold::{ThresholdPolicy, apply_threshold};
use crate::error::LabelError;
use crate::fonts::BitmapFace;

/// Width of the placeholder drawn for an unusable image.
pub const PLACEHOLDER_WIDTH: u32 = 100;

/// Width of an image scaled to `target_height`, rounded half up.
///
/// Returns `None` for images with no pixels.
pub fn scaled_width(natural_width: u32, natural_height: u32, target_height: u32) -> Option<u32> {
    if natural_width == 0 || natural_height == 0 {
        return None;
    }
    let num = natural_width as u64 * target_height as u64;
    let den = natural_height as u64;
    u32::try_from((2 * num + den) / (2 * den)).ok()
}

/// Stateless rasterizer for image items.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRasterizer;

impl ImageRasterizer {
    pub fn new() -> Self {
        Self
    }

    pub fn render_pass(
        &self,
        image: &DynamicImage,
        policy: &ThresholdPolicy,
        surface: &mut RasterSurface,
    ) -> PassOutcome {
        let height = surface.height();
        let Some(width) = scaled_width(image.width(), image.height(), height) else {
            return PassOutcome::Skipped("image has no pixels".to_string());
        };

        if surface.width() != width {
            let from = surface.width();
            surface.resize(width);
            return PassOutcome::Resized { from, to: width };
        }

        surface.clear();
        if width > 0 && height > 0 {
            let scaled = imageops::resize(&image.to_rgba8(), width, height, FilterType::Nearest);
            surface.copy_from(&RasterSurface::from_image(scaled), 0, 0);
        }
        apply_threshold(surface, policy);
        PassOutcome::Drawn
    }

    pub fn render(
        &self,
        key: &str,
        image: &DynamicImage,
        policy: &ThresholdPolicy,
        surface: &mut RasterSurface,
    ) -> Result<Convergence, LabelError> {
        converge(key, surface, |s| self.render_pass(image, policy, s))
    }
}

/// A `PLACEHOLDER_WIDTH × height` surface with a centered "?".
///
/// Thresholded uninverted so the glyph reads the same whatever the item
/// asked for.
pub fn placeholder(height: u32, policy: &ThresholdPolicy) -> RasterSurface {
    let mut surface = RasterSurface::new(PLACEHOLDER_WIDTH, height);
    let face = BitmapFace::spleen();
    let size = (height as f32 * 0.75).floor().max(1.0);
    let metrics = face.measure("?", size);

    let x = ((PLACEHOLDER_WIDTH as f32 - metrics.width) / 2.0).max(0.0);
    let baseline = (height as f32 + metrics.ascent - metrics.descent) / 2.0;
    face.draw("?", size, x, baseline, &mut surface, Rgba([0, 0, 0, 255]));

    apply_threshold(&mut surface, &policy.uninverted());
    surface
}
