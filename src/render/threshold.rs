//! # Threshold Compositor
//!
//! Converts an arbitrary-color, arbitrary-alpha surface into a strict
//! two-level ink/background surface.
//!
//! ## Algorithm
//!
//! Every pixel is decided on its own:
//!
//! ```text
//! alpha_above  = alpha > threshold                 (is it drawn content at all?)
//! bright_below = (r + g + b) / 3 < threshold       (is it dark?)
//! above        = alpha_above && (bright_below XOR inverted)
//! ink          = above XOR mask
//! ```
//!
//! Ink pixels become the ink color at alpha 255, background pixels get
//! alpha 0. Alpha gating lets fully opaque glyph ink and partially
//! transparent images share the same rule; `mask` is a second inversion
//! applied after the main decision and yields the stencil complement.
//!
//! ```
//! use labelstrip::label::InkColor;
//! use labelstrip::render::surface::RasterSurface;
//! use labelstrip::render::threshold::{ThresholdPolicy, apply_threshold};
//! use image::Rgba;
//!
//! let mut surface = RasterSurface::new(2, 1);
//! surface.put_pixel(0, 0, Rgba([0, 0, 0, 255]));       // black
//! surface.put_pixel(1, 0, Rgba([255, 255, 255, 255])); // white
//!
//! apply_threshold(&mut surface, &ThresholdPolicy::new(InkColor::BLACK));
//!
//! assert_eq!(surface.get_pixel(0, 0), Some(Rgba([0, 0, 0, 255])));
//! assert_eq!(surface.get_pixel(1, 0).unwrap()[3], 0);
//! ```

use rayon::prelude::*;

use super::surface::RasterSurface;
use crate::label::{InkColor, ItemStyle, Threshold};

/// How a surface is reduced to ink and background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdPolicy {
    pub threshold: Threshold,
    pub inverted: bool,
    pub mask: bool,
    pub ink: InkColor,
}

impl ThresholdPolicy {
    /// Default threshold (128), no invert, no mask.
    pub fn new(ink: InkColor) -> Self {
        Self {
            threshold: Threshold::default(),
            inverted: false,
            mask: false,
            ink,
        }
    }

    /// Policy taken from an item's style, honouring its `inverted` flag.
    pub fn from_style(style: &ItemStyle, ink: InkColor) -> Self {
        Self {
            threshold: style.threshold,
            inverted: style.inverted,
            mask: style.mask,
            ink,
        }
    }

    /// Same policy with `inverted` forced off.
    ///
    /// Text, QR and placeholder content is always thresholded uninverted,
    /// whatever the item says.
    pub fn uninverted(self) -> Self {
        Self {
            inverted: false,
            ..self
        }
    }

    /// Decide a single RGBA pixel.
    #[inline]
    pub fn is_ink(&self, [r, g, b, a]: [u8; 4]) -> bool {
        let threshold = self.threshold.value() as u32;
        let alpha_above = a as u32 > threshold;
        // (r + g + b) / 3 < t without the division
        let bright_below = (r as u32 + g as u32 + b as u32) < threshold * 3;
        let above = alpha_above && (bright_below != self.inverted);
        self.mask != above
    }
}

/// Rewrite every pixel of `surface` to ink or background.
pub fn apply_threshold(surface: &mut RasterSurface, policy: &ThresholdPolicy) {
    let InkColor { r, g, b } = policy.ink;
    surface
        .pixels_mut()
        .par_chunks_exact_mut(4)
        .for_each(|px| {
            let alpha = if policy.is_ink([px[0], px[1], px[2], px[3]]) {
                255
            } else {
                0
            };
            px.copy_from_slice(&[r, g, b, alpha]);
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn single(px: [u8; 4], policy: &ThresholdPolicy) -> [u8; 4] {
        let mut surface = RasterSurface::new(1, 1);
        surface.put_pixel(0, 0, Rgba(px));
        apply_threshold(&mut surface, policy);
        surface.get_pixel(0, 0).unwrap().0
    }

    fn policy(threshold: u8, inverted: bool, mask: bool) -> ThresholdPolicy {
        ThresholdPolicy {
            threshold: Threshold::from(threshold),
            inverted,
            mask,
            ink: InkColor::new(12, 34, 56),
        }
    }

    /// A spread of colors and alphas including the edge values.
    fn sample_pixels() -> Vec<[u8; 4]> {
        let levels = [0u8, 1, 63, 127, 128, 129, 200, 254, 255];
        let mut out = Vec::new();
        for &v in &levels {
            for &a in &levels {
                out.push([v, v, v, a]);
                out.push([v, 255 - v, v / 2, a]);
            }
        }
        out
    }

    #[test]
    fn test_black_is_ink_white_is_background() {
        let p = ThresholdPolicy::new(InkColor::BLACK);
        assert_eq!(single([0, 0, 0, 255], &p), [0, 0, 0, 255]);
        assert_eq!(single([255, 255, 255, 255], &p)[3], 0);
    }

    #[test]
    fn test_transparent_is_background() {
        let p = ThresholdPolicy::new(InkColor::BLACK);
        assert_eq!(single([0, 0, 0, 0], &p)[3], 0);
        // Alpha must be strictly above the threshold
        assert_eq!(single([0, 0, 0, 128], &p)[3], 0);
        assert_eq!(single([0, 0, 0, 129], &p)[3], 255);
    }

    #[test]
    fn test_output_is_strictly_two_level() {
        for threshold in [0u8, 1, 64, 128, 200, 254] {
            for inverted in [false, true] {
                for mask in [false, true] {
                    let p = policy(threshold, inverted, mask);
                    for px in sample_pixels() {
                        let out = single(px, &p);
                        assert!(out[3] == 0 || out[3] == 255, "alpha {} for {:?}", out[3], px);
                        if out[3] == 255 {
                            assert_eq!(&out[..3], &[12, 34, 56]);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_mask_exactly_inverts_decision() {
        for threshold in [0u8, 50, 128, 254] {
            for inverted in [false, true] {
                let plain = policy(threshold, inverted, false);
                let masked = policy(threshold, inverted, true);
                for px in sample_pixels() {
                    assert_ne!(plain.is_ink(px), masked.is_ink(px), "{:?}", px);
                }
            }
        }
    }

    #[test]
    fn test_inverted_flips_brightness_comparison() {
        let plain = policy(128, false, false);
        let inverted = policy(128, true, false);
        for px in sample_pixels() {
            if px[3] > 128 {
                assert_ne!(plain.is_ink(px), inverted.is_ink(px), "{:?}", px);
            } else {
                // Alpha gating wins regardless of direction
                assert!(!plain.is_ink(px) && !inverted.is_ink(px));
            }
        }
    }

    #[test]
    fn test_rethreshold_is_stable() {
        let p = ThresholdPolicy::new(InkColor::BLACK);
        let mut surface = RasterSurface::new(4, 1);
        surface.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        surface.put_pixel(1, 0, Rgba([255, 255, 255, 255]));
        surface.put_pixel(2, 0, Rgba([90, 90, 90, 200]));
        apply_threshold(&mut surface, &p);
        let once = surface.clone();
        apply_threshold(&mut surface, &p);
        assert_eq!(surface, once);
    }

    #[test]
    fn test_brightness_is_unweighted_mean() {
        let p = policy(100, false, false);
        // mean of (0, 0, 255) = 85 is below 100
        assert!(p.is_ink([0, 0, 255, 255]));
        // mean of (100, 100, 100) is not below 100
        assert!(!p.is_ink([100, 100, 100, 255]));
        // mean of (99, 100, 100) = 99.67 is below 100
        assert!(p.is_ink([99, 100, 100, 255]));
    }

    #[test]
    fn test_uninverted() {
        let style = ItemStyle {
            inverted: true,
            mask: true,
            ..ItemStyle::default()
        };
        let p = ThresholdPolicy::from_style(&style, InkColor::BLACK).uninverted();
        assert!(!p.inverted);
        assert!(p.mask);
    }
}
