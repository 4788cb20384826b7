//! Orientation and margins for finished item surfaces.
//!
//! Every item surface keeps the strip height, so the only rotation offered
//! is a half turn. Top and bottom margins shrink the box the rasterizer
//! draws into; left and right margins add blank columns.

use image::imageops;

use super::GuideLine;
use super::surface::RasterSurface;
use crate::label::{ItemStyle, Margins};

/// Rows left for content once the top and bottom margins are taken.
pub fn content_height(margins: &Margins, full_height: u32) -> u32 {
    full_height
        .saturating_sub(margins.top)
        .saturating_sub(margins.bottom)
}

/// Apply rotation, flips and margins, in that order.
pub fn place(surface: RasterSurface, style: &ItemStyle, full_height: u32) -> RasterSurface {
    let mut image = surface.into_image();
    if style.rotated {
        imageops::rotate180_in_place(&mut image);
    }
    if style.flipped_horizontal {
        imageops::flip_horizontal_in_place(&mut image);
    }
    if style.flipped_vertical {
        imageops::flip_vertical_in_place(&mut image);
    }
    let content = RasterSurface::from_image(image);

    let margins = &style.margins;
    if margins.is_zero() && content.height() == full_height {
        return content;
    }

    let width = margins.left + content.width() + margins.right;
    let mut placed = RasterSurface::new(width, full_height);
    placed.copy_from(&content, margins.left as i64, margins.top as i64);
    placed
}

/// Move guides of a `width × height` item surface to where [`place`] puts
/// that surface.
pub fn place_guides(
    guides: &[GuideLine],
    width: u32,
    height: u32,
    style: &ItemStyle,
) -> Vec<GuideLine> {
    let mirror_x = style.rotated ^ style.flipped_horizontal;
    let mirror_y = style.rotated ^ style.flipped_vertical;

    guides
        .iter()
        .filter(|g| g.y < height)
        .map(|g| {
            let x = if mirror_x {
                width.saturating_sub(g.x + g.width)
            } else {
                g.x
            };
            let y = if mirror_y { height - 1 - g.y } else { g.y };
            GuideLine {
                x: x + style.margins.left,
                width: g.width,
                y: y + style.margins.top,
            }
        })
        .collect()
}
