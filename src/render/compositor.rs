//! Left-to-right concatenation of item surfaces into one strip.

use super::surface::RasterSurface;

/// Join `items` side by side, with no gap, into a surface `height` rows tall.
///
/// Width is the sum of item widths; an empty slice gives a zero-width
/// strip.
pub fn compose(items: &[RasterSurface], height: u32) -> RasterSurface {
    let width = items.iter().map(RasterSurface::width).sum();
    let mut strip = RasterSurface::new(width, height);

    let mut x = 0i64;
    for item in items {
        strip.copy_from(item, x, 0);
        x += item.width() as i64;
    }
    strip
}
