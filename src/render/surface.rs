//! Raster surfaces: the RGBA buffer every item renders into.
//!
//! A surface has a fixed height and a width that is discovered while
//! rendering. Resizing never preserves content; whoever resizes a surface
//! must redraw it.

use image::{Rgba, RgbaImage};

/// Fully transparent pixel.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Addressable RGBA pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterSurface {
    image: RgbaImage,
}

impl RasterSurface {
    /// Create a fully transparent `width × height` surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// Wrap an existing image.
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Change the width, keeping the height. Content is reset to transparent.
    pub fn resize(&mut self, new_width: u32) {
        self.image = RgbaImage::new(new_width, self.image.height());
    }

    /// Reset every pixel to transparent without changing dimensions.
    pub fn clear(&mut self) {
        for px in self.image.pixels_mut() {
            *px = TRANSPARENT;
        }
    }

    /// Raw RGBA bytes, row-major, four bytes per pixel.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Mutable raw RGBA bytes, row-major, four bytes per pixel.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }

    /// Pixel at (x, y), or `None` outside the surface.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    /// Overwrite a pixel. Coordinates outside the surface are ignored.
    pub fn put_pixel(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if let Some((x, y)) = self.clip(x, y) {
            self.image.put_pixel(x, y, color);
        }
    }

    /// Source-over blend a pixel onto the surface.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        let Some((x, y)) = self.clip(x, y) else {
            return;
        };
        let dst = *self.image.get_pixel(x, y);
        self.image.put_pixel(x, y, source_over(dst, color));
    }

    /// Fill an axis-aligned rectangle with an opaque color. Clipped.
    pub fn fill_rect(&mut self, x: i64, y: i64, width: u32, height: u32, color: Rgba<u8>) {
        for py in y..y + height as i64 {
            for px in x..x + width as i64 {
                self.put_pixel(px, py, color);
            }
        }
    }

    /// Copy `other` onto this surface with its top-left corner at (x, y).
    /// Pixels are replaced, not blended.
    pub fn copy_from(&mut self, other: &RasterSurface, x: i64, y: i64) {
        for (sx, sy, px) in other.image.enumerate_pixels() {
            self.put_pixel(x + sx as i64, y + sy as i64, *px);
        }
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn clip(&self, x: i64, y: i64) -> Option<(u32, u32)> {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            None
        } else {
            Some((x as u32, y as u32))
        }
    }
}

/// Porter-Duff source-over for non-premultiplied RGBA.
fn source_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return TRANSPARENT;
    }
    let channel = |i: usize| {
        let c = (src[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round() as u8,
    ])
}
