//! # Printable Output
//!
//! A rendered strip ([`PrintableBuffer`]) and the encodings produced from it.
//!
//! ## Print lines
//!
//! The tape moves past a fixed print head, so every strip *column* becomes
//! one printer line of `BUFFER_HEIGHT` bits. Strip rows sit after
//! `PRINT_MARGIN` blank bits, most significant bit first:
//!
//! ```text
//! bit   0 ........ 29 | 30 ................. 97 | 98 ....... 127
//!       margin        | strip rows 0..68         | margin
//! ```
//!
//! ## Raster transfer
//!
//! Each line is PackBits-compressed and framed as
//!
//! | Byte    | Meaning                         |
//! |---------|---------------------------------|
//! | `G`     | raster graphics transfer        |
//! | `n1 n2` | payload length, `n1 + n2 * 256` |
//! | ...     | PackBits payload                |

pub mod packbits;

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage, Rgba};

use crate::error::LabelError;
use crate::printer::TapeConfig;
use crate::render::{GuideLine, Notice, RasterSurface};

/// Raster graphics transfer command byte.
pub const TRANSFER_COMMAND: u8 = b'G';

/// Blank paper in the preview.
const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Translucent red used for the ascent/descent guide lines.
pub const GUIDE_LINE_COLOR: Rgba<u8> = Rgba([0xff, 0x00, 0x00, 0x30]);

/// A finished strip plus the notices gathered while rendering it.
///
/// Every pixel of `surface` has alpha 0 or 255; opaque pixels carry the ink
/// color. `guides` only show up in the [`preview`](Self::preview) and never
/// reach the printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintableBuffer {
    pub surface: RasterSurface,
    pub notices: Vec<Notice>,
    pub guides: Vec<GuideLine>,
}

impl PrintableBuffer {
    pub fn new(surface: RasterSurface, notices: Vec<Notice>) -> Self {
        Self {
            surface,
            notices,
            guides: Vec::new(),
        }
    }

    pub fn with_guides(mut self, guides: Vec<GuideLine>) -> Self {
        self.guides = guides;
        self
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    #[inline]
    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        self.surface.get_pixel(x, y).is_some_and(|px| px[3] == 255)
    }

    /// Ink drawn in its color over white paper, guides blended on top.
    ///
    /// A zero-width strip previews as a single blank column.
    pub fn preview(&self) -> RgbImage {
        let width = self.width().max(1);
        let mut paper = RasterSurface::new(width, self.height());
        paper.fill_rect(0, 0, width, self.height(), PAPER);
        for (x, y, px) in self.surface.as_image().enumerate_pixels() {
            if px[3] == 255 {
                paper.put_pixel(x as i64, y as i64, *px);
            }
        }
        for guide in &self.guides {
            for x in guide.x..guide.x + guide.width {
                paper.blend_pixel(x as i64, guide.y as i64, GUIDE_LINE_COLOR);
            }
        }

        RgbImage::from_fn(width, self.height(), |x, y| {
            let px = paper.get_pixel(x, y).unwrap_or(PAPER);
            Rgb([px[0], px[1], px[2]])
        })
    }

    /// PNG-encoded [`preview`](Self::preview).
    pub fn to_png(&self) -> Result<Vec<u8>, LabelError> {
        let mut png = Vec::new();
        self.preview()
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| LabelError::Image(format!("Failed to encode PNG: {}", e)))?;
        Ok(png)
    }

    /// One printer line per strip column.
    pub fn print_lines(&self, tape: &TapeConfig) -> Vec<Vec<u8>> {
        let bits = tape.buffer_height as usize;
        (0..self.width())
            .map(|x| {
                let mut line = vec![0u8; tape.line_bytes()];
                for y in 0..self.height() {
                    let bit = (tape.print_margin + y) as usize;
                    if bit >= bits {
                        break;
                    }
                    if self.is_ink(x, y) {
                        line[bit / 8] |= 0x80 >> (bit % 8);
                    }
                }
                line
            })
            .collect()
    }

    /// Print lines framed for raster transfer.
    pub fn to_raster(&self, tape: &TapeConfig) -> Result<Vec<u8>, LabelError> {
        encode_raster_transfer(&self.print_lines(tape))
    }
}

/// Frame each line as a PackBits raster transfer packet.
pub fn encode_raster_transfer(lines: &[Vec<u8>]) -> Result<Vec<u8>, LabelError> {
    let mut buf = Vec::new();
    for line in lines {
        let packed = packbits::encode(line);
        let length = u16::try_from(packed.len()).map_err(|_| {
            LabelError::Encode(format!("Line of {} bytes too long for one transfer", line.len()))
        })?;
        buf.push(TRANSFER_COMMAND);
        buf.extend_from_slice(&length.to_le_bytes());
        buf.extend_from_slice(&packed);
    }
    Ok(buf)
}

/// Split raster transfer bytes back into uncompressed lines.
pub fn decode_raster_transfer(data: &[u8]) -> Result<Vec<Vec<u8>>, LabelError> {
    let mut lines = Vec::new();
    let mut i = 0;

    while i < data.len() {
        if data[i] != TRANSFER_COMMAND {
            return Err(LabelError::Encode(format!(
                "Unexpected byte 0x{:02X} at index {}",
                data[i], i
            )));
        }
        let header = data.get(i + 1..i + 3).ok_or_else(|| {
            LabelError::Encode(format!("Transfer header truncated at index {}", i))
        })?;
        let length = u16::from_le_bytes([header[0], header[1]]) as usize;
        let payload = data.get(i + 3..i + 3 + length).ok_or_else(|| {
            LabelError::Encode(format!(
                "Failed to read {} bytes at index {}: end of input data reached",
                length, i
            ))
        })?;
        lines.push(packbits::decode(payload)?);
        i += 3 + length;
    }

    Ok(lines)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::{PRINT_MARGIN, USABLE_HEIGHT};
    use image::Rgba;
    use pretty_assertions::assert_eq;

    const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn strip(width: u32) -> PrintableBuffer {
        PrintableBuffer::new(RasterSurface::new(width, USABLE_HEIGHT), Vec::new())
    }

    #[test]
    fn test_print_line_layout() {
        let mut buffer = strip(2);
        // Top and bottom strip rows in column 0
        buffer.surface.put_pixel(0, 0, INK);
        buffer.surface.put_pixel(0, (USABLE_HEIGHT - 1) as i64, INK);

        let lines = buffer.print_lines(&TapeConfig::default());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 16);

        // Bit 30 is byte 3, mask 0x02; bit 97 is byte 12, mask 0x40
        let mut expected = vec![0u8; 16];
        expected[(PRINT_MARGIN / 8) as usize] = 0x80 >> (PRINT_MARGIN % 8);
        expected[12] = 0x40;
        assert_eq!(lines[0], expected);
        assert_eq!(lines[1], vec![0u8; 16]);
    }

    #[test]
    fn test_full_column_leaves_margins_blank() {
        let mut buffer = strip(1);
        buffer.surface.fill_rect(0, 0, 1, USABLE_HEIGHT, INK);
        let line = &buffer.print_lines(&TapeConfig::default())[0];
        let set: u32 = line.iter().map(|b| b.count_ones()).sum();
        assert_eq!(set, USABLE_HEIGHT);
        assert_eq!(&line[..3], &[0, 0, 0]);
        assert_eq!(&line[13..], &[0, 0, 0]);
    }

    #[test]
    fn test_raster_transfer_round_trip() {
        let mut buffer = strip(3);
        buffer.surface.fill_rect(1, 10, 1, 20, INK);
        let tape = TapeConfig::default();

        let encoded = buffer.to_raster(&tape).unwrap();
        // Blank line: 'G', 2, 0, 0xF1, 0x00
        assert_eq!(&encoded[..5], &[b'G', 2, 0, 0xF1, 0x00]);
        assert_eq!(decode_raster_transfer(&encoded).unwrap(), buffer.print_lines(&tape));
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert!(matches!(decode_raster_transfer(&[0x00]), Err(LabelError::Encode(_))));
        assert!(matches!(decode_raster_transfer(&[b'G', 5]), Err(LabelError::Encode(_))));
        assert!(matches!(
            decode_raster_transfer(&[b'G', 3, 0, 0x02, 1]),
            Err(LabelError::Encode(_))
        ));
        assert_eq!(decode_raster_transfer(&[]).unwrap(), Vec::<Vec<u8>>::new());
    }

    #[test]
    fn test_png_preview() {
        let mut buffer = strip(4);
        buffer.surface.put_pixel(1, 1, INK);
        let png = buffer.to_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (4, USABLE_HEIGHT));
        assert_eq!(decoded.get_pixel(1, 1), &Rgb([0, 0, 0]));
        assert_eq!(decoded.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_guides_show_in_preview_only() {
        let mut buffer = strip(4);
        buffer.surface.put_pixel(1, 5, INK);
        let plain_lines = buffer.print_lines(&TapeConfig::default());
        let buffer = buffer.with_guides(vec![GuideLine {
            x: 0,
            width: 3,
            y: 5,
        }]);

        let preview = buffer.preview();
        assert_eq!(preview.get_pixel(0, 5), &Rgb([255, 207, 207]));
        assert_eq!(preview.get_pixel(3, 5), &Rgb([255, 255, 255]));
        // Ink under a guide is tinted but still darker than paper
        let tinted = preview.get_pixel(1, 5);
        assert!(tinted[0] > 0 && tinted[1] == 0);

        assert_eq!(buffer.print_lines(&TapeConfig::default()), plain_lines);
    }

    #[test]
    fn test_empty_strip_preview() {
        let buffer = strip(0);
        assert!(buffer.print_lines(&TapeConfig::default()).is_empty());
        assert_eq!(buffer.preview().dimensions(), (1, USABLE_HEIGHT));
        assert!(buffer.to_png().is_ok());
    }
}
