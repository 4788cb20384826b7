//! # Tape Printer Configuration
//!
//! This module defines the raster geometry of the supported tape printers.
//!
//! A tape printer prints the label strip sideways: every column of the strip
//! becomes one raster line across the print head. The head is taller than the
//! printable band of the tape, so each line carries a blank margin above and
//! below the strip.
//!
//! ```text
//!   ┌──────────────────── print head (128 dots) ────────────────────┐
//!   │ 30 blank │            68 usable dots             │ 30 blank │
//!   └──────────┴───────────────────────────────────────┴──────────┘
//! ```
//!
//! ## Usage
//!
//! ```
//! use labelstrip::printer::TapeConfig;
//!
//! let config = TapeConfig::PT_128;
//! assert_eq!(config.usable_height(), 68);
//! assert_eq!(config.line_bytes(), 16);
//! ```

/// Raster line height of the print head in dots.
pub const BUFFER_HEIGHT: u32 = 128;

/// Blank dots above and below the printable band.
pub const PRINT_MARGIN: u32 = 30;

/// Fixed output height every item surface and the final strip must have.
pub const USABLE_HEIGHT: u32 = BUFFER_HEIGHT - PRINT_MARGIN * 2;

/// # Tape Printer Configuration
///
/// Defines the raster characteristics of a tape printer.
///
/// ## Physical Properties
///
/// - **buffer_height**: dots per raster line (height of the print head)
/// - **print_margin**: blank dots on each side of the printable band
/// - **dpi**: resolution in dots per inch
///
/// ## Calculations
///
/// ```text
/// usable_height = buffer_height - 2 * print_margin
/// line_bytes    = buffer_height / 8
///
/// For the 128-dot head:
///   usable_height = 128 - 60 = 68
///   line_bytes    = 16
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapeConfig {
    /// Printer family name
    pub name: &'static str,

    /// Raster line height in dots
    pub buffer_height: u32,

    /// Blank dots above and below the printable band
    pub print_margin: u32,

    /// Resolution in dots per inch
    pub dpi: u16,
}

impl TapeConfig {
    /// # 128-dot P-Touch style head
    ///
    /// | Property | Value |
    /// |----------|-------|
    /// | Head height | 128 dots |
    /// | Margin | 30 dots per side |
    /// | Printable band | 68 dots |
    /// | Resolution | 180 DPI |
    pub const PT_128: Self = Self {
        name: "P-Touch 128",
        buffer_height: BUFFER_HEIGHT,
        print_margin: PRINT_MARGIN,
        dpi: 180,
    };

    /// Height of the printable band in dots.
    #[inline]
    pub fn usable_height(&self) -> u32 {
        self.buffer_height.saturating_sub(self.print_margin * 2)
    }

    /// Bytes per raster line (one bit per dot, padded to a whole byte).
    #[inline]
    pub fn line_bytes(&self) -> usize {
        (self.buffer_height as usize).div_ceil(8)
    }

    /// Calculate dots per millimeter
    #[inline]
    pub fn dots_per_mm(&self) -> f32 {
        self.dpi as f32 / 25.4
    }

    /// Length of a strip of `columns` dots in millimeters
    #[inline]
    pub fn strip_length_mm(&self, columns: u32) -> f32 {
        columns as f32 / self.dots_per_mm()
    }
}

impl Default for TapeConfig {
    fn default() -> Self {
        Self::PT_128
    }
}
