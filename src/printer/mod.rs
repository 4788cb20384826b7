//! # Printer Module
//!
//! This module provides the print-head geometry the label strip is rendered
//! for.
//!
//! ## Modules
//!
//! - [`config`]: Tape printer raster specifications

pub mod config;

pub use config::{BUFFER_HEIGHT, PRINT_MARGIN, TapeConfig, USABLE_HEIGHT};
