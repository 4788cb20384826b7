//! Width convergence.
//!
//! An item's width is only known after measuring its content, and resizing
//! a surface throws its content away. Rendering is therefore a short
//! fixed-point iteration:
//!
//! ```text
//! pass 1: measure → width differs → resize, stop
//! pass 2: measure → width matches → draw → threshold
//! ```
//!
//! [`converge`] runs that loop explicitly. Stable input settles in at most
//! [`MAX_PASSES`] passes; needing more means measurement is not
//! deterministic, which is reported as [`LabelError::NotConverged`].

use tracing::debug;

use super::surface::RasterSurface;
use crate::error::LabelError;

/// Passes allowed before giving up: one resize plus one stable draw.
pub const MAX_PASSES: usize = 2;

/// Result of a single render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// A precondition is not met yet (font not loaded, image not decoded).
    /// The surface was not touched; retry once the precondition changes.
    Deferred,
    /// The content cannot be drawn. The surface keeps its previous state.
    Skipped(String),
    /// The surface width changed; its content must be redrawn.
    Resized { from: u32, to: u32 },
    /// Content drawn and thresholded at the current width.
    Drawn,
}

/// Final outcome of a convergence loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Convergence {
    /// Last non-resize outcome
    pub outcome: PassOutcome,
    /// Passes executed, including the final one
    pub passes: usize,
}

impl Convergence {
    pub fn is_drawn(&self) -> bool {
        self.outcome == PassOutcome::Drawn
    }
}

/// Run `pass` until it stops resizing the surface.
pub fn converge<F>(key: &str, surface: &mut RasterSurface, mut pass: F) -> Result<Convergence, LabelError>
where
    F: FnMut(&mut RasterSurface) -> PassOutcome,
{
    for passes in 1..=MAX_PASSES {
        match pass(surface) {
            PassOutcome::Resized { from, to } => {
                debug!(key, pass = passes, from, to, "surface resized, redrawing");
            }
            outcome => return Ok(Convergence { outcome, passes }),
        }
    }
    Err(LabelError::NotConverged {
        key: key.to_string(),
        passes: MAX_PASSES,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A pass that resizes to `target` and draws once the width matches.
    fn sizing_pass(target: u32) -> impl FnMut(&mut RasterSurface) -> PassOutcome {
        move |surface| {
            if surface.width() != target {
                let from = surface.width();
                surface.resize(target);
                PassOutcome::Resized { from, to: target }
            } else {
                PassOutcome::Drawn
            }
        }
    }

    #[test]
    fn test_two_passes_when_width_differs() {
        let mut surface = RasterSurface::new(200, 68);
        let result = converge("t", &mut surface, sizing_pass(42)).unwrap();
        assert_eq!(result.passes, 2);
        assert!(result.is_drawn());
        assert_eq!(surface.width(), 42);
    }

    #[test]
    fn test_one_pass_when_width_matches() {
        let mut surface = RasterSurface::new(42, 68);
        let result = converge("t", &mut surface, sizing_pass(42)).unwrap();
        assert_eq!(result.passes, 1);
    }

    #[test]
    fn test_unstable_measurement_is_an_error() {
        let mut surface = RasterSurface::new(0, 68);
        let mut next = 10;
        let err = converge("wobbly", &mut surface, |s| {
            let from = s.width();
            next += 1;
            s.resize(next);
            PassOutcome::Resized { from, to: next }
        })
        .unwrap_err();
        assert!(matches!(err, LabelError::NotConverged { passes: 2, .. }));
    }

    #[test]
    fn test_deferred_stops_immediately() {
        let mut surface = RasterSurface::new(7, 68);
        let result = converge("t", &mut surface, |_| PassOutcome::Deferred).unwrap();
        assert_eq!(result.outcome, PassOutcome::Deferred);
        assert_eq!(result.passes, 1);
        assert_eq!(surface.width(), 7);
    }
}
