//! # Image Decoding
//!
//! Image items name their picture by source string. Fetching and decoding
//! happens off the render path:
//!
//! - [`loader`]: [`SourceLoader`] trait and the default loader for
//!   `http(s)://` URLs, `data:` URIs and file paths
//! - [`cache`]: bounded least-recently-used store of decoded images
//! - [`slots`]: per-item decode state with generation counters, so a result
//!   that arrives after the item changed source is dropped
//!
//! Rendering never waits on a decode. An item whose slot is still pending
//! is left out of the strip and reported as a notice.

pub mod cache;
pub mod loader;
pub mod slots;

pub use cache::{DEFAULT_CACHE_ENTRIES, ImageCache};
pub use loader::{DefaultLoader, SourceKind, SourceLoader};
pub use slots::{ImageSlots, SlotState, Ticket};
