//! # Label Rendering Pipeline
//!
//! Drives every item of a [`Label`] through its rasterizer, thresholding and
//! placement, then joins the results into one [`PrintableBuffer`].
//!
//! ## Item outcomes
//!
//! | Item                         | Strip contribution         | Notice              |
//! |------------------------------|----------------------------|---------------------|
//! | text, font ready             | measured width             | -                   |
//! | text, font not registered    | nothing                    | `FontNotReady`      |
//! | text, malformed font string  | nothing                    | `InvalidFont`       |
//! | image, decoded               | scaled width               | -                   |
//! | image, decode pending        | nothing                    | `ImagePending`      |
//! | image, decode failed         | 100 px placeholder         | `ImageUnavailable`  |
//! | QR, fits                     | square symbol              | -                   |
//! | QR, too much data            | 100 px placeholder         | `QrOverflow`        |
//! | barcode, valid data          | bars plus quiet zones      | -                   |
//! | barcode, invalid data        | 100 px placeholder         | `BarcodeInvalid`    |
//! | spacing                      | its width                  | -                   |
//! | width never settles          | nothing                    | `NotConverged`      |
//!
//! Items are independent and are rendered in parallel. With
//! `debug_lines` set, text items also contribute guide lines that are
//! carried beside the strip for the preview.
//!
//! ## Sessions
//!
//! [`render_label`] is synchronous and never waits for images. A
//! [`LabelSession`] owns the image slots for a label across edits and
//! starts the decodes a render needs before drawing.

use std::collections::HashSet;
use std::sync::Arc;

use rayon::prelude::*;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::decode::{ImageSlots, SlotState, SourceLoader};
use crate::error::LabelError;
use crate::fonts::FontRegistry;
use crate::label::{ItemContent, Label, LabelItem};
use crate::raster::PrintableBuffer;
use crate::render::barcode::render_barcode;
use crate::render::image::{ImageRasterizer, placeholder};
use crate::render::placement::{content_height, place, place_guides};
use crate::render::qr::{render_qr, render_spacer};
use crate::render::text::{INITIAL_WIDTH, TextRasterizer};
use crate::render::{
    GuideLine, Notice, NoticeKind, PassOutcome, RasterSurface, RenderOptions, ThresholdPolicy,
    compose,
};

/// What one item contributed to the strip.
#[derive(Debug, Default)]
struct ItemRender {
    surface: Option<RasterSurface>,
    notice: Option<Notice>,
    guides: Vec<GuideLine>,
}

impl ItemRender {
    fn drawn(surface: RasterSurface) -> Self {
        Self {
            surface: Some(surface),
            ..Default::default()
        }
    }

    fn left_out(notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            ..Default::default()
        }
    }

    fn placeholder(surface: RasterSurface, notice: Notice) -> Self {
        Self {
            surface: Some(surface),
            notice: Some(notice),
            ..Default::default()
        }
    }

    /// An item whose width never settled.
    fn unconverged(key: &str, error: LabelError) -> Self {
        Self::left_out(Notice::new(key, NoticeKind::NotConverged, error.to_string()))
    }

    fn with_guides(mut self, guides: Vec<GuideLine>) -> Self {
        self.guides = guides;
        self
    }
}

/// Render `label` with whatever fonts and images are available right now.
pub fn render_label(
    label: &Label,
    fonts: &FontRegistry,
    images: &ImageSlots,
    options: &RenderOptions,
) -> Result<PrintableBuffer, LabelError> {
    let height = options.tape.usable_height();

    let rendered: Vec<ItemRender> = label
        .items()
        .par_iter()
        .map(|item| render_item(item, fonts, images, options))
        .collect();

    let mut surfaces = Vec::with_capacity(rendered.len());
    let mut notices = Vec::new();
    let mut guides = Vec::new();
    let mut x = 0;
    for (item, outcome) in label.items().iter().zip(rendered) {
        if let Some(notice) = outcome.notice {
            warn!(key = %notice.key, kind = ?notice.kind, "{}", notice.message);
            notices.push(notice);
        }
        if let Some(surface) = outcome.surface {
            let placed_guides =
                place_guides(&outcome.guides, surface.width(), surface.height(), &item.style);
            guides.extend(placed_guides.into_iter().map(|g| GuideLine { x: g.x + x, ..g }));

            let placed = place(surface, &item.style, height);
            x += placed.width();
            surfaces.push(placed);
        }
    }

    let strip = compose(&surfaces, height);
    info!(
        items = label.len(),
        width = strip.width(),
        notices = notices.len(),
        "Rendered label"
    );
    Ok(PrintableBuffer::new(strip, notices).with_guides(guides))
}

fn render_item(
    item: &LabelItem,
    fonts: &FontRegistry,
    images: &ImageSlots,
    options: &RenderOptions,
) -> ItemRender {
    let key = item.key.as_str();
    let policy = ThresholdPolicy::from_style(&item.style, options.ink);
    let height = content_height(&item.style.margins, options.tape.usable_height());

    match &item.content {
        ItemContent::Text { text, font } => {
            let raster = TextRasterizer::new(fonts);
            let mut surface = RasterSurface::new(INITIAL_WIDTH, height);
            let result = match raster.render(key, text, font, &policy, &mut surface) {
                Ok(result) => result,
                Err(e) => return ItemRender::unconverged(key, e),
            };
            match result.outcome {
                PassOutcome::Drawn if options.debug_lines => {
                    let guides = raster.guides(text, font, &surface);
                    ItemRender::drawn(surface).with_guides(guides)
                }
                PassOutcome::Drawn => ItemRender::drawn(surface),
                PassOutcome::Skipped(reason) => {
                    ItemRender::left_out(Notice::new(key, NoticeKind::InvalidFont, reason))
                }
                _ => ItemRender::left_out(Notice::new(
                    key,
                    NoticeKind::FontNotReady,
                    format!("Font '{}' is not loaded", font),
                )),
            }
        }

        ItemContent::Image { image } => match images.state_for(key, image) {
            Some(SlotState::Ready(decoded)) => {
                let mut surface = RasterSurface::new(0, height);
                let result = match ImageRasterizer::new().render(key, decoded, &policy, &mut surface)
                {
                    Ok(result) => result,
                    Err(e) => return ItemRender::unconverged(key, e),
                };
                match result.outcome {
                    PassOutcome::Drawn => ItemRender::drawn(surface),
                    PassOutcome::Skipped(reason) => ItemRender::placeholder(
                        placeholder(height, &policy),
                        Notice::new(key, NoticeKind::ImageUnavailable, reason),
                    ),
                    _ => ItemRender::left_out(Notice::new(
                        key,
                        NoticeKind::ImagePending,
                        "Image is not decoded yet",
                    )),
                }
            }
            Some(SlotState::Failed(reason)) => ItemRender::placeholder(
                placeholder(height, &policy),
                Notice::new(key, NoticeKind::ImageUnavailable, reason.clone()),
            ),
            Some(SlotState::Pending) | None => ItemRender::left_out(Notice::new(
                key,
                NoticeKind::ImagePending,
                "Image is not decoded yet",
            )),
        },

        ItemContent::QrCode { data } => match render_qr(data, height, &policy) {
            Ok(surface) => ItemRender::drawn(surface),
            Err(e) => ItemRender::placeholder(
                placeholder(height, &policy),
                Notice::new(key, NoticeKind::QrOverflow, e.to_string()),
            ),
        },

        ItemContent::Barcode { data, code_type } => {
            match render_barcode(data, *code_type, height, &policy) {
                Ok(surface) => ItemRender::drawn(surface),
                Err(e) => ItemRender::placeholder(
                    placeholder(height, &policy),
                    Notice::new(key, NoticeKind::BarcodeInvalid, e.to_string()),
                ),
            }
        }

        ItemContent::Spacing { width } => ItemRender::drawn(render_spacer(*width, height, &policy)),
    }
}

/// Rendering state for one label across edits.
///
/// Holds the image slots, so re-rendering after an edit only decodes images
/// whose source changed.
pub struct LabelSession {
    loader: Arc<dyn SourceLoader>,
    slots: ImageSlots,
    options: RenderOptions,
}

impl LabelSession {
    pub fn new(loader: Arc<dyn SourceLoader>, options: RenderOptions) -> Self {
        Self {
            loader,
            slots: ImageSlots::new(),
            options,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn slots(&self) -> &ImageSlots {
        &self.slots
    }

    /// Decode every image `label` needs, then render it.
    pub async fn render(
        &mut self,
        label: &Label,
        fonts: &FontRegistry,
    ) -> Result<PrintableBuffer, LabelError> {
        self.load_images(label).await;
        render_label(label, fonts, &self.slots, &self.options)
    }

    /// Bring the image slots in line with `label` and wait for the decodes.
    ///
    /// Slots of removed items are dropped. Failures are stored in the slot
    /// and surface as notices at render time.
    pub async fn load_images(&mut self, label: &Label) {
        let keys: HashSet<&str> = label.items().iter().map(|item| item.key.as_str()).collect();
        self.slots.retain(|key| keys.contains(key));

        let tickets: Vec<_> = label
            .items()
            .iter()
            .filter_map(|item| match &item.content {
                ItemContent::Image { image } => self.slots.request(&item.key, image),
                _ => None,
            })
            .collect();
        if tickets.is_empty() {
            return;
        }
        debug!(count = tickets.len(), "Starting image decodes");

        let mut set = JoinSet::new();
        for ticket in tickets.iter().cloned() {
            let loader = Arc::clone(&self.loader);
            set.spawn(async move {
                let result = loader.load(&ticket.source).await;
                (ticket, result)
            });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((ticket, result)) => {
                    self.slots.complete(&ticket, result);
                }
                Err(e) => warn!(error = %e, "Image decode task failed"),
            }
        }

        // A task that panicked never reported back
        for ticket in &tickets {
            if matches!(
                self.slots.state_for(&ticket.key, &ticket.source),
                Some(SlotState::Pending)
            ) {
                self.slots.complete(
                    ticket,
                    Err(LabelError::Decode("decode task did not finish".to_string())),
                );
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
