//! # End-to-end Label Rendering
//!
//! Renders whole label documents through the public API and checks the
//! properties every printable strip must have.

use std::io::Cursor;
use std::sync::Arc;

use base64::Engine;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use pretty_assertions::assert_eq;

use labelstrip::decode::{DefaultLoader, ImageSlots};
use labelstrip::fonts::FontRegistry;
use labelstrip::label::{BarcodeType, InkColor, Label, LabelDocument, LabelItem};
use labelstrip::pipeline::{LabelSession, render_label};
use labelstrip::raster::decode_raster_transfer;
use labelstrip::render::barcode;
use labelstrip::render::image::PLACEHOLDER_WIDTH;
use labelstrip::render::text::TextRasterizer;
use labelstrip::render::{NoticeKind, RenderOptions};
use labelstrip::{PrintableBuffer, TapeConfig};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn png_data_uri(width: u32, height: u32, color: [u8; 4]) -> String {
    let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)));
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png).unwrap();
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(out.into_inner())
    )
}

fn assert_two_level(buffer: &PrintableBuffer, ink: InkColor) {
    for px in buffer.surface.pixels().chunks(4) {
        assert!(px[3] == 0 || px[3] == 255, "alpha {} is not two-level", px[3]);
        assert_eq!(&px[..3], &[ink.r, ink.g, ink.b]);
    }
}

async fn render_doc(json: &str) -> PrintableBuffer {
    let (label, ink) = LabelDocument::from_json(json).unwrap().into_label().unwrap();
    let options = RenderOptions {
        ink,
        ..Default::default()
    };
    let mut session = LabelSession::new(Arc::new(DefaultLoader::new().unwrap()), options);
    session
        .render(&label, &FontRegistry::with_builtin())
        .await
        .unwrap()
}

// ============================================================================
// TESTS
// ============================================================================

#[test]
fn test_hello_in_bitmap_font() {
    let fonts = FontRegistry::with_builtin();
    let label = Label::from_items(vec![LabelItem::text("t", "Hi", "24px spleen")]).unwrap();
    let buffer = render_label(&label, &fonts, &ImageSlots::new(), &RenderOptions::default()).unwrap();

    let measured = TextRasterizer::new(&fonts).measure("Hi", "24px spleen").unwrap();
    assert_eq!(buffer.width(), measured.width.ceil() as u32);
    assert_eq!(buffer.height(), 68);

    let pixels: Vec<&[u8]> = buffer.surface.pixels().chunks(4).collect();
    assert!(pixels.iter().any(|p| *p == [0, 0, 0, 255]));
    assert!(pixels.iter().all(|p| *p == [0, 0, 0, 255] || *p == [0, 0, 0, 0]));

    // The top rows of the strip hold no ink
    for x in 0..buffer.width() {
        assert!(!buffer.is_ink(x, 0));
    }
}

#[tokio::test]
async fn test_document_with_every_variant() {
    let json = format!(
        r#"{{
            "color": [0, 0, 0],
            "items": [
                {{"key": "title", "variant": "text", "text": "Hi", "font": "24px spleen"}},
                {{"key": "gap", "variant": "spacing", "width": 8}},
                {{"key": "logo", "variant": "image", "image": "{}"}},
                {{"key": "code", "variant": "qr_code", "data": "hello"}},
                {{"key": "sku", "variant": "barcode", "data": "HI", "code_type": "code39"}}
            ]
        }}"#,
        png_data_uri(300, 60, [0, 0, 0, 255])
    );
    let buffer = render_doc(&json).await;

    let bars = barcode::encode_modules("HI", BarcodeType::Code39).unwrap().len() as u32;
    let barcode_width = (bars + 2 * barcode::QUIET_ZONE) * barcode::MODULE_WIDTH;
    assert_eq!(buffer.width(), 24 + 8 + 340 + 68 + barcode_width);
    assert!(buffer.notices.is_empty());
    assert_two_level(&buffer, InkColor::BLACK);

    // The image fills its columns completely
    for y in 0..buffer.height() {
        assert!(buffer.is_ink(32, y));
        assert!(buffer.is_ink(32 + 339, y));
    }
}

#[tokio::test]
async fn test_unusable_image_gets_placeholder() {
    let json = r#"{"items": [
        {"key": "broken", "variant": "image", "image": "/no/such/file.png"}
    ]}"#;
    let buffer = render_doc(json).await;
    assert_eq!(buffer.width(), PLACEHOLDER_WIDTH);
    assert_eq!(buffer.height(), 68);
    assert_eq!(buffer.notices.len(), 1);
    assert_eq!(buffer.notices[0].kind, NoticeKind::ImageUnavailable);
    assert_eq!(buffer.notices[0].key, "broken");
}

#[tokio::test]
async fn test_inverted_image_and_colored_ink() {
    let json = format!(
        r#"{{
            "color": [180, 0, 40],
            "items": [
                {{"key": "w", "variant": "image", "image": "{}", "inverted": true, "threshold": 999}}
            ]
        }}"#,
        png_data_uri(10, 10, [255, 255, 255, 255])
    );
    let buffer = render_doc(&json).await;
    assert_eq!(buffer.width(), 68);
    // Threshold clamps to 254: white is bright, inverted turns it into ink
    assert!(buffer.surface.pixels().chunks(4).all(|p| p == [180, 0, 40, 255]));
}

#[tokio::test]
async fn test_raster_output_matches_strip() {
    let json = r#"{"items": [
        {"key": "a", "variant": "spacing", "width": 2, "mask": true},
        {"key": "b", "variant": "spacing", "width": 3}
    ]}"#;
    let buffer = render_doc(json).await;
    let tape = TapeConfig::default();

    let lines = decode_raster_transfer(&buffer.to_raster(&tape).unwrap()).unwrap();
    assert_eq!(lines, buffer.print_lines(&tape));
    assert_eq!(lines.len(), 5);

    let ink_bits = |line: &Vec<u8>| line.iter().map(|b| b.count_ones()).sum::<u32>();
    assert_eq!(ink_bits(&lines[0]), 68);
    assert_eq!(ink_bits(&lines[1]), 68);
    assert_eq!(ink_bits(&lines[2]), 0);
}

#[test]
fn test_duplicate_keys_are_rejected() {
    let json = r#"{"items": [
        {"key": "a", "variant": "spacing"},
        {"key": "a", "variant": "qr_code", "data": "x"}
    ]}"#;
    let doc = LabelDocument::from_json(json).unwrap();
    assert!(doc.into_label().is_err());
}
