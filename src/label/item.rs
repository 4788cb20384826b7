//! Label items: the common per-item style plus one content variant.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::FontSpec;
use crate::error::LabelError;

/// Default brightness/alpha cutoff.
pub const DEFAULT_THRESHOLD: u8 = 128;

/// Highest accepted threshold value.
pub const MAX_THRESHOLD: u8 = 254;

/// Default width of a spacing item in pixels.
pub const DEFAULT_SPACING_WIDTH: u32 = 10;

/// Brightness/alpha cutoff in `0..=254`.
///
/// Construction clamps, so a `Threshold` is never out of range at render
/// time. Deserialization accepts any integer and clamps it the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Threshold(u8);

impl Threshold {
    pub fn new(value: i64) -> Self {
        Self(value.clamp(0, MAX_THRESHOLD as i64) as u8)
    }

    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl From<u8> for Threshold {
    fn from(value: u8) -> Self {
        Self::new(value as i64)
    }
}

impl Serialize for Threshold {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for Threshold {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Ok(Self::new(raw.round() as i64))
    }
}

/// Item padding in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    #[serde(rename = "marginTop")]
    pub top: u32,
    #[serde(rename = "marginBottom")]
    pub bottom: u32,
    #[serde(rename = "marginLeft")]
    pub left: u32,
    #[serde(rename = "marginRight")]
    pub right: u32,
}

impl Margins {
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.top == 0 && self.bottom == 0 && self.left == 0 && self.right == 0
    }
}

/// Settings shared by every item variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemStyle {
    pub threshold: Threshold,
    /// Flip the brightness comparison. Only image items honour it.
    pub inverted: bool,
    /// Produce the stencil complement of the ink decision.
    pub mask: bool,
    /// Turn the finished item upside down.
    pub rotated: bool,
    pub flipped_horizontal: bool,
    pub flipped_vertical: bool,
    #[serde(flatten)]
    pub margins: Margins,
}

/// One-dimensional barcode symbology.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarcodeType {
    /// EAN-13, twelve digits plus a computed check digit
    #[default]
    Ean13,
    /// EAN-8, seven digits plus a computed check digit
    Ean8,
    Code39,
    Code93,
    /// Code 128; character set B unless the data selects one
    Code128,
}

impl fmt::Display for BarcodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ean13 => "EAN-13",
            Self::Ean8 => "EAN-8",
            Self::Code39 => "Code 39",
            Self::Code93 => "Code 93",
            Self::Code128 => "Code 128",
        };
        f.write_str(name)
    }
}

/// What an item draws.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum ItemContent {
    /// A single run of text in a `"<size>px <family>"` font.
    Text {
        #[serde(default)]
        text: String,
        font: String,
    },
    /// A bitmap image referenced by URL, `data:` URI or file path.
    Image { image: String },
    /// A blank gap of fixed width.
    Spacing {
        #[serde(default = "default_spacing_width")]
        width: u32,
    },
    /// A QR symbol filling the item height.
    QrCode { data: String },
    /// A barcode whose bars fill the item height.
    Barcode {
        data: String,
        #[serde(default)]
        code_type: BarcodeType,
    },
}

fn default_spacing_width() -> u32 {
    DEFAULT_SPACING_WIDTH
}

impl ItemContent {
    /// Short lowercase name of the variant, as used in descriptors.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::Spacing { .. } => "spacing",
            Self::QrCode { .. } => "qr_code",
            Self::Barcode { .. } => "barcode",
        }
    }
}

/// One entry of the label strip.
///
/// Items are never edited in place: an update builds a new value with the
/// same key and replaces the old one (see [`Label::replace`](super::Label::replace)).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelItem {
    pub key: String,
    #[serde(flatten)]
    pub style: ItemStyle,
    #[serde(flatten)]
    pub content: ItemContent,
}

impl LabelItem {
    pub fn text(key: impl Into<String>, text: impl Into<String>, font: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            style: ItemStyle::default(),
            content: ItemContent::Text {
                text: text.into(),
                font: font.into(),
            },
        }
    }

    pub fn image(key: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            style: ItemStyle::default(),
            content: ItemContent::Image {
                image: source.into(),
            },
        }
    }

    pub fn spacing(key: impl Into<String>, width: u32) -> Self {
        Self {
            key: key.into(),
            style: ItemStyle::default(),
            content: ItemContent::Spacing { width },
        }
    }

    pub fn qr_code(key: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            style: ItemStyle::default(),
            content: ItemContent::QrCode { data: data.into() },
        }
    }

    pub fn barcode(key: impl Into<String>, data: impl Into<String>, code_type: BarcodeType) -> Self {
        Self {
            key: key.into(),
            style: ItemStyle::default(),
            content: ItemContent::Barcode {
                data: data.into(),
                code_type,
            },
        }
    }

    /// Replace the whole style.
    pub fn with_style(mut self, style: ItemStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_threshold(mut self, threshold: impl Into<Threshold>) -> Self {
        self.style.threshold = threshold.into();
        self
    }

    pub fn inverted(mut self, inverted: bool) -> Self {
        self.style.inverted = inverted;
        self
    }

    pub fn masked(mut self, mask: bool) -> Self {
        self.style.mask = mask;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.style.margins = margins;
        self
    }

    /// Parse the font string of a text item.
    ///
    /// Returns `None` for non-text items.
    pub fn font_spec(&self) -> Option<Result<FontSpec, LabelError>> {
        match &self.content {
            ItemContent::Text { font, .. } => Some(font.parse()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_threshold_clamps() {
        assert_eq!(Threshold::new(-5).value(), 0);
        assert_eq!(Threshold::new(300).value(), 254);
        assert_eq!(Threshold::from(255).value(), 254);
        assert_eq!(Threshold::default().value(), 128);
    }

    #[test]
    fn test_text_descriptor() {
        let json = r#"{
            "key": "t1",
            "variant": "text",
            "text": "Hello?",
            "font": "40px otsutome_font",
            "marginTop": 0, "marginBottom": 0, "marginLeft": 0, "marginRight": 0
        }"#;
        let item: LabelItem = serde_json::from_str(json).unwrap();
        assert_eq!(item, LabelItem::text("t1", "Hello?", "40px otsutome_font"));
    }

    #[test]
    fn test_image_descriptor_with_style() {
        let json = r#"{
            "key": "i1",
            "variant": "image",
            "image": "/shoutrrr.png",
            "threshold": 999,
            "inverted": true,
            "mask": true,
            "flippedHorizontal": true,
            "marginLeft": 4
        }"#;
        let item: LabelItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.style.threshold.value(), 254);
        assert!(item.style.inverted);
        assert!(item.style.mask);
        assert!(item.style.flipped_horizontal);
        assert!(!item.style.flipped_vertical);
        assert_eq!(item.style.margins.left, 4);
        assert_eq!(
            item.content,
            ItemContent::Image {
                image: "/shoutrrr.png".to_string()
            }
        );
    }

    #[test]
    fn test_spacing_default_width() {
        let item: LabelItem = serde_json::from_str(r#"{"key": "s", "variant": "spacing"}"#).unwrap();
        assert_eq!(item.content, ItemContent::Spacing { width: 10 });
    }

    #[test]
    fn test_missing_content_is_rejected() {
        let result: Result<LabelItem, _> =
            serde_json::from_str(r#"{"key": "t", "variant": "text"}"#);
        assert!(result.is_err());
        let result: Result<LabelItem, _> = serde_json::from_str(r#"{"key": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_uses_descriptor_names() {
        let item = LabelItem::qr_code("q", "hello").masked(true);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["variant"], "qr_code");
        assert_eq!(value["mask"], true);
        assert_eq!(value["threshold"], 128);
        assert_eq!(value["marginRight"], 0);
    }

    #[test]
    fn test_barcode_descriptor() {
        let item: LabelItem =
            serde_json::from_str(r#"{"key": "b", "variant": "barcode", "data": "123456789012"}"#)
                .unwrap();
        assert_eq!(
            item,
            LabelItem::barcode("b", "123456789012", BarcodeType::Ean13)
        );

        let json = r#"{"key": "b", "variant": "barcode", "data": "HI", "code_type": "code39"}"#;
        let item: LabelItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.content.variant_name(), "barcode");
        assert_eq!(
            item.content,
            ItemContent::Barcode {
                data: "HI".to_string(),
                code_type: BarcodeType::Code39
            }
        );
        assert_eq!(BarcodeType::Code128.to_string(), "Code 128");
    }

    #[test]
    fn test_style_builders() {
        let style = ItemStyle {
            rotated: true,
            ..Default::default()
        };
        let item = LabelItem::spacing("s", 3)
            .with_style(style)
            .with_threshold(Threshold::new(400));
        assert!(item.style.rotated);
        assert_eq!(item.style.threshold.value(), MAX_THRESHOLD);

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["rotated"], true);
        assert_eq!(value["threshold"], 254);
    }

    #[test]
    fn test_font_spec_only_for_text() {
        let text = LabelItem::text("t", "x", "12px spleen");
        assert_eq!(text.font_spec().unwrap().unwrap().size_px, 12);
        assert!(LabelItem::spacing("s", 3).font_spec().is_none());
        let bad = LabelItem::text("t", "x", "huge spleen");
        assert!(bad.font_spec().unwrap().is_err());
    }
}
