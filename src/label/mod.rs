//! # Label Data Model
//!
//! A label is an ordered strip of [`LabelItem`]s. The order of the sequence
//! is the left-to-right print order and every item key is unique within it.
//!
//! ## Example
//!
//! ```
//! use labelstrip::label::{Label, LabelItem};
//!
//! let mut label = Label::new();
//! label.append(LabelItem::text("t1", "Hello?", "40px spleen")).unwrap();
//! label.append(LabelItem::spacing("gap", 12)).unwrap();
//!
//! // Updates replace the whole item with the same key
//! label.replace(LabelItem::text("t1", "Hello!", "40px spleen")).unwrap();
//! assert_eq!(label.len(), 2);
//! ```

mod font_spec;
mod item;

pub use font_spec::FontSpec;
pub use item::{
    BarcodeType, DEFAULT_SPACING_WIDTH, DEFAULT_THRESHOLD, ItemContent, ItemStyle, LabelItem, MAX_THRESHOLD,
    Margins, Threshold,
};

use serde::{Deserialize, Serialize};

use crate::error::LabelError;

/// Color applied to every ink pixel of a render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct InkColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl InkColor {
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for InkColor {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<InkColor> for [u8; 3] {
    fn from(color: InkColor) -> Self {
        [color.r, color.g, color.b]
    }
}

/// Ordered sequence of uniquely keyed items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Label {
    items: Vec<LabelItem>,
}

impl Label {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a label, rejecting duplicate keys.
    pub fn from_items(items: Vec<LabelItem>) -> Result<Self, LabelError> {
        let mut label = Self::new();
        for item in items {
            label.append(item)?;
        }
        Ok(label)
    }

    /// Add an item at the right end of the strip.
    pub fn append(&mut self, item: LabelItem) -> Result<(), LabelError> {
        if self.get(&item.key).is_some() {
            return Err(LabelError::DuplicateKey(item.key));
        }
        self.items.push(item);
        Ok(())
    }

    /// Replace the item with the same key, keeping its position.
    ///
    /// Returns the previous value.
    pub fn replace(&mut self, item: LabelItem) -> Result<LabelItem, LabelError> {
        let slot = self
            .items
            .iter_mut()
            .find(|i| i.key == item.key)
            .ok_or_else(|| LabelError::UnknownKey(item.key.clone()))?;
        Ok(std::mem::replace(slot, item))
    }

    /// Remove the item with the given key.
    pub fn remove(&mut self, key: &str) -> Result<LabelItem, LabelError> {
        let index = self
            .items
            .iter()
            .position(|i| i.key == key)
            .ok_or_else(|| LabelError::UnknownKey(key.to_string()))?;
        Ok(self.items.remove(index))
    }

    pub fn get(&self, key: &str) -> Option<&LabelItem> {
        self.items.iter().find(|i| i.key == key)
    }

    pub fn items(&self) -> &[LabelItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// JSON document describing a label and its ink color.
///
/// ```json
/// {
///   "color": [0, 0, 0],
///   "items": [
///     { "key": "t1", "variant": "text", "text": "Hi", "font": "40px spleen" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelDocument {
    pub items: Vec<LabelItem>,
    #[serde(default)]
    pub color: InkColor,
}

impl LabelDocument {
    pub fn from_json(json: &str) -> Result<Self, LabelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate keys and split into label and ink color.
    pub fn into_label(self) -> Result<(Label, InkColor), LabelError> {
        Ok((Label::from_items(self.items)?, self.color))
    }
}
