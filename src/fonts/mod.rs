//! # Font Registry
//!
//! The set of font families currently loaded, shared by every text
//! rasterizer of a process. It is plain state passed to whoever renders:
//!
//! - [`FontRegistry::register`] adds a family with its variants. Registering
//!   a family that is already present is a no-op.
//! - [`FontRegistry::add_variant`] adds one more variant to a loaded family.
//! - [`FontRegistry::unregister`] removes a family.
//! - [`FontRegistry::is_ready`] answers whether a `"<size>px <family>"`
//!   font can be measured and drawn right now.
//!
//! Family names are matched case-insensitively, like CSS family names.
//!
//! ## Example
//!
//! ```
//! use labelstrip::fonts::{Face, FontRegistry, FontVariant};
//! use labelstrip::label::FontSpec;
//!
//! let mut fonts = FontRegistry::new();
//! let spec: FontSpec = "24px Spleen".parse().unwrap();
//! assert!(!fonts.is_ready(&spec));
//!
//! assert!(fonts.register("spleen", vec![(FontVariant::Regular, Face::spleen())]));
//! assert!(fonts.is_ready(&spec));
//!
//! // Loading the same family twice does nothing
//! assert!(!fonts.register("Spleen", vec![(FontVariant::Regular, Face::spleen())]));
//! ```

mod bitmap;
mod outline;

pub use bitmap::BitmapFace;
pub use outline::OutlineFace;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::Rgba;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::LabelError;
use crate::label::FontSpec;
use crate::render::surface::RasterSurface;

/// Families registered by [`FontRegistry::with_builtin`].
pub const BUILTIN_FAMILIES: &[&str] = &["spleen", "monospace"];

/// Text measurements in pixels. Ascent and descent are both positive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    /// Advance width of the whole run
    pub width: f32,
    /// Font ascent above the baseline
    pub ascent: f32,
    /// Font descent below the baseline
    pub descent: f32,
    /// Highest ink of this particular run above the baseline
    pub actual_ascent: f32,
}

/// Style variant of a family, named like web font variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontVariant {
    #[serde(rename = "regular")]
    Regular,
    #[serde(rename = "italic")]
    Italic,
    #[serde(rename = "700")]
    Bold,
    #[serde(rename = "700italic")]
    BoldItalic,
}

impl FromStr for FontVariant {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "regular" | "400" => Ok(Self::Regular),
            "italic" => Ok(Self::Italic),
            "700" | "bold" => Ok(Self::Bold),
            "700italic" | "bolditalic" => Ok(Self::BoldItalic),
            other => Err(LabelError::Font(format!("Unknown font variant '{}'", other))),
        }
    }
}

/// A loaded face that can measure and draw text.
#[derive(Debug, Clone)]
pub enum Face {
    Bitmap(BitmapFace),
    Outline(OutlineFace),
}

impl Face {
    /// The built-in Spleen bitmap face.
    pub fn spleen() -> Self {
        Self::Bitmap(BitmapFace::spleen())
    }

    pub fn measure(&self, text: &str, size_px: f32) -> TextMetrics {
        match self {
            Self::Bitmap(face) => face.measure(text, size_px),
            Self::Outline(face) => face.measure(text, size_px),
        }
    }

    /// Draw `text` with its baseline at `baseline_y`, starting at `origin_x`.
    ///
    /// Ink is written fully opaque; there is no anti-aliasing.
    pub fn draw(
        &self,
        text: &str,
        size_px: f32,
        origin_x: f32,
        baseline_y: f32,
        surface: &mut RasterSurface,
        color: Rgba<u8>,
    ) {
        match self {
            Self::Bitmap(face) => face.draw(text, size_px, origin_x, baseline_y, surface, color),
            Self::Outline(face) => face.draw(text, size_px, origin_x, baseline_y, surface, color),
        }
    }
}

/// A font file to load, written `FAMILY=PATH` or `FAMILY:VARIANT=PATH`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSource {
    pub family: String,
    pub variant: FontVariant,
    pub path: PathBuf,
}

impl FromStr for FontSource {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, path) = s
            .split_once('=')
            .ok_or_else(|| LabelError::Font(format!("Expected FAMILY=PATH, got '{}'", s)))?;
        let (family, variant) = match name.split_once(':') {
            Some((family, variant)) => (family, variant.parse()?),
            None => (name, FontVariant::Regular),
        };
        let family = family.trim();
        if family.is_empty() || path.is_empty() {
            return Err(LabelError::Font(format!("Expected FAMILY=PATH, got '{}'", s)));
        }
        Ok(Self {
            family: family.to_string(),
            variant,
            path: PathBuf::from(path),
        })
    }
}

#[derive(Debug, Clone)]
struct FontFamily {
    /// Name as first registered
    name: String,
    variants: Vec<(FontVariant, Face)>,
}

impl FontFamily {
    fn variant(&self, variant: FontVariant) -> Option<&Face> {
        self.variants
            .iter()
            .find(|(v, _)| *v == variant)
            .map(|(_, face)| face)
    }

    /// `variant` if loaded, else regular, else the first variant loaded.
    fn face(&self, variant: FontVariant) -> Option<&Face> {
        self.variant(variant)
            .or_else(|| self.variant(FontVariant::Regular))
            .or_else(|| self.variants.first().map(|(_, face)| face))
    }
}

/// Process-wide set of loaded font families.
#[derive(Debug, Clone, Default)]
pub struct FontRegistry {
    families: HashMap<String, FontFamily>,
}

impl FontRegistry {
    /// An empty registry. No font is ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in bitmap families loaded.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for family in BUILTIN_FAMILIES {
            registry.register(family, vec![(FontVariant::Regular, Face::spleen())]);
        }
        registry
    }

    /// Add a family. Returns `false` (and changes nothing) if the family is
    /// already registered or no variants were given.
    pub fn register(&mut self, family: &str, variants: Vec<(FontVariant, Face)>) -> bool {
        let key = family.to_lowercase();
        if variants.is_empty() || self.families.contains_key(&key) {
            debug!(family, "font family already registered or empty, skipping");
            return false;
        }
        info!(family, variants = variants.len(), "registered font family");
        self.families.insert(
            key,
            FontFamily {
                name: family.to_string(),
                variants,
            },
        );
        true
    }

    /// Add a variant to a registered family. Returns `false` if the family
    /// is unknown or already has that variant.
    pub fn add_variant(&mut self, family: &str, variant: FontVariant, face: Face) -> bool {
        let Some(entry) = self.families.get_mut(&family.to_lowercase()) else {
            return false;
        };
        if entry.variant(variant).is_some() {
            debug!(family, ?variant, "font variant already registered, skipping");
            return false;
        }
        info!(family, ?variant, "registered font variant");
        entry.variants.push((variant, face));
        true
    }

    /// Load a font file as the given family/variant.
    ///
    /// The file is not read at all when that variant is already registered.
    pub fn register_file(
        &mut self,
        family: &str,
        variant: FontVariant,
        path: impl AsRef<Path>,
    ) -> Result<bool, LabelError> {
        if self.has_variant(family, variant) {
            debug!(family, ?variant, "font variant already loaded, not reading file");
            return Ok(false);
        }
        let face = Face::Outline(OutlineFace::from_file(path)?);
        if self.contains(family) {
            Ok(self.add_variant(family, variant, face))
        } else {
            Ok(self.register(family, vec![(variant, face)]))
        }
    }

    /// Load every source. Variants already present are left alone.
    pub fn load_sources(&mut self, sources: &[FontSource]) -> Result<(), LabelError> {
        for source in sources {
            self.register_file(&source.family, source.variant, &source.path)?;
        }
        Ok(())
    }

    /// Remove a family. Returns whether it was present.
    pub fn unregister(&mut self, family: &str) -> bool {
        let removed = self.families.remove(&family.to_lowercase()).is_some();
        if removed {
            info!(family, "unregistered font family");
        }
        removed
    }

    pub fn contains(&self, family: &str) -> bool {
        self.families.contains_key(&family.to_lowercase())
    }

    pub fn has_variant(&self, family: &str, variant: FontVariant) -> bool {
        self.families
            .get(&family.to_lowercase())
            .is_some_and(|f| f.variant(variant).is_some())
    }

    /// Whether text in this font can be measured and drawn now.
    pub fn is_ready(&self, spec: &FontSpec) -> bool {
        self.face(spec).is_some()
    }

    /// The face used for this spec, if its family is loaded.
    ///
    /// A variant the family lacks falls back to its regular face.
    pub fn face(&self, spec: &FontSpec) -> Option<&Face> {
        self.families
            .get(&spec.family.to_lowercase())
            .and_then(|family| family.face(spec.variant))
    }

    /// Registered family names, sorted case-insensitively.
    pub fn families(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.families.values().map(|f| f.name.as_str()).collect();
        names.sort_by_key(|n| n.to_lowercase());
        names
    }
}
