//! Font specifications in the `"[style] [weight] <size>px <family>"` form
//! used by text items.
//!
//! Only the keywords that pick a [`FontVariant`] are understood before the
//! size: `italic`, `bold` or `700`, and `normal` or `400`.

use std::fmt;
use std::str::FromStr;

use crate::error::LabelError;
use crate::fonts::FontVariant;

/// A parsed font string.
///
/// ```
/// use labelstrip::fonts::FontVariant;
/// use labelstrip::label::FontSpec;
///
/// let spec: FontSpec = "40px sans-serif".parse().unwrap();
/// assert_eq!(spec.size_px, 40);
/// assert_eq!(spec.family, "sans-serif");
/// assert_eq!(spec.to_string(), "40px sans-serif");
///
/// let bold: FontSpec = "bold 12px Inter".parse().unwrap();
/// assert_eq!(bold.variant, FontVariant::Bold);
/// assert_eq!(bold.to_string(), "700 12px Inter");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontSpec {
    /// Pixel size (em height)
    pub size_px: u32,
    /// Family name, without surrounding quotes
    pub family: String,
    pub variant: FontVariant,
}

impl FontSpec {
    pub fn new(size_px: u32, family: impl Into<String>) -> Self {
        Self {
            size_px,
            family: family.into(),
            variant: FontVariant::Regular,
        }
    }

    pub fn with_variant(mut self, variant: FontVariant) -> Self {
        self.variant = variant;
        self
    }
}

impl FromStr for FontSpec {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut italic = false;
        let mut bold = false;
        let mut rest = s;

        let (size, family) = loop {
            let (token, tail) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| LabelError::FontSpec(format!("'{}' has no family name", s)))?;
            match token.to_lowercase().as_str() {
                "italic" => italic = true,
                "bold" | "700" => bold = true,
                "normal" | "400" => {}
                _ => break (token, tail),
            }
            rest = tail.trim_start();
        };

        let digits = size
            .strip_suffix("px")
            .ok_or_else(|| LabelError::FontSpec(format!("'{}': size must be given in px", s)))?;
        let size_px: u32 = digits
            .parse()
            .map_err(|_| LabelError::FontSpec(format!("'{}': invalid size '{}'", s, size)))?;
        if size_px == 0 {
            return Err(LabelError::FontSpec(format!("'{}': size must be positive", s)));
        }

        let family = family.trim().trim_matches(|c| c == '"' || c == '\'').trim();
        if family.is_empty() {
            return Err(LabelError::FontSpec(format!("'{}' has no family name", s)));
        }

        let variant = match (bold, italic) {
            (false, false) => FontVariant::Regular,
            (false, true) => FontVariant::Italic,
            (true, false) => FontVariant::Bold,
            (true, true) => FontVariant::BoldItalic,
        };
        Ok(Self::new(size_px, family).with_variant(variant))
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.variant {
            FontVariant::Regular => "",
            FontVariant::Italic => "italic ",
            FontVariant::Bold => "700 ",
            FontVariant::BoldItalic => "italic 700 ",
        };
        write!(f, "{}{}px {}", prefix, self.size_px, self.family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let spec: FontSpec = "40px otsutome_font".parse().unwrap();
        assert_eq!(spec, FontSpec::new(40, "otsutome_font"));
        assert_eq!(spec.variant, FontVariant::Regular);
    }

    #[test]
    fn test_parse_family_with_spaces_and_quotes() {
        let spec: FontSpec = "12px \"Open Sans\"".parse().unwrap();
        assert_eq!(spec.family, "Open Sans");
        let spec: FontSpec = "  18px   Noto Serif  ".parse().unwrap();
        assert_eq!(spec, FontSpec::new(18, "Noto Serif"));
    }

    #[test]
    fn test_parse_variant_keywords() {
        let spec: FontSpec = "italic bold 20px Inter".parse().unwrap();
        assert_eq!(spec, FontSpec::new(20, "Inter").with_variant(FontVariant::BoldItalic));
        assert_eq!(spec.to_string(), "italic 700 20px Inter");

        let spec: FontSpec = "700  9px mono".parse().unwrap();
        assert_eq!(spec.variant, FontVariant::Bold);
        let spec: FontSpec = "normal 9px mono".parse().unwrap();
        assert_eq!(spec.variant, FontVariant::Regular);

        // Keywords without a size are not a font
        assert!("bold italic".parse::<FontSpec>().is_err());
        assert!("oblique 9px mono".parse::<FontSpec>().is_err());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("sans-serif".parse::<FontSpec>().is_err());
        assert!("40 sans-serif".parse::<FontSpec>().is_err());
        assert!("40pt sans-serif".parse::<FontSpec>().is_err());
        assert!("0px sans-serif".parse::<FontSpec>().is_err());
        assert!("40px \"\"".parse::<FontSpec>().is_err());
        assert!("".parse::<FontSpec>().is_err());
    }
}
