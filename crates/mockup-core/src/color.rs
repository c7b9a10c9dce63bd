//! sRGB colors parsed from CSS-style strings

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur while parsing a color string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("Empty color string")]
    Empty,

    #[error("Invalid color {input:?}: {message}")]
    Invalid { input: String, message: String },
}

/// An opaque sRGB color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a color from sRGB components
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        Self::from_rgb8(
            ((hex >> 16) & 0xff) as u8,
            ((hex >> 8) & 0xff) as u8,
            (hex & 0xff) as u8,
        )
    }

    /// Create a color from 8-bit sRGB components
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Packed `0xRRGGBB` value
    pub fn to_hex(self) -> u32 {
        let [r, g, b] = self.to_rgb8();
        ((r as u32) << 16) | ((g as u32) << 8) | b as u32
    }

    /// 8-bit sRGB components
    pub fn to_rgb8(self) -> [u8; 3] {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [quantize(self.r), quantize(self.g), quantize(self.b)]
    }

    /// Linear-light components for shading and clear colors
    pub fn to_linear(self) -> [f32; 3] {
        [
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
        ]
    }

    /// Parse any CSS color: hex with or without alpha, `rgb()`, `hsl()`,
    /// `hwb()` or a named color
    ///
    /// Alpha is discarded; the color is treated as opaque.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ColorError::Empty);
        }
        let parsed = csscolorparser::parse(s).map_err(|e| ColorError::Invalid {
            input: input.to_string(),
            message: e.to_string(),
        })?;
        let [r, g, b, _] = parsed.to_rgba8();
        Ok(Self::from_rgb8(r, g, b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_hex() {
        let color = Color::parse("#4a90d9").unwrap();
        assert_eq!(color.to_hex(), 0x4a90d9);
    }

    #[test]
    fn test_parse_short_hex() {
        let color = Color::parse("#fa0").unwrap();
        assert_eq!(color.to_hex(), 0xffaa00);
    }

    #[test]
    fn test_parse_rgb_function() {
        let color = Color::parse("rgb(255, 0, 128)").unwrap();
        assert_eq!(color.to_rgb8(), [255, 0, 128]);
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(Color::parse("White").unwrap(), Color::WHITE);
        assert_eq!(Color::parse("lightblue").unwrap().to_hex(), 0xadd8e6);
        assert_eq!(Color::parse("navy").unwrap().to_hex(), 0x000080);
        assert!(matches!(
            Color::parse("chartreuse-ish"),
            Err(ColorError::Invalid { .. })
        ));
    }

    #[test]
    fn test_parse_hsl_and_percentages() {
        assert_eq!(Color::parse("hsl(0, 100%, 50%)").unwrap().to_hex(), 0xff0000);
        assert_eq!(Color::parse("rgb(100%, 0%, 0%)").unwrap().to_hex(), 0xff0000);
    }

    #[test]
    fn test_parse_drops_alpha() {
        assert_eq!(Color::parse("#ff000080").unwrap().to_hex(), 0xff0000);
        assert_eq!(Color::parse("rgba(0, 0, 255, 0.5)").unwrap().to_hex(), 0x0000ff);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Color::parse("  "), Err(ColorError::Empty));
        assert!(matches!(Color::parse("#12345"), Err(ColorError::Invalid { .. })));
        assert!(matches!(Color::parse("#ggg"), Err(ColorError::Invalid { .. })));
        assert!(matches!(
            Color::parse("rgb(1, 2)"),
            Err(ColorError::Invalid { .. })
        ));
    }

    #[test]
    fn test_display_is_lowercase_hex() {
        assert_eq!(Color::from_hex(0xE17055).to_string(), "#e17055");
    }

    #[test]
    fn test_linear_conversion_endpoints() {
        assert_eq!(Color::BLACK.to_linear(), [0.0, 0.0, 0.0]);
        let white = Color::WHITE.to_linear();
        for c in white {
            approx::assert_relative_eq!(c, 1.0, epsilon = 1e-6);
        }
        // Mid-gray is darker in linear space
        let gray = Color::from_hex(0x808080).to_linear();
        assert!(gray[0] < 0.25);
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Color::from_hex(0x6ab04c)).unwrap();
        assert_eq!(json, "\"#6ab04c\"");
        let back: Color = serde_json::from_str("\"#6AB04C\"").unwrap();
        assert_eq!(back.to_hex(), 0x6ab04c);
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }
}
