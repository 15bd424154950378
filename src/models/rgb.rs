//! RGB color handling for character themes, with hex parsing and serialization.

// Allow small types passed by reference for API consistency
#![allow(clippy::trivially_copy_pass_by_ref)]
// Allow intentional type casts for color math
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Luminance below which a color counts as dark (needs light text on top).
const DARK_LUMINANCE_THRESHOLD: f32 = 0.35;

/// RGB color value used for card theming and selection highlights.
///
/// Serialized as a `"#RRGGBB"` string so catalog files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RgbColor {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl RgbColor {
    /// Pure black, the neutral accent used when nothing else applies.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Creates a new `RgbColor` from individual channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses an `RgbColor` from a hex string.
    ///
    /// Accepts "#RRGGBB" or "RRGGBB" in either case, surrounding whitespace ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use synchronize::models::RgbColor;
    ///
    /// let cap = RgbColor::from_hex("#0055AA").unwrap();
    /// assert_eq!(cap, RgbColor::new(0, 0x55, 0xAA));
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if digits.len() != 6 || !digits.is_ascii() {
            anyhow::bail!("Invalid hex color '{trimmed}'. Expected #RRGGBB");
        }

        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&digits[range], 16)
                .with_context(|| format!("Invalid {name} channel in hex color '{trimmed}'"))
        };

        Ok(Self::new(
            channel(0..2, "red")?,
            channel(2..4, "green")?,
            channel(4..6, "blue")?,
        ))
    }

    /// Formats the color as "#RRGGBB" (uppercase).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Converts the color to a Ratatui Color for terminal rendering.
    #[must_use]
    pub const fn to_ratatui_color(&self) -> ratatui::style::Color {
        ratatui::style::Color::Rgb(self.r, self.g, self.b)
    }

    /// Blends this color over `background` with the given opacity (0.0-1.0).
    #[must_use]
    pub fn over(&self, background: Self, opacity: f32) -> Self {
        let alpha = opacity.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| {
            (f32::from(bg) + (f32::from(fg) - f32::from(bg)) * alpha)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Self::new(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }

    /// Relative luminance in 0.0-1.0 (Rec. 709 weights, no gamma correction).
    #[must_use]
    pub fn luminance(&self) -> f32 {
        (0.2126 * f32::from(self.r) + 0.7152 * f32::from(self.g) + 0.0722 * f32::from(self.b))
            / 255.0
    }

    /// Whether text drawn on this color should be light.
    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.luminance() < DARK_LUMINANCE_THRESHOLD
    }

    /// Grayscale version of the color (used for cards that are not active).
    #[must_use]
    pub fn grayscale(&self) -> Self {
        let level = (self.luminance() * 255.0).round() as u8;
        Self::new(level, level, level)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for RgbColor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for RgbColor {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<RgbColor> for String {
    fn from(color: RgbColor) -> Self {
        color.to_hex()
    }
}

impl Default for RgbColor {
    /// Default color is black (#000000), the neutral accent.
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_valid() {
        assert_eq!(
            RgbColor::from_hex("#0055AA").unwrap(),
            RgbColor::new(0, 85, 170)
        );
        assert_eq!(
            RgbColor::from_hex("aa0505").unwrap(),
            RgbColor::new(170, 5, 5)
        );
        assert_eq!(
            RgbColor::from_hex("  #FFFFFF  ").unwrap(),
            RgbColor::WHITE
        );
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(RgbColor::from_hex("#FFF").is_err());
        assert!(RgbColor::from_hex("#FFFFFFF").is_err());
        assert!(RgbColor::from_hex("GGGGGG").is_err());
        assert!(RgbColor::from_hex("").is_err());
        assert!(RgbColor::from_hex("#").is_err());
        assert!(RgbColor::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_to_hex_uppercase() {
        assert_eq!(RgbColor::new(0, 85, 170).to_hex(), "#0055AA");
        assert_eq!(RgbColor::BLACK.to_string(), "#000000");
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&RgbColor::new(170, 5, 5)).unwrap();
        assert_eq!(json, "\"#AA0505\"");

        let parsed: RgbColor = serde_json::from_str("\"#0055aa\"").unwrap();
        assert_eq!(parsed, RgbColor::new(0, 85, 170));

        assert!(serde_json::from_str::<RgbColor>("\"blue\"").is_err());
    }

    #[test]
    fn test_over_blends_towards_background() {
        let red = RgbColor::new(255, 0, 0);
        assert_eq!(red.over(RgbColor::BLACK, 1.0), red);
        assert_eq!(red.over(RgbColor::BLACK, 0.0), RgbColor::BLACK);
        assert_eq!(red.over(RgbColor::BLACK, 0.5), RgbColor::new(128, 0, 0));
    }

    #[test]
    fn test_is_dark() {
        assert!(RgbColor::BLACK.is_dark());
        assert!(RgbColor::new(0, 85, 170).is_dark());
        assert!(!RgbColor::WHITE.is_dark());
        assert!(!RgbColor::new(255, 215, 0).is_dark());
    }

    #[test]
    fn test_grayscale() {
        let gray = RgbColor::new(170, 5, 5).grayscale();
        assert_eq!(gray.r, gray.g);
        assert_eq!(gray.g, gray.b);
        assert_eq!(RgbColor::WHITE.grayscale(), RgbColor::WHITE);
    }
}
