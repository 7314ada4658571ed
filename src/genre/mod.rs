//! # Genre Module
//!
//! Theming profiles applied to generated content, plus the machinery for
//! deriving hybrid genres.
//!
//! Base genres live in an immutable [`GenreRegistry`] that is built once and
//! shared by reference-counted handle. The [`GenreBlender`] interpolates two
//! registered genres into a [`BlendedGenre`] that points back at its sources
//! through the registry instead of owning copies of them.

pub mod blend;
pub mod registry;

pub use blend::*;
pub use registry::*;

use crate::generation::NamingStyle;
use crate::utils::lerp;
use serde::{Deserialize, Serialize};

/// RGB color with channels in `[0, 255]`.
///
/// Channels are kept as `f64` so blended colors are exact convex combinations
/// of their sources; [`Color::to_hex`] rounds only for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    /// Creates a color from 8-bit channels.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: f64::from(r),
            g: f64::from(g),
            b: f64::from(b),
        }
    }

    /// Parses `#RRGGBB` (the leading `#` is optional).
    ///
    /// # Examples
    ///
    /// ```
    /// use seedforge::Color;
    ///
    /// let color = Color::from_hex("#8B4513").unwrap();
    /// assert_eq!(color, Color::rgb(0x8B, 0x45, 0x13));
    /// assert_eq!(color.to_hex(), "#8B4513");
    /// assert!(Color::from_hex("#12345").is_none());
    /// ```
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Formats as `#RRGGBB`, rounding each channel.
    pub fn to_hex(&self) -> String {
        let channel = |value: f64| value.round().clamp(0.0, 255.0) as u8;
        format!(
            "#{:02X}{:02X}{:02X}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }

    /// Componentwise convex combination `self * (1 - t) + other * t`.
    pub fn lerp(&self, other: &Color, t: f64) -> Color {
        Color {
            r: lerp(self.r, other.r, t),
            g: lerp(self.g, other.g, t),
            b: lerp(self.b, other.b, t),
        }
    }

    /// Largest per-channel difference to another color.
    pub fn max_channel_delta(&self, other: &Color) -> f64 {
        (self.r - other.r)
            .abs()
            .max((self.g - other.g).abs())
            .max((self.b - other.b).abs())
    }
}

/// A named theming profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreDefinition {
    /// Registry key, e.g. `"fantasy"`
    pub id: String,
    /// Display name
    pub name: String,
    pub description: String,
    /// Theme tags, most defining first
    pub themes: Vec<String>,
    pub primary_color: Color,
    pub secondary_color: Color,
    pub accent_color: Color,
    /// Vocabulary for nouns, suffixes and personal names
    #[serde(default)]
    pub naming_style: NamingStyle,
    /// Prefixes for creature and character names
    pub entity_prefixes: Vec<String>,
    /// Prefixes for item names
    pub item_prefixes: Vec<String>,
    /// Prefixes for place names
    pub location_prefixes: Vec<String>,
}

impl GenreDefinition {
    /// Whether the genre carries a theme tag.
    pub fn has_theme(&self, theme: &str) -> bool {
        self.themes.iter().any(|t| t == theme)
    }

    /// The three palette colors in primary, secondary, accent order.
    pub fn palette(&self) -> [Color; 3] {
        [self.primary_color, self.secondary_color, self.accent_color]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_roundtrip() {
        let color = Color::rgb(255, 0, 128);
        assert_eq!(color.to_hex(), "#FF0080");
        assert_eq!(Color::from_hex("FF0080"), Some(color));
        assert!(Color::from_hex("#GG0000").is_none());
        assert!(Color::from_hex("#ÿÿÿ").is_none());
    }

    #[test]
    fn test_color_hex_rejects_signs() {
        assert!(Color::from_hex("#+F0000").is_none());
        assert!(Color::from_hex("+FF+FF+").is_none());
        assert!(Color::from_hex("#-10000").is_none());
        assert_eq!(Color::from_hex("#ff00aa"), Some(Color::rgb(0xFF, 0x00, 0xAA)));
    }

    #[test]
    fn test_color_lerp() {
        let black = Color::rgb(0, 0, 0);
        let white = Color::rgb(255, 255, 255);
        assert_eq!(black.lerp(&white, 0.0), black);
        assert_eq!(black.lerp(&white, 1.0), white);
        let mid = black.lerp(&white, 0.5);
        assert_eq!(mid.r, 127.5);
        assert_eq!(mid.to_hex(), "#808080");
    }
}
