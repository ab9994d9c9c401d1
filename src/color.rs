//! Color parsing and color math for cell rendering.
//!
//! Colors travel through the attribute layer as the toolkit's `"R G B"`
//! strings (hex `#RRGGBB` is accepted too) and are resolved to [`Rgb`]
//! before any blending so repeated string parsing stays out of the draw loop.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// RGB color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// Parse `"R G B"`, `"R;G;B"` or `#RRGGBB`.
    /// Returns None if the format is invalid.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.starts_with('#') {
            return Self::from_hex(s);
        }
        let mut parts = s
            .split(|c: char| c == ' ' || c == ';' || c == ',')
            .filter(|p| !p.is_empty());
        let r: u8 = parts.next()?.parse().ok()?;
        let g: u8 = parts.next()?.parse().ok()?;
        let b: u8 = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { r, g, b })
    }

    /// Parse from a hex string (with or without #).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Convert to CSS hex string (#RRGGBB).
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Toolkit attribute form, `"R G B"`.
    pub fn to_attr_string(self) -> String {
        format!("{} {} {}", self.r, self.g, self.b)
    }

    /// Multiply every channel by `num / den` (integer math, truncating).
    ///
    /// `scale(9, 10)` is the 10% title darkening, `scale(8, 10)` the mark attenuation.
    pub fn scale(self, num: u32, den: u32) -> Self {
        let den = den.max(1);
        let f = |c: u8| u8::try_from(u32::from(c) * num / den).unwrap_or(u8::MAX);
        Self {
            r: f(self.r),
            g: f(self.g),
            b: f(self.b),
        }
    }

    /// Blend toward `target`; `alpha` 0 keeps `self`, 255 yields `target`.
    pub fn blend_toward(self, target: Rgb, alpha: u8) -> Self {
        let a = u32::from(alpha);
        let f = |src: u8, dst: u8| {
            let v = (u32::from(dst) * a + u32::from(src) * (255 - a)) / 255;
            u8::try_from(v).unwrap_or(u8::MAX)
        };
        Self {
            r: f(self.r, target.r),
            g: f(self.g, target.g),
            b: f(self.b, target.b),
        }
    }

    /// Inactive-widget transform: halfway toward the background.
    pub fn make_inactive(self, background: Rgb) -> Self {
        let f = |c: u8, bg: u8| u8::try_from((u16::from(c) + u16::from(bg)) / 2).unwrap_or(u8::MAX);
        Self {
            r: f(self.r, background.r),
            g: f(self.g, background.g),
            b: f(self.b, background.b),
        }
    }

    /// Darken the color by blending with black.
    /// Factor of 0.0 = no change, 1.0 = pure black.
    pub fn darken(self, factor: f64) -> Self {
        Self {
            r: Self::blend_component(self.r, 0, factor),
            g: Self::blend_component(self.g, 0, factor),
            b: Self::blend_component(self.b, 0, factor),
        }
    }

    /// Calculate relative luminance (0.0 to 1.0).
    /// Uses simplified formula: 0.299*R + 0.587*G + 0.114*B
    pub fn luminance(self) -> f64 {
        let r = f64::from(self.r);
        let g = f64::from(self.g);
        let b = f64::from(self.b);
        (0.299 * r + 0.587 * g + 0.114 * b) / 255.0
    }

    /// Check if this is a light color (luminance > 0.5).
    pub fn is_light(self) -> bool {
        self.luminance() > 0.5
    }

    /// Blend a single color component toward a target.
    /// The cast is safe because we clamp to [0, 255] before converting.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn blend_component(from: u8, to: u8, factor: f64) -> u8 {
        let from = f64::from(from);
        let to = f64::from(to);
        let blended = from + (to - from) * factor.clamp(0.0, 1.0);
        blended.clamp(0.0, 255.0).round() as u8
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_attr_string())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color: {s}")))
    }
}

/// System default colors used when nothing more specific is set.
pub mod palette {
    use super::Rgb;

    /// Dialog background (titles, parent fallback)
    pub const DLG_BG: Rgb = Rgb::new(240, 240, 240);
    /// Dialog foreground (title text)
    pub const DLG_FG: Rgb = Rgb::new(0, 0, 0);
    /// Text-entry background (regular cells)
    pub const TXT_BG: Rgb = Rgb::new(255, 255, 255);
    /// Text-entry foreground (regular cell text)
    pub const TXT_FG: Rgb = Rgb::new(0, 0, 0);
    /// Selection highlight
    pub const TXT_HL: Rgb = Rgb::new(0, 120, 215);
    /// Grid frame lines
    pub const FRAME: Rgb = Rgb::new(100, 100, 100);
    /// Focus feedback rectangle
    pub const FOCUS: Rgb = Rgb::new(0, 0, 0);

    /// Scrollbar track color
    pub const SCROLLBAR_TRACK: Rgb = Rgb::new(245, 245, 245);
    /// Scrollbar thumb color
    pub const SCROLLBAR_THUMB: Rgb = Rgb::new(180, 180, 180);
    /// Scrollbar thumb while hovered or dragged
    pub const SCROLLBAR_THUMB_HOT: Rgb = Rgb::new(140, 140, 140);
    /// Scrollbar arrow glyphs
    pub const SCROLLBAR_ARROW: Rgb = Rgb::new(95, 99, 104);
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_space_separated() {
        assert_eq!(Rgb::parse("255 128 0"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::parse(" 1;2;3 "), Some(Rgb::new(1, 2, 3)));
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::parse("#FF8040"), Some(Rgb::new(255, 128, 64)));
        assert_eq!(Rgb::from_hex("00ff00"), Some(Rgb::new(0, 255, 0)));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(Rgb::parse("256 0 0"), None);
        assert_eq!(Rgb::parse("1 2"), None);
        assert_eq!(Rgb::parse("1 2 3 4"), None);
        assert_eq!(Rgb::parse("#12345"), None);
        assert_eq!(Rgb::parse("BGCOLOR"), None);
    }

    #[test]
    fn test_scale_darkens_ten_percent() {
        assert_eq!(Rgb::new(200, 100, 10).scale(9, 10), Rgb::new(180, 90, 9));
    }

    #[test]
    fn test_blend_toward_extremes() {
        let c = Rgb::new(10, 20, 30);
        let t = Rgb::new(250, 240, 230);
        assert_eq!(c.blend_toward(t, 0), c);
        assert_eq!(c.blend_toward(t, 255), t);
    }

    #[test]
    fn test_make_inactive_is_midpoint() {
        assert_eq!(
            Rgb::new(0, 100, 200).make_inactive(Rgb::new(200, 100, 0)),
            Rgb::new(100, 100, 100)
        );
    }

    #[test]
    fn test_serde_uses_attr_string() {
        let json = serde_json::to_string(&Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(json, "\"1 2 3\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::new(1, 2, 3));
    }
}
