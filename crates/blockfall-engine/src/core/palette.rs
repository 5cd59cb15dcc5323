use std::fmt::Write as _;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Default shading factor used to derive a palette's secondary color.
pub const DARKEN_FACTOR: f32 = 0.1;

/// An 8-bit-per-channel color.
///
/// Serialized as a `#rrggbb` hex string.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("rgb({r}, {g}, {b})")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scales every channel towards black by `factor` (0.0 keeps the color,
    /// 1.0 yields black).
    #[must_use]
    pub fn darken(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let scale = |c: u8| (f32::from(c) * (1.0 - factor)).round() as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }

    fn to_hex(self) -> String {
        let mut hex = String::with_capacity(7);
        write!(&mut hex, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b).unwrap();
        hex
    }

    fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for Rgb {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).ok_or_else(|| {
            serde::de::Error::custom(format!("expected color in '#rrggbb' format, got '{s}'"))
        })
    }
}

/// Visual identity of a piece, inherited by every grid cell it locks into.
///
/// Carries no gameplay meaning. The secondary shade is derived from the
/// primary color and is meant for borders or fill contrast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Palette {
    primary: Rgb,
    secondary: Rgb,
}

impl Palette {
    /// Creates a palette whose secondary shade is `primary` darkened by
    /// [`DARKEN_FACTOR`].
    #[must_use]
    pub fn from_primary(primary: Rgb) -> Self {
        Self::with_darken_factor(primary, DARKEN_FACTOR)
    }

    #[must_use]
    pub fn with_darken_factor(primary: Rgb, factor: f32) -> Self {
        Self {
            primary,
            secondary: primary.darken(factor),
        }
    }

    #[must_use]
    pub const fn primary(&self) -> Rgb {
        self.primary
    }

    #[must_use]
    pub const fn secondary(&self) -> Rgb {
        self.secondary
    }
}

/// Random palettes draw each primary channel uniformly from `0..255`.
impl Distribution<Palette> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Palette {
        let primary = Rgb::new(
            rng.random_range(0..255),
            rng.random_range(0..255),
            rng.random_range(0..255),
        );
        Palette::from_primary(primary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_darken() {
        let color = Rgb::new(200, 100, 0);
        assert_eq!(color.darken(0.0), color);
        assert_eq!(color.darken(1.0), Rgb::BLACK);
        assert_eq!(color.darken(0.5), Rgb::new(100, 50, 0));
        assert_eq!(color.darken(7.0), Rgb::BLACK);
    }

    #[test]
    fn test_palette_secondary_is_darker() {
        let palette = Palette::from_primary(Rgb::new(250, 120, 30));
        assert_eq!(palette.primary(), Rgb::new(250, 120, 30));
        assert_eq!(palette.secondary(), Rgb::new(225, 108, 27));
    }

    #[test]
    fn test_rgb_display() {
        assert_eq!(Rgb::new(1, 2, 3).to_string(), "rgb(1, 2, 3)");
    }

    #[test]
    fn test_rgb_serialization() {
        let color = Rgb::new(0x12, 0xab, 0xff);
        let serialized = serde_json::to_string(&color).unwrap();
        assert_eq!(serialized, "\"#12abff\"");
        let deserialized: Rgb = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, color);
    }

    #[test]
    fn test_rgb_deserialization_error_cases() {
        assert!(serde_json::from_str::<Rgb>("\"12abff\"").is_err());
        assert!(serde_json::from_str::<Rgb>("\"#12abf\"").is_err());
        assert!(serde_json::from_str::<Rgb>("\"#12abfg\"").is_err());
        assert!(serde_json::from_str::<Rgb>("\"#12abfé\"").is_err());
    }
}
