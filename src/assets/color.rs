use crate::foundation::core::Rgba8Premul;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Straight-alpha sRGB color.
///
/// Parses any CSS color string `csscolorparser` understands (hex, named, `rgb()`, `hsl()`,
/// `hwb()` and friends) and serializes back to `#rrggbb` / `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from straight-alpha RGBA channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Color from normalized `0..=1` channels. Out-of-range inputs are clamped.
    pub fn from_unit(r: f64, g: f64, b: f64, a: f64) -> Self {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        Self::rgba(to_u8(r), to_u8(g), to_u8(b), to_u8(a))
    }

    /// `true` when the color paints nothing.
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Premultiplied form used by pixel buffers.
    pub fn to_rgba8_premul(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }

    pub(crate) fn to_cpu(self) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }

    /// Lowercase hex form; the alpha byte is omitted when opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed =
            csscolorparser::parse(s.trim()).map_err(|e| format!("color {s:?}: {e}"))?;
        let [r, g, b, a] = parsed.to_rgba8();
        Ok(Self::rgba(r, g, b, a))
    }
}

impl From<&str> for Color {
    /// Lenient conversion for builder call sites: unparseable strings become black.
    fn from(s: &str) -> Self {
        s.parse().unwrap_or(Self::BLACK)
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Str(String),
            RgbaObj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            HslaObj {
                h: f64,
                s: f64,
                l: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Str(s) => s.parse().map_err(serde::de::Error::custom),
            Repr::RgbaObj { r, g, b, a } => Ok(Self::from_unit(r, g, b, a)),
            Repr::HslaObj { h, s, l, a } => format!(
                "hsla({h}, {}%, {}%, {})",
                s.clamp(0.0, 1.0) * 100.0,
                l.clamp(0.0, 1.0) * 100.0,
                a.clamp(0.0, 1.0)
            )
            .parse()
            .map_err(serde::de::Error::custom),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::from_unit(*r, *g, *b, 1.0)),
                [r, g, b, a] => Ok(Self::from_unit(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
