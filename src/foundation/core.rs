pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self::default()
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: crate::foundation::math::mul_div255_u8(u16::from(r), u16::from(a)),
            g: crate::foundation::math::mul_div255_u8(u16::from(g), u16::from(a)),
            b: crate::foundation::math::mul_div255_u8(u16::from(b), u16::from(a)),
            a,
        }
    }

    /// Channels as a `[r, g, b, a]` array.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Whole-pixel surface extent, truncated from a fractional layout size.
///
/// Returns `(0, 0)` for non-finite or non-positive sizes.
pub fn pixel_extent(width: f64, height: f64) -> (u32, u32) {
    fn trunc(v: f64) -> u32 {
        if !v.is_finite() || v <= 0.0 {
            return 0;
        }
        v.trunc().min(f64::from(u32::MAX)) as u32
    }
    (trunc(width), trunc(height))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
