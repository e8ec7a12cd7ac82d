use serde::{Deserialize, Serialize};

use crate::assets::color::Color;
use crate::foundation::core::Vec2;

/// Drop shadow cast by a box silhouette or by glyphs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shadow {
    /// Offset in pixels, applied after blurring.
    pub offset: Vec2,
    /// Blur radius in pixels (the Gaussian sigma is half of it).
    pub blur_radius: f64,
    /// Shadow color.
    pub color: Color,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            blur_radius: 0.0,
            color: Color::BLACK,
        }
    }
}

impl Shadow {
    /// Shadow with every field spelled out.
    pub fn new(dx: f64, dy: f64, blur_radius: f64, color: impl Into<Color>) -> Self {
        Self {
            offset: Vec2::new(dx, dy),
            blur_radius,
            color: color.into(),
        }
    }

    /// Replace the offset.
    pub fn with_offset(mut self, dx: f64, dy: f64) -> Self {
        self.offset = Vec2::new(dx, dy);
        self
    }

    /// Replace the blur radius.
    pub fn with_blur(mut self, blur_radius: f64) -> Self {
        self.blur_radius = blur_radius;
        self
    }

    /// Replace the color.
    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    /// Gaussian sigma in pixels. Negative or non-finite radii blur nothing.
    pub(crate) fn sigma(&self) -> f32 {
        if self.blur_radius.is_finite() && self.blur_radius > 0.0 {
            (self.blur_radius / 2.0) as f32
        } else {
            0.0
        }
    }

    /// Half-width of the blur kernel; also the padding an offscreen silhouette needs.
    pub(crate) fn kernel_radius(&self) -> u32 {
        let sigma = self.sigma();
        if sigma <= 0.0 {
            return 0;
        }
        (3.0 * sigma).ceil().min(256.0) as u32
    }

    pub(crate) fn is_visible(&self) -> bool {
        !self.color.is_transparent() && self.offset.x.is_finite() && self.offset.y.is_finite()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paint/shadow.rs"]
mod tests;
