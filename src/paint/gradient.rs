use serde::{Deserialize, Serialize};

use crate::assets::color::Color;
use crate::foundation::core::{Point, Rgba8Premul};

/// Linear gradient with evenly spaced color stops.
///
/// `start` and `end` are normalized to the painted box: `(0, 0)` is its top-left corner and
/// `(1, 1)` its bottom-right corner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearGradient {
    /// Color stops in order.
    pub colors: Vec<Color>,
    /// Gradient start, normalized to the box.
    pub start: Point,
    /// Gradient end, normalized to the box.
    pub end: Point,
}

impl Default for LinearGradient {
    fn default() -> Self {
        Self {
            colors: Vec::new(),
            start: Point::new(0.0, 0.0),
            end: Point::new(0.0, 1.0),
        }
    }
}

impl LinearGradient {
    /// Top-to-bottom gradient through `colors`.
    pub fn new<C: Into<Color>>(colors: impl IntoIterator<Item = C>) -> Self {
        Self {
            colors: colors.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Replace the normalized start point.
    pub fn with_start(mut self, x: f64, y: f64) -> Self {
        self.start = Point::new(x, y);
        self
    }

    /// Replace the normalized end point.
    pub fn with_end(mut self, x: f64, y: f64) -> Self {
        self.end = Point::new(x, y);
        self
    }

    /// Stop offsets paired with colors: stop `i` sits at `i / (n - 1)`.
    ///
    /// A single color yields one stop at `0`.
    pub fn stops(&self) -> Vec<(f32, Color)> {
        let n = self.colors.len();
        if n == 1 {
            return vec![(0.0, self.colors[0])];
        }
        let last = (n.max(2) - 1) as f32;
        self.colors
            .iter()
            .enumerate()
            .map(|(i, c)| (i as f32 / last, *c))
            .collect()
    }

    /// Color at parameter `t` along the gradient line, clamped to `[0, 1]`.
    ///
    /// Interpolation happens in premultiplied space. Returns transparent when there are no stops.
    pub fn color_at(&self, t: f64) -> Rgba8Premul {
        let n = self.colors.len();
        match n {
            0 => return Rgba8Premul::transparent(),
            1 => return self.colors[0].to_rgba8_premul(),
            _ => {}
        }

        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let seg = t * (n - 1) as f64;
        let i = (seg.floor() as usize).min(n - 2);
        let frac = seg - i as f64;

        let a = self.colors[i].to_rgba8_premul();
        let b = self.colors[i + 1].to_rgba8_premul();
        let lerp = |x: u8, y: u8| -> u8 {
            let xf = f64::from(x);
            let yf = f64::from(y);
            (xf + (yf - xf) * frac).round().clamp(0.0, 255.0) as u8
        };
        Rgba8Premul {
            r: lerp(a.r, b.r),
            g: lerp(a.g, b.g),
            b: lerp(a.b, b.b),
            a: lerp(a.a, b.a),
        }
    }

    /// Rasterize the gradient over a `width x height` box into premultiplied RGBA8.
    ///
    /// Pixels are sampled at their centers. A gradient whose start and end coincide in pixel
    /// space paints nothing.
    pub(crate) fn rasterize(&self, width: u32, height: u32) -> Vec<u8> {
        self.rasterize_window(f64::from(width), f64::from(height), 0, 0, width, height)
    }

    /// Rasterize only the `win_w x win_h` window at `(x0, y0)` of a `box_w x box_h` box.
    ///
    /// The gradient line still spans the whole box, so a window matches the same pixels of a
    /// full raster.
    pub(crate) fn rasterize_window(
        &self,
        box_w: f64,
        box_h: f64,
        x0: u32,
        y0: u32,
        win_w: u32,
        win_h: u32,
    ) -> Vec<u8> {
        let mut bytes = vec![0u8; (win_w as usize) * (win_h as usize) * 4];
        if self.colors.is_empty() {
            return bytes;
        }

        let p0 = (self.start.x * box_w, self.start.y * box_h);
        let d = (
            (self.end.x - self.start.x) * box_w,
            (self.end.y - self.start.y) * box_h,
        );
        let len2 = d.0 * d.0 + d.1 * d.1;
        if !(len2.is_finite() && len2 > 1e-12) {
            return bytes;
        }

        for (row, y) in (y0..y0 + win_h).enumerate() {
            let py = f64::from(y) + 0.5 - p0.1;
            for (col, x) in (x0..x0 + win_w).enumerate() {
                let px = f64::from(x) + 0.5 - p0.0;
                let t = (px * d.0 + py * d.1) / len2;
                let c = self.color_at(t);
                let idx = (row * (win_w as usize) + col) * 4;
                bytes[idx..idx + 4].copy_from_slice(&c.to_array());
            }
        }
        bytes
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paint/gradient.rs"]
mod tests;
