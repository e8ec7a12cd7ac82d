use serde::{Deserialize, Serialize};

use crate::assets::color::Color;
use crate::foundation::error::PictexResult;
use crate::node::{BoxModel, LayoutCx, NodeBase};
use crate::paint::shadow::Shadow;
use crate::render::cpu::Painter;
use crate::text::engine::{ShapedText, TextRequest};

/// Extra vertical space added to measured text height.
pub const TEXT_VERTICAL_BUFFER: f64 = 10.0;

/// Horizontal placement of the line inside the content box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    /// Line starts at the left padding edge.
    #[default]
    Left,
    /// Line is centered in the content box.
    Center,
}

/// CSS-style font weight (`400` normal, `700` bold).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontWeight(pub f32);

impl FontWeight {
    /// `400`.
    pub const NORMAL: Self = Self(400.0);
    /// `700`.
    pub const BOLD: Self = Self(700.0);
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Single line of text.
#[derive(Clone, Debug)]
pub struct Text {
    base: NodeBase,
    content: String,
    font_size: f64,
    font_family: String,
    font_weight: FontWeight,
    color: Color,
    text_align: TextAlign,
    text_shadows: Vec<Shadow>,
    shaped: Option<ShapedText>,
}

impl Text {
    /// Text node with the defaults: 40px Arial, normal weight, black, left aligned.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            base: NodeBase::default(),
            content: content.into(),
            font_size: 40.0,
            font_family: "Arial".to_owned(),
            font_weight: FontWeight::NORMAL,
            color: Color::BLACK,
            text_align: TextAlign::Left,
            text_shadows: Vec::new(),
            shaped: None,
        }
    }

    /// Set the font size in pixels.
    pub fn font_size(mut self, value: f64) -> Self {
        self.font_size = value;
        self
    }

    /// Set the font family.
    pub fn font_family(mut self, value: impl Into<String>) -> Self {
        self.font_family = value.into();
        self
    }

    /// Set the font weight.
    pub fn font_weight(mut self, value: FontWeight) -> Self {
        self.font_weight = value;
        self
    }

    /// Set the text color.
    pub fn color(mut self, value: impl Into<Color>) -> Self {
        self.color = value.into();
        self
    }

    /// Set the horizontal alignment.
    pub fn text_align(mut self, value: TextAlign) -> Self {
        self.text_align = value;
        self
    }

    /// Append a shadow cast by the glyphs.
    pub fn text_shadow(mut self, shadow: Shadow) -> Self {
        self.text_shadows.push(shadow);
        self
    }

    /// Text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Font size in pixels.
    pub fn size_px(&self) -> f64 {
        self.font_size
    }

    /// Font family.
    pub fn family(&self) -> &str {
        &self.font_family
    }

    /// Font weight.
    pub fn weight(&self) -> FontWeight {
        self.font_weight
    }

    /// Text color.
    pub fn text_color(&self) -> Color {
        self.color
    }

    /// Horizontal alignment.
    pub fn align(&self) -> TextAlign {
        self.text_align
    }

    /// Glyph shadows in paint order.
    pub fn text_shadows(&self) -> &[Shadow] {
        &self.text_shadows
    }

    /// Mutable glyph shadows.
    pub fn text_shadows_mut(&mut self) -> &mut Vec<Shadow> {
        &mut self.text_shadows
    }

    /// Replace the content. Takes effect on the next layout.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Replace the font size. Takes effect on the next layout.
    pub fn set_font_size(&mut self, value: f64) {
        self.font_size = value;
    }

    /// Replace the color.
    pub fn set_color(&mut self, value: impl Into<Color>) {
        self.color = value.into();
    }

    /// Measured line width from the last layout, without padding.
    pub fn measured_width(&self) -> f64 {
        self.shaped.as_ref().map_or(0.0, |s| s.width)
    }

    /// Ink height of the glyphs from the last layout: the extent of what is actually drawn, so
    /// `"ace"` measures shorter than `"Ág"` at the same size.
    pub fn measured_height(&self) -> f64 {
        self.shaped.as_ref().map_or(0.0, |s| s.ink_height)
    }

    pub(crate) fn layout(&mut self, cx: &mut LayoutCx<'_>, _max_width: Option<f64>) {
        let shaped = cx.text.shape(&TextRequest {
            content: &self.content,
            font_size: self.font_size,
            font_family: &self.font_family,
            font_weight: self.font_weight.0,
            color: self.color,
        });
        let p = self.base.style.padding;
        let w = shaped.width + 2.0 * p;
        let h = shaped.ink_height + 2.0 * p + TEXT_VERTICAL_BUFFER;
        self.base.resolve_size(w, h);
        self.shaped = Some(shaped);
    }

    /// Left edge of the line and top of the line box, both node-local.
    pub(crate) fn line_origin(&self) -> (f64, f64) {
        let (width, line_h) = self
            .shaped
            .as_ref()
            .map_or((0.0, 0.0), |s| (s.width, s.ascent + s.descent));
        let p = self.base.style.padding;
        let w = self.base.computed_width;
        let x = match self.text_align {
            TextAlign::Left => p,
            TextAlign::Center => p + (w - 2.0 * p) / 2.0 - width / 2.0,
        };
        let y = self.base.computed_height / 2.0 - line_h / 2.0;
        (x, y)
    }

    pub(crate) fn render_content(&self, painter: &mut Painter<'_>) -> PictexResult<()> {
        let Some(shaped) = &self.shaped else {
            return Ok(());
        };
        let (x, y) = self.line_origin();
        painter.draw_text(shaped, x, y, self.color, &self.text_shadows)
    }
}

impl BoxModel for Text {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }
}

#[cfg(test)]
#[path = "../../tests/unit/node/text.rs"]
mod tests;
