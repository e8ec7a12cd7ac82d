use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use vello_cpu::kurbo::Shape as _;

use crate::assets::color::Color;
use crate::assets::decode::DecodedImage;
use crate::foundation::core::{Affine, Rect, Vec2};
use crate::foundation::error::{PictexError, PictexResult};
use crate::node::BoxStyle;
use crate::paint::Fill;
use crate::paint::shadow::Shadow;
use crate::render::blur::{blur_rgba8_premul_q16, gaussian_kernel_q16};
use crate::text::engine::ShapedText;

/// Flattening tolerance for rounded rectangles.
const PATH_TOLERANCE: f64 = 0.1;

/// Decoded bitmap ready to be used as a `vello_cpu` image paint.
#[derive(Clone)]
pub(crate) struct BitmapPaint {
    pub(crate) paint: vello_cpu::Image,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl fmt::Debug for BitmapPaint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitmapPaint")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl BitmapPaint {
    pub(crate) fn from_decoded(img: &DecodedImage) -> PictexResult<Self> {
        Ok(Self {
            paint: rgba_premul_to_image(&img.rgba8_premul, img.width, img.height)?,
            width: img.width,
            height: img.height,
        })
    }
}

/// Fonts converted from Parley's font handles, keyed by blob id and face index.
#[derive(Default)]
pub(crate) struct FontCache {
    fonts: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
}

impl FontCache {
    fn get(
        &mut self,
        key: (u64, u32),
        bytes: impl FnOnce() -> Vec<u8>,
    ) -> vello_cpu::peniko::FontData {
        self.fonts
            .entry(key)
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes()), key.1)
            })
            .clone()
    }
}

struct PreparedRun {
    font: vello_cpu::peniko::FontData,
    font_size: f32,
    glyphs: Vec<(u32, f32, f32)>,
}

impl PreparedRun {
    fn glyphs(&self) -> impl Iterator<Item = vello_cpu::Glyph> + '_ {
        self.glyphs
            .iter()
            .map(|&(id, x, y)| vello_cpu::Glyph { id, x, y })
    }
}

/// Immediate-mode painter over a `vello_cpu` context.
///
/// Coordinates are node-local: callers move the origin with [`Painter::translate`] and restore it
/// with [`Painter::set_transform`]. Shadows are explicit arguments of each paint call.
pub(crate) struct Painter<'a> {
    ctx: &'a mut vello_cpu::RenderContext,
    fonts: &'a mut FontCache,
    transform: Affine,
}

impl<'a> Painter<'a> {
    pub(crate) fn new(ctx: &'a mut vello_cpu::RenderContext, fonts: &'a mut FontCache) -> Self {
        Self {
            ctx,
            fonts,
            transform: Affine::IDENTITY,
        }
    }

    pub(crate) fn transform(&self) -> Affine {
        self.transform
    }

    pub(crate) fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    pub(crate) fn translate(&mut self, x: f64, y: f64) {
        self.transform *= Affine::translate(Vec2::new(x, y));
    }

    fn apply_transform(&mut self, local: Affine) {
        self.ctx.set_transform(affine_to_cpu(self.transform * local));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    pub(crate) fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.apply_transform(Affine::IDENTITY);
        self.ctx.set_paint(color.to_cpu());
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    /// Paint the box decoration of a `width x height` box at the current origin: every shadow,
    /// then the fill, then the border stroke.
    ///
    /// Shadows take the silhouette of the fill and border. `opaque_content` marks content that
    /// covers the whole box (a decoded bitmap), which then casts shadows as well.
    pub(crate) fn paint_box(
        &mut self,
        width: f64,
        height: f64,
        style: &BoxStyle,
        opaque_content: bool,
    ) -> PictexResult<()> {
        let has_border = style.border_width > 0.0;
        let fill_silhouette = style.background.is_some() || opaque_content;
        if !fill_silhouette && !has_border {
            return Ok(());
        }

        let path = box_path(width, height, style.border_radius);

        for shadow in &style.shadows {
            if !shadow.is_visible() {
                continue;
            }
            let half = if has_border { style.border_width / 2.0 } else { 0.0 };
            let bounds = Rect::new(-half, -half, width + half, height + half);
            let border_width = style.border_width;
            self.cast_shadow(shadow, bounds, |ctx, _| {
                if fill_silhouette {
                    ctx.fill_path(&path);
                }
                if has_border {
                    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(border_width));
                    ctx.stroke_path(&path);
                }
            })?;
        }

        match &style.background {
            Some(Fill::Solid { color }) => {
                self.apply_transform(Affine::IDENTITY);
                self.ctx.set_paint(color.to_cpu());
                self.ctx.fill_path(&path);
            }
            Some(Fill::LinearGradient(g)) => {
                if let Some((x0, y0, gw, gh)) = self.visible_window(width, height) {
                    let bytes = g.rasterize_window(width.ceil(), height.ceil(), x0, y0, gw, gh);
                    let img = rgba_premul_to_image(&bytes, gw, gh)?;
                    self.apply_transform(Affine::IDENTITY);
                    self.ctx.set_paint(img);
                    self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::translate((
                        f64::from(x0),
                        f64::from(y0),
                    )));
                    self.ctx.fill_path(&path);
                }
            }
            None => {}
        }

        if has_border {
            self.apply_transform(Affine::IDENTITY);
            self.ctx.set_paint(style.border_color.to_cpu());
            self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(style.border_width));
            self.ctx.stroke_path(&path);
        }
        Ok(())
    }

    /// Pixel window `(x0, y0, w, h)` of a `width x height` box at the current origin that lands
    /// on the surface, in box pixels. `None` when nothing of the box is visible.
    fn visible_window(&self, width: f64, height: f64) -> Option<(u32, u32, u32, u32)> {
        let o = self.transform.translation();
        let axis = |origin: f64, len: f64, surface: u16| -> Option<(u32, u32)> {
            let len = len.ceil();
            let lo = (-origin).floor().clamp(0.0, len);
            let hi = (f64::from(surface) - origin).ceil().clamp(0.0, len);
            (hi > lo).then(|| (lo as u32, (hi - lo) as u32))
        };
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return None;
        }
        let (x0, w) = axis(o.x, width, self.ctx.width())?;
        let (y0, h) = axis(o.y, height, self.ctx.height())?;
        Some((x0, y0, w, h))
    }

    /// Draw `bitmap` scaled to `width x height`, clipped to the rounded box when `radius > 0`.
    pub(crate) fn draw_bitmap(
        &mut self,
        bitmap: &BitmapPaint,
        width: f64,
        height: f64,
        radius: f64,
    ) {
        if bitmap.width == 0 || bitmap.height == 0 || !(width > 0.0) || !(height > 0.0) {
            return;
        }

        let clipped = radius > 0.0;
        if clipped {
            self.apply_transform(Affine::IDENTITY);
            self.ctx.push_clip_layer(&box_path(width, height, radius));
        }

        let sx = width / f64::from(bitmap.width);
        let sy = height / f64::from(bitmap.height);
        self.apply_transform(Affine::scale_non_uniform(sx, sy));
        self.ctx.set_paint(bitmap.paint.clone());
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(bitmap.width),
            f64::from(bitmap.height),
        ));

        if clipped {
            self.ctx.pop_layer();
        }
    }

    /// Fill the glyphs of `shaped` in `color` with the top-left of the line box at `(x, y_top)`,
    /// casting every shadow in `shadows` first.
    pub(crate) fn draw_text(
        &mut self,
        shaped: &ShapedText,
        x: f64,
        y_top: f64,
        color: Color,
        shadows: &[Shadow],
    ) -> PictexResult<()> {
        let Some(layout) = &shaped.layout else {
            return Ok(());
        };

        let runs = self.prepare_runs(layout);
        if runs.is_empty() {
            return Ok(());
        }
        let dy = y_top + shaped.ascent - shaped.baseline;

        let line_h = shaped.ascent + shaped.descent;
        let slack = runs
            .iter()
            .map(|r| f64::from(r.font_size))
            .fold(0.0f64, f64::max)
            * 0.5;
        let bounds = Rect::new(
            x - slack,
            y_top - slack,
            x + shaped.width + slack,
            y_top + line_h + slack,
        );

        for shadow in shadows {
            if !shadow.is_visible() {
                continue;
            }
            self.cast_shadow(shadow, bounds, |ctx, base| {
                ctx.set_transform(base * vello_cpu::kurbo::Affine::translate((x, dy)));
                for run in &runs {
                    ctx.glyph_run(&run.font)
                        .font_size(run.font_size)
                        .fill_glyphs(run.glyphs());
                }
            })?;
        }

        self.apply_transform(Affine::translate(Vec2::new(x, dy)));
        self.ctx.set_paint(color.to_cpu());
        for run in &runs {
            self.ctx
                .glyph_run(&run.font)
                .font_size(run.font_size)
                .fill_glyphs(run.glyphs());
        }
        Ok(())
    }

    fn prepare_runs(
        &mut self,
        layout: &parley::Layout<crate::text::engine::TextBrushRgba8>,
    ) -> Vec<PreparedRun> {
        let mut out = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let font = run.run().font();
                let font = self
                    .fonts
                    .get((font.data.id(), font.index), || font.data.data().to_vec());
                out.push(PreparedRun {
                    font,
                    font_size: run.run().font_size(),
                    glyphs: run
                        .positioned_glyphs()
                        .map(|g| (g.id, g.x, g.y))
                        .collect(),
                });
            }
        }
        out
    }

    /// Render a silhouette offscreen in the shadow color, blur it, and composite it offset by the
    /// shadow offset. `bounds` is the silhouette's extent in node-local coordinates.
    fn cast_shadow(
        &mut self,
        shadow: &Shadow,
        bounds: Rect,
        draw: impl FnOnce(&mut vello_cpu::RenderContext, vello_cpu::kurbo::Affine),
    ) -> PictexResult<()> {
        let pad = f64::from(shadow.kernel_radius());
        let origin_x = (bounds.x0 - pad).floor();
        let origin_y = (bounds.y0 - pad).floor();
        let w = (bounds.x1 + pad).ceil() - origin_x;
        let h = (bounds.y1 + pad).ceil() - origin_y;
        if !(w >= 1.0 && h >= 1.0) || !w.is_finite() || !h.is_finite() {
            return Ok(());
        }
        if w > f64::from(u16::MAX) || h > f64::from(u16::MAX) {
            return Err(PictexError::render(format!(
                "shadow surface too large: {w}x{h}"
            )));
        }
        let (w, h) = (w as u16, h as u16);

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        let base = vello_cpu::kurbo::Affine::translate((-origin_x, -origin_y));
        ctx.set_transform(base);
        ctx.set_paint(shadow.color.to_cpu());
        draw(&mut ctx, base);
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);

        let kernel = gaussian_kernel_q16(shadow.kernel_radius(), shadow.sigma())?;
        if kernel.len() > 1 {
            let src = pixmap.data_as_u8_slice().to_vec();
            let mut tmp = vec![0u8; src.len()];
            blur_rgba8_premul_q16(
                &src,
                pixmap.data_as_u8_slice_mut(),
                &mut tmp,
                u32::from(w),
                u32::from(h),
                &kernel,
            );
        }

        let img = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.apply_transform(Affine::translate(Vec2::new(
            origin_x + shadow.offset.x,
            origin_y + shadow.offset.y,
        )));
        self.ctx.set_paint(img);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(w),
            f64::from(h),
        ));
        Ok(())
    }
}

/// Rectangle or rounded-rectangle outline of a `width x height` box at the origin.
pub(crate) fn box_path(width: f64, height: f64, radius: f64) -> vello_cpu::kurbo::BezPath {
    let rect = vello_cpu::kurbo::Rect::new(0.0, 0.0, width, height);
    if radius > 0.0 {
        vello_cpu::kurbo::RoundedRect::from_rect(rect, radius).to_path(PATH_TOLERANCE)
    } else {
        rect.to_path(PATH_TOLERANCE)
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> PictexResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PictexError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PictexError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(PictexError::render("pixmap byte len mismatch"));
    }
    let pixels: Vec<vello_cpu::peniko::color::PremulRgba8> = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> PictexResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
