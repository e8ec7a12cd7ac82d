use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

use skrifa::instance::{LocationRef, NormalizedCoord, Size};
use skrifa::metrics::GlyphMetrics;

use crate::assets::color::Color;
use crate::foundation::error::{PictexError, PictexResult};

/// Environment variable listing extra font files (platform path-list syntax).
pub const FONT_FILES_ENV: &str = "PICTEX_FONT_FILES";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Color> for TextBrushRgba8 {
    fn from(c: Color) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Text engine configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct TextEngineOpts {
    /// Font files registered on top of the system fonts.
    pub font_files: Vec<PathBuf>,
    /// Family appended to every font stack, used when the requested family is missing.
    pub fallback_family: String,
}

impl Default for TextEngineOpts {
    fn default() -> Self {
        Self {
            font_files: Vec::new(),
            fallback_family: "sans-serif".to_owned(),
        }
    }
}

impl TextEngineOpts {
    /// Defaults plus any font files listed in `PICTEX_FONT_FILES`.
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        if let Some(v) = std::env::var_os(FONT_FILES_ENV) {
            opts.font_files
                .extend(std::env::split_paths(&v).filter(|p| !p.as_os_str().is_empty()));
        }
        opts
    }

    /// Register an extra font file.
    pub fn with_font_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_files.push(path.into());
        self
    }

    /// Replace the fallback family.
    pub fn with_fallback_family(mut self, family: impl Into<String>) -> Self {
        self.fallback_family = family.into();
        self
    }
}

/// Font request for a single line of text.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TextRequest<'a> {
    pub(crate) content: &'a str,
    pub(crate) font_size: f64,
    pub(crate) font_family: &'a str,
    pub(crate) font_weight: f32,
    pub(crate) color: Color,
}

/// Shaped single-line layout and the metrics layout needs.
#[derive(Clone)]
pub(crate) struct ShapedText {
    pub(crate) layout: Option<parley::Layout<TextBrushRgba8>>,
    /// Advance width of the line.
    pub(crate) width: f64,
    /// Distance from the line top to the baseline.
    pub(crate) ascent: f64,
    /// Distance from the baseline to the line bottom.
    pub(crate) descent: f64,
    /// Baseline position inside `layout`, which may include half-leading.
    pub(crate) baseline: f64,
    /// Height of the union of the glyphs' ink boxes. Zero when nothing has ink.
    pub(crate) ink_height: f64,
}

impl ShapedText {
    pub(crate) fn empty() -> Self {
        Self {
            layout: None,
            width: 0.0,
            ascent: 0.0,
            descent: 0.0,
            baseline: 0.0,
            ink_height: 0.0,
        }
    }
}

impl fmt::Debug for ShapedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapedText")
            .field("width", &self.width)
            .field("ascent", &self.ascent)
            .field("descent", &self.descent)
            .field("ink_height", &self.ink_height)
            .field("glyph_runs", &self.layout.as_ref().map(count_runs))
            .finish()
    }
}

fn count_runs(layout: &parley::Layout<TextBrushRgba8>) -> usize {
    layout.lines().map(|l| l.items().count()).sum()
}

/// Shapes and measures single-line text with Parley over system and configured fonts.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    fallback_family: String,
}

impl fmt::Debug for TextEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextEngine")
            .field("fallback_family", &self.fallback_family)
            .finish_non_exhaustive()
    }
}

impl TextEngine {
    /// Build an engine, registering every configured font file.
    pub fn new(opts: &TextEngineOpts) -> PictexResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        for path in &opts.font_files {
            let bytes = std::fs::read(path).map_err(|e| {
                PictexError::validation(format!("read font file '{}': {e}", path.display()))
            })?;
            let families = font_ctx
                .collection
                .register_fonts(parley::fontique::Blob::from(bytes), None);
            if families.is_empty() {
                return Err(PictexError::validation(format!(
                    "no font families registered from '{}'",
                    path.display()
                )));
            }
            tracing::debug!(
                path = %path.display(),
                families = families.len(),
                "registered font file"
            );
        }

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            fallback_family: opts.fallback_family.clone(),
        })
    }

    /// Register font bytes already in memory. Returns the family names they provide.
    pub fn register_font_bytes(&mut self, bytes: Vec<u8>) -> Vec<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes), None);
        let mut names = Vec::with_capacity(families.len());
        for (id, _) in &families {
            if let Some(name) = self.font_ctx.collection.family_name(*id) {
                names.push(name.to_owned());
            }
        }
        names
    }

    /// Shape one unwrapped line. Invalid sizes and empty content produce empty metrics.
    pub(crate) fn shape(&mut self, req: &TextRequest<'_>) -> ShapedText {
        if !req.font_size.is_finite() || req.font_size <= 0.0 || req.content.is_empty() {
            return ShapedText::empty();
        }

        let stack = if req.font_family.trim().is_empty() {
            self.fallback_family.clone()
        } else {
            format!("{}, {}", req.font_family, self.fallback_family)
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, req.content, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(stack)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(req.font_size as f32));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(req.font_weight),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::from(
            req.color,
        )));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(req.content);
        layout.break_all_lines(None);

        let (ascent, descent, baseline) = layout
            .lines()
            .next()
            .map(|line| {
                let m = line.metrics();
                (
                    f64::from(m.ascent),
                    f64::from(m.descent),
                    f64::from(m.baseline),
                )
            })
            .unwrap_or((0.0, 0.0, 0.0));

        ShapedText {
            width: f64::from(layout.width()),
            ascent,
            descent,
            baseline,
            ink_height: ink_height(&layout),
            layout: Some(layout),
        }
    }
}

/// Vertical extent of the inked glyphs in `layout`, from each run font's glyph bounds.
///
/// Glyphs without outlines (spaces) and fonts skrifa cannot read are skipped.
fn ink_height(layout: &parley::Layout<TextBrushRgba8>) -> f64 {
    let mut top = f32::INFINITY;
    let mut bottom = f32::NEG_INFINITY;
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let font = run.run().font();
            let Ok(font_ref) = skrifa::FontRef::from_index(font.data.data(), font.index) else {
                tracing::debug!(index = font.index, "font not readable for ink bounds");
                continue;
            };
            let coords: Vec<NormalizedCoord> = run
                .run()
                .normalized_coords()
                .iter()
                .map(|&c| NormalizedCoord::from_bits(c))
                .collect();
            let metrics = GlyphMetrics::new(
                &font_ref,
                Size::new(run.run().font_size()),
                LocationRef::new(&coords),
            );
            for g in run.positioned_glyphs() {
                let Some(b) = metrics.bounds(skrifa::GlyphId::new(g.id)) else {
                    continue;
                };
                if b.y_max <= b.y_min || b.x_max <= b.x_min {
                    continue;
                }
                // Font units are y-up; layout coordinates are y-down from the line top.
                top = top.min(g.y - b.y_max);
                bottom = bottom.max(g.y - b.y_min);
            }
        }
    }
    if bottom > top {
        f64::from(bottom - top)
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;
