use crate::assets::color::Color;
use crate::assets::store::{FileLoader, ImageLoader};
use crate::foundation::core::{Rect, pixel_extent};
use crate::foundation::error::{PictexError, PictexResult};
use crate::node::{BoxModel, LayoutCx, Node};
use crate::render::backend::FrameRGBA;
use crate::render::cpu::{FontCache, Painter};
use crate::text::engine::{TextEngine, TextEngineOpts};

/// Renderer configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RendererOpts {
    /// Straight-alpha RGBA8 color the surface is cleared to before painting. `None` clears to
    /// transparent.
    pub clear_rgba: Option<[u8; 4]>,
    /// Font configuration.
    pub text: TextEngineOpts,
}

impl RendererOpts {
    /// Return options with a configured clear color for the output surface.
    pub fn with_clear_rgba(mut self, clear: Option<[u8; 4]>) -> Self {
        self.clear_rgba = clear;
        self
    }

    /// Return options with the given font configuration.
    pub fn with_text(mut self, text: TextEngineOpts) -> Self {
        self.text = text;
        self
    }
}

/// Owns the output surface and drives the layout and paint passes.
///
/// ```no_run
/// use pictex::{BoxModel, Column, Node, Renderer, RendererOpts, Text};
///
/// let mut root: Node = Column::new([Text::new("Hello"), Text::new("world")])
///     .gap(4.0)
///     .padding(10.0)
///     .into();
/// let mut renderer = Renderer::new(RendererOpts::default())?;
/// let frame = renderer.render(&mut root)?;
/// assert_eq!(frame.width as f64, root.computed_size().width.trunc());
/// # Ok::<(), pictex::PictexError>(())
/// ```
pub struct Renderer {
    opts: RendererOpts,
    text: TextEngine,
    loader: Box<dyn ImageLoader>,
    fonts: FontCache,
    ctx: Option<vello_cpu::RenderContext>,
    frame: FrameRGBA,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("opts", &self.opts)
            .field("surface", &(self.frame.width, self.frame.height))
            .finish_non_exhaustive()
    }
}

impl Renderer {
    /// Renderer using a [`FileLoader`] rooted at the working directory.
    pub fn new(opts: RendererOpts) -> PictexResult<Self> {
        Self::with_loader(opts, FileLoader::new())
    }

    /// Renderer fetching image bytes through `loader`.
    pub fn with_loader(
        opts: RendererOpts,
        loader: impl ImageLoader + 'static,
    ) -> PictexResult<Self> {
        Ok(Self {
            text: TextEngine::new(&opts.text)?,
            opts,
            loader: Box::new(loader),
            fonts: FontCache::default(),
            ctx: None,
            frame: FrameRGBA::transparent(0, 0),
        })
    }

    /// Image loader used during layout.
    pub fn loader(&self) -> &dyn ImageLoader {
        self.loader.as_ref()
    }

    /// Text engine used during layout, for registering extra fonts.
    pub fn text_engine_mut(&mut self) -> &mut TextEngine {
        &mut self.text
    }

    /// The surface from the most recent render.
    pub fn frame(&self) -> &FrameRGBA {
        &self.frame
    }

    /// Run the layout pass alone.
    pub fn layout(&mut self, root: &mut Node) {
        let mut cx = LayoutCx::new(&mut self.text, self.loader.as_ref());
        root.layout(&mut cx, None);
    }

    /// Lay out `root`, resize the surface to its computed size, clear it, and paint the tree.
    ///
    /// The surface is replaced on every call. Sizes are truncated to whole pixels; surfaces wider
    /// or taller than 65535 pixels are rejected.
    #[tracing::instrument(skip_all, fields(kind = root.kind()))]
    pub fn render(&mut self, root: &mut Node) -> PictexResult<&FrameRGBA> {
        self.layout(root);

        let size = root.computed_size();
        let (width, height) = pixel_extent(size.width, size.height);
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(PictexError::render(format!(
                "surface {width}x{height} exceeds the {max}x{max} raster limit",
                max = u16::MAX
            )));
        }
        if (width, height) != (self.frame.width, self.frame.height) {
            tracing::debug!(width, height, "resized surface");
        }

        if width == 0 || height == 0 {
            self.frame = FrameRGBA::transparent(width, height);
            return Ok(&self.frame);
        }

        let (w16, h16) = (width as u16, height as u16);
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w16 && ctx.height() == h16 => ctx,
            _ => vello_cpu::RenderContext::new(w16, h16),
        };
        ctx.reset();

        let painted = {
            let mut painter = Painter::new(&mut ctx, &mut self.fonts);
            if let Some([r, g, b, a]) = self.opts.clear_rgba {
                painter.fill_rect(
                    Rect::new(0.0, 0.0, f64::from(width), f64::from(height)),
                    Color::rgba(r, g, b, a),
                );
            }
            root.render(&mut painter)
        };
        if let Err(e) = painted {
            self.ctx = Some(ctx);
            return Err(e);
        }

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);

        self.frame = FrameRGBA {
            width,
            height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        };
        Ok(&self.frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
