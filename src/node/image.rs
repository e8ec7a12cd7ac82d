use crate::assets::decode::decode_image;
use crate::assets::store::{ImageLoader, ImageSource};
use crate::foundation::error::PictexResult;
use crate::node::{BoxModel, LayoutCx, NodeBase};
use crate::render::cpu::{BitmapPaint, Painter};

/// Where an image node is in its fetch-and-decode lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeState {
    /// Nothing attempted yet.
    Unloaded,
    /// Fetch or decode in progress.
    Loading,
    /// Bitmap available.
    Loaded,
    /// Fetch or decode failed. The node paints no bitmap.
    Failed,
}

/// Bitmap image drawn scaled to its computed box.
#[derive(Clone, Debug)]
pub struct Image {
    base: NodeBase,
    source: ImageSource,
    state: DecodeState,
    bitmap: Option<BitmapPaint>,
    error: Option<String>,
}

impl Image {
    /// Image node for `source`. Nothing is fetched until layout or [`Image::load`].
    pub fn new(source: impl Into<ImageSource>) -> Self {
        Self {
            base: NodeBase::default(),
            source: source.into(),
            state: DecodeState::Unloaded,
            bitmap: None,
            error: None,
        }
    }

    /// Encoded image source.
    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    /// Replace the source and forget the decoded bitmap. The requested size is kept.
    pub fn set_source(&mut self, source: impl Into<ImageSource>) {
        self.source = source.into();
        self.state = DecodeState::Unloaded;
        self.bitmap = None;
        self.error = None;
    }

    /// Current lifecycle state.
    pub fn decode_state(&self) -> DecodeState {
        self.state
    }

    /// `true` once a bitmap is available.
    pub fn is_loaded(&self) -> bool {
        self.state == DecodeState::Loaded
    }

    /// Pixel size of the decoded bitmap.
    pub fn native_size(&self) -> Option<(u32, u32)> {
        self.bitmap.as_ref().map(|b| (b.width, b.height))
    }

    /// Why the last load failed, if it did.
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Request an explicit size and apply it immediately, without waiting for a layout pass.
    ///
    /// Image layout only ever resolves the requested size, so this matches what the next layout
    /// would compute.
    pub fn resize(&mut self, width: f64, height: f64) {
        let b = &mut self.base;
        b.requested_width = Some(width);
        b.requested_height = Some(height);
        b.resolve_size(0.0, 0.0);
    }

    /// Fetch and decode the source once.
    ///
    /// Calls after the state has settled are no-ops. On success, axes without a requested size
    /// adopt the bitmap's native size. Failures are logged and leave the node `Failed`.
    pub fn load(&mut self, loader: &dyn ImageLoader) {
        if self.state != DecodeState::Unloaded {
            return;
        }
        self.state = DecodeState::Loading;

        match fetch_and_decode(loader, &self.source) {
            Ok(bitmap) => {
                let b = &mut self.base;
                b.requested_width.get_or_insert(f64::from(bitmap.width));
                b.requested_height.get_or_insert(f64::from(bitmap.height));
                b.computed_width = b.requested_width.unwrap_or(0.0);
                b.computed_height = b.requested_height.unwrap_or(0.0);
                self.bitmap = Some(bitmap);
                self.state = DecodeState::Loaded;
            }
            Err(e) => {
                tracing::warn!(source = ?self.source, error = %e, "failed to load image");
                self.error = Some(e.to_string());
                self.state = DecodeState::Failed;
            }
        }
    }

    pub(crate) fn layout(&mut self, cx: &mut LayoutCx<'_>, _max_width: Option<f64>) {
        self.load(cx.loader);
        self.base.resolve_size(0.0, 0.0);
    }

    pub(crate) fn render_content(&self, painter: &mut Painter<'_>) {
        if let Some(bitmap) = &self.bitmap {
            painter.draw_bitmap(
                bitmap,
                self.base.computed_width,
                self.base.computed_height,
                self.base.style.border_radius,
            );
        }
    }
}

fn fetch_and_decode(loader: &dyn ImageLoader, source: &ImageSource) -> PictexResult<BitmapPaint> {
    let bytes = loader.fetch(source)?;
    let decoded = decode_image(&bytes)?;
    BitmapPaint::from_decoded(&decoded)
}

impl BoxModel for Image {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }
}

#[cfg(test)]
#[path = "../../tests/unit/node/image.rs"]
mod tests;
