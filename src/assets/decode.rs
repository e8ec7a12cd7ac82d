use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{PictexError, PictexResult};
use crate::foundation::math::premultiply_rgba8_in_place;

// Larger SVG canvases are rejected instead of allocating a huge pixmap.
const MAX_SVG_DIM: u32 = 16_384;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded bitmap in premultiplied RGBA8 form.
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode encoded image bytes (PNG, JPEG, GIF, WebP, ... or SVG) into a premultiplied bitmap.
///
/// SVG documents are rasterized at their intrinsic size.
pub fn decode_image(bytes: &[u8]) -> PictexResult<DecodedImage> {
    if looks_like_svg(bytes) {
        return rasterize_svg(bytes);
    }

    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(DecodedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Sniff for an XML/SVG prologue. Raster formats all start with binary magic bytes.
pub(crate) fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    let Ok(text) = std::str::from_utf8(head) else {
        // A multi-byte char may straddle the cut; retry on the valid prefix.
        return match std::str::from_utf8(&head[..head.len().saturating_sub(3)]) {
            Ok(text) => text.contains("<svg"),
            Err(_) => false,
        };
    };
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    trimmed.starts_with("<svg") || (trimmed.starts_with('<') && text.contains("<svg"))
}

fn rasterize_svg(bytes: &[u8]) -> PictexResult<DecodedImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;

    let size = tree.size();
    let to_px = |v: f32| -> PictexResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(PictexError::decode("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    };
    let width = to_px(size.width())?;
    let height = to_px(size.height())?;
    if width > MAX_SVG_DIM || height > MAX_SVG_DIM {
        return Err(PictexError::decode(format!(
            "svg raster size too large: {width}x{height} (max {MAX_SVG_DIM}x{MAX_SVG_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| PictexError::decode("failed to allocate svg pixmap"))?;
    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    // tiny-skia already stores premultiplied RGBA8.
    Ok(DecodedImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.take()),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
