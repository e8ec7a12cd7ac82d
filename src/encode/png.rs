use std::io::Cursor;
use std::path::Path;

use anyhow::Context as _;

use crate::assets::store::encode_data_url;
use crate::foundation::error::{PictexError, PictexResult};
use crate::render::backend::FrameRGBA;

fn straight_rgba(frame: &FrameRGBA) -> PictexResult<image::RgbaImage> {
    if frame.is_empty() {
        return Err(PictexError::validation(format!(
            "cannot encode an empty {}x{} frame",
            frame.width, frame.height
        )));
    }
    let straight = frame.to_straight();
    image::RgbaImage::from_raw(straight.width, straight.height, straight.data)
        .ok_or_else(|| PictexError::validation("frame data does not match its dimensions"))
}

/// Encode a frame as PNG bytes with straight alpha.
pub fn encode_png(frame: &FrameRGBA) -> PictexResult<Vec<u8>> {
    let img = straight_rgba(frame)?;
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

/// Write a frame to `path` as PNG, creating parent directories as needed.
pub fn save_png(frame: &FrameRGBA, path: impl AsRef<Path>) -> PictexResult<()> {
    let path = path.as_ref();
    let img = straight_rgba(frame)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Encode a frame as a `data:image/png;base64,...` URL.
pub fn png_data_url(frame: &FrameRGBA) -> PictexResult<String> {
    Ok(encode_data_url("image/png", &encode_png(frame)?))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
