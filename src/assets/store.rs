use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

use crate::foundation::error::{PictexError, PictexResult};

/// Where an image node gets its encoded bytes from.
#[derive(Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A file path (absolute, or relative to the loader root) or a `data:` URL.
    Uri(String),
    /// Encoded bytes held in memory.
    Bytes(Arc<[u8]>),
}

impl ImageSource {
    /// The URI form, if this source is one. Export writes it back as `src`.
    pub fn as_uri(&self) -> Option<&str> {
        match self {
            Self::Uri(s) => Some(s),
            Self::Bytes(_) => None,
        }
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uri(s) if s.len() > 64 => {
                let head: String = s.chars().take(64).collect();
                write!(f, "Uri({head:?}...)")
            }
            Self::Uri(s) => write!(f, "Uri({s:?})"),
            Self::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
        }
    }
}

impl From<&str> for ImageSource {
    fn from(s: &str) -> Self {
        Self::Uri(s.to_owned())
    }
}

impl From<String> for ImageSource {
    fn from(s: String) -> Self {
        Self::Uri(s)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b.into())
    }
}

/// Fetches the encoded bytes behind an [`ImageSource`].
///
/// Implementations must be shareable across the preload thread pool.
pub trait ImageLoader: Send + Sync {
    /// Return the raw encoded bytes for `source`.
    fn fetch(&self, source: &ImageSource) -> PictexResult<Vec<u8>>;
}

/// Filesystem loader. Also understands `data:` URLs and in-memory sources.
#[derive(Clone, Debug, Default)]
pub struct FileLoader {
    root: Option<PathBuf>,
}

impl FileLoader {
    /// Loader resolving relative paths against the process working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root`.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Root directory for relative sources, if any.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    fn resolve(&self, uri: &str) -> PictexResult<PathBuf> {
        if let Some(rest) = uri.strip_prefix("file://") {
            return Ok(PathBuf::from(rest));
        }
        if uri.starts_with("http://") || uri.starts_with("https://") {
            return Err(PictexError::validation(format!(
                "remote image sources are not supported: {uri}"
            )));
        }
        let path = Path::new(uri);
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        let rel = normalize_rel_path(uri)?;
        Ok(match &self.root {
            Some(root) => root.join(rel),
            None => PathBuf::from(rel),
        })
    }
}

impl ImageLoader for FileLoader {
    fn fetch(&self, source: &ImageSource) -> PictexResult<Vec<u8>> {
        match source {
            ImageSource::Bytes(b) => Ok(b.to_vec()),
            ImageSource::Uri(uri) if uri.starts_with("data:") => decode_data_url(uri),
            ImageSource::Uri(uri) => {
                let path = self.resolve(uri)?;
                std::fs::read(&path).map_err(|e| {
                    PictexError::decode(format!("read image '{}': {e}", path.display()))
                })
            }
        }
    }
}

/// Decode the payload of a `data:[<mime>][;base64],<payload>` URL.
pub fn decode_data_url(url: &str) -> PictexResult<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| PictexError::validation("data URL must start with 'data:'"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| PictexError::validation("data URL has no ',' separator"))?;

    if meta.split(';').any(|p| p.eq_ignore_ascii_case("base64")) {
        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        BASE64_STANDARD
            .decode(cleaned)
            .map_err(|e| PictexError::decode(format!("data URL base64: {e}")))
    } else {
        Ok(urlencoding::decode_binary(payload.as_bytes()).into_owned())
    }
}

/// Encode bytes as a base64 `data:` URL with the given MIME type.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64_STANDARD.encode(bytes))
}

/// Normalize and validate loader-relative image paths.
///
/// The result uses `/` separators, drops `.` segments, and rejects parent traversals (`..`).
pub(crate) fn normalize_rel_path(source: &str) -> PictexResult<String> {
    let s = source.replace('\\', "/");
    if s.is_empty() {
        return Err(PictexError::validation("image path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(PictexError::validation("image paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(PictexError::validation("image path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
