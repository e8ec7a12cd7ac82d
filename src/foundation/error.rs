/// Crate-wide result alias.
pub type PictexResult<T> = Result<T, PictexError>;

/// Errors surfaced by layout, rendering, decoding, and document import/export.
#[derive(thiserror::Error, Debug)]
pub enum PictexError {
    /// Caller-supplied values that cannot be used (bad paths, oversized surfaces, bad options).
    #[error("validation error: {0}")]
    Validation(String),

    /// Encoded image bytes could not be fetched or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// An overlay document could not be read or written.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other failure, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PictexError {
    /// Build a [`PictexError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PictexError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`PictexError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PictexError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for PictexError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
