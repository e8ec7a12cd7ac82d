//! Encoding rendered frames for storage or upload.

pub(crate) mod png;
