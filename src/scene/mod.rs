//! Percentage-based overlay documents and the layer stack they describe.

pub(crate) mod composition;
pub(crate) mod model;
