//! pictex composes layered images: a base photo plus text and image overlays with backgrounds,
//! borders, shadows and gradients, rasterized on the CPU.
//!
//! - Build a tree of [`Node`]s ([`Text`], [`Image`], [`Column`], [`Group`]) with the
//!   [`BoxModel`] builders
//! - Hand the root to a [`Renderer`], which lays it out and paints it into a [`FrameRGBA`]
//! - Or load a percentage-based [`OverlayDocument`] into a [`Composition`] and render that
//!
//! ```no_run
//! use pictex::{BoxModel, Color, Column, Node, Renderer, RendererOpts, Text};
//!
//! let mut root: Node = Column::new([
//!     Text::new("Hello").font_size(48.0).color(Color::WHITE),
//!     Text::new("world").font_size(24.0),
//! ])
//! .gap(8.0)
//! .padding(16.0)
//! .background("#1e293b")
//! .into();
//!
//! let mut renderer = Renderer::new(RendererOpts::default())?;
//! let frame = renderer.render(&mut root)?;
//! pictex::save_png(frame, "hello.png")?;
//! # Ok::<(), pictex::PictexError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod encode;
mod foundation;
mod node;
mod paint;
mod render;
mod scene;
mod text;

pub use crate::assets::color::Color;
pub use crate::assets::decode::{DecodedImage, decode_image};
pub use crate::assets::store::{
    FileLoader, ImageLoader, ImageSource, decode_data_url, encode_data_url,
};
pub use crate::encode::png::{encode_png, png_data_url, save_png};
pub use crate::foundation::core::{Affine, Point, Rect, Rgba8Premul, Size, Vec2};
pub use crate::foundation::error::{PictexError, PictexResult};
pub use crate::node::column::{AlignItems, Column};
pub use crate::node::group::Group;
pub use crate::node::image::{DecodeState, Image};
pub use crate::node::text::{FontWeight, TEXT_VERTICAL_BUFFER, Text, TextAlign};
pub use crate::node::{BoxModel, BoxStyle, LayoutCx, Node, NodeBase, preload_images};
pub use crate::paint::Fill;
pub use crate::paint::gradient::LinearGradient;
pub use crate::paint::shadow::Shadow;
pub use crate::render::backend::FrameRGBA;
pub use crate::render::surface::{Renderer, RendererOpts};
pub use crate::scene::composition::{
    Composition, DEFAULT_BASE_SIZE, MAX_UPLOAD_WIDTH, NEW_OVERLAY_POSITION,
};
pub use crate::scene::model::{BackgroundDef, Dim, ElementDef, OverlayDocument, ShadowDef};
pub use crate::text::engine::{FONT_FILES_ENV, TextEngine, TextEngineOpts};
