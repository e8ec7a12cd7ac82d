//! Scene-graph nodes: the shared box model and the closed set of node kinds.

pub(crate) mod column;
pub(crate) mod group;
pub(crate) mod image;
pub(crate) mod text;

use crate::assets::color::Color;
use crate::assets::store::ImageLoader;
use crate::foundation::core::Size;
use crate::foundation::error::PictexResult;
use crate::paint::Fill;
use crate::paint::shadow::Shadow;
use crate::render::cpu::Painter;
use crate::text::engine::TextEngine;

use column::Column;
use group::Group;
use image::Image;
use text::Text;

/// Box-model decoration shared by every node kind.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxStyle {
    /// Inset between the box edge and its content, in pixels.
    pub padding: f64,
    /// Stored for callers; layout ignores it.
    pub margin: f64,
    /// Background fill. `None` paints no background.
    pub background: Option<Fill>,
    /// Corner radius in pixels.
    pub border_radius: f64,
    /// Border stroke width in pixels. `0` disables the border.
    pub border_width: f64,
    /// Border stroke color.
    pub border_color: Color,
    /// Shadows cast by the box silhouette, painted in order.
    pub shadows: Vec<Shadow>,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            padding: 0.0,
            margin: 0.0,
            background: None,
            border_radius: 0.0,
            border_width: 0.0,
            border_color: Color::BLACK,
            shadows: Vec::new(),
        }
    }
}

/// State every node carries: style, requested and computed size, and position in the parent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeBase {
    /// Box decoration.
    pub style: BoxStyle,
    /// Explicit width override.
    pub requested_width: Option<f64>,
    /// Explicit height override.
    pub requested_height: Option<f64>,
    pub(crate) computed_width: f64,
    pub(crate) computed_height: f64,
    /// Horizontal position in the parent's local space.
    pub x: f64,
    /// Vertical position in the parent's local space.
    pub y: f64,
}

impl NodeBase {
    /// Requested size per axis, falling back to `intrinsic`.
    pub(crate) fn resolve_size(&mut self, intrinsic_w: f64, intrinsic_h: f64) {
        self.computed_width = self.requested_width.unwrap_or(intrinsic_w);
        self.computed_height = self.requested_height.unwrap_or(intrinsic_h);
    }

    /// Inclusive point-in-box test in the parent's coordinate space.
    pub(crate) fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x
            && px <= self.x + self.computed_width
            && py >= self.y
            && py <= self.y + self.computed_height
    }
}

/// Box-model accessors and chained builders shared by every node kind.
///
/// Builders consume and return the node so trees read as one expression:
///
/// ```
/// use pictex::{BoxModel, Color, Text};
///
/// let title = Text::new("Hello")
///     .font_size(32.0)
///     .padding(8.0)
///     .background(Color::WHITE)
///     .border_radius(6.0);
/// assert_eq!(title.style().padding, 8.0);
/// ```
pub trait BoxModel {
    /// Shared node state.
    fn base(&self) -> &NodeBase;
    /// Mutable shared node state.
    fn base_mut(&mut self) -> &mut NodeBase;

    /// Box decoration.
    fn style(&self) -> &BoxStyle {
        &self.base().style
    }

    /// Mutable box decoration, for in-place edits.
    fn style_mut(&mut self) -> &mut BoxStyle {
        &mut self.base_mut().style
    }

    /// Size produced by the most recent layout pass.
    fn computed_size(&self) -> Size {
        let b = self.base();
        Size::new(b.computed_width, b.computed_height)
    }

    /// Position in the parent's local space.
    fn position(&self) -> (f64, f64) {
        (self.base().x, self.base().y)
    }

    /// Move the node within its parent. Column layout overwrites this for its children.
    fn set_position(&mut self, x: f64, y: f64) {
        let b = self.base_mut();
        b.x = x;
        b.y = y;
    }

    /// Replace the explicit size overrides.
    fn set_requested_size(&mut self, width: Option<f64>, height: Option<f64>) {
        let b = self.base_mut();
        b.requested_width = width;
        b.requested_height = height;
    }

    /// Inclusive hit test against the computed box, in the parent's coordinate space.
    fn hit_test(&self, px: f64, py: f64) -> bool {
        self.base().contains(px, py)
    }

    /// Set the padding.
    fn padding(mut self, value: f64) -> Self
    where
        Self: Sized,
    {
        self.style_mut().padding = value;
        self
    }

    /// Set the margin.
    fn margin(mut self, value: f64) -> Self
    where
        Self: Sized,
    {
        self.style_mut().margin = value;
        self
    }

    /// Set the background fill. A gradient without colors clears the background.
    fn background(mut self, fill: impl Into<Fill>) -> Self
    where
        Self: Sized,
    {
        self.style_mut().background = fill.into().normalized();
        self
    }

    /// Set the corner radius.
    fn border_radius(mut self, value: f64) -> Self
    where
        Self: Sized,
    {
        self.style_mut().border_radius = value;
        self
    }

    /// Set the border width and color.
    fn border(mut self, width: f64, color: impl Into<Color>) -> Self
    where
        Self: Sized,
    {
        let style = self.style_mut();
        style.border_width = width;
        style.border_color = color.into();
        self
    }

    /// Append a box shadow.
    fn box_shadow(mut self, shadow: Shadow) -> Self
    where
        Self: Sized,
    {
        self.style_mut().shadows.push(shadow);
        self
    }

    /// Request an explicit width.
    fn width(mut self, value: f64) -> Self
    where
        Self: Sized,
    {
        self.base_mut().requested_width = Some(value);
        self
    }

    /// Request an explicit height.
    fn height(mut self, value: f64) -> Self
    where
        Self: Sized,
    {
        self.base_mut().requested_height = Some(value);
        self
    }

    /// Set the position within the parent.
    fn at(mut self, x: f64, y: f64) -> Self
    where
        Self: Sized,
    {
        self.set_position(x, y);
        self
    }
}

/// Services available during the layout pass.
pub struct LayoutCx<'a> {
    pub(crate) text: &'a mut TextEngine,
    pub(crate) loader: &'a dyn ImageLoader,
}

impl<'a> LayoutCx<'a> {
    /// Bundle a text engine and an image loader for one layout pass.
    pub fn new(text: &'a mut TextEngine, loader: &'a dyn ImageLoader) -> Self {
        Self { text, loader }
    }
}

/// A drawable scene-graph node.
#[derive(Clone, Debug)]
pub enum Node {
    /// Single line of text.
    Text(Text),
    /// Bitmap image.
    Image(Image),
    /// Vertical stack.
    Column(Column),
    /// Free-positioned children.
    Group(Group),
}

impl Node {
    /// Recompute this node's size and, for containers, the positions they own.
    ///
    /// Idempotent: running it twice without edits in between changes nothing.
    pub fn layout(&mut self, cx: &mut LayoutCx<'_>, max_width: Option<f64>) {
        match self {
            Self::Text(n) => n.layout(cx, max_width),
            Self::Image(n) => n.layout(cx, max_width),
            Self::Column(n) => n.layout(cx, max_width),
            Self::Group(n) => n.layout(cx, max_width),
        }
    }

    /// Paint the box then the content at the node's position, leaving the painter's origin as it
    /// found it.
    pub(crate) fn render(&self, painter: &mut Painter<'_>) -> PictexResult<()> {
        let saved = painter.transform();
        let base = self.base();
        painter.translate(base.x, base.y);

        let res = painter
            .paint_box(
                base.computed_width,
                base.computed_height,
                &base.style,
                matches!(self, Self::Image(n) if n.is_loaded()),
            )
            .and_then(|()| match self {
                Self::Text(n) => n.render_content(painter),
                Self::Image(n) => {
                    n.render_content(painter);
                    Ok(())
                }
                Self::Column(n) => n.children().iter().try_for_each(|c| c.render(painter)),
                Self::Group(n) => n.children().iter().try_for_each(|c| c.render(painter)),
            });

        painter.set_transform(saved);
        res
    }

    /// Children in paint order. Leaves have none.
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Column(n) => n.children(),
            Self::Group(n) => n.children(),
            Self::Text(_) | Self::Image(_) => &[],
        }
    }

    /// Mutable children in paint order. Leaves have none.
    pub fn children_mut(&mut self) -> &mut [Node] {
        match self {
            Self::Column(n) => n.children_mut(),
            Self::Group(n) => n.children_mut(),
            Self::Text(_) | Self::Image(_) => &mut [],
        }
    }

    /// Short kind name, as used in overlay documents and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::Column(_) => "column",
            Self::Group(_) => "group",
        }
    }

    /// The text node, if this is one.
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Self::Text(n) => Some(n),
            _ => None,
        }
    }

    /// The mutable text node, if this is one.
    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Self::Text(n) => Some(n),
            _ => None,
        }
    }

    /// The image node, if this is one.
    pub fn as_image(&self) -> Option<&Image> {
        match self {
            Self::Image(n) => Some(n),
            _ => None,
        }
    }

    /// The mutable image node, if this is one.
    pub fn as_image_mut(&mut self) -> Option<&mut Image> {
        match self {
            Self::Image(n) => Some(n),
            _ => None,
        }
    }

    /// The group node, if this is one.
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(n) => Some(n),
            _ => None,
        }
    }

    /// Visit every node depth-first, parent before children.
    pub fn visit_mut(&mut self, f: &mut impl FnMut(&mut Node)) {
        f(self);
        for child in self.children_mut() {
            child.visit_mut(f);
        }
    }
}

impl BoxModel for Node {
    fn base(&self) -> &NodeBase {
        match self {
            Self::Text(n) => n.base(),
            Self::Image(n) => n.base(),
            Self::Column(n) => n.base(),
            Self::Group(n) => n.base(),
        }
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        match self {
            Self::Text(n) => n.base_mut(),
            Self::Image(n) => n.base_mut(),
            Self::Column(n) => n.base_mut(),
            Self::Group(n) => n.base_mut(),
        }
    }
}

impl From<Text> for Node {
    fn from(n: Text) -> Self {
        Self::Text(n)
    }
}

impl From<Image> for Node {
    fn from(n: Image) -> Self {
        Self::Image(n)
    }
}

impl From<Column> for Node {
    fn from(n: Column) -> Self {
        Self::Column(n)
    }
}

impl From<Group> for Node {
    fn from(n: Group) -> Self {
        Self::Group(n)
    }
}

/// Decode every image in the tree on the rayon pool so later layout passes never block.
///
/// Images already settled are skipped. Returns the number of images that ended up loaded.
#[tracing::instrument(skip_all)]
pub fn preload_images(root: &mut Node, loader: &dyn ImageLoader) -> usize {
    use rayon::prelude::*;

    let mut images: Vec<&mut Image> = Vec::new();
    collect_images(root, &mut images);
    let pending = images.len();
    let loaded = images
        .into_par_iter()
        .map(|img| {
            img.load(loader);
            usize::from(img.is_loaded())
        })
        .sum();
    tracing::debug!(pending, loaded, "preloaded images");
    loaded
}

fn collect_images<'a>(node: &'a mut Node, out: &mut Vec<&'a mut Image>) {
    match node {
        Node::Image(img) => out.push(img),
        Node::Column(n) => n.children_mut().iter_mut().for_each(|c| collect_images(c, out)),
        Node::Group(n) => n.children_mut().iter_mut().for_each(|c| collect_images(c, out)),
        Node::Text(_) => {}
    }
}

#[cfg(test)]
#[path = "../../tests/unit/node/mod.rs"]
mod tests;
