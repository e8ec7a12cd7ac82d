use crate::assets::color::Color;
use crate::assets::store::{ImageLoader, ImageSource, encode_data_url};
use crate::foundation::core::Size;
use crate::foundation::error::PictexResult;
use crate::node::group::Group;
use crate::node::image::Image;
use crate::node::text::Text;
use crate::node::{BoxModel, Node};
use crate::paint::Fill;
use crate::paint::gradient::LinearGradient;
use crate::paint::shadow::Shadow;
use crate::render::backend::FrameRGBA;
use crate::render::surface::Renderer;
use crate::scene::model::{BackgroundDef, Dim, ElementDef, OverlayDocument, ShadowDef};

/// Base size used when there is no usable base image.
pub const DEFAULT_BASE_SIZE: Size = Size::new(800.0, 600.0);

/// Position given to newly added overlays.
pub const NEW_OVERLAY_POSITION: (f64, f64) = (50.0, 50.0);

/// Uploaded images wider than this are scaled down, keeping their aspect ratio.
pub const MAX_UPLOAD_WIDTH: f64 = 300.0;

/// Layer stack: an optional base image with overlays painted on top of it in order.
///
/// Overlay positions are in the base image's pixel space. Rendering wraps the base and the
/// overlays in a [`Group`], so the output covers the base image and anything overlapping its
/// edges.
#[derive(Clone, Debug, Default)]
pub struct Composition {
    base: Option<Image>,
    overlays: Group,
}

impl Composition {
    /// Empty composition without a base image.
    pub fn new() -> Self {
        Self::default()
    }

    /// Composition over the image at `source`, decoded right away so overlay percentages can be
    /// resolved against its size.
    pub fn with_base_image(source: impl Into<ImageSource>, loader: &dyn ImageLoader) -> Self {
        let mut comp = Self::new();
        comp.set_base_image(source, loader);
        comp
    }

    /// Replace the base image. Overlays keep their pixel positions.
    pub fn set_base_image(&mut self, source: impl Into<ImageSource>, loader: &dyn ImageLoader) {
        let mut base = Image::new(source);
        base.load(loader);
        self.base = Some(base);
    }

    /// The base image node, if any.
    pub fn base_image(&self) -> Option<&Image> {
        self.base.as_ref()
    }

    /// Pixel size percentages resolve against: the base image's computed size, or
    /// [`DEFAULT_BASE_SIZE`] when there is no base or it has an empty box.
    pub fn base_size(&self) -> Size {
        match &self.base {
            Some(b) => {
                let s = b.computed_size();
                if s.width > 0.0 && s.height > 0.0 {
                    s
                } else {
                    DEFAULT_BASE_SIZE
                }
            }
            None => DEFAULT_BASE_SIZE,
        }
    }

    /// Overlays in paint order.
    pub fn overlays(&self) -> &[Node] {
        self.overlays.children()
    }

    /// Mutable overlays in paint order.
    pub fn overlays_mut(&mut self) -> &mut [Node] {
        self.overlays.children_mut()
    }

    /// Number of overlays.
    pub fn len(&self) -> usize {
        self.overlays().len()
    }

    /// `true` when there are no overlays.
    pub fn is_empty(&self) -> bool {
        self.overlays().is_empty()
    }

    /// Push an overlay on top and return its index.
    pub fn add(&mut self, node: impl Into<Node>) -> usize {
        self.overlays.push(node);
        self.len() - 1
    }

    /// Add a "New Text" overlay with the default style at [`NEW_OVERLAY_POSITION`].
    pub fn add_text(&mut self) -> usize {
        let (x, y) = NEW_OVERLAY_POSITION;
        self.add(
            Text::new("New Text")
                .font_size(40.0)
                .font_family("Arial")
                .color(Color::BLACK)
                .at(x, y),
        )
    }

    /// Decode an uploaded image and add it at [`NEW_OVERLAY_POSITION`], scaled down to
    /// [`MAX_UPLOAD_WIDTH`] when wider.
    pub fn add_uploaded_image(
        &mut self,
        source: impl Into<ImageSource>,
        loader: &dyn ImageLoader,
    ) -> usize {
        let mut img = Image::new(source);
        img.load(loader);
        let s = img.computed_size();
        if s.width > MAX_UPLOAD_WIDTH {
            let ratio = s.height / s.width;
            img.resize(MAX_UPLOAD_WIDTH, MAX_UPLOAD_WIDTH * ratio);
        }
        let (x, y) = NEW_OVERLAY_POSITION;
        img.set_position(x, y);
        self.add(img)
    }

    /// Remove and return the overlay at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Node> {
        self.overlays.remove(index)
    }

    /// Topmost overlay whose box contains the point, in base image pixels.
    ///
    /// Uses the sizes from the last layout or render.
    pub fn pick(&self, x: f64, y: f64) -> Option<usize> {
        self.overlays().iter().rposition(|n| n.hit_test(x, y))
    }

    /// Build a composition from a document. Images (the base included) are decoded with
    /// `loader`. Elements of unknown kind are skipped.
    #[tracing::instrument(skip_all, fields(elements = doc.elements.len()))]
    pub fn import(doc: &OverlayDocument, loader: &dyn ImageLoader) -> Self {
        let mut comp = match &doc.base_image {
            Some(src) => Self::with_base_image(src.as_str(), loader),
            None => Self::new(),
        };
        comp.import_elements(&doc.elements, loader);
        comp
    }

    /// Append document elements as overlays, resolving percentages against [`Self::base_size`].
    /// Returns how many elements were added.
    pub fn import_elements(&mut self, elements: &[ElementDef], loader: &dyn ImageLoader) -> usize {
        let base = self.base_size();
        let mut added = 0;
        for el in elements {
            if let Some(node) = element_to_node(el, base, loader) {
                self.overlays.push(node);
                added += 1;
            } else {
                tracing::warn!(kind = %el.kind, "skipping overlay element of unknown type");
            }
        }
        added
    }

    /// Describe the overlays as a percentage document against [`Self::base_size`].
    ///
    /// Text and image overlays are exported; containers have no document form and are skipped.
    pub fn export(&self) -> OverlayDocument {
        let base = self.base_size();
        OverlayDocument {
            base_image: self
                .base
                .as_ref()
                .map(|b| source_to_string(b.source())),
            elements: self
                .overlays()
                .iter()
                .filter_map(|n| node_to_element(n, base))
                .collect(),
        }
    }

    /// Lay out and rasterize the base plus overlays with `renderer`.
    pub fn render<'r>(&mut self, renderer: &'r mut Renderer) -> PictexResult<&'r FrameRGBA> {
        let (mut root, had_base) = self.take_root();
        let res = renderer.render(&mut root).map(|_| ());
        self.restore_root(root, had_base);
        res.map(|()| renderer.frame())
    }

    /// Lay out the base plus overlays without painting, refreshing the sizes [`Self::pick`] and
    /// [`Self::export`] read.
    pub fn layout(&mut self, renderer: &mut Renderer) {
        let (mut root, had_base) = self.take_root();
        renderer.layout(&mut root);
        self.restore_root(root, had_base);
    }

    fn take_root(&mut self) -> (Node, bool) {
        let overlays = std::mem::take(&mut self.overlays).into_children();
        let base = self.base.take().map(Node::from);
        let had_base = base.is_some();
        (Group::new(base.into_iter().chain(overlays)).into(), had_base)
    }

    fn restore_root(&mut self, root: Node, had_base: bool) {
        let Node::Group(group) = root else {
            return;
        };
        let mut children = group.into_children().into_iter();
        if had_base && let Some(Node::Image(img)) = children.next() {
            self.base = Some(img);
        }
        self.overlays = Group::new(children);
    }
}

fn element_to_node(el: &ElementDef, base: Size, loader: &dyn ImageLoader) -> Option<Node> {
    let shadow = el.shadow.as_ref().map(shadow_from_def);
    let mut node: Node = match el.kind.as_str() {
        "text" => {
            let mut text = Text::new(el.content.clone().unwrap_or_else(|| "Text".to_owned()))
                .font_size(el.font_size.unwrap_or_default().resolve(base.height))
                .font_family(el.font_family.as_deref().unwrap_or("Arial"))
                .color(el.color.as_deref().map_or(Color::BLACK, |c| parse_color(c, "color")));
            if let Some(s) = shadow {
                text = text.text_shadow(s);
            }
            text.into()
        }
        "image" => {
            let mut img = Image::new(el.src.clone().unwrap_or_default());
            img.load(loader);
            img.resize(
                el.width.unwrap_or_default().resolve(base.width),
                el.height.unwrap_or_default().resolve(base.height),
            );
            if let Some(s) = shadow {
                img = img.box_shadow(s);
            }
            img.into()
        }
        _ => return None,
    };

    node.set_position(el.x.resolve(base.width), el.y.resolve(base.height));
    let style = node.style_mut();
    style.padding = el.padding;
    style.border_radius = el.border_radius;
    style.background = el.background.as_ref().and_then(background_from_def);
    Some(node)
}

fn node_to_element(node: &Node, base: Size) -> Option<ElementDef> {
    let (x, y) = node.position();
    let style = node.style();
    let mut el = ElementDef {
        kind: node.kind().to_owned(),
        x: Dim::percent_of(x, base.width),
        y: Dim::percent_of(y, base.height),
        padding: style.padding,
        border_radius: style.border_radius,
        background: style.background.as_ref().map(background_to_def),
        ..ElementDef::default()
    };

    match node {
        Node::Text(t) => {
            el.content = Some(t.content().to_owned());
            el.font_size = Some(Dim::percent_of(t.size_px(), base.height));
            el.font_family = Some(t.family().to_owned());
            el.color = Some(t.text_color().to_hex());
            el.shadow = t.text_shadows().first().map(shadow_to_def);
        }
        Node::Image(img) => {
            let s = img.computed_size();
            el.src = Some(source_to_string(img.source()));
            el.width = Some(Dim::percent_of(s.width, base.width));
            el.height = Some(Dim::percent_of(s.height, base.height));
            el.shadow = style.shadows.first().map(shadow_to_def);
        }
        Node::Column(_) | Node::Group(_) => return None,
    }
    Some(el)
}

fn parse_color(s: &str, field: &str) -> Color {
    s.parse().unwrap_or_else(|e| {
        tracing::warn!(field, value = s, error = %e, "unparseable color, using black");
        Color::BLACK
    })
}

fn shadow_from_def(def: &ShadowDef) -> Shadow {
    let [dx, dy] = def.offset.unwrap_or([2.0, 2.0]);
    let color = def
        .color
        .as_deref()
        .map_or(Color::BLACK, |c| parse_color(c, "shadow.color"));
    Shadow::new(dx, dy, def.blur, color)
}

fn shadow_to_def(s: &Shadow) -> ShadowDef {
    ShadowDef {
        blur: s.blur_radius,
        color: Some(s.color.to_hex()),
        offset: Some([s.offset.x, s.offset.y]),
    }
}

fn background_from_def(def: &BackgroundDef) -> Option<Fill> {
    match def {
        BackgroundDef::Gradient { colors, .. } => Fill::from(LinearGradient::new(
            colors.iter().map(|c| parse_color(c, "background.colors")),
        ))
        .normalized(),
        BackgroundDef::Solid(c) => Some(parse_color(c, "background").into()),
    }
}

fn background_to_def(fill: &Fill) -> BackgroundDef {
    match fill {
        Fill::Solid { color } => BackgroundDef::Solid(color.to_hex()),
        Fill::LinearGradient(g) => BackgroundDef::Gradient {
            kind: "linear_gradient".to_owned(),
            colors: g.colors.iter().map(|c| c.to_hex()).collect(),
        },
    }
}

/// In-memory sources are written back as `data:` URLs so the document stays self-contained.
fn source_to_string(source: &ImageSource) -> String {
    match source {
        ImageSource::Uri(s) => s.clone(),
        ImageSource::Bytes(b) => {
            let mime = image::guess_format(b)
                .map(|f| f.to_mime_type())
                .unwrap_or("application/octet-stream");
            encode_data_url(mime, b)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/composition.rs"]
mod tests;
