use std::io::Cursor;

use super::*;
use crate::assets::store::FileLoader;
use crate::render::surface::RendererOpts;

fn png(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn png_url(w: u32, h: u32) -> String {
    encode_data_url("image/png", &png(w, h, [0, 0, 255, 255]))
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 0.5
}

#[test]
fn base_size_falls_back_without_a_usable_base() {
    let loader = FileLoader::new();
    assert_eq!(Composition::new().base_size(), DEFAULT_BASE_SIZE);
    assert_eq!(
        Composition::with_base_image("missing/base.png", &loader).base_size(),
        DEFAULT_BASE_SIZE
    );
    assert_eq!(
        Composition::with_base_image(png_url(400, 200), &loader).base_size(),
        Size::new(400.0, 200.0)
    );
}

#[test]
fn text_geometry_round_trips_through_percentages() {
    let mut comp = Composition::new();
    comp.add(Text::new("Hello").font_size(60.0).at(80.0, 120.0));

    let json = comp.export().to_json_string().unwrap();
    let doc = OverlayDocument::from_json_str(&json).unwrap();
    assert_eq!(doc.elements[0].x, Dim::Percent(10.0));

    let back = Composition::import(&doc, &FileLoader::new());
    let text = back.overlays()[0].as_text().unwrap();
    let (x, y) = back.overlays()[0].position();
    assert!(close(x, 80.0) && close(y, 120.0));
    assert!(close(text.size_px(), 60.0));
    assert_eq!(text.content(), "Hello");
}

#[test]
fn import_applies_editor_defaults() {
    let doc = OverlayDocument::from_json_str(
        r#"{"elements": [
            {"type": "text", "x": "50%", "y": "10%", "shadow": {"blur": 4}},
            {"type": "video", "x": 1, "y": 2},
            {"type": "image", "x": 5, "y": "abc", "src": "missing.png",
             "width": "25%", "height": "50%", "shadow": {"color": "red", "offset": [1, 3]}}
        ]}"#,
    )
    .unwrap();
    let comp = Composition::import(&doc, &FileLoader::new());
    assert_eq!(comp.len(), 2);

    let text = comp.overlays()[0].as_text().unwrap();
    assert_eq!(text.content(), "Text");
    assert_eq!(text.family(), "Arial");
    assert_eq!(text.text_color(), Color::BLACK);
    assert_eq!(text.size_px(), 0.0);
    assert_eq!(comp.overlays()[0].position(), (400.0, 60.0));
    assert_eq!(text.text_shadows()[0], Shadow::new(2.0, 2.0, 4.0, Color::BLACK));
    assert!(comp.overlays()[0].style().shadows.is_empty());

    let img = &comp.overlays()[1];
    assert_eq!(img.position(), (5.0, 0.0));
    // Height scales by the base height, not by the image's aspect ratio.
    assert_eq!(img.computed_size(), Size::new(200.0, 300.0));
    assert_eq!(
        img.style().shadows,
        vec![Shadow::new(1.0, 3.0, 0.0, Color::rgb(255, 0, 0))]
    );
}

#[test]
fn backgrounds_import_and_export() {
    let doc = OverlayDocument::from_json_str(
        r##"{"elements": [
            {"type": "text", "content": "a", "background": {"type": "linear_gradient", "colors": ["#ff0000", "#0000ff"]}},
            {"type": "text", "content": "b", "background": "#00ff00"},
            {"type": "text", "content": "c", "background": {"type": "linear_gradient", "colors": []}}
        ]}"##,
    )
    .unwrap();
    let comp = Composition::import(&doc, &FileLoader::new());
    assert!(matches!(
        comp.overlays()[0].style().background,
        Some(Fill::LinearGradient(ref g)) if g.colors.len() == 2
    ));
    assert_eq!(comp.overlays()[2].style().background, None);

    let out = comp.export();
    assert_eq!(
        out.elements[0].background,
        Some(BackgroundDef::Gradient {
            kind: "linear_gradient".to_owned(),
            colors: vec!["#ff0000".to_owned(), "#0000ff".to_owned()],
        })
    );
    assert_eq!(
        out.elements[1].background,
        Some(BackgroundDef::Solid("#00ff00".to_owned()))
    );
    assert_eq!(out.elements[2].background, None);
}

#[test]
fn image_export_uses_computed_size_against_each_base_axis() {
    let loader = FileLoader::new();
    let mut comp = Composition::with_base_image(png_url(400, 200), &loader);
    comp.add(Image::new(png_url(40, 40)).width(100.0).height(50.0).at(40.0, 20.0));
    let mut renderer = Renderer::new(RendererOpts::default()).unwrap();
    comp.layout(&mut renderer);

    let out = comp.export();
    let el = &out.elements[0];
    assert_eq!(el.kind, "image");
    assert_eq!(el.x, Dim::Percent(10.0));
    assert_eq!(el.y, Dim::Percent(10.0));
    assert_eq!(el.width, Some(Dim::Percent(25.0)));
    assert_eq!(el.height, Some(Dim::Percent(25.0)));
    assert!(el.content.is_none());
    assert!(out.base_image.unwrap().starts_with("data:image/png;base64,"));
}

#[test]
fn uploaded_images_are_capped_in_width() {
    let loader = FileLoader::new();
    let mut comp = Composition::new();
    let wide = comp.add_uploaded_image(png(600, 200, [1, 2, 3, 255]), &loader);
    let small = comp.add_uploaded_image(png(20, 10, [1, 2, 3, 255]), &loader);

    assert_eq!(comp.overlays()[wide].computed_size(), Size::new(300.0, 100.0));
    assert_eq!(comp.overlays()[wide].position(), NEW_OVERLAY_POSITION);
    assert_eq!(comp.overlays()[small].computed_size(), Size::new(20.0, 10.0));

    let exported = comp.export();
    assert!(
        exported.elements[0]
            .src
            .as_deref()
            .unwrap()
            .starts_with("data:image/png;base64,")
    );
}

#[test]
fn pick_prefers_the_topmost_overlay_and_remove_drops_it() {
    let loader = FileLoader::new();
    let mut comp = Composition::new();
    let mut below = Image::new(png_url(1, 1));
    below.resize(100.0, 100.0);
    let mut above = Image::new(png_url(1, 1));
    above.resize(20.0, 20.0);
    above.set_position(10.0, 10.0);
    below.load(&loader);
    above.load(&loader);
    comp.add(below);
    comp.add(above);

    assert_eq!(comp.pick(15.0, 15.0), Some(1));
    assert_eq!(comp.pick(30.0, 30.0), Some(1));
    assert_eq!(comp.pick(31.0, 30.0), Some(0));
    assert_eq!(comp.pick(101.0, 0.0), None);

    assert!(comp.remove(1).is_some());
    assert_eq!(comp.pick(15.0, 15.0), Some(0));
    assert!(comp.remove(5).is_none());
}

#[test]
fn render_paints_base_then_overlays() {
    let loader = FileLoader::new();
    let mut comp = Composition::with_base_image(
        encode_data_url("image/png", &png(4, 3, [255, 0, 0, 255])),
        &loader,
    );
    comp.add(Image::new(png(2, 2, [0, 0, 255, 255])).at(2.0, 1.0));

    let mut renderer = Renderer::new(RendererOpts::default()).unwrap();
    let frame = comp.render(&mut renderer).unwrap();
    assert_eq!((frame.width, frame.height), (4, 3));
    assert_eq!(frame.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(3, 2), Some([0, 0, 255, 255]));

    // The base and overlays survive the render.
    assert!(comp.base_image().is_some());
    assert_eq!(comp.len(), 1);
}

#[test]
fn add_text_uses_new_text_defaults() {
    let mut comp = Composition::new();
    let i = comp.add_text();
    let t = comp.overlays()[i].as_text().unwrap();
    assert_eq!(t.content(), "New Text");
    assert_eq!(t.size_px(), 40.0);
    assert_eq!(comp.overlays()[i].position(), NEW_OVERLAY_POSITION);
}
