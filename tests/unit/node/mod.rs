use std::io::Cursor;

use super::*;
use crate::assets::store::FileLoader;
use crate::node::image::DecodeState;
use crate::paint::gradient::LinearGradient;

fn png(w: u32, h: u32) -> Vec<u8> {
    let img = ::image::RgbaImage::from_pixel(w, h, ::image::Rgba([0, 0, 0, 255]));
    let mut buf = Vec::new();
    ::image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ::image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn hit_test_boundary_is_inclusive() {
    let mut node = NodeBase {
        x: 10.0,
        y: 10.0,
        ..NodeBase::default()
    };
    node.resolve_size(50.0, 20.0);
    assert!(node.contains(10.0, 10.0));
    assert!(node.contains(60.0, 30.0));
    assert!(!node.contains(9.0, 10.0));
    assert!(!node.contains(61.0, 10.0));
    assert!(!node.contains(10.0, 30.5));
}

#[test]
fn builders_fill_the_box_style() {
    let node: Node = Group::empty()
        .padding(4.0)
        .margin(2.0)
        .background("#ff0000")
        .border_radius(6.0)
        .border(2.0, "blue")
        .box_shadow(Shadow::new(1.0, 1.0, 2.0, Color::BLACK))
        .box_shadow(Shadow::default())
        .into();
    let style = node.style();
    assert_eq!(style.padding, 4.0);
    assert_eq!(style.margin, 2.0);
    assert_eq!(
        style.background,
        Some(Fill::Solid {
            color: Color::rgb(255, 0, 0)
        })
    );
    assert_eq!(style.border_width, 2.0);
    assert_eq!(style.border_color, Color::rgb(0, 0, 255));
    assert_eq!(style.shadows.len(), 2);
    assert_eq!(node.kind(), "group");
}

#[test]
fn empty_gradient_background_means_no_background() {
    let g = Group::empty().background(LinearGradient::default());
    assert_eq!(g.style().background, None);
    let g = Group::empty().background(LinearGradient::new(["white"]));
    assert!(matches!(g.style().background, Some(Fill::LinearGradient(_))));
}

#[test]
fn setters_edit_in_place() {
    let mut node: Node = Text::new("a").into();
    node.set_position(3.0, 4.0);
    node.set_requested_size(Some(10.0), None);
    node.style_mut().padding = 1.5;
    assert_eq!(node.position(), (3.0, 4.0));
    assert_eq!(node.base().requested_width, Some(10.0));
    assert_eq!(node.base().requested_height, None);
    assert_eq!(node.style().padding, 1.5);
    assert!(node.as_text().is_some());
    assert!(node.as_image().is_none());
}

#[test]
fn preload_decodes_every_image_in_the_tree() {
    let mut root: Node = Group::empty()
        .add(Image::new(png(3, 2)))
        .add(Column::new([Node::from(Image::new(png(5, 5))), Text::new("t").into()]))
        .add(Image::new(b"junk".to_vec()))
        .into();
    let loaded = preload_images(&mut root, &FileLoader::new());
    assert_eq!(loaded, 2);

    let mut states = Vec::new();
    root.visit_mut(&mut |n| {
        if let Some(img) = n.as_image() {
            states.push(img.decode_state());
        }
    });
    assert_eq!(
        states,
        vec![DecodeState::Loaded, DecodeState::Loaded, DecodeState::Failed]
    );
    // Settled images are not fetched again.
    assert_eq!(preload_images(&mut root, &FileLoader::new()), 2);
}
