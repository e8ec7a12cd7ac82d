use super::*;
use crate::assets::store::FileLoader;
use crate::foundation::core::Size;
use crate::text::engine::{TextEngine, TextEngineOpts};

fn layout(group: &mut Group) {
    let mut text = TextEngine::new(&TextEngineOpts::default()).unwrap();
    let loader = FileLoader::new();
    let mut cx = LayoutCx::new(&mut text, &loader);
    group.layout(&mut cx, None);
}

fn boxed(x: f64, y: f64, w: f64, h: f64) -> Group {
    Group::empty().width(w).height(h).at(x, y)
}

#[test]
fn bounds_cover_every_child_far_edge() {
    let mut g = Group::empty()
        .add(boxed(10.0, 5.0, 20.0, 20.0))
        .add(boxed(-50.0, 40.0, 30.0, 10.0));
    layout(&mut g);
    assert_eq!(g.computed_size(), Size::new(30.0, 50.0));
}

#[test]
fn layout_never_moves_children() {
    let mut g = Group::new([boxed(7.0, 9.0, 1.0, 1.0)]);
    layout(&mut g);
    layout(&mut g);
    assert_eq!(g.children()[0].position(), (7.0, 9.0));
}

#[test]
fn empty_and_negative_groups_floor_at_zero() {
    let mut g = Group::empty();
    layout(&mut g);
    assert_eq!(g.computed_size(), Size::ZERO);

    let mut g = Group::new([boxed(-40.0, -40.0, 10.0, 10.0)]);
    layout(&mut g);
    assert_eq!(g.computed_size(), Size::ZERO);
}

#[test]
fn requested_axes_are_independent() {
    let mut g = Group::new([boxed(0.0, 0.0, 30.0, 40.0)]).width(100.0);
    layout(&mut g);
    assert_eq!(g.computed_size(), Size::new(100.0, 40.0));
}

#[test]
fn insert_and_remove_keep_paint_order() {
    let mut g = Group::empty();
    g.push(boxed(0.0, 0.0, 1.0, 1.0));
    g.push(boxed(2.0, 0.0, 1.0, 1.0));
    g.insert(0, boxed(1.0, 0.0, 1.0, 1.0));
    let xs: Vec<f64> = g.children().iter().map(|c| c.position().0).collect();
    assert_eq!(xs, vec![1.0, 0.0, 2.0]);
    assert!(g.remove(5).is_none());
    assert_eq!(g.remove(0).map(|n| n.position().0), Some(1.0));
    assert_eq!(g.children().len(), 2);

    g.insert(99, boxed(9.0, 0.0, 1.0, 1.0));
    assert_eq!(g.children().last().map(|n| n.position().0), Some(9.0));
}

#[test]
fn into_children_hands_back_paint_order() {
    let g = Group::new([boxed(3.0, 0.0, 1.0, 1.0), boxed(4.0, 0.0, 1.0, 1.0)]).padding(2.0);
    let xs: Vec<f64> = g.into_children().iter().map(|c| c.position().0).collect();
    assert_eq!(xs, vec![3.0, 4.0]);
}
