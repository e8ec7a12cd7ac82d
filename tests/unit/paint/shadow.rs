use super::*;

#[test]
fn defaults_are_unblurred_black_at_origin() {
    let s = Shadow::default();
    assert_eq!(s.offset, Vec2::ZERO);
    assert_eq!(s.blur_radius, 0.0);
    assert_eq!(s.color, Color::BLACK);
    assert_eq!(s.kernel_radius(), 0);
}

#[test]
fn kernel_radius_covers_three_sigma() {
    let s = Shadow::new(2.0, 2.0, 8.0, "#00000080");
    assert_eq!(s.sigma(), 4.0);
    assert_eq!(s.kernel_radius(), 12);
    assert_eq!(Shadow::default().with_blur(-3.0).kernel_radius(), 0);
    assert_eq!(Shadow::default().with_blur(1.0).kernel_radius(), 2);
}

#[test]
fn transparent_shadows_are_skipped() {
    assert!(Shadow::default().is_visible());
    assert!(!Shadow::default().with_color(Color::TRANSPARENT).is_visible());
}
