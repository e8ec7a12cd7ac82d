use super::*;

#[test]
fn pixel_lookup_is_bounds_checked() {
    let mut f = FrameRGBA::transparent(2, 2);
    f.data[12..16].copy_from_slice(&[1, 2, 3, 4]);
    assert_eq!(f.pixel(1, 1), Some([1, 2, 3, 4]));
    assert_eq!(f.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(f.pixel(2, 0), None);
    assert!(!f.is_empty());
    assert!(FrameRGBA::transparent(0, 5).is_empty());
}

#[test]
fn to_straight_undoes_premultiplication_once() {
    let mut f = FrameRGBA::transparent(1, 1);
    f.data.copy_from_slice(&[64, 0, 0, 128]);
    let s = f.to_straight();
    assert!(!s.premultiplied);
    assert_eq!(s.data, vec![128, 0, 0, 128]);
    assert_eq!(s.to_straight().data, s.data);
}
