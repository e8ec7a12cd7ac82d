use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(0, 255), 0);
    assert_eq!(mul_div255_u8(128, 128), 64);
}

#[test]
fn premultiply_zeroes_transparent_pixels() {
    let mut px = vec![200, 100, 50, 0, 100, 50, 200, 128];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[0, 0, 0, 0]);
    assert_eq!(px[7], 128);
    assert_eq!(px[4], ((100u16 * 128 + 127) / 255) as u8);
}

#[test]
fn unpremultiply_restores_opaque_and_approximates_partial() {
    let mut px = vec![10, 20, 30, 255, 50, 25, 100, 128];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[10, 20, 30, 255]);
    assert!((i32::from(px[4]) - 100).abs() <= 1);
    assert!((i32::from(px[6]) - 199).abs() <= 1);
}
