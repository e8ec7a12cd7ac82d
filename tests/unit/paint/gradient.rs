use super::*;

#[test]
fn stops_are_evenly_spaced() {
    let g = LinearGradient::new(["#ff0000", "#00ff00", "#0000ff", "#ffffff"]);
    let offsets: Vec<f32> = g.stops().iter().map(|(o, _)| *o).collect();
    assert_eq!(offsets.len(), 4);
    for (i, o) in offsets.iter().enumerate() {
        assert!((o - i as f32 / 3.0).abs() < 1e-6);
    }
}

#[test]
fn single_color_fills_uniformly() {
    let g = LinearGradient::new(["#336699"]);
    assert_eq!(g.stops(), vec![(0.0, Color::rgb(0x33, 0x66, 0x99))]);
    let px = g.rasterize(3, 5);
    for chunk in px.chunks_exact(4) {
        assert_eq!(chunk, &[0x33, 0x66, 0x99, 0xff]);
    }
}

#[test]
fn default_direction_is_top_to_bottom() {
    let g = LinearGradient::new([Color::BLACK, Color::WHITE]);
    assert_eq!(g.start, Point::new(0.0, 0.0));
    assert_eq!(g.end, Point::new(0.0, 1.0));

    let px = g.rasterize(2, 10);
    let row = |y: usize| px[y * 2 * 4];
    assert!(row(0) < 20);
    assert!(row(9) > 235);
    for y in 1..10 {
        assert!(row(y) >= row(y - 1));
        // Constant along each row.
        assert_eq!(px[y * 8], px[y * 8 + 4]);
    }
}

#[test]
fn color_at_hits_stops_exactly() {
    let g = LinearGradient::new(["#ff0000", "#00ff00", "#0000ff"]);
    assert_eq!(g.color_at(0.0).to_array(), [255, 0, 0, 255]);
    assert_eq!(g.color_at(0.5).to_array(), [0, 255, 0, 255]);
    assert_eq!(g.color_at(1.0).to_array(), [0, 0, 255, 255]);
    assert_eq!(g.color_at(7.0).to_array(), [0, 0, 255, 255]);
    assert_eq!(g.color_at(0.25).to_array(), [128, 128, 0, 255]);
}

#[test]
fn empty_or_degenerate_gradients_paint_nothing() {
    let empty = LinearGradient::default();
    assert!(empty.rasterize(4, 4).iter().all(|&b| b == 0));
    assert_eq!(empty.color_at(0.5), Rgba8Premul::transparent());

    let flat = LinearGradient::new([Color::BLACK, Color::WHITE]).with_end(0.0, 0.0);
    assert!(flat.rasterize(4, 4).iter().all(|&b| b == 0));
}

#[test]
fn window_matches_the_same_pixels_of_a_full_raster() {
    let g = LinearGradient::new(["#ff0000", "#00ff00", "#0000ff"]).with_end(1.0, 1.0);
    let full = g.rasterize(8, 6);
    let win = g.rasterize_window(8.0, 6.0, 3, 2, 4, 3);
    assert_eq!(win.len(), 4 * 3 * 4);
    for row in 0..3 {
        for col in 0..4 {
            let fi = ((row + 2) * 8 + col + 3) * 4;
            let wi = (row * 4 + col) * 4;
            assert_eq!(win[wi..wi + 4], full[fi..fi + 4]);
        }
    }
}
