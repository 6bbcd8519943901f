use super::*;

// --- Pixel conversion ---

#[test]
fn rgb565_white_is_opaque_white() {
    assert_eq!(rgb565_to_argb8888(0xFFFF), 0xFFFF_FFFF);
}

#[test]
fn rgb565_black_is_opaque_black() {
    assert_eq!(rgb565_to_argb8888(0x0000), 0xFF00_0000);
}

#[test]
fn rgb565_pure_red_lands_in_low_byte() {
    assert_eq!(rgb565_to_argb8888(0xF800), 0xFF00_00FF);
}

#[test]
fn rgb565_pure_blue_lands_in_third_byte() {
    assert_eq!(rgb565_to_argb8888(0x001F), 0xFFFF_0000);
}

// --- Spans ---

#[test]
fn vertical_fold_gives_constant_spans() {
    let mut synth = Synthesizer::new(10, 4);
    // W and Z share x = 5 but the fold must not be exactly vertical, or the
    // inverse slope is zero and the intercept is infinite.
    synth.compute_spans(Point::new(5.0, 4.0), Point::new(5.0001, 0.0), 7.0, false);
    for (wz, st) in synth.spans() {
        assert_eq!(wz, 4);
        assert_eq!(st, 6);
    }
}

#[test]
fn spans_clamp_to_surface() {
    let mut synth = Synthesizer::new(10, 2);
    synth.compute_spans(Point::new(-50.0, 2.0), Point::new(-49.999, 0.0), 100.0, false);
    for (wz, st) in synth.spans() {
        assert_eq!(wz, 0);
        assert_eq!(st, 9);
    }
}

#[test]
fn upside_down_mirrors_rows() {
    let w = Point::new(2.0, 4.0);
    let z = Point::new(6.0, 0.0);
    let mut up = Synthesizer::new(10, 4);
    up.compute_spans(w, z, 3.0, false);
    let mut down = Synthesizer::new(10, 4);
    down.compute_spans(w, z, 3.0, true);

    let up: Vec<_> = up.spans().collect();
    let mut down: Vec<_> = down.spans().collect();
    down.reverse();
    assert_eq!(up, down);
}

// --- Composition ---

#[test]
fn fills_only_right_of_fold_and_keeps_drawn_pixels() {
    let mut synth = Synthesizer::new(4, 1);
    synth.compute_spans(Point::new(3.0, 1.0), Point::new(3.0001, 0.0), 3.0, false);

    let lower = vec![0xFFFF; 4];
    let mut out = vec![0, 0, 0, 0x1234_5678];
    synth.synthesize(&mut out, &lower).unwrap();

    assert_eq!(out[0], 0);
    assert_eq!(out[1], 0);
    assert_eq!(out[2], 0xFFFF_FFFF);
    assert_eq!(out[3], 0x1234_5678);
}

#[test]
fn size_mismatch_rejected() {
    let synth = Synthesizer::new(4, 4);
    let mut out = vec![0; 15];
    let err = synth.synthesize(&mut out, &[0; 16]).unwrap_err();
    assert_eq!(err, SynthError::SizeMismatch { expected: 16, actual: 15 });
}

#[test]
fn empty_surface_is_noop() {
    let synth = Synthesizer::new(0, 3);
    assert!(synth.synthesize(&mut [], &[]).is_ok());
}

#[test]
fn clear_resets_pixels() {
    let mut out = vec![7; 8];
    clear(&mut out);
    assert!(out.iter().all(|p| *p == 0));
}

// --- Lower page ---

fn fold(w: Point, z: Point, s_x: f64) -> AllPoints {
    AllPoints { w, z, s: Point::new(s_x, 0.0), ..AllPoints::default() }
}

fn rows(pixels: &[u32], width: usize) -> Vec<Vec<u32>> {
    pixels.chunks(width).map(<[u32]>::to_vec).collect()
}

#[test]
fn lower_page_rejects_short_buffer() {
    let err = LowerPage::new(3, Slot::Next, 4, 4, vec![0; 12]).unwrap_err();
    assert_eq!(err, SynthError::SizeMismatch { expected: 16, actual: 12 });
}

#[test]
fn lower_page_keeps_its_identity() {
    let lower = LowerPage::new(3, Slot::Next, 8, 4, vec![0; 32]).unwrap();
    assert_eq!(lower.page(), 3);
    assert_eq!(lower.slot(), Slot::Next);
    assert_eq!(lower.size(), (8, 4));
}

#[test]
fn lower_page_reveals_right_of_fold() {
    let mut lower = LowerPage::new(3, Slot::Next, 8, 4, vec![0xFFFF; 32]).unwrap();
    let points = fold(Point::new(4.0, 4.0), Point::new(4.0001, 0.0), 5.0);
    let composed = lower.compose(&points, false).unwrap();

    for row in rows(composed, 8) {
        assert_eq!(&row[..3], &[0, 0, 0]);
        assert!(row[3..].iter().all(|p| *p == 0xFFFF_FFFF));
    }
}

#[test]
fn lower_page_recomposes_from_scratch() {
    let mut lower = LowerPage::new(3, Slot::Next, 8, 4, vec![0xFFFF; 32]).unwrap();
    lower.compose(&fold(Point::new(1.0, 4.0), Point::new(1.0001, 0.0), 2.0), false).unwrap();
    let composed = lower.compose(&fold(Point::new(6.0, 4.0), Point::new(6.0001, 0.0), 7.0), false).unwrap();

    for row in rows(composed, 8) {
        assert!(row[..5].iter().all(|p| *p == 0));
        assert!(row[5..].iter().all(|p| *p == 0xFFFF_FFFF));
    }
}

#[test]
fn upside_down_lower_page_mirrors_rows() {
    let points = fold(Point::new(2.0, 4.0), Point::new(6.0, 0.0), 3.0);
    let mut upright = LowerPage::new(3, Slot::Next, 8, 4, vec![0xFFFF; 32]).unwrap();
    let expected = rows(upright.compose(&points, false).unwrap(), 8);

    let display = points.reflect_about(&Line::horizontal(2.0));
    let mut flipped = LowerPage::new(3, Slot::Next, 8, 4, vec![0xFFFF; 32]).unwrap();
    let actual = rows(flipped.compose(&display, true).unwrap(), 8);

    // The slanted fold reveals a different width on every row.
    assert_ne!(expected[0], expected[3]);
    for (row, pixels) in actual.iter().enumerate() {
        assert_eq!(pixels, &expected[3 - row]);
    }
}

#[test]
fn rgba_bytes_follow_image_data_order() {
    assert_eq!(to_rgba_bytes(&[0xFF00_00FF, 0xFF00_FF00]), vec![0xFF, 0, 0, 0xFF, 0, 0xFF, 0, 0xFF]);
}
