use super::*;

fn drag(dx: f64, dy: f64) -> DragEvent {
    DragEvent::new(Point::ZERO, Point::new(dx, dy))
}

// --- Relative to origin ---

#[test]
fn from_origin_all_quadrants() {
    assert_eq!(drag(1.0, 0.0).direction_from_origin(), DragDirection::Right);
    assert_eq!(drag(1.0, 1.0).direction_from_origin(), DragDirection::RightUp);
    assert_eq!(drag(0.0, 1.0).direction_from_origin(), DragDirection::Up);
    assert_eq!(drag(-1.0, 1.0).direction_from_origin(), DragDirection::LeftUp);
    assert_eq!(drag(-1.0, 0.0).direction_from_origin(), DragDirection::Left);
    assert_eq!(drag(-1.0, -1.0).direction_from_origin(), DragDirection::LeftDown);
    assert_eq!(drag(0.0, -1.0).direction_from_origin(), DragDirection::Down);
    assert_eq!(drag(1.0, -1.0).direction_from_origin(), DragDirection::RightDown);
}

#[test]
fn from_origin_unmoved_is_static() {
    let event = drag(0.0, 0.0);
    assert!(event.is_unmoved());
    assert_eq!(event.direction_from_origin(), DragDirection::Static);
}

#[test]
fn from_origin_nan_is_static() {
    assert_eq!(drag(f64::NAN, 1.0).direction_from_origin(), DragDirection::Static);
}

// --- Relative to a rising line ---

#[test]
fn to_rising_line() {
    let line = Line::new(1.0, 5.0);
    assert_eq!(drag(1.0, 1.0).direction_to_line(&line), DragDirection::Right);
    assert_eq!(drag(0.0, 1.0).direction_to_line(&line), DragDirection::RightUp);
    assert_eq!(drag(-1.0, 1.0).direction_to_line(&line), DragDirection::Up);
    assert_eq!(drag(-1.0, 0.0).direction_to_line(&line), DragDirection::LeftUp);
    assert_eq!(drag(-1.0, -1.0).direction_to_line(&line), DragDirection::Left);
    assert_eq!(drag(0.0, -1.0).direction_to_line(&line), DragDirection::LeftDown);
    assert_eq!(drag(1.0, -1.0).direction_to_line(&line), DragDirection::Down);
    assert_eq!(drag(1.0, 0.0).direction_to_line(&line), DragDirection::RightDown);
}

// --- Relative to a falling line ---

#[test]
fn to_falling_line() {
    let line = Line::new(-1.0, 0.0);
    assert_eq!(drag(1.0, -1.0).direction_to_line(&line), DragDirection::Right);
    assert_eq!(drag(1.0, 0.0).direction_to_line(&line), DragDirection::RightUp);
    assert_eq!(drag(1.0, 1.0).direction_to_line(&line), DragDirection::Up);
    assert_eq!(drag(0.0, 1.0).direction_to_line(&line), DragDirection::LeftUp);
    assert_eq!(drag(-1.0, 1.0).direction_to_line(&line), DragDirection::Left);
    assert_eq!(drag(-1.0, 0.0).direction_to_line(&line), DragDirection::LeftDown);
    assert_eq!(drag(-1.0, -1.0).direction_to_line(&line), DragDirection::Down);
    assert_eq!(drag(0.0, -1.0).direction_to_line(&line), DragDirection::RightDown);
}

#[test]
fn to_line_unmoved_is_static() {
    assert_eq!(drag(0.0, 0.0).direction_to_line(&Line::new(2.0, 0.0)), DragDirection::Static);
}

// --- Degenerate reference lines ---

#[test]
fn horizontal_line_uses_origin() {
    let line = Line::horizontal(3.0);
    assert_eq!(drag(-2.0, 1.0).direction_to_line(&line), DragDirection::LeftUp);
}

#[test]
fn vertical_line_uses_origin() {
    let line = Line::through(Point::new(2.0, 0.0), Point::new(2.0, 9.0));
    assert_eq!(drag(1.0, -3.0).direction_to_line(&line), DragDirection::RightDown);
}

#[test]
fn nan_line_is_static() {
    let line = Line::new(f64::NAN, 0.0);
    assert_eq!(drag(1.0, 1.0).direction_to_line(&line), DragDirection::Static);
}

// --- Conversion ---

#[test]
fn to_cartesian_flips_vertical_motion() {
    let vp = Viewport::new(400.0, 800.0);
    let screen = DragEvent::new(Point::new(100.0, 500.0), Point::new(100.0, 400.0));
    assert_eq!(screen.to_cartesian(&vp).direction_from_origin(), DragDirection::Up);
}

#[test]
fn reflection_swaps_vertical_motion() {
    let vp = Viewport::new(400.0, 800.0);
    let screen = DragEvent::new(Point::new(100.0, 500.0), Point::new(110.0, 400.0));
    let mirrored = screen.reflect_about(&vp.mid_line());
    assert_eq!(mirrored.origin, Point::new(100.0, 300.0));
    assert_eq!(mirrored.to_cartesian(&vp).direction_from_origin(), DragDirection::RightDown);
}

#[test]
fn is_in_set() {
    let set = [DragDirection::Up, DragDirection::Down];
    assert!(DragDirection::Up.is_in(&set));
    assert!(!DragDirection::Left.is_in(&set));
}
