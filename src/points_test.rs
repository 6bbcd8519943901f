#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn point_approx_eq(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
}

fn all_approx_eq(a: &AllPoints, b: &AllPoints) -> bool {
    let pairs = [
        (a.o, b.o),
        (a.a, b.a),
        (a.b, b.b),
        (a.c, b.c),
        (a.h, b.h),
        (a.i, b.i),
        (a.j, b.j),
        (a.m, b.m),
        (a.n, b.n),
        (a.s, b.s),
        (a.t, b.t),
        (a.u, b.u),
        (a.v, b.v),
        (a.w, b.w),
        (a.z, b.z),
    ];
    pairs.iter().all(|(p, q)| point_approx_eq(*p, *q))
}

fn sample() -> AllPoints {
    AllPoints {
        o: Point::new(0.0, 0.0),
        a: Point::new(0.0, 800.0),
        b: Point::new(400.0, 0.0),
        c: Point::new(400.0, 800.0),
        h: Point::new(250.0, 500.0),
        i: Point::new(220.0, 700.0),
        j: Point::new(330.0, 520.0),
        m: Point::new(240.0, 760.0),
        n: Point::new(380.0, 610.0),
        s: Point::new(260.0, 800.0),
        t: Point::new(400.0, 640.0),
        u: Point::new(230.0, 720.0),
        v: Point::new(360.0, 580.0),
        w: Point::new(200.0, 800.0),
        z: Point::new(400.0, 560.0),
    }
}

#[test]
fn default_is_all_origin() {
    let p = AllPoints::default();
    assert!(p.is_finite());
    assert!(!p.is_solved());
    assert_eq!(p.h, Point::ZERO);
    assert_eq!(p.z, Point::ZERO);
}

#[test]
fn sample_is_solved() {
    assert!(sample().is_solved());
}

#[test]
fn cartesian_round_trip() {
    let vp = Viewport { origin: Point::new(7.0, 11.0), ..Viewport::new(400.0, 800.0) };
    let p = sample();
    assert!(all_approx_eq(&p.to_cartesian(&vp).to_screen(&vp), &p));
}

#[test]
fn reflection_is_involution() {
    let vp = Viewport::new(400.0, 800.0);
    let line = vp.mid_line();
    let p = sample();
    let once = p.reflect_about(&line);
    assert_eq!(once.c, Point::new(400.0, 0.0));
    assert!(all_approx_eq(&once.reflect_about(&line), &p));
}

#[test]
fn view_scaling_maps_every_point() {
    let vp = Viewport::new(400.0, 800.0).with_surface(200.0, 400.0);
    let scaled = sample().to_view(&vp);
    assert_eq!(scaled.c, Point::new(200.0, 400.0));
    assert_eq!(scaled.h, Point::new(125.0, 250.0));
}

#[test]
fn non_finite_point_detected() {
    let p = AllPoints { v: Point::new(f64::NAN, 0.0), ..sample() };
    assert!(!p.is_finite());
}
