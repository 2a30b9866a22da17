//! Small numerical helpers shared by the geometry primitives and by
//! `laser_core`'s overlap engine.

use crate::Point;

/// Rounds a point's coordinates to 9 decimals, for use as a hash key.
pub fn round_for_hash(p: Point) -> (i64, i64) {
    let scale = 1e9;
    (
        (p.x * scale).round() as i64,
        (p.y * scale).round() as i64,
    )
}

/// Rounds a point's coordinates to `decimals` decimals, for use as a
/// critical-point bucket key. The precision is a parameter rather than a
/// fixed constant so callers can tune it to their document's unit scale.
pub fn round_to(p: Point, decimals: u32) -> (i64, i64) {
    let scale = 10f64.powi(decimals as i32);
    (
        (p.x * scale).round() as i64,
        (p.y * scale).round() as i64,
    )
}

#[test]
fn round_for_hash_collapses_epsilon_noise() {
    let a = Point::new(1.000_000_000_1, 2.0);
    let b = Point::new(1.0, 2.0);
    assert_eq!(round_for_hash(a), round_for_hash(b));
}

#[test]
fn round_to_groups_nearby_points() {
    let a = Point::new(5.001, 5.001);
    let b = Point::new(5.004, 4.998);
    assert_eq!(round_to(a, 2), round_to(b, 2));
}
