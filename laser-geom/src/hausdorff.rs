use crate::Point;

/// Directed Hausdorff distance from `a` to `b`: `max_{p∈a} min_{q∈b} |p-q|`.
/// `a` and `b` are polyline samples of the curves being compared, not
/// necessarily the same length.
///
/// Returns `+inf` if either sample set is empty — every caller treats that
/// as "no overlap" rather than an error.
pub fn directed_hausdorff(a: &[Point], b: &[Point]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return f64::INFINITY;
    }
    a.iter()
        .map(|p| {
            b.iter()
                .map(|q| (*p - *q).length())
                .fold(f64::INFINITY, f64::min)
        })
        .fold(0.0_f64, f64::max)
}

/// Symmetric directed Hausdorff distance: the larger of the two directed
/// distances between `a` and `b`.
pub fn symmetric_hausdorff(a: &[Point], b: &[Point]) -> f64 {
    directed_hausdorff(a, b).max(directed_hausdorff(b, a))
}

#[test]
fn identical_sets_have_zero_distance() {
    let pts = [crate::point(0.0, 0.0), crate::point(1.0, 1.0), crate::point(2.0, 0.0)];
    assert_eq!(directed_hausdorff(&pts, &pts), 0.0);
    assert_eq!(symmetric_hausdorff(&pts, &pts), 0.0);
}

#[test]
fn empty_set_is_infinite() {
    let pts = [crate::point(0.0, 0.0)];
    assert_eq!(directed_hausdorff(&pts, &[]), f64::INFINITY);
    assert_eq!(directed_hausdorff(&[], &pts), f64::INFINITY);
}

#[test]
fn containment_direction_matters() {
    // b is a subset of a's span: a -> b measures the worst excursion of a
    // beyond b, b -> a is the (smaller) distance of b's few points to a.
    let a: Vec<_> = (0..=10).map(|i| crate::point(f64::from(i), 0.0)).collect();
    let b = [crate::point(4.0, 0.0), crate::point(6.0, 0.0)];
    assert!(directed_hausdorff(&a, &b) > directed_hausdorff(&b, &a));
}
