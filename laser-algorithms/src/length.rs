use laser_path::{AtomGeometry, Segment};

/// Number of uniform samples used to estimate an atom's length, matching
/// the ordering engine's "polyline sum of 10 samples" convention.
pub const LENGTH_SAMPLES: u32 = 10;

/// Minimum number of points sampled along an atomic path's geometry when
/// comparing curve chains.
pub const CHAIN_SAMPLE_MIN_POINTS: u32 = 30;

/// Estimates an atom's length as the sum of chord lengths between
/// [`LENGTH_SAMPLES`] uniform samples. Exact for lines, a close
/// approximation for arcs and béziers.
pub fn estimate_length(geom: &AtomGeometry) -> f64 {
    geom.approximate_length(LENGTH_SAMPLES)
}

/// Samples an atom's geometry at at least [`CHAIN_SAMPLE_MIN_POINTS`]
/// points, uniformly in the curve parameter.
pub fn sample_for_comparison(geom: &AtomGeometry) -> Vec<laser_geom::Point> {
    geom.sample_uniform(CHAIN_SAMPLE_MIN_POINTS)
}

#[test]
fn line_length_is_exact() {
    let geom = AtomGeometry::Line(laser_geom::LineSegment::new(
        laser_geom::point(0.0, 0.0),
        laser_geom::point(10.0, 0.0),
    ));
    assert!((estimate_length(&geom) - 10.0).abs() < 1e-9);
}

#[test]
fn samples_include_both_endpoints() {
    let geom = AtomGeometry::Line(laser_geom::LineSegment::new(
        laser_geom::point(0.0, 0.0),
        laser_geom::point(10.0, 0.0),
    ));
    let samples = sample_for_comparison(&geom);
    assert!(samples.len() as u32 >= CHAIN_SAMPLE_MIN_POINTS);
    assert_eq!(samples[0], geom.from());
    assert_eq!(*samples.last().unwrap(), geom.to());
}
