use laser_path::{AtomGeometry, Segment};

use crate::length::sample_for_comparison;

/// Concatenates the comparison samples of an ordered sequence of atoms into
/// one polyline, deduplicating the point shared by consecutive atoms.
///
/// Atoms are expected to already be in traversal order (reversed atoms
/// should have been flipped by the caller before sampling), so
/// `atoms[i].to()` is already within the caller's join tolerance of
/// `atoms[i + 1].from()` — see [`is_connected`].
pub fn concatenate_chain_samples(atoms: &[AtomGeometry]) -> Vec<laser_geom::Point> {
    let mut points = Vec::new();
    for atom in atoms {
        let mut samples = sample_for_comparison(atom);
        if !points.is_empty() {
            samples.remove(0);
        }
        points.extend(samples);
    }
    points
}

/// Total approximate length of a chain of atoms, matching the 10-sample
/// per-atom convention used elsewhere.
pub fn chain_length(atoms: &[AtomGeometry]) -> f64 {
    atoms.iter().map(crate::length::estimate_length).sum()
}

/// `true` if `atoms` forms a connected traversal: each atom's endpoint
/// lies within `tolerance` of the next atom's start.
pub fn is_connected(atoms: &[AtomGeometry], tolerance: f64) -> bool {
    atoms.windows(2).all(|pair| (pair[0].to() - pair[1].from()).length() <= tolerance)
}

#[test]
fn concatenation_dedups_junction_points() {
    use laser_geom::{point, LineSegment};
    let a = AtomGeometry::Line(LineSegment::new(point(0.0, 0.0), point(5.0, 0.0)));
    let b = AtomGeometry::Line(LineSegment::new(point(5.0, 0.0), point(10.0, 0.0)));
    let points = concatenate_chain_samples(&[a, b]);
    let junctions = points.iter().filter(|p| laser_geom::points_close(**p, point(5.0, 0.0))).count();
    assert_eq!(junctions, 1);
}

#[test]
fn disconnected_chain_is_detected() {
    use laser_geom::{point, LineSegment};
    let a = AtomGeometry::Line(LineSegment::new(point(0.0, 0.0), point(5.0, 0.0)));
    let b = AtomGeometry::Line(LineSegment::new(point(6.0, 0.0), point(10.0, 0.0)));
    assert!(!is_connected(&[a, b], 0.1));
    assert!(is_connected(&[a, b], 1.0));
}
