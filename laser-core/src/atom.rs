use laser_algorithms::length::{estimate_length, sample_for_comparison};
use laser_geom::{points_close, Box2D, Point, Segment};
use laser_path::{AtomGeometry, Colour, PathType};

/// Index of a shape within the `Drawing` being optimized.
pub type ShapeRef = usize;

/// A pipeline-local view of one atomic path, rebuilt fresh by the overlap
/// engine and the ordering engine from the live `Drawing` rather than
/// carried between phases.
#[derive(Clone, Debug)]
pub struct AtomRecord {
    pub shape_ref: ShapeRef,
    pub start: Point,
    pub end: Point,
    pub colour: Colour,
    pub path_type: PathType,
    pub is_closed: bool,
    pub sampled_points: Vec<Point>,
    pub length_estimate: f64,
    pub bbox: Box2D,
}

impl AtomRecord {
    pub fn build(shape_ref: ShapeRef, geom: &AtomGeometry, colour: Colour) -> Self {
        let start = geom.from();
        let end = geom.to();
        let sampled_points = sample_for_comparison(geom);
        let bbox = Box2D::from_points(sampled_points.iter().copied());
        AtomRecord {
            shape_ref,
            start,
            end,
            colour,
            path_type: geom.type_tag(),
            is_closed: points_close(start, end),
            length_estimate: estimate_length(geom),
            sampled_points,
            bbox,
        }
    }
}

#[test]
fn loop_atoms_are_marked_closed() {
    use laser_geom::{point, ArcSegment};
    // A full-circle arc whose endpoints coincide (not produced by the
    // flattener's ellipse policy, but a valid atom shape in general).
    let geom = AtomGeometry::Arc(ArcSegment {
        from: point(10.0, 0.0),
        to: point(10.0, 0.0),
        rx: 10.0,
        ry: 10.0,
        x_rotation: 0.0,
        large_arc: true,
        sweep: false,
    });
    let record = AtomRecord::build(0, &geom, Colour::BLACK);
    assert!(record.is_closed);
}
