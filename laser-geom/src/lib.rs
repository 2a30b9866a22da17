//! 2D geometric primitives on top of euclid.
//!
//! This crate implements the maths used to normalise and compare laser-cut
//! paths:
//!
//! - points, vectors and affine transforms,
//! - line segments,
//! - elliptic arcs in SVG endpoint parameterisation,
//! - quadratic and cubic bezier curves,
//! - directed Hausdorff distance between sampled curves.
//!
//! Every type here is specialised to `f64`: the document model this crate
//! serves (`laser_path`) only ever works in document units, so there is no
//! need for the generic-over-scalar machinery `lyon_geom` uses to share code
//! between `f32` render space and `f64` document space.

mod arc;
mod cubic_bezier;
mod hausdorff;
mod line;
mod quadratic_bezier;
pub mod utils;

pub use arc::ArcSegment;
pub use cubic_bezier::CubicBezierSegment;
pub use hausdorff::{directed_hausdorff, symmetric_hausdorff};
pub use line::LineSegment;
pub use quadratic_bezier::QuadraticBezierSegment;

/// Alias for `euclid::default::Point2D<f64>`.
pub type Point = euclid::default::Point2D<f64>;

/// Alias for `euclid::default::Vector2D<f64>`.
pub type Vector = euclid::default::Vector2D<f64>;

/// Alias for `euclid::default::Box2D<f64>`.
pub type Box2D = euclid::default::Box2D<f64>;

/// Alias for `euclid::default::Transform2D<f64>`, an affine transform.
pub type Transform = euclid::default::Transform2D<f64>;

/// Absolute tolerance used to compare point coordinates.
pub const POINT_EPSILON: f64 = 1e-9;

/// Shorthand for `Point::new(x, y)`.
#[inline]
pub fn point(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Shorthand for `Vector::new(x, y)`.
#[inline]
pub fn vector(x: f64, y: f64) -> Vector {
    Vector::new(x, y)
}

/// Compares two points for equality within [`POINT_EPSILON`] on each axis.
#[inline]
pub fn points_close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < POINT_EPSILON && (a.y - b.y).abs() < POINT_EPSILON
}

/// A curve or line segment that can be sampled, flattened to a polyline and
/// reversed. Implemented by every segment type in this crate.
pub trait Segment: Copy {
    /// Start of the segment.
    fn from(&self) -> Point;

    /// End of the segment.
    fn to(&self) -> Point;

    /// Samples the segment at `t` (expecting `t` between 0 and 1).
    fn sample(&self, t: f64) -> Point;

    /// Returns a copy of the segment with `from`/`to` (and any control
    /// points) swapped to traverse the same geometry in the other
    /// direction.
    fn flip(&self) -> Self;

    /// Approximates the segment's length by summing the chord lengths of
    /// `samples` uniform samples.
    fn approximate_length(&self, samples: u32) -> f64 {
        let samples = samples.max(1);
        let mut length = 0.0;
        let mut prev = self.sample(0.0);
        for i in 1..=samples {
            let t = f64::from(i) / f64::from(samples);
            let p = self.sample(t);
            length += (p - prev).length();
            prev = p;
        }
        length
    }

    /// Samples at least `min_points` points uniformly in `t`, always
    /// including both endpoints.
    fn sample_uniform(&self, min_points: u32) -> Vec<Point> {
        let min_points = min_points.max(2);
        (0..min_points)
            .map(|i| self.sample(f64::from(i) / f64::from(min_points - 1)))
            .collect()
    }
}
