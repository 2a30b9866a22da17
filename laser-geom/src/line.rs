use crate::{point, Point, Segment, Vector};

/// A straight line segment between two points.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct LineSegment {
    pub from: Point,
    pub to: Point,
}

impl LineSegment {
    pub fn new(from: Point, to: Point) -> Self {
        LineSegment { from, to }
    }

    /// Vector from `from` to `to`. Zero for a degenerate (zero-length)
    /// segment.
    #[inline]
    pub fn to_vector(&self) -> Vector {
        self.to - self.from
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.to_vector().length()
    }

    /// Normalized direction vector, or `None` for a degenerate segment.
    pub fn direction(&self) -> Option<Vector> {
        let v = self.to_vector();
        let len = v.length();
        if len < crate::POINT_EPSILON {
            None
        } else {
            Some(v / len)
        }
    }

    /// Projects `p` onto the line through `self` and returns the parameter
    /// `t` such that `self.sample(t)` is the foot of the perpendicular.
    /// Returns 0.0 for a degenerate segment.
    pub fn project_t(&self, p: Point) -> f64 {
        let v = self.to_vector();
        let len_sq = v.square_length();
        if len_sq < crate::POINT_EPSILON {
            return 0.0;
        }
        (p - self.from).dot(v) / len_sq
    }

    /// Shortest distance from `p` to the segment (not the infinite line).
    pub fn distance_to_point(&self, p: Point) -> f64 {
        let t = self.project_t(p).clamp(0.0, 1.0);
        (self.sample(t) - p).length()
    }

    /// Returns `true` when this segment's bounding box, expanded by
    /// `margin` on every side, intersects `other`'s.
    pub fn bounding_boxes_overlap(&self, other: &LineSegment, margin: f64) -> bool {
        self.bounding_box().inflate(margin, margin).intersects(&other.bounding_box())
    }

    pub fn bounding_box(&self) -> crate::Box2D {
        crate::Box2D::from_points([self.from, self.to])
    }
}

impl Segment for LineSegment {
    #[inline]
    fn from(&self) -> Point {
        self.from
    }

    #[inline]
    fn to(&self) -> Point {
        self.to
    }

    #[inline]
    fn sample(&self, t: f64) -> Point {
        self.from.lerp(self.to, t)
    }

    #[inline]
    fn flip(&self) -> Self {
        LineSegment {
            from: self.to,
            to: self.from,
        }
    }
}

/// Shorthand for building a [`LineSegment`].
pub fn line(from: Point, to: Point) -> LineSegment {
    LineSegment::new(from, to)
}

#[test]
fn sample_and_flip() {
    let l = line(point(0.0, 0.0), point(10.0, 0.0));
    assert_eq!(l.sample(0.5), point(5.0, 0.0));
    let flipped = l.flip();
    assert_eq!(flipped.from, point(10.0, 0.0));
    assert_eq!(flipped.to, point(0.0, 0.0));
}

#[test]
fn distance_to_point() {
    let l = line(point(0.0, 0.0), point(10.0, 0.0));
    assert!((l.distance_to_point(point(5.0, 3.0)) - 3.0).abs() < 1e-9);
    // Outside the segment's span: distance is to the nearest endpoint.
    assert!((l.distance_to_point(point(-4.0, 3.0)) - 5.0).abs() < 1e-9);
}

#[test]
fn degenerate_segment_is_well_defined() {
    let l = line(point(3.0, 3.0), point(3.0, 3.0));
    assert_eq!(l.direction(), None);
    assert_eq!(l.length(), 0.0);
    assert_eq!(l.project_t(point(0.0, 0.0)), 0.0);
}
