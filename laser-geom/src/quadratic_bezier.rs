use crate::{point, Point, Segment};

/// A quadratic bezier curve segment: two endpoints and a single control
/// point.
///
/// ```text
/// P(t) = (1-t)²·from + 2(1-t)t·ctrl + t²·to, t ∈ [0, 1]
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadraticBezierSegment {
    pub from: Point,
    pub ctrl: Point,
    pub to: Point,
}

impl QuadraticBezierSegment {
    pub fn new(from: Point, ctrl: Point, to: Point) -> Self {
        QuadraticBezierSegment { from, ctrl, to }
    }

    pub fn bounding_box(&self) -> crate::Box2D {
        crate::Box2D::from_points([self.from, self.ctrl, self.to])
    }
}

impl Segment for QuadraticBezierSegment {
    #[inline]
    fn from(&self) -> Point {
        self.from
    }

    #[inline]
    fn to(&self) -> Point {
        self.to
    }

    fn sample(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        point(
            mt * mt * self.from.x + 2.0 * mt * t * self.ctrl.x + t * t * self.to.x,
            mt * mt * self.from.y + 2.0 * mt * t * self.ctrl.y + t * t * self.to.y,
        )
    }

    /// Swaps the endpoints and keeps the single control point in place.
    #[inline]
    fn flip(&self) -> Self {
        QuadraticBezierSegment {
            from: self.to,
            ctrl: self.ctrl,
            to: self.from,
        }
    }
}

#[test]
fn endpoints_are_sampled_exactly() {
    let q = QuadraticBezierSegment::new(point(0.0, 0.0), point(2.0, 4.0), point(4.0, 0.0));
    assert_eq!(q.sample(0.0), q.from);
    assert_eq!(q.sample(1.0), q.to);
}

#[test]
fn flip_keeps_control_point() {
    let q = QuadraticBezierSegment::new(point(0.0, 0.0), point(2.0, 4.0), point(4.0, 0.0));
    let flipped = q.flip();
    assert_eq!(flipped.ctrl, q.ctrl);
    assert_eq!(flipped.from, q.to);
    assert_eq!(flipped.to, q.from);
}
