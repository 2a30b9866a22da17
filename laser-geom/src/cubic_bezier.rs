use crate::{point, Point, Segment};

/// A cubic bezier curve segment defined by its two endpoints and two
/// control points.
///
/// ```text
/// P(t) = (1-t)³·from + 3(1-t)²t·ctrl1 + 3(1-t)t²·ctrl2 + t³·to, t ∈ [0, 1]
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicBezierSegment {
    pub from: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub to: Point,
}

impl CubicBezierSegment {
    pub fn new(from: Point, ctrl1: Point, ctrl2: Point, to: Point) -> Self {
        CubicBezierSegment { from, ctrl1, ctrl2, to }
    }

    pub fn bounding_box(&self) -> crate::Box2D {
        crate::Box2D::from_points([self.from, self.ctrl1, self.ctrl2, self.to])
    }
}

impl Segment for CubicBezierSegment {
    #[inline]
    fn from(&self) -> Point {
        self.from
    }

    #[inline]
    fn to(&self) -> Point {
        self.to
    }

    fn sample(&self, t: f64) -> Point {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;
        point(
            mt3 * self.from.x + 3.0 * mt2 * t * self.ctrl1.x + 3.0 * mt * t2 * self.ctrl2.x + t3 * self.to.x,
            mt3 * self.from.y + 3.0 * mt2 * t * self.ctrl1.y + 3.0 * mt * t2 * self.ctrl2.y + t3 * self.to.y,
        )
    }

    /// Swaps the endpoints and the control points (`ctrl1 <-> ctrl2`).
    #[inline]
    fn flip(&self) -> Self {
        CubicBezierSegment {
            from: self.to,
            ctrl1: self.ctrl2,
            ctrl2: self.ctrl1,
            to: self.from,
        }
    }
}

#[test]
fn endpoints_are_sampled_exactly() {
    let c = CubicBezierSegment::new(
        point(0.0, 0.0),
        point(1.0, 2.0),
        point(3.0, 2.0),
        point(4.0, 0.0),
    );
    assert_eq!(c.sample(0.0), c.from);
    assert_eq!(c.sample(1.0), c.to);
}

#[test]
fn flip_is_involutive() {
    let c = CubicBezierSegment::new(
        point(0.0, 0.0),
        point(1.0, 2.0),
        point(3.0, 2.0),
        point(4.0, 0.0),
    );
    assert_eq!(c.flip().flip(), c);
}

#[test]
fn flip_reverses_sampling() {
    let c = CubicBezierSegment::new(
        point(0.0, 0.0),
        point(1.0, 5.0),
        point(3.0, -5.0),
        point(4.0, 0.0),
    );
    let flipped = c.flip();
    for i in 0..=10 {
        let t = f64::from(i) / 10.0;
        let a = c.sample(t);
        let b = flipped.sample(1.0 - t);
        assert!((a - b).length() < 1e-9);
    }
}
