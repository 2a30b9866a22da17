use crate::{Point, Segment, Vector};

/// An elliptical arc in SVG endpoint parameterisation (the same five
/// parameters as the `A` path command, plus the two endpoints).
///
/// Angle conventions follow the SVG 1.1 implementation notes
/// (<https://www.w3.org/TR/SVG11/implnote.html#ArcImplementationNotes>):
/// `x_rotation` is in radians, `large_arc`/`sweep` are the corresponding
/// path-command flags.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct ArcSegment {
    pub from: Point,
    pub to: Point,
    pub rx: f64,
    pub ry: f64,
    pub x_rotation: f64,
    pub large_arc: bool,
    pub sweep: bool,
}

/// The centre parameterisation of an arc, used internally for sampling.
struct CenterForm {
    center: Point,
    rx: f64,
    ry: f64,
    x_rotation: f64,
    start_angle: f64,
    sweep_angle: f64,
}

impl ArcSegment {
    /// Converts the endpoint parameterisation to the centre parameterisation
    /// (SVG implementation notes, steps F.6.5 / F.6.6). Returns `None` when
    /// `from == to` (a degenerate arc with no well-defined centre) or when a
    /// radius is non-finite.
    fn center_form(&self) -> Option<CenterForm> {
        if crate::points_close(self.from, self.to) {
            return None;
        }
        let (mut rx, mut ry) = (self.rx.abs(), self.ry.abs());
        if rx < crate::POINT_EPSILON || ry < crate::POINT_EPSILON {
            return None;
        }

        let phi = self.x_rotation;
        let (sin_phi, cos_phi) = phi.sin_cos();

        // F.6.5.1: compute (x1', y1'), the endpoint in the rotated frame
        // centred on the segment midpoint.
        let half = (self.from - self.to) / 2.0;
        let x1p = cos_phi * half.x + sin_phi * half.y;
        let y1p = -sin_phi * half.x + cos_phi * half.y;

        // F.6.6.2/3: scale up the radii if they're too small to reach from
        // `from` to `to` at all.
        let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
        if lambda > 1.0 {
            let scale = lambda.sqrt();
            rx *= scale;
            ry *= scale;
        }

        // F.6.5.2: centre in the rotated frame.
        let rx2 = rx * rx;
        let ry2 = ry * ry;
        let num = (rx2 * ry2 - rx2 * y1p * y1p - ry2 * x1p * x1p).max(0.0);
        let den = rx2 * y1p * y1p + ry2 * x1p * x1p;
        let mut co = if den < crate::POINT_EPSILON {
            0.0
        } else {
            (num / den).sqrt()
        };
        if self.large_arc == self.sweep {
            co = -co;
        }
        let cxp = co * (rx * y1p) / ry;
        let cyp = -co * (ry * x1p) / rx;

        // F.6.5.3: centre in the original frame.
        let mid = (self.from.to_vector() + self.to.to_vector()) / 2.0;
        let center = Point::new(
            cos_phi * cxp - sin_phi * cyp + mid.x,
            sin_phi * cxp + cos_phi * cyp + mid.y,
        );

        // F.6.5.5/6: start angle and sweep angle.
        let v1 = Vector::new((x1p - cxp) / rx, (y1p - cyp) / ry);
        let v2 = Vector::new((-x1p - cxp) / rx, (-y1p - cyp) / ry);
        let start_angle = signed_angle(Vector::new(1.0, 0.0), v1);
        let mut sweep_angle = signed_angle(v1, v2);
        if !self.sweep && sweep_angle > 0.0 {
            sweep_angle -= 2.0 * std::f64::consts::PI;
        } else if self.sweep && sweep_angle < 0.0 {
            sweep_angle += 2.0 * std::f64::consts::PI;
        }

        Some(CenterForm {
            center,
            rx,
            ry,
            x_rotation: phi,
            start_angle,
            sweep_angle,
        })
    }
}

/// Signed angle from `a` to `b`, in `(-pi, pi]`.
fn signed_angle(a: Vector, b: Vector) -> f64 {
    let dot = a.dot(b).clamp(-1.0, 1.0);
    let det = a.cross(b);
    let angle = dot.acos();
    if det < 0.0 {
        -angle
    } else {
        angle
    }
}

impl Segment for ArcSegment {
    #[inline]
    fn from(&self) -> Point {
        self.from
    }

    #[inline]
    fn to(&self) -> Point {
        self.to
    }

    fn sample(&self, t: f64) -> Point {
        let Some(c) = self.center_form() else {
            return self.from.lerp(self.to, t);
        };
        let angle = c.start_angle + t * c.sweep_angle;
        let (sin_a, cos_a) = angle.sin_cos();
        let (sin_phi, cos_phi) = c.x_rotation.sin_cos();
        let ex = c.rx * cos_a;
        let ey = c.ry * sin_a;
        Point::new(
            c.center.x + cos_phi * ex - sin_phi * ey,
            c.center.y + sin_phi * ex + cos_phi * ey,
        )
    }

    /// Swaps the endpoints and complements the sweep flag: traversing the
    /// same ellipse backwards flips whether it turns clockwise or
    /// counter-clockwise, but changes neither the radii, the rotation nor
    /// which of the two candidate arcs (`large_arc`) is used.
    #[inline]
    fn flip(&self) -> Self {
        ArcSegment {
            from: self.to,
            to: self.from,
            rx: self.rx,
            ry: self.ry,
            x_rotation: self.x_rotation,
            large_arc: self.large_arc,
            sweep: !self.sweep,
        }
    }
}

#[test]
fn quarter_circle_east_to_north() {
    // East(10, 0) -> North(0, -10), a quarter circle with sweep=0, large=0,
    // rotation=0.
    let arc = ArcSegment {
        from: Point::new(10.0, 0.0),
        to: Point::new(0.0, -10.0),
        rx: 10.0,
        ry: 10.0,
        x_rotation: 0.0,
        large_arc: false,
        sweep: false,
    };
    let mid = arc.sample(0.5);
    assert!((mid.x - 10.0 * std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    assert!((mid.y + 10.0 * std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-6);
}

#[test]
fn flip_swaps_endpoints_and_complements_sweep() {
    let arc = ArcSegment {
        from: Point::new(10.0, 0.0),
        to: Point::new(0.0, -10.0),
        rx: 10.0,
        ry: 5.0,
        x_rotation: 0.0,
        large_arc: false,
        sweep: false,
    };
    let flipped = arc.flip();
    assert_eq!(flipped.from, arc.to);
    assert_eq!(flipped.to, arc.from);
    assert_eq!(flipped.sweep, !arc.sweep);
    assert_eq!(flipped.large_arc, arc.large_arc);
    assert_eq!((flipped.rx, flipped.ry), (arc.rx, arc.ry));
}

#[test]
fn degenerate_arc_falls_back_to_linear_sample() {
    let p = Point::new(3.0, 4.0);
    let arc = ArcSegment {
        from: p,
        to: p,
        rx: 1.0,
        ry: 1.0,
        x_rotation: 0.0,
        large_arc: false,
        sweep: false,
    };
    assert_eq!(arc.sample(0.5), p);
}
