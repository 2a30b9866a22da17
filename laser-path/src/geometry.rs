use laser_geom::{ArcSegment, CubicBezierSegment, LineSegment, Point, QuadraticBezierSegment, Segment};

/// The geometry of a single atomic path's drawing command, as a
/// `laser_geom` segment. Bridges the document model (`PathCommand`, which
/// knows nothing about curve maths) and the geometry crate (which knows
/// nothing about SVG).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AtomGeometry {
    Line(LineSegment),
    Arc(ArcSegment),
    Cubic(CubicBezierSegment),
    Quadratic(QuadraticBezierSegment),
}

impl Segment for AtomGeometry {
    fn from(&self) -> Point {
        match self {
            AtomGeometry::Line(s) => s.from(),
            AtomGeometry::Arc(s) => s.from(),
            AtomGeometry::Cubic(s) => s.from(),
            AtomGeometry::Quadratic(s) => s.from(),
        }
    }

    fn to(&self) -> Point {
        match self {
            AtomGeometry::Line(s) => s.to(),
            AtomGeometry::Arc(s) => s.to(),
            AtomGeometry::Cubic(s) => s.to(),
            AtomGeometry::Quadratic(s) => s.to(),
        }
    }

    fn sample(&self, t: f64) -> Point {
        match self {
            AtomGeometry::Line(s) => s.sample(t),
            AtomGeometry::Arc(s) => s.sample(t),
            AtomGeometry::Cubic(s) => s.sample(t),
            AtomGeometry::Quadratic(s) => s.sample(t),
        }
    }

    fn flip(&self) -> Self {
        match self {
            AtomGeometry::Line(s) => AtomGeometry::Line(s.flip()),
            AtomGeometry::Arc(s) => AtomGeometry::Arc(s.flip()),
            AtomGeometry::Cubic(s) => AtomGeometry::Cubic(s.flip()),
            AtomGeometry::Quadratic(s) => AtomGeometry::Quadratic(s.flip()),
        }
    }
}

impl AtomGeometry {
    /// A short tag identifying which curve kind this geometry is.
    pub fn type_tag(&self) -> PathType {
        match self {
            AtomGeometry::Line(_) => PathType::Line,
            AtomGeometry::Arc(_) => PathType::Arc,
            AtomGeometry::Cubic(_) => PathType::Cubic,
            AtomGeometry::Quadratic(_) => PathType::Quadratic,
        }
    }
}

/// The kind of curve an atomic path's single drawing command is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathType {
    Line,
    Arc,
    Cubic,
    Quadratic,
}
