use laser_geom::Point;

/// A single SVG-style path drawing command, already absolute and already in
/// non-shorthand form.
///
/// Every variant that draws (everything but `Move` and `Close`) carries its
/// own endpoint, so a command's effect can always be read off without
/// consulting its neighbours — only the *starting* point of a command has to
/// come from whatever came before it in the enclosing [`Path`](crate::Path).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum PathCommand {
    Move(Point),
    Line(Point),
    Arc {
        rx: f64,
        ry: f64,
        x_rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
    },
    Cubic {
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
    Quadratic {
        ctrl: Point,
        to: Point,
    },
    Close,
}

impl PathCommand {
    /// The endpoint this command moves to, if it moves at all. `Close` has
    /// no endpoint of its own: its effective destination is the enclosing
    /// subpath's `Move`, which only the owning [`Path`](crate::Path) knows.
    pub fn endpoint(&self) -> Option<Point> {
        match *self {
            PathCommand::Move(p) | PathCommand::Line(p) => Some(p),
            PathCommand::Arc { to, .. } => Some(to),
            PathCommand::Cubic { to, .. } => Some(to),
            PathCommand::Quadratic { to, .. } => Some(to),
            PathCommand::Close => None,
        }
    }

    pub fn is_move(&self) -> bool {
        matches!(self, PathCommand::Move(_))
    }

    pub fn is_close(&self) -> bool {
        matches!(self, PathCommand::Close)
    }

    /// Applies an affine transform to every point this command carries.
    pub fn transformed(&self, t: &laser_geom::Transform) -> PathCommand {
        match *self {
            PathCommand::Move(p) => PathCommand::Move(t.transform_point(p)),
            PathCommand::Line(p) => PathCommand::Line(t.transform_point(p)),
            PathCommand::Arc {
                rx,
                ry,
                x_rotation,
                large_arc,
                sweep,
                to,
            } => {
                // Approximates the transformed radii by scaling along each
                // axis; exact under uniform scale/rotate/translate, which is
                // the only kind of transform a group or shape ever carries.
                let scale_x = t.transform_vector(laser_geom::vector(1.0, 0.0)).length();
                let scale_y = t.transform_vector(laser_geom::vector(0.0, 1.0)).length();
                PathCommand::Arc {
                    rx: rx * scale_x,
                    ry: ry * scale_y,
                    x_rotation,
                    large_arc,
                    sweep,
                    to: t.transform_point(to),
                }
            }
            PathCommand::Cubic { ctrl1, ctrl2, to } => PathCommand::Cubic {
                ctrl1: t.transform_point(ctrl1),
                ctrl2: t.transform_point(ctrl2),
                to: t.transform_point(to),
            },
            PathCommand::Quadratic { ctrl, to } => PathCommand::Quadratic {
                ctrl: t.transform_point(ctrl),
                to: t.transform_point(to),
            },
            PathCommand::Close => PathCommand::Close,
        }
    }
}

#[test]
fn close_has_no_endpoint() {
    assert_eq!(PathCommand::Close.endpoint(), None);
}

#[test]
fn transform_moves_every_point() {
    let t = laser_geom::Transform::translation(10.0, 0.0);
    let cmd = PathCommand::Line(laser_geom::point(1.0, 1.0));
    assert_eq!(cmd.transformed(&t).endpoint(), Some(laser_geom::point(11.0, 1.0)));
}
