use crate::commands::PathCommand;
use crate::error::PathError;
use crate::geometry::AtomGeometry;
use laser_geom::{ArcSegment, CubicBezierSegment, LineSegment, Point, QuadraticBezierSegment, Segment};

/// An ordered sequence of [`PathCommand`]s.
///
/// Invariants maintained by every `Path` this crate hands back to a caller:
/// the first command is a `Move`, and the endpoint of command *n* equals the
/// start of command *n+1* for every non-`Close` command. A path may contain
/// several `Move`s (a multi-subpath path).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Path { commands: Vec::new() }
    }

    /// Builds a path from a command list. Debug builds assert the first
    /// command is a `Move` if the list is non-empty.
    pub fn from_commands(commands: Vec<PathCommand>) -> Self {
        debug_assert!(commands.first().map_or(true, PathCommand::is_move));
        Path { commands }
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn push(&mut self, cmd: PathCommand) {
        self.commands.push(cmd);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn first_move(&self) -> Option<Point> {
        self.commands.first().and_then(PathCommand::endpoint)
    }

    /// The start and end point of the whole path, walking `Close` commands
    /// back to their subpath's `Move`.
    pub fn endpoints(&self) -> Option<(Point, Point)> {
        let start = self.first_move()?;
        let mut subpath_start = start;
        let mut current = start;
        for cmd in &self.commands {
            match cmd {
                PathCommand::Move(p) => {
                    subpath_start = *p;
                    current = *p;
                }
                PathCommand::Close => current = subpath_start,
                _ => current = cmd.endpoint().unwrap(),
            }
        }
        Some((start, current))
    }

    /// A path is atomic when it has exactly two commands: a `Move` and one
    /// drawing command whose endpoint differs from the `Move`.
    pub fn is_atomic(&self) -> bool {
        match self.commands.as_slice() {
            [PathCommand::Move(start), cmd] if !cmd.is_close() => {
                cmd.endpoint().is_some_and(|end| !laser_geom::points_close(*start, end))
            }
            _ => false,
        }
    }

    /// The geometry of an atomic path's single drawing command, or `None`
    /// if this path is not atomic.
    pub fn atom_geometry(&self) -> Option<AtomGeometry> {
        let [PathCommand::Move(start), cmd] = self.commands.as_slice() else {
            return None;
        };
        let start = *start;
        Some(match *cmd {
            PathCommand::Line(to) => AtomGeometry::Line(LineSegment::new(start, to)),
            PathCommand::Arc { rx, ry, x_rotation, large_arc, sweep, to } => {
                AtomGeometry::Arc(ArcSegment { from: start, to, rx, ry, x_rotation, large_arc, sweep })
            }
            PathCommand::Cubic { ctrl1, ctrl2, to } => {
                AtomGeometry::Cubic(CubicBezierSegment::new(start, ctrl1, ctrl2, to))
            }
            PathCommand::Quadratic { ctrl, to } => {
                AtomGeometry::Quadratic(QuadraticBezierSegment::new(start, ctrl, to))
            }
            PathCommand::Move(_) | PathCommand::Close => return None,
        })
    }

    /// Converts this path to absolute, non-shorthand form — the first step
    /// of atomisation. [`PathCommand`] already stores every endpoint and
    /// control point in absolute form, so there is no shorthand to expand;
    /// what's left to check is that every numeric field is actually usable
    /// (finite coordinates, positive arc radii). Returns the first malformed
    /// command's description on failure.
    pub fn to_absolute(&self) -> Result<Path, PathError> {
        for cmd in &self.commands {
            if let Err(reason) = validate_command(cmd) {
                return Err(PathError::MalformedCommand { command: format!("{cmd:?}"), reason });
            }
        }
        Ok(self.clone())
    }

    /// Builds a two-command atomic path from a geometry segment.
    pub fn from_atom_geometry(geom: AtomGeometry) -> Path {
        let start = geom.from();
        let cmd = match geom {
            AtomGeometry::Line(s) => PathCommand::Line(s.to),
            AtomGeometry::Arc(s) => PathCommand::Arc {
                rx: s.rx,
                ry: s.ry,
                x_rotation: s.x_rotation,
                large_arc: s.large_arc,
                sweep: s.sweep,
                to: s.to,
            },
            AtomGeometry::Cubic(s) => PathCommand::Cubic { ctrl1: s.ctrl1, ctrl2: s.ctrl2, to: s.to },
            AtomGeometry::Quadratic(s) => PathCommand::Quadratic { ctrl: s.ctrl, to: s.to },
        };
        Path::from_commands(vec![PathCommand::Move(start), cmd])
    }

    /// Reverses an atomic path: swaps its endpoints and, for curves,
    /// complements the data that makes the curve direction-dependent.
    /// Panics in debug builds if called on a non-atomic path.
    pub fn reverse(&self) -> Path {
        debug_assert!(self.is_atomic(), "path reversal is only defined for atomic paths");
        self.reverse_open()
    }

    /// Decomposes this path into one [`AtomGeometry`] per drawing command,
    /// the general form of [`Path::atom_geometry`] for paths with more
    /// than one drawing command, as produced by the topological merger.
    /// `Close` is rendered as a `Line` back to its subpath's start, same
    /// as the atomiser's treatment of a final `Close`.
    pub fn segments(&self) -> Vec<AtomGeometry> {
        let mut segments = Vec::new();
        let mut current = laser_geom::point(0.0, 0.0);
        let mut subpath_start = current;
        for cmd in &self.commands {
            match *cmd {
                PathCommand::Move(p) => {
                    current = p;
                    subpath_start = p;
                }
                PathCommand::Close => {
                    segments.push(AtomGeometry::Line(LineSegment::new(current, subpath_start)));
                    current = subpath_start;
                }
                _ => {
                    let start = current;
                    let endpoint = cmd.endpoint().expect("non-Close, non-Move commands always have an endpoint");
                    segments.push(match cmd {
                        PathCommand::Line(to) => AtomGeometry::Line(LineSegment::new(start, *to)),
                        PathCommand::Arc { rx, ry, x_rotation, large_arc, sweep, to } => {
                            AtomGeometry::Arc(ArcSegment { from: start, to: *to, rx: *rx, ry: *ry, x_rotation: *x_rotation, large_arc: *large_arc, sweep: *sweep })
                        }
                        PathCommand::Cubic { ctrl1, ctrl2, to } => {
                            AtomGeometry::Cubic(CubicBezierSegment::new(start, *ctrl1, *ctrl2, *to))
                        }
                        PathCommand::Quadratic { ctrl, to } => AtomGeometry::Quadratic(QuadraticBezierSegment::new(start, *ctrl, *to)),
                        PathCommand::Move(_) | PathCommand::Close => unreachable!(),
                    });
                    current = endpoint;
                }
            }
        }
        segments
    }

    /// Reverses any single-subpath, `Close`-free path (what every atom or
    /// merger-fused chain looks like by the time the ordering engine
    /// runs): reverses command order and flips each segment's own
    /// direction-dependent data. [`Path::reverse`] is the atomic-only
    /// special case of this.
    pub fn reverse_open(&self) -> Path {
        let segments = self.segments();
        let Some(last) = segments.last() else {
            return self.clone();
        };
        let mut commands = Vec::with_capacity(self.commands.len());
        commands.push(PathCommand::Move(last.to()));
        for geom in segments.iter().rev() {
            commands.push(match geom.flip() {
                AtomGeometry::Line(s) => PathCommand::Line(s.to),
                AtomGeometry::Arc(s) => PathCommand::Arc { rx: s.rx, ry: s.ry, x_rotation: s.x_rotation, large_arc: s.large_arc, sweep: s.sweep, to: s.to },
                AtomGeometry::Cubic(s) => PathCommand::Cubic { ctrl1: s.ctrl1, ctrl2: s.ctrl2, to: s.to },
                AtomGeometry::Quadratic(s) => PathCommand::Quadratic { ctrl: s.ctrl, to: s.to },
            });
        }
        Path::from_commands(commands)
    }

    /// Applies an affine transform to every point this path carries,
    /// baking a shape or group transform directly into its coordinates.
    pub fn apply_transform(&mut self, t: &laser_geom::Transform) {
        for cmd in &mut self.commands {
            *cmd = cmd.transformed(t);
        }
    }

    /// Bounding box over every endpoint and control point in the path.
    /// Conservative for curves (uses control points, not the tight curve
    /// extents) but sufficient as a cheap overlap prefilter.
    pub fn bounding_box(&self) -> Option<laser_geom::Box2D> {
        let mut points = Vec::new();
        for cmd in &self.commands {
            match *cmd {
                PathCommand::Move(p) | PathCommand::Line(p) => points.push(p),
                PathCommand::Arc { to, .. } => points.push(to),
                PathCommand::Cubic { ctrl1, ctrl2, to } => {
                    points.push(ctrl1);
                    points.push(ctrl2);
                    points.push(to);
                }
                PathCommand::Quadratic { ctrl, to } => {
                    points.push(ctrl);
                    points.push(to);
                }
                PathCommand::Close => {}
            }
        }
        if points.is_empty() {
            None
        } else {
            Some(laser_geom::Box2D::from_points(points))
        }
    }
}

fn finite_point(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

fn validate_command(cmd: &PathCommand) -> Result<(), String> {
    match *cmd {
        PathCommand::Move(p) | PathCommand::Line(p) => {
            if !finite_point(p) {
                return Err("endpoint is not finite".to_string());
            }
        }
        PathCommand::Arc { rx, ry, x_rotation, to, .. } => {
            if !finite_point(to) || !x_rotation.is_finite() {
                return Err("endpoint or rotation is not finite".to_string());
            }
            if !(rx.is_finite() && ry.is_finite() && rx > 0.0 && ry > 0.0) {
                return Err(format!("radii must be finite and positive, got rx={rx}, ry={ry}"));
            }
        }
        PathCommand::Cubic { ctrl1, ctrl2, to } => {
            if !finite_point(ctrl1) || !finite_point(ctrl2) || !finite_point(to) {
                return Err("control point or endpoint is not finite".to_string());
            }
        }
        PathCommand::Quadratic { ctrl, to } => {
            if !finite_point(ctrl) || !finite_point(to) {
                return Err("control point or endpoint is not finite".to_string());
            }
        }
        PathCommand::Close => {}
    }
    Ok(())
}

#[test]
fn to_absolute_accepts_well_formed_commands() {
    let p = Path::from_commands(vec![
        PathCommand::Move(laser_geom::point(0.0, 0.0)),
        PathCommand::Line(laser_geom::point(10.0, 0.0)),
    ]);
    assert_eq!(p.to_absolute(), Ok(p));
}

#[test]
fn to_absolute_rejects_non_finite_coordinates() {
    let p = Path::from_commands(vec![
        PathCommand::Move(laser_geom::point(0.0, 0.0)),
        PathCommand::Line(laser_geom::point(f64::NAN, 0.0)),
    ]);
    assert!(p.to_absolute().is_err());
}

#[test]
fn to_absolute_rejects_non_positive_arc_radii() {
    let p = Path::from_commands(vec![
        PathCommand::Move(laser_geom::point(0.0, 0.0)),
        PathCommand::Arc {
            rx: 0.0,
            ry: 5.0,
            x_rotation: 0.0,
            large_arc: false,
            sweep: false,
            to: laser_geom::point(5.0, 5.0),
        },
    ]);
    assert!(p.to_absolute().is_err());
}

#[test]
fn atomic_detection() {
    let atomic = Path::from_commands(vec![
        PathCommand::Move(laser_geom::point(0.0, 0.0)),
        PathCommand::Line(laser_geom::point(1.0, 0.0)),
    ]);
    assert!(atomic.is_atomic());

    let zero_length = Path::from_commands(vec![
        PathCommand::Move(laser_geom::point(0.0, 0.0)),
        PathCommand::Line(laser_geom::point(0.0, 0.0)),
    ]);
    assert!(!zero_length.is_atomic());

    let multi = Path::from_commands(vec![
        PathCommand::Move(laser_geom::point(0.0, 0.0)),
        PathCommand::Line(laser_geom::point(1.0, 0.0)),
        PathCommand::Line(laser_geom::point(1.0, 1.0)),
    ]);
    assert!(!multi.is_atomic());
}

#[test]
fn reverse_is_involutive_for_a_line() {
    let p = Path::from_commands(vec![
        PathCommand::Move(laser_geom::point(0.0, 0.0)),
        PathCommand::Line(laser_geom::point(10.0, 0.0)),
    ]);
    assert_eq!(p.reverse().reverse(), p);
}

#[test]
fn reverse_complements_arc_sweep() {
    let p = Path::from_commands(vec![
        PathCommand::Move(laser_geom::point(10.0, 0.0)),
        PathCommand::Arc {
            rx: 10.0,
            ry: 10.0,
            x_rotation: 0.0,
            large_arc: false,
            sweep: false,
            to: laser_geom::point(0.0, -10.0),
        },
    ]);
    let reversed = p.reverse();
    match reversed.commands()[1] {
        PathCommand::Arc { sweep, to, .. } => {
            assert!(sweep);
            assert_eq!(to, laser_geom::point(10.0, 0.0));
        }
        _ => panic!("expected an arc"),
    }
}

#[test]
fn endpoints_follow_close_back_to_subpath_start() {
    let p = Path::from_commands(vec![
        PathCommand::Move(laser_geom::point(0.0, 0.0)),
        PathCommand::Line(laser_geom::point(10.0, 0.0)),
        PathCommand::Line(laser_geom::point(10.0, 10.0)),
        PathCommand::Close,
    ]);
    assert_eq!(p.endpoints(), Some((laser_geom::point(0.0, 0.0), laser_geom::point(0.0, 0.0))));
}

#[test]
fn segments_yields_one_geometry_per_drawing_command() {
    let p = Path::from_commands(vec![
        PathCommand::Move(laser_geom::point(0.0, 0.0)),
        PathCommand::Line(laser_geom::point(5.0, 0.0)),
        PathCommand::Line(laser_geom::point(5.0, 5.0)),
    ]);
    let segments = p.segments();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].from(), laser_geom::point(0.0, 0.0));
    assert_eq!(segments[1].to(), laser_geom::point(5.0, 5.0));
}

#[test]
fn reverse_open_reverses_a_multi_segment_chain() {
    let p = Path::from_commands(vec![
        PathCommand::Move(laser_geom::point(0.0, 0.0)),
        PathCommand::Line(laser_geom::point(5.0, 0.0)),
        PathCommand::Line(laser_geom::point(5.0, 5.0)),
    ]);
    let reversed = p.reverse_open();
    assert_eq!(reversed.endpoints(), Some((laser_geom::point(5.0, 5.0), laser_geom::point(0.0, 0.0))));
    assert_eq!(reversed.reverse_open(), p);
}
