use crate::commands::PathCommand;
use crate::path::Path;
use laser_geom::Point;

/// A fluent builder for [`Path`]s, mirroring the `move_to`/`line_to`/…
/// vocabulary the teacher crate uses for its path builders.
///
/// ```
/// use laser_path::{Path, point};
/// let mut b = Path::builder();
/// b.move_to(point(0.0, 0.0));
/// b.line_to(point(10.0, 0.0));
/// b.line_to(point(10.0, 10.0));
/// b.close();
/// let path = b.build();
/// assert_eq!(path.commands().len(), 4);
/// ```
#[derive(Default)]
pub struct Builder {
    commands: Vec<PathCommand>,
    started: bool,
}

impl Builder {
    pub fn new() -> Self {
        Builder::default()
    }

    pub fn move_to(&mut self, to: Point) -> &mut Self {
        self.commands.push(PathCommand::Move(to));
        self.started = true;
        self
    }

    pub fn line_to(&mut self, to: Point) -> &mut Self {
        debug_assert!(self.started, "line_to before move_to");
        self.commands.push(PathCommand::Line(to));
        self
    }

    pub fn arc_to(&mut self, rx: f64, ry: f64, x_rotation: f64, large_arc: bool, sweep: bool, to: Point) -> &mut Self {
        debug_assert!(self.started, "arc_to before move_to");
        self.commands.push(PathCommand::Arc { rx, ry, x_rotation, large_arc, sweep, to });
        self
    }

    pub fn cubic_bezier_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) -> &mut Self {
        debug_assert!(self.started, "cubic_bezier_to before move_to");
        self.commands.push(PathCommand::Cubic { ctrl1, ctrl2, to });
        self
    }

    pub fn quadratic_bezier_to(&mut self, ctrl: Point, to: Point) -> &mut Self {
        debug_assert!(self.started, "quadratic_bezier_to before move_to");
        self.commands.push(PathCommand::Quadratic { ctrl, to });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        debug_assert!(self.started, "close before move_to");
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn build(self) -> Path {
        Path::from_commands(self.commands)
    }
}

impl Path {
    pub fn builder() -> Builder {
        Builder::new()
    }
}

#[test]
fn builds_a_rectangle() {
    let mut b = Path::builder();
    b.move_to(laser_geom::point(0.0, 0.0));
    b.line_to(laser_geom::point(10.0, 0.0));
    b.line_to(laser_geom::point(10.0, 10.0));
    b.line_to(laser_geom::point(0.0, 10.0));
    b.close();
    let path = b.build();
    assert_eq!(path.commands().len(), 5);
    assert_eq!(path.first_move(), Some(laser_geom::point(0.0, 0.0)));
}
