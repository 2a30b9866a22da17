use laser_geom::points_close;
use laser_path::{Colour, Drawing, Path, PathCommand, Shape};

/// Splits one path into atomic paths (`Move`; one drawing command each),
/// dropping zero-length atoms.
///
/// Step 1 of the documented algorithm, "convert to absolute, non-shorthand
/// form", is [`Path::to_absolute`]: `PathCommand` has no relative or
/// shorthand variants to begin with, so it amounts to validating that every
/// command's numeric fields are usable. A path that fails this check is not
/// atomised at all; the caller logs and drops the whole shape.
pub fn atomic_paths(path: &Path) -> Vec<Path> {
    let commands = path.commands();
    let Some(first) = commands.first() else {
        return Vec::new();
    };
    let mut current = first.endpoint().unwrap_or_else(|| laser_geom::point(0.0, 0.0));
    let mut subpath_start = current;
    let mut atoms = Vec::new();

    for (i, cmd) in commands.iter().enumerate() {
        match cmd {
            PathCommand::Move(p) => {
                current = *p;
                subpath_start = *p;
            }
            PathCommand::Close => {
                let is_last_command = i == commands.len() - 1;
                if is_last_command && !points_close(current, subpath_start) {
                    atoms.push(two_command_path(current, PathCommand::Line(subpath_start)));
                }
                current = subpath_start;
            }
            _ => {
                let endpoint = cmd.endpoint().expect("non-Close, non-Move commands always have an endpoint");
                if !points_close(current, endpoint) {
                    atoms.push(two_command_path(current, *cmd));
                }
                current = endpoint;
            }
        }
    }
    atoms
}

fn two_command_path(start: laser_geom::Point, drawing_command: PathCommand) -> Path {
    Path::from_commands(vec![PathCommand::Move(start), drawing_command])
}

/// Replaces every shape in `drawing` with its atomic paths, in emission
/// order. Atoms inherit their source shape's stroke and layer; fill is
/// forced to `none` (atoms are cut, not filled); ids are assigned
/// `chemin1, chemin2, …` in emission order.
pub fn atomise_drawing(drawing: &mut Drawing) {
    let next_id = std::cell::Cell::new(1usize);
    let atomised: Vec<Shape> = drawing
        .shapes()
        .iter()
        .filter_map(|shape| match shape.path.to_absolute() {
            Ok(path) => Some((shape, path)),
            Err(err) => {
                log::warn!("dropping shape {:?}: {err}", shape.id);
                None
            }
        })
        .flat_map(|(shape, path)| {
            let next_id = &next_id;
            atomic_paths(&path).into_iter().map(move |atom_path| {
                let mut atom = Shape::new(format!("chemin{}", next_id.get()), atom_path, shape.stroke, shape.parent_layer);
                atom.fill = Some(Colour::None);
                next_id.set(next_id.get() + 1);
                atom
            })
        })
        .collect();
    *drawing.shapes_mut() = atomised;
}

#[test]
fn malformed_shape_is_dropped_with_a_warning() {
    use laser_path::Shape;
    let mut d = Drawing::new();
    let malformed = Path::from_commands(vec![PathCommand::Move(laser_geom::point(0.0, 0.0)), PathCommand::Line(laser_geom::point(f64::NAN, 0.0))]);
    d.push_shape(Shape::new("bad", malformed, Colour::BLACK, d.root()));
    let mut good = Path::builder();
    good.move_to(laser_geom::point(0.0, 0.0));
    good.line_to(laser_geom::point(1.0, 0.0));
    d.push_shape(Shape::new("good", good.build(), Colour::BLACK, d.root()));

    atomise_drawing(&mut d);

    assert_eq!(d.shapes().len(), 1);
    assert_eq!(d.shapes()[0].id, "chemin1");
}

#[test]
fn splits_a_rectangle_into_four_atoms() {
    let mut b = Path::builder();
    b.move_to(laser_geom::point(0.0, 0.0));
    b.line_to(laser_geom::point(10.0, 0.0));
    b.line_to(laser_geom::point(10.0, 10.0));
    b.line_to(laser_geom::point(0.0, 10.0));
    b.close();
    let rect = b.build();

    let atoms = atomic_paths(&rect);
    assert_eq!(atoms.len(), 4);
    assert!(atoms.iter().all(|a| a.is_atomic()));
    assert_eq!(atoms.last().unwrap().endpoints(), Some((laser_geom::point(0.0, 10.0), laser_geom::point(0.0, 0.0))));
}

#[test]
fn intermediate_closes_are_not_materialized() {
    let mut b = Path::builder();
    b.move_to(laser_geom::point(0.0, 0.0));
    b.line_to(laser_geom::point(1.0, 0.0));
    b.close();
    b.move_to(laser_geom::point(5.0, 5.0));
    b.line_to(laser_geom::point(6.0, 5.0));
    let two_subpaths = b.build();

    let atoms = atomic_paths(&two_subpaths);
    assert_eq!(atoms.len(), 2, "the first subpath's Close must not produce a materialised line");
}

#[test]
fn zero_length_atoms_are_dropped() {
    let mut b = Path::builder();
    b.move_to(laser_geom::point(0.0, 0.0));
    b.line_to(laser_geom::point(0.0, 0.0));
    b.line_to(laser_geom::point(5.0, 0.0));
    let p = b.build();

    let atoms = atomic_paths(&p);
    assert_eq!(atoms.len(), 1);
}

#[test]
fn atomise_drawing_assigns_sequential_ids_and_clears_fill() {
    use laser_path::Shape;
    let mut d = Drawing::new();
    let mut b1 = Path::builder();
    b1.move_to(laser_geom::point(0.0, 0.0));
    b1.line_to(laser_geom::point(1.0, 0.0));
    d.push_shape(Shape::new("a", b1.build(), Colour::BLACK, d.root()));
    let mut b2 = Path::builder();
    b2.move_to(laser_geom::point(0.0, 0.0));
    b2.line_to(laser_geom::point(0.0, 1.0));
    d.push_shape(Shape::new("b", b2.build(), Colour::BLACK, d.root()));

    atomise_drawing(&mut d);

    let ids: Vec<&str> = d.shapes().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["chemin1", "chemin2"]);
    assert!(d.shapes().iter().all(|s| s.fill == Some(Colour::None)));
}
