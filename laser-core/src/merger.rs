use std::collections::HashMap;

use laser_geom::utils::round_to;
use laser_geom::{Point, Segment};
use laser_path::{Colour, Drawing, Path, PathCommand, Shape};

use crate::atom::ShapeRef;
use crate::cancel::CancellationToken;

/// Decimal precision used to bucket endpoints into critical-point keys.
/// Exposed as a constant per spec §9's open question about large-scale
/// drawings conflating distinct junctions at this rounding.
pub const CRITICAL_POINT_PRECISION: u32 = 2;

/// Safety cap on fusion-loop iterations (spec §4.4). No known input drives
/// the loop anywhere near this; it exists purely as a defensive bound.
const MAX_MERGE_ITERATIONS: u32 = 100;

type PointKey = (i64, i64);

fn endpoint_key(p: Point) -> PointKey {
    round_to(p, CRITICAL_POINT_PRECISION)
}

/// One endpoint of a live atom, as seen by the merger.
#[derive(Clone, Copy)]
struct AtomEnds {
    start: Point,
    end: Point,
    colour: Colour,
}

/// Builds `(point, colour) -> [atom ids]` over every atom currently alive
/// in `atoms`.
fn connections(atoms: &HashMap<ShapeRef, AtomEnds>) -> HashMap<(PointKey, Colour), Vec<ShapeRef>> {
    let mut map: HashMap<(PointKey, Colour), Vec<ShapeRef>> = HashMap::new();
    for (&id, ends) in atoms {
        map.entry((endpoint_key(ends.start), ends.colour)).or_default().push(id);
        map.entry((endpoint_key(ends.end), ends.colour)).or_default().push(id);
    }
    map
}

/// Computes the critical-point set once, from the atom set as it stood
/// right after atomisation/overlap removal. A point is critical when three
/// or more atoms of the same colour touch it (spec §4.4, §8 B3).
fn critical_points(atoms: &HashMap<ShapeRef, AtomEnds>) -> std::collections::HashSet<(PointKey, Colour)> {
    connections(atoms)
        .into_iter()
        .filter(|(_, ids)| ids.len() >= 3)
        .map(|(key, _)| key)
        .collect()
}

/// A chain of atoms to fuse into one, in traversal order. `reversed[i]`
/// says whether `atoms[i]` must be traversed backwards to continue the
/// chain.
struct Chain {
    atom_ids: Vec<ShapeRef>,
    reversed: Vec<bool>,
}

/// Extends a two-atom seed chain forward and backward across non-critical
/// degree-2 junctions, matching `_build_merge_chain`'s orientation-fixing
/// and critical-point guard.
fn build_chain(
    seed_point: PointKey,
    seed_colour: Colour,
    a: ShapeRef,
    b: ShapeRef,
    atoms: &HashMap<ShapeRef, AtomEnds>,
    valid_points: &HashMap<(PointKey, Colour), (ShapeRef, ShapeRef)>,
    critical: &std::collections::HashSet<(PointKey, Colour)>,
    processed: &mut std::collections::HashSet<ShapeRef>,
) -> Chain {
    let ea = atoms[&a];
    let eb = atoms[&b];
    let a_start_key = endpoint_key(ea.start);
    let a_end_key = endpoint_key(ea.end);
    let b_start_key = endpoint_key(eb.start);
    let b_end_key = endpoint_key(eb.end);

    // Orient so `end(first) == start(second) == seed_point`.
    let (mut atom_ids, mut reversed) = if a_end_key == seed_point && b_start_key == seed_point {
        (vec![a, b], vec![false, false])
    } else if a_start_key == seed_point && b_end_key == seed_point {
        (vec![b, a], vec![false, false])
    } else if a_end_key == seed_point && b_end_key == seed_point {
        (vec![a, b], vec![false, true])
    } else {
        debug_assert!(a_start_key == seed_point && b_start_key == seed_point);
        (vec![a, b], vec![true, false])
    };

    processed.insert(a);
    processed.insert(b);

    let effective_end = |id: ShapeRef, rev: bool| -> Point {
        let e = atoms[&id];
        if rev {
            e.start
        } else {
            e.end
        }
    };
    let effective_start = |id: ShapeRef, rev: bool| -> Point {
        let e = atoms[&id];
        if rev {
            e.end
        } else {
            e.start
        }
    };

    // Extend forward from the chain's current end.
    loop {
        let last = *atom_ids.last().unwrap();
        let last_rev = *reversed.last().unwrap();
        let end_key = endpoint_key(effective_end(last, last_rev));
        let Some(&(x, y)) = valid_points.get(&(end_key, seed_colour)) else { break };
        let next = if x == last { y } else if y == last { x } else { break };
        if processed.contains(&next) || !atoms.contains_key(&next) {
            break;
        }
        let next_ends = atoms[&next];
        let next_rev = endpoint_key(next_ends.end) == end_key;
        let far_end = if next_rev { next_ends.start } else { next_ends.end };
        if critical.contains(&(endpoint_key(far_end), seed_colour)) {
            break;
        }
        atom_ids.push(next);
        reversed.push(next_rev);
        processed.insert(next);
    }

    // Extend backward from the chain's current start.
    loop {
        let first = atom_ids[0];
        let first_rev = reversed[0];
        let start_key = endpoint_key(effective_start(first, first_rev));
        let Some(&(x, y)) = valid_points.get(&(start_key, seed_colour)) else { break };
        let prev = if x == first { y } else if y == first { x } else { break };
        if processed.contains(&prev) || !atoms.contains_key(&prev) {
            break;
        }
        let prev_ends = atoms[&prev];
        let prev_rev = endpoint_key(prev_ends.start) == start_key;
        let far_end = if prev_rev { prev_ends.end } else { prev_ends.start };
        if critical.contains(&(endpoint_key(far_end), seed_colour)) {
            break;
        }
        atom_ids.insert(0, prev);
        reversed.insert(0, prev_rev);
        processed.insert(prev);
    }

    Chain { atom_ids, reversed }
}

/// One fusion pass: finds every disjoint chain reachable from a currently
/// mergeable (non-critical, degree-2) endpoint and returns them.
fn find_chains(
    atoms: &HashMap<ShapeRef, AtomEnds>,
    critical: &std::collections::HashSet<(PointKey, Colour)>,
) -> Vec<Chain> {
    let conns = connections(atoms);
    let mut valid_points: HashMap<(PointKey, Colour), (ShapeRef, ShapeRef)> = HashMap::new();
    for (key, ids) in &conns {
        if ids.len() == 2 && !critical.contains(key) && ids[0] != ids[1] {
            valid_points.insert(*key, (ids[0], ids[1]));
        }
    }

    let mut processed = std::collections::HashSet::new();
    let mut chains = Vec::new();
    for (&(point_key, colour), &(a, b)) in &valid_points {
        if processed.contains(&a) || processed.contains(&b) {
            continue;
        }
        let chain = build_chain(point_key, colour, a, b, atoms, &valid_points, critical, &mut processed);
        if chain.atom_ids.len() > 1 {
            chains.push(chain);
        }
    }
    chains
}

/// Concatenates a chain's paths (in traversal order, reversing atoms that
/// need it) into one fused `Path`, dropping every `Move` but the first.
fn fuse_path(chain: &Chain, paths: &HashMap<ShapeRef, Path>) -> Path {
    let mut commands: Vec<PathCommand> = Vec::new();
    for (i, (&id, &rev)) in chain.atom_ids.iter().zip(&chain.reversed).enumerate() {
        let path = if rev { paths[&id].reverse() } else { paths[&id].clone() };
        for cmd in path.commands() {
            if cmd.is_move() {
                if i == 0 {
                    commands.push(*cmd);
                }
            } else {
                commands.push(*cmd);
            }
        }
    }
    Path::from_commands(commands)
}

/// Runs the topological merger (spec §4.4) over every shape in `drawing`:
/// fuses chains of atoms meeting at non-critical degree-2 endpoints,
/// iterating until no mergeable pair remains or the safety cap is hit.
pub fn run(drawing: &mut Drawing, cancel: &CancellationToken) {
    let mut live: HashMap<ShapeRef, Shape> =
        drawing.shapes().iter().cloned().enumerate().collect();

    let ends_of = |shapes: &HashMap<ShapeRef, Shape>| -> HashMap<ShapeRef, AtomEnds> {
        shapes
            .iter()
            .filter_map(|(&id, s)| s.path.endpoints().map(|(start, end)| (id, AtomEnds { start, end, colour: s.stroke })))
            .collect()
    };

    let initial_ends = ends_of(&live);
    let critical = critical_points(&initial_ends);
    log::debug!("merger: {} atoms in, {} critical points", live.len(), critical.len());

    let mut next_id = live.keys().max().copied().map_or(0, |m| m + 1);

    for _ in 0..MAX_MERGE_ITERATIONS {
        if cancel.is_cancelled() {
            break;
        }
        let ends = ends_of(&live);
        let chains = find_chains(&ends, &critical);
        if chains.is_empty() {
            break;
        }

        let paths: HashMap<ShapeRef, Path> = live.iter().map(|(&id, s)| (id, s.path.clone())).collect();
        for chain in &chains {
            let fused_path = fuse_path(chain, &paths);
            let template = &live[&chain.atom_ids[0]];
            let fused = Shape::new(template.id.clone(), fused_path, template.stroke, template.parent_layer);
            for id in &chain.atom_ids {
                live.remove(id);
            }
            live.insert(next_id, fused);
            next_id += 1;
        }
    }

    *drawing.shapes_mut() = live.into_values().collect();
    log::debug!("merger: {} atoms out", drawing.shapes().len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use laser_path::Shape;

    fn line_shape(id: &str, from: Point, to: Point, colour: Colour, layer: laser_path::LayerId) -> Shape {
        let mut b = Path::builder();
        b.move_to(from);
        b.line_to(to);
        Shape::new(id, b.build(), colour, layer)
    }

    #[test]
    fn two_collinear_atoms_fuse_into_one_multi_segment_path() {
        let mut d = Drawing::new();
        let root = d.root();
        d.push_shape(line_shape("chemin1", laser_geom::point(0.0, 0.0), laser_geom::point(5.0, 0.0), Colour::BLACK, root));
        d.push_shape(line_shape("chemin2", laser_geom::point(5.0, 0.0), laser_geom::point(10.0, 0.0), Colour::BLACK, root));

        run(&mut d, &CancellationToken::new());

        assert_eq!(d.shapes().len(), 1);
        assert_eq!(d.shapes()[0].path.endpoints(), Some((laser_geom::point(0.0, 0.0), laser_geom::point(10.0, 0.0))));
    }

    #[test]
    fn y_junction_is_never_fused_at_the_critical_point() {
        let mut d = Drawing::new();
        let root = d.root();
        d.push_shape(line_shape("chemin1", laser_geom::point(0.0, 5.0), laser_geom::point(5.0, 5.0), Colour::BLACK, root));
        d.push_shape(line_shape("chemin2", laser_geom::point(5.0, 5.0), laser_geom::point(10.0, 5.0), Colour::BLACK, root));
        d.push_shape(line_shape("chemin3", laser_geom::point(5.0, 5.0), laser_geom::point(5.0, 0.0), Colour::BLACK, root));

        run(&mut d, &CancellationToken::new());

        assert_eq!(d.shapes().len(), 3, "the shared point has degree 3 and must stay a critical point");
    }

    #[test]
    fn different_colours_never_fuse() {
        let mut d = Drawing::new();
        let root = d.root();
        d.push_shape(line_shape("chemin1", laser_geom::point(0.0, 0.0), laser_geom::point(5.0, 0.0), Colour::BLACK, root));
        d.push_shape(line_shape("chemin2", laser_geom::point(5.0, 0.0), laser_geom::point(10.0, 0.0), Colour::Rgb(0xff, 0, 0), root));

        run(&mut d, &CancellationToken::new());

        assert_eq!(d.shapes().len(), 2);
    }

    #[test]
    fn a_three_atom_chain_fuses_in_one_pass() {
        let mut d = Drawing::new();
        let root = d.root();
        d.push_shape(line_shape("c1", laser_geom::point(0.0, 0.0), laser_geom::point(1.0, 0.0), Colour::BLACK, root));
        d.push_shape(line_shape("c2", laser_geom::point(1.0, 0.0), laser_geom::point(2.0, 0.0), Colour::BLACK, root));
        d.push_shape(line_shape("c3", laser_geom::point(2.0, 0.0), laser_geom::point(3.0, 0.0), Colour::BLACK, root));

        run(&mut d, &CancellationToken::new());

        assert_eq!(d.shapes().len(), 1);
        assert_eq!(d.shapes()[0].path.commands().len(), 4);
    }

    #[test]
    fn reversed_atom_is_fused_with_correct_orientation() {
        let mut d = Drawing::new();
        let root = d.root();
        // c2 runs the "wrong" way: its start coincides with c1's start.
        d.push_shape(line_shape("c1", laser_geom::point(5.0, 0.0), laser_geom::point(0.0, 0.0), Colour::BLACK, root));
        d.push_shape(line_shape("c2", laser_geom::point(5.0, 0.0), laser_geom::point(10.0, 0.0), Colour::BLACK, root));

        run(&mut d, &CancellationToken::new());

        assert_eq!(d.shapes().len(), 1);
        let (start, end) = d.shapes()[0].path.endpoints().unwrap();
        assert!((start == laser_geom::point(0.0, 0.0) && end == laser_geom::point(10.0, 0.0)) || (start == laser_geom::point(10.0, 0.0) && end == laser_geom::point(0.0, 0.0)));
    }
}
