use std::collections::HashMap;

use laser_geom::{point, Point};
use laser_path::{Colour, Drawing, Shape};

use crate::cancel::CancellationToken;
use crate::config::{Config, OptimizationStrategy, StripDirection};
use crate::palette::Palette;
use crate::stats::Stats;

/// An atom as seen by the ordering engine: the live shape plus the
/// endpoint/length facts the strategies need. Rebuilt fresh from the
/// drawing, same discipline as `crate::atom::AtomRecord`.
struct OrderAtom {
    shape: Shape,
    start: Point,
    end: Point,
    is_closed: bool,
    length: f64,
}

impl OrderAtom {
    fn build(shape: Shape) -> Option<Self> {
        let (start, end) = shape.path.endpoints()?;
        let length = shape.path.segments().iter().map(laser_algorithms::estimate_length).sum();
        Some(OrderAtom { is_closed: laser_geom::points_close(start, end), start, end, shape, length })
    }

    /// Reverses this atom's path in place (closed atoms are never
    /// reversed, per spec §4.5's nearest-neighbour rule).
    fn reverse(&mut self) {
        debug_assert!(!self.is_closed);
        self.shape.path = self.shape.path.reverse_open();
        std::mem::swap(&mut self.start, &mut self.end);
    }
}

fn idle_distance(atoms: &[OrderAtom]) -> f64 {
    atoms.windows(2).map(|w| (w[0].end - w[1].start).length()).sum()
}

/// Buckets atoms by stroke colour, then orders the buckets by the
/// palette's declared cut order; colours outside the palette (when kept)
/// follow in the order they were first encountered.
fn bucket_by_colour(atoms: Vec<OrderAtom>, palette: &Palette) -> Vec<(Colour, Vec<OrderAtom>)> {
    let mut groups: HashMap<Colour, Vec<OrderAtom>> = HashMap::new();
    let mut first_seen: Vec<Colour> = Vec::new();
    for atom in atoms {
        if !groups.contains_key(&atom.shape.stroke) {
            first_seen.push(atom.shape.stroke);
        }
        groups.entry(atom.shape.stroke).or_default().push(atom);
    }

    // Stable sort on palette rank: present colours fall into palette order,
    // and colours outside the palette (all tied at `usize::MAX`) keep their
    // relative first-seen position.
    first_seen.sort_by_key(|c| palette.rank(*c).unwrap_or(usize::MAX));
    first_seen.into_iter().map(|c| (c, groups.remove(&c).unwrap())).collect()
}

/// Greedy nearest-neighbour from `cursor`: repeatedly pick the remaining
/// atom whose closer endpoint is nearest, reversing open atoms whose
/// `end` is the closer one.
fn nearest_neighbour(mut remaining: Vec<OrderAtom>, cursor: &mut Point) -> Vec<OrderAtom> {
    let mut order = Vec::with_capacity(remaining.len());
    while !remaining.is_empty() {
        let mut best_idx = 0;
        let mut best_dist = f64::INFINITY;
        let mut best_reverse = false;
        for (i, atom) in remaining.iter().enumerate() {
            let d_start = (*cursor - atom.start).length();
            let d_end = (*cursor - atom.end).length();
            if d_start <= d_end {
                if d_start < best_dist {
                    best_dist = d_start;
                    best_idx = i;
                    best_reverse = false;
                }
            } else if d_end < best_dist {
                best_dist = d_end;
                best_idx = i;
                best_reverse = !atom.is_closed;
            }
        }
        let mut atom = remaining.remove(best_idx);
        if best_reverse {
            atom.reverse();
        }
        *cursor = atom.end;
        order.push(atom);
    }
    order
}

/// 2-opt local search over a nearest-neighbour tour: for each pair `(i,
/// j)` with `j >= i+2`, reverses the slice `[i+1..=j]` when doing so
/// shortens the tour by more than 0.01, for up to `max_iterations` passes.
fn two_opt(order: &mut Vec<OrderAtom>, max_iterations: u32) {
    let n = order.len();
    if n < 3 {
        return;
    }
    for _ in 0..max_iterations {
        let mut improved = false;
        for i in 0..n - 1 {
            for j in (i + 2)..n {
                let old_d1 = (order[i].end - order[i + 1].start).length();
                let old_d2 = if j < n - 1 { (order[j].end - order[j + 1].start).length() } else { 0.0 };
                let new_d1 = (order[i].end - order[j].start).length();
                let new_d2 = if j < n - 1 { (order[i + 1].end - order[j + 1].start).length() } else { 0.0 };
                if (new_d1 + new_d2) < (old_d1 + old_d2) - 0.01 {
                    order[i + 1..=j].reverse();
                    improved = true;
                }
            }
        }
        if !improved {
            break;
        }
    }
}

/// Buckets atoms into strips of width `strip_size` along the configured
/// axis, orders atoms within each strip by nearest-neighbour, and
/// alternates traversal direction every other strip (serpentine).
fn banded_serpentine(atoms: Vec<OrderAtom>, config: &Config, cursor: &mut Point) -> Vec<OrderAtom> {
    let strip_size = config.strip_size_units();
    let mut strips: HashMap<i64, Vec<OrderAtom>> = HashMap::new();
    for atom in atoms {
        let centre = point((atom.start.x + atom.end.x) / 2.0, (atom.start.y + atom.end.y) / 2.0);
        let coordinate = match config.strip_direction {
            StripDirection::Columns => centre.x,
            StripDirection::Rows => centre.y,
        };
        let strip_id = (coordinate / strip_size).floor() as i64;
        strips.entry(strip_id).or_default().push(atom);
    }

    let mut strip_ids: Vec<i64> = strips.keys().copied().collect();
    strip_ids.sort_unstable();

    let mut result = Vec::new();
    for (band_num, strip_id) in strip_ids.into_iter().enumerate() {
        let strip_atoms = strips.remove(&strip_id).unwrap();
        let mut strip_order = nearest_neighbour(strip_atoms, cursor);
        if band_num % 2 == 1 {
            strip_order.reverse();
            // Re-derive the new cursor position and re-run the open-atom
            // reversal the serpentine flip invalidated.
            *cursor = strip_order.last().map_or(*cursor, |a| a.end);
        }
        result.extend(strip_order);
    }
    result
}

/// Final pass: for each open atom, compares its current orientation
/// against the reversed one using its neighbours in cut order, and
/// reverses it when that lowers total idle travel by more than 0.01.
fn reverse_pass(order: &mut [OrderAtom], start_point: Point) {
    for i in 0..order.len() {
        if order[i].is_closed {
            continue;
        }
        let prev_end = if i == 0 { start_point } else { order[i - 1].end };
        let next_start = order.get(i + 1).map(|a| a.start);

        let mut cost_normal = (prev_end - order[i].start).length();
        let mut cost_reversed = (prev_end - order[i].end).length();
        if let Some(next_start) = next_start {
            cost_normal += (order[i].end - next_start).length();
            cost_reversed += (order[i].start - next_start).length();
        }
        if cost_reversed < cost_normal - 0.01 {
            order[i].reverse();
        }
    }
}

/// Runs the ordering engine (spec §4.5) over every shape in `drawing`:
/// buckets atoms by colour in palette order, orders each bucket with the
/// configured strategy, reverses open atoms where that shortens idle
/// travel, then renames the atoms `chemin1..cheminN` in cut order.
pub fn run(drawing: &mut Drawing, config: &Config, palette: &Palette, cancel: &CancellationToken) -> Stats {
    let atoms: Vec<OrderAtom> = drawing.shapes().iter().cloned().filter_map(OrderAtom::build).collect();
    let mut stats = Stats { num_paths: atoms.len(), total_cut_length: atoms.iter().map(|a| a.length).sum(), ..Stats::default() };

    if atoms.is_empty() {
        return stats;
    }
    stats.initial_idle = idle_distance(&atoms);

    if !config.optimization_enabled {
        stats.final_idle = stats.initial_idle;
        stats.finalize(config.laser_speed_mm_s, config.idle_speed_mm_s, 1.0 / crate::config::MM_TO_UNITS);
        return stats;
    }

    let buckets = bucket_by_colour(atoms, palette);
    let mut cursor = point(0.0, 0.0);
    let mut full_order: Vec<OrderAtom> = Vec::new();

    for (colour, bucket) in buckets {
        if cancel.is_cancelled() {
            break;
        }
        log::debug!("ordering: colour {:?}, {} atoms", colour, bucket.len());
        let mut strip_order = match config.optimization_strategy {
            OptimizationStrategy::Nearest => {
                let order = nearest_neighbour(bucket, &mut cursor);
                cursor = order.last().map_or(cursor, |a| a.end);
                order
            }
            OptimizationStrategy::TwoOpt => {
                let mut order = nearest_neighbour(bucket, &mut cursor);
                two_opt(&mut order, config.max_iterations);
                cursor = order.last().map_or(cursor, |a| a.end);
                order
            }
            OptimizationStrategy::Zoning => banded_serpentine(bucket, config, &mut cursor),
        };
        reverse_pass(&mut strip_order, full_order.last().map_or(point(0.0, 0.0), |a: &OrderAtom| a.end));
        cursor = strip_order.last().map_or(cursor, |a| a.end);
        full_order.extend(strip_order);
    }

    stats.final_idle = idle_distance(&full_order);
    stats.finalize(config.laser_speed_mm_s, config.idle_speed_mm_s, 1.0 / crate::config::MM_TO_UNITS);

    let renamed: Vec<Shape> = full_order
        .into_iter()
        .enumerate()
        .map(|(i, atom)| {
            let mut shape = atom.shape;
            shape.id = format!("chemin{}", i + 1);
            shape
        })
        .collect();
    *drawing.shapes_mut() = renamed;

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use laser_path::Path;

    fn line_shape(id: &str, from: Point, to: Point, colour: Colour, layer: laser_path::LayerId) -> Shape {
        let mut b = Path::builder();
        b.move_to(from);
        b.line_to(to);
        Shape::new(id, b.build(), colour, layer)
    }

    fn square_at(d: &mut Drawing, id_prefix: &str, x: f64, y: f64) {
        let root = d.root();
        d.push_shape(line_shape(&format!("{id_prefix}a"), point(x, y), point(x + 1.0, y), Colour::BLACK, root));
        d.push_shape(line_shape(&format!("{id_prefix}b"), point(x + 1.0, y), point(x + 1.0, y + 1.0), Colour::BLACK, root));
    }

    #[test]
    fn empty_drawing_reports_zero_paths() {
        let mut d = Drawing::new();
        let stats = run(&mut d, &Config::default(), &Palette::default(), &CancellationToken::new());
        assert_eq!(stats.num_paths, 0);
    }

    #[test]
    fn nearest_neighbour_reverses_open_atoms_to_reduce_idle() {
        let mut d = Drawing::new();
        let root = d.root();
        // Atom points "backwards": its `end` is closest to the cursor's start.
        d.push_shape(line_shape("a", point(10.0, 0.0), point(0.0, 0.0), Colour::BLACK, root));
        let config = Config { optimization_strategy: OptimizationStrategy::Nearest, ..Config::default() };
        let palette = Palette::from_hex(&["#000000".to_string()]);
        run(&mut d, &config, &palette, &CancellationToken::new());
        assert_eq!(d.shapes()[0].path.endpoints(), Some((point(0.0, 0.0), point(10.0, 0.0))));
    }

    #[test]
    fn atoms_are_renamed_in_cut_order() {
        let mut d = Drawing::new();
        square_at(&mut d, "x", 0.0, 0.0);
        let config = Config { optimization_strategy: OptimizationStrategy::Nearest, ..Config::default() };
        run(&mut d, &config, &Palette::default(), &CancellationToken::new());
        let ids: Vec<&str> = d.shapes().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["chemin1", "chemin2"]);
    }

    #[test]
    fn ordering_groups_atoms_by_palette_colour_order() {
        let mut d = Drawing::new();
        let root = d.root();
        d.push_shape(line_shape("r", point(0.0, 0.0), point(1.0, 0.0), Colour::Rgb(0xff, 0, 0), root));
        d.push_shape(line_shape("b", point(0.0, 0.0), point(1.0, 0.0), Colour::Rgb(0, 0, 0xff), root));
        let palette = Palette::from_hex(&["#0000ff".to_string(), "#ff0000".to_string()]);
        let config = Config { optimization_strategy: OptimizationStrategy::Nearest, ..Config::default() };
        run(&mut d, &config, &palette, &CancellationToken::new());
        assert_eq!(d.shapes()[0].stroke, Colour::Rgb(0, 0, 0xff));
        assert_eq!(d.shapes()[1].stroke, Colour::Rgb(0xff, 0, 0));
    }

    #[test]
    fn disabled_optimization_leaves_draw_order_untouched() {
        let mut d = Drawing::new();
        let root = d.root();
        d.push_shape(line_shape("a", point(10.0, 0.0), point(5.0, 0.0), Colour::BLACK, root));
        d.push_shape(line_shape("b", point(0.0, 0.0), point(1.0, 0.0), Colour::BLACK, root));
        let config = Config { optimization_enabled: false, ..Config::default() };
        run(&mut d, &config, &Palette::default(), &CancellationToken::new());
        assert_eq!(d.shapes()[0].path.endpoints(), Some((point(10.0, 0.0), point(5.0, 0.0))));
    }
}
