use laser_geom::{symmetric_hausdorff, Box2D, Point, Segment};
use laser_path::{AtomGeometry, Drawing};

use crate::atom::{AtomRecord, ShapeRef};
use crate::config::Config;

/// A maximal run of curve atoms of one colour and type whose endpoints
/// connect within `tolerance`, used to compare whole logical curves rather
/// than isolated atoms.
struct Chain {
    atom_indices: Vec<ShapeRef>,
    geoms: Vec<AtomGeometry>,
}

impl Chain {
    fn start(&self) -> Point {
        self.geoms.first().map(Segment::from).expect("a chain always has at least one atom")
    }

    fn end(&self) -> Point {
        self.geoms.last().map(Segment::to).expect("a chain always has at least one atom")
    }

    fn length(&self) -> f64 {
        laser_algorithms::chain_length(&self.geoms)
    }

    fn samples(&self) -> Vec<Point> {
        laser_algorithms::concatenate_chain_samples(&self.geoms)
    }

    fn bbox(&self, margin: f64) -> Box2D {
        Box2D::from_points(self.samples()).inflate(margin, margin)
    }
}

fn build_chains(indices: &[ShapeRef], records: &[AtomRecord], drawing: &Drawing, tolerance: f64) -> Vec<Chain> {
    let geoms: std::collections::HashMap<ShapeRef, AtomGeometry> = indices
        .iter()
        .filter_map(|&i| drawing.shapes()[records[i].shape_ref].path.atom_geometry().map(|g| (i, g)))
        .collect();

    let close = |a: Point, b: Point| (a - b).length() <= tolerance;

    let mut unused: std::collections::HashSet<ShapeRef> = geoms.keys().copied().collect();
    let mut chains = Vec::new();

    while let Some(&seed) = unused.iter().next() {
        unused.remove(&seed);
        let mut atom_indices = vec![seed];
        let mut chain_geoms = vec![geoms[&seed]];

        loop {
            let end = chain_geoms.last().unwrap().to();
            let Some((next, flip)) = unused.iter().find_map(|&i| {
                let g = geoms[&i];
                if close(g.from(), end) {
                    Some((i, false))
                } else if close(g.to(), end) {
                    Some((i, true))
                } else {
                    None
                }
            }) else {
                break;
            };
            unused.remove(&next);
            atom_indices.push(next);
            chain_geoms.push(if flip { geoms[&next].flip() } else { geoms[&next] });
        }

        loop {
            let start = chain_geoms.first().unwrap().from();
            let Some((prev, flip)) = unused.iter().find_map(|&i| {
                let g = geoms[&i];
                if close(g.to(), start) {
                    Some((i, false))
                } else if close(g.from(), start) {
                    Some((i, true))
                } else {
                    None
                }
            }) else {
                break;
            };
            unused.remove(&prev);
            atom_indices.insert(0, prev);
            chain_geoms.insert(0, if flip { geoms[&prev].flip() } else { geoms[&prev] });
        }

        debug_assert!(
            laser_algorithms::is_connected(&chain_geoms, tolerance),
            "chained atoms must be join-tolerance connected"
        );
        chains.push(Chain { atom_indices, geoms: chain_geoms });
    }
    chains
}

fn endpoints_connect(a: &Chain, b: &Chain, tolerance: f64) -> bool {
    let close = |p: Point, q: Point| (p - q).length() <= tolerance;
    (close(a.start(), b.start()) && close(a.end(), b.end()))
        || (close(a.start(), b.end()) && close(a.end(), b.start()))
}

fn coverage_ratio(a: &[Point], b: &[Point], threshold: f64) -> f64 {
    if a.is_empty() {
        return 0.0;
    }
    let covered = a
        .iter()
        .filter(|p| b.iter().map(|q| (**p - *q).length()).fold(f64::INFINITY, f64::min) <= threshold)
        .count();
    covered as f64 / a.len() as f64
}

/// Finds duplicate and partially-contained curve atoms among `indices`
/// (all sharing one colour and path type) and returns the original atom
/// indices (into `records`/`drawing.shapes()`) that should be removed.
pub fn duplicates(indices: &[ShapeRef], records: &[AtomRecord], drawing: &Drawing, config: &Config) -> Vec<ShapeRef> {
    if indices.len() < 2 {
        return Vec::new();
    }
    let tolerance = config.tolerance;
    let bbox_margin = config.bbox_margin();
    let chains = build_chains(indices, records, drawing, tolerance);
    let mut removed_chain = vec![false; chains.len()];

    // Chain similarity: same logical curve retraced, keep the finer one.
    for i in 0..chains.len() {
        if removed_chain[i] {
            continue;
        }
        for j in (i + 1)..chains.len() {
            if removed_chain[j] {
                continue;
            }
            let (a, b) = (&chains[i], &chains[j]);
            if !a.bbox(bbox_margin).intersects(&b.bbox(bbox_margin)) {
                continue;
            }
            if !endpoints_connect(a, b, tolerance) {
                continue;
            }
            let distance = symmetric_hausdorff(&a.samples(), &b.samples());
            let threshold = (5.0 * tolerance).max(0.015 * a.length().max(b.length()));
            if distance <= threshold {
                if a.atom_indices.len() >= b.atom_indices.len() {
                    removed_chain[j] = true;
                } else {
                    removed_chain[i] = true;
                    break;
                }
            }
        }
    }

    // Partial containment: a short chain lying entirely on a longer one.
    let mut removed_by_containment = vec![false; chains.len()];
    for i in 0..chains.len() {
        if removed_chain[i] {
            continue;
        }
        for j in 0..chains.len() {
            if i == j || removed_chain[j] || removed_by_containment[i] {
                continue;
            }
            let (a, b) = (&chains[i], &chains[j]);
            if a.length() > 1.1 * b.length() {
                continue;
            }
            let a_samples = a.samples();
            let b_samples = b.samples();
            let distance = laser_geom::directed_hausdorff(&a_samples, &b_samples);
            let threshold = (5.0 * tolerance).max(0.04 * a.length());
            if distance <= threshold && coverage_ratio(&a_samples, &b_samples, threshold) >= config.partial_overlap_ratio {
                removed_by_containment[i] = true;
            }
        }
    }

    let mut remove = std::collections::HashSet::new();
    for (i, chain) in chains.iter().enumerate() {
        if removed_chain[i] || removed_by_containment[i] {
            remove.extend(chain.atom_indices.iter().copied());
        }
    }

    // Residual pass: per-atom duplicates not caught by the chain-level
    // comparisons above (e.g. isolated atoms that never formed a chain).
    let survivors: Vec<ShapeRef> = indices.iter().copied().filter(|i| !remove.contains(i)).collect();
    for a in 0..survivors.len() {
        if remove.contains(&survivors[a]) {
            continue;
        }
        for b in (a + 1)..survivors.len() {
            if remove.contains(&survivors[b]) {
                continue;
            }
            let Some(ga) = drawing.shapes()[records[survivors[a]].shape_ref].path.atom_geometry() else { continue };
            let Some(gb) = drawing.shapes()[records[survivors[b]].shape_ref].path.atom_geometry() else { continue };
            let sa = laser_algorithms::sample_for_comparison(&ga);
            let sb = laser_algorithms::sample_for_comparison(&gb);
            if symmetric_hausdorff(&sa, &sb) <= tolerance {
                remove.insert(survivors[b]);
            }
        }
    }

    remove.into_iter().collect()
}
