use laser_algorithms::DistanceCache;
use laser_geom::{LineSegment, Point, Segment, Vector};

use crate::atom::{AtomRecord, ShapeRef};
use crate::config::Config;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum Bucket {
    Horizontal,
    Vertical,
    Diagonal,
}

fn bucket_of(dir: Vector) -> Bucket {
    if dir.y.abs() < 0.01 {
        Bucket::Horizontal
    } else if dir.x.abs() < 0.01 {
        Bucket::Vertical
    } else {
        Bucket::Diagonal
    }
}

/// A connected group of straight atoms collapsed into one covering segment.
#[derive(Clone, Debug)]
pub struct StraightMerge {
    pub atom_indices: Vec<ShapeRef>,
    pub new_start: Point,
    pub new_end: Point,
    /// How much shorter the merged segment is than the sum of the
    /// individual atoms it replaces — a diagnostic, not used by any
    /// downstream invariant.
    pub overlap_ratio: f64,
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        DisjointSet { parent: (0..n).collect() }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

fn to_line(record: &AtomRecord) -> LineSegment {
    LineSegment::new(record.start, record.end)
}

fn candidates_overlap(a: &LineSegment, b: &LineSegment, tolerance: f64, cache: &DistanceCache) -> bool {
    let Some(dir) = a.direction() else { return false };
    let Some(dir_b) = b.direction() else { return false };
    if dir.dot(dir_b).abs() <= 0.99 {
        return false;
    }

    let near_enough = [cache.distance(b.from, a), cache.distance(b.to, a), cache.distance(a.from, b), cache.distance(a.to, b)]
        .into_iter()
        .any(|d| d <= tolerance);
    if !near_enough {
        return false;
    }

    let project = |p: Point| (p - a.from).dot(dir);
    let (a0, a1) = (project(a.from), project(a.to));
    let (b0, b1) = (project(b.from), project(b.to));
    let (a_min, a_max) = (a0.min(a1), a0.max(a1));
    let (b_min, b_max) = (b0.min(b1), b0.max(b1));
    a_max >= b_min && b_max >= a_min
}

/// Merges overlapping/duplicate straight atoms among `indices` into their
/// minimal covering segments. `cache` memoises the point-to-segment
/// distance queries `candidates_overlap` makes across the whole run
/// (spec §5's shared distance cache).
pub fn merge(indices: &[ShapeRef], records: &[AtomRecord], config: &Config, cache: &DistanceCache) -> Vec<StraightMerge> {
    let mut buckets: std::collections::HashMap<Bucket, Vec<ShapeRef>> = std::collections::HashMap::new();
    for &i in indices {
        let Some(dir) = to_line(&records[i]).direction() else { continue };
        buckets.entry(bucket_of(dir)).or_default().push(i);
    }

    let mut merges = Vec::new();
    for bucket_indices in buckets.into_values() {
        if bucket_indices.len() < 2 {
            continue;
        }
        let mut dsu = DisjointSet::new(bucket_indices.len());
        for a in 0..bucket_indices.len() {
            for b in (a + 1)..bucket_indices.len() {
                let seg_a = to_line(&records[bucket_indices[a]]);
                let seg_b = to_line(&records[bucket_indices[b]]);
                if candidates_overlap(&seg_a, &seg_b, config.tolerance, cache) {
                    dsu.union(a, b);
                }
            }
        }

        let mut components: std::collections::HashMap<usize, Vec<usize>> = std::collections::HashMap::new();
        for local in 0..bucket_indices.len() {
            let root = dsu.find(local);
            components.entry(root).or_default().push(local);
        }

        for component in components.into_values() {
            if component.len() < 2 {
                continue;
            }
            let atom_indices: Vec<ShapeRef> = component.iter().map(|&local| bucket_indices[local]).collect();
            let reference = to_line(&records[atom_indices[0]]);
            let Some(dir) = reference.direction() else { continue };

            let mut min_t = f64::INFINITY;
            let mut max_t = f64::NEG_INFINITY;
            let mut min_point = reference.from;
            let mut max_point = reference.to;
            let mut total_length = 0.0;
            for &i in &atom_indices {
                let seg = to_line(&records[i]);
                total_length += seg.length();
                for p in [seg.from, seg.to] {
                    let t = (p - reference.from).dot(dir);
                    if t < min_t {
                        min_t = t;
                        min_point = p;
                    }
                    if t > max_t {
                        max_t = t;
                        max_point = p;
                    }
                }
            }

            let merged_length = (max_point - min_point).length();
            let overlap_ratio = if total_length > 0.0 { 1.0 - merged_length / total_length } else { 0.0 };
            merges.push(StraightMerge { atom_indices, new_start: min_point, new_end: max_point, overlap_ratio });
        }
    }
    merges
}

#[test]
fn two_coincident_lines_merge_into_one() {
    let records = vec![
        AtomRecord {
            shape_ref: 0,
            start: laser_geom::point(0.0, 0.0),
            end: laser_geom::point(10.0, 0.0),
            colour: laser_path::Colour::BLACK,
            path_type: laser_path::PathType::Line,
            is_closed: false,
            sampled_points: vec![],
            length_estimate: 10.0,
            bbox: laser_geom::Box2D::from_points([laser_geom::point(0.0, 0.0), laser_geom::point(10.0, 0.0)]),
        },
        AtomRecord {
            shape_ref: 1,
            start: laser_geom::point(0.0, 0.0),
            end: laser_geom::point(10.0, 0.0),
            colour: laser_path::Colour::BLACK,
            path_type: laser_path::PathType::Line,
            is_closed: false,
            sampled_points: vec![],
            length_estimate: 10.0,
            bbox: laser_geom::Box2D::from_points([laser_geom::point(0.0, 0.0), laser_geom::point(10.0, 0.0)]),
        },
    ];
    let cache = DistanceCache::new();
    let merges = merge(&[0, 1], &records, &Config::default(), &cache);
    assert_eq!(merges.len(), 1);
    assert_eq!(merges[0].atom_indices.len(), 2);
}

#[test]
fn collinear_overlap_produces_the_covering_segment() {
    let line = |start: (f64, f64), end: (f64, f64)| AtomRecord {
        shape_ref: 0,
        start: laser_geom::point(start.0, start.1),
        end: laser_geom::point(end.0, end.1),
        colour: laser_path::Colour::BLACK,
        path_type: laser_path::PathType::Line,
        is_closed: false,
        sampled_points: vec![],
        length_estimate: 0.0,
        bbox: laser_geom::Box2D::from_points([laser_geom::point(start.0, start.1), laser_geom::point(end.0, end.1)]),
    };
    let records = vec![line((0.0, 0.0), (6.0, 0.0)), line((4.0, 0.0), (10.0, 0.0))];
    let cache = DistanceCache::new();
    let merges = merge(&[0, 1], &records, &Config::default(), &cache);
    assert_eq!(merges.len(), 1);
    let m = &merges[0];
    let (lo, hi) = if m.new_start.x < m.new_end.x { (m.new_start, m.new_end) } else { (m.new_end, m.new_start) };
    assert!((lo.x - 0.0).abs() < 1e-9);
    assert!((hi.x - 10.0).abs() < 1e-9);
}
