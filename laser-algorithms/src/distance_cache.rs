use std::cell::RefCell;
use std::collections::HashMap;

use laser_geom::{utils::round_for_hash, LineSegment, Point};

type Key = ((i64, i64), (i64, i64), (i64, i64));

/// Memoises `point`-to-segment distance queries for the lifetime of one
/// optimization run.
///
/// The overlap engine and the ordering engine both repeatedly measure the
/// distance from a handful of endpoints to a handful of candidate segments;
/// caching on rounded coordinates avoids recomputing the same projection
/// when the same pair is queried from both directions or from an adjacent
/// pass. The cache is owned by a single run and discarded with it — there
/// is no global, persistent cache.
#[derive(Default)]
pub struct DistanceCache {
    entries: RefCell<HashMap<Key, f64>>,
}

impl DistanceCache {
    pub fn new() -> Self {
        DistanceCache::default()
    }

    /// Distance from `point` to `segment`, memoised on rounded coordinates.
    pub fn distance(&self, point: Point, segment: &LineSegment) -> f64 {
        let key = (round_for_hash(point), round_for_hash(segment.from), round_for_hash(segment.to));
        if let Some(&d) = self.entries.borrow().get(&key) {
            return d;
        }
        let d = segment.distance_to_point(point);
        self.entries.borrow_mut().insert(key, d);
        d
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

#[test]
fn repeated_queries_hit_the_cache() {
    let cache = DistanceCache::new();
    let seg = LineSegment::new(laser_geom::point(0.0, 0.0), laser_geom::point(10.0, 0.0));
    let p = laser_geom::point(5.0, 3.0);
    let d1 = cache.distance(p, &seg);
    assert_eq!(cache.len(), 1);
    let d2 = cache.distance(p, &seg);
    assert_eq!(cache.len(), 1);
    assert_eq!(d1, d2);
}

#[test]
fn distinct_queries_are_distinct_entries() {
    let cache = DistanceCache::new();
    let seg = LineSegment::new(laser_geom::point(0.0, 0.0), laser_geom::point(10.0, 0.0));
    cache.distance(laser_geom::point(5.0, 3.0), &seg);
    cache.distance(laser_geom::point(5.0, 4.0), &seg);
    assert_eq!(cache.len(), 2);
}
