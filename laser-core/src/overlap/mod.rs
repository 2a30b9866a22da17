//! Per-colour duplicate and overlap removal: straight segments merge into
//! their minimal covering segment, curves are deduplicated by comparing
//! whole logical chains with directed Hausdorff distance.

pub mod curve;
pub mod straight;

use std::collections::HashMap;

use laser_algorithms::DistanceCache;
use laser_geom::LineSegment;
use laser_path::{AtomGeometry, Colour, Drawing, PathType};

use crate::atom::{AtomRecord, ShapeRef};
use crate::cancel::CancellationToken;
use crate::config::Config;

/// Groups atom records by colour, then (for non-line atoms) by path type,
/// the bucketing every sub-pass of the overlap engine starts from.
pub fn group_by_colour(records: &[AtomRecord]) -> HashMap<Colour, Vec<ShapeRef>> {
    let mut groups: HashMap<Colour, Vec<ShapeRef>> = HashMap::new();
    for (i, record) in records.iter().enumerate() {
        groups.entry(record.colour).or_default().push(i);
    }
    groups
}

pub fn group_by_colour_and_type(records: &[AtomRecord]) -> HashMap<(Colour, PathType), Vec<ShapeRef>> {
    let mut groups: HashMap<(Colour, PathType), Vec<ShapeRef>> = HashMap::new();
    for (i, record) in records.iter().enumerate() {
        groups.entry((record.colour, record.path_type)).or_default().push(i);
    }
    groups
}

/// Runs the overlap engine over every shape in `drawing`: builds an
/// [`AtomRecord`] for each shape, merges/removes duplicates per colour, and
/// writes the surviving (and newly synthesized) shapes back.
pub fn run(drawing: &mut Drawing, config: &Config, cancel: &CancellationToken) {
    let records: Vec<AtomRecord> = drawing
        .shapes()
        .iter()
        .enumerate()
        .filter_map(|(i, shape)| shape.path.atom_geometry().map(|geom| AtomRecord::build(i, &geom, shape.stroke)))
        .collect();
    log::debug!("overlap engine: {} atoms in", records.len());

    let mut removed = vec![false; drawing.shapes().len()];
    let mut synthetic: Vec<laser_path::Shape> = Vec::new();

    // One cache per run (spec §5's shared distance cache), shared across
    // every colour's straight-segment pass below.
    let distance_cache = DistanceCache::new();

    for (colour, indices) in group_by_colour(&records) {
        if cancel.is_cancelled() {
            return;
        }
        let line_indices: Vec<ShapeRef> =
            indices.iter().copied().filter(|&i| records[i].path_type == PathType::Line).collect();
        for merge in straight::merge(&line_indices, &records, config, &distance_cache) {
            for &i in &merge.atom_indices {
                removed[i] = true;
            }
            let path = laser_path::Path::from_atom_geometry(AtomGeometry::Line(LineSegment::new(merge.new_start, merge.new_end)));
            let template = &drawing.shapes()[merge.atom_indices[0]];
            synthetic.push(laser_path::Shape::new(template.id.clone(), path, colour, template.parent_layer));
            log::debug!(
                "straight merge: {} atoms -> 1, overlap_ratio={:.3}",
                merge.atom_indices.len(),
                merge.overlap_ratio
            );
        }

        for path_type in [PathType::Arc, PathType::Cubic, PathType::Quadratic] {
            let curve_indices: Vec<ShapeRef> =
                indices.iter().copied().filter(|&i| records[i].path_type == path_type).collect();
            for i in curve::duplicates(&curve_indices, &records, drawing, config) {
                removed[i] = true;
            }
        }
    }

    let mut kept: Vec<laser_path::Shape> =
        drawing.shapes().iter().enumerate().filter(|(i, _)| !removed[*i]).map(|(_, s)| s.clone()).collect();
    kept.extend(synthetic);
    *drawing.shapes_mut() = kept;
    log::debug!("overlap engine: {} atoms out", drawing.shapes().len());
}
