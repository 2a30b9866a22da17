//! The four coupled subsystems of the laser-cut path optimizer — the path
//! normaliser (flattener + atomiser), the overlap engine, the topological
//! merger, and the ordering engine — plus the configuration, error and
//! cancellation types that tie them into one [`optimize`] entry point.
//!
//! Every phase takes the live [`Drawing`](laser_path::Drawing) and mutates
//! it in place; nothing is carried between phases except the drawing
//! itself (and, across phases 1 and 8, the detached grey-shape snapshot).

pub mod atom;
pub mod atomise;
pub mod cancel;
pub mod colour_filter;
pub mod config;
pub mod error;
pub mod flatten;
pub mod grey;
pub mod merger;
pub mod ordering;
pub mod overlap;
pub mod palette;
pub mod stats;

pub use cancel::CancellationToken;
pub use config::Config;
pub use error::{Error, Result};
pub use palette::Palette;
pub use stats::Stats;

use laser_path::Drawing;

/// Runs the full 8-phase pipeline (spec §2) over `drawing`, in place.
///
/// Phases, in order: grey snapshot, colour filter, flatten, atomise,
/// overlap removal, topological merge, ordering, grey restore. Returns
/// the ordering engine's [`Stats`] (zeroed if `drawing` has no cuttable
/// shapes at all, per spec §8 B1).
///
/// Cancellation is polled between phases; on cancellation this returns
/// `Err(Error::Cancelled)` having already mutated `drawing` — per spec
/// §5, restoring the caller's on-disk original is the caller's
/// responsibility, since the core never touches disk itself.
pub fn optimize(drawing: &mut Drawing, config: &Config, cancel: &CancellationToken) -> Result<Stats> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let palette = Palette::from_hex(&config.palette);

    let grey_shapes = grey::snapshot(drawing, config);
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    colour_filter::run(drawing, config, &palette);
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    flatten::ungroup_and_bake(drawing);
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    atomise::atomise_drawing(drawing);
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    overlap::run(drawing, config, cancel);
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    merger::run(drawing, cancel);
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let stats = ordering::run(drawing, config, &palette, cancel);
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    grey::restore(drawing, grey_shapes, &palette);

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use laser_path::{Colour, Path, Shape};

    #[test]
    fn empty_drawing_yields_empty_output_and_zero_stats() {
        let mut d = Drawing::new();
        let stats = optimize(&mut d, &Config::default(), &CancellationToken::new()).unwrap();
        assert!(d.is_empty());
        assert_eq!(stats.num_paths, 0);
    }

    #[test]
    fn grey_only_drawing_passes_through_untouched() {
        let mut d = Drawing::new();
        let root = d.root();
        let mut b = Path::builder();
        b.move_to(laser_geom::point(0.0, 0.0));
        b.line_to(laser_geom::point(10.0, 0.0));
        d.push_shape(Shape::new("engrave1", b.build(), Colour::Rgb(128, 128, 128), root));

        optimize(&mut d, &Config::default(), &CancellationToken::new()).unwrap();

        assert_eq!(d.shapes().len(), 1);
        assert_eq!(d.shapes()[0].path.endpoints(), Some((laser_geom::point(0.0, 0.0), laser_geom::point(10.0, 0.0))));
    }

    #[test]
    fn cancelling_before_the_first_phase_mutates_nothing() {
        let mut d = Drawing::new();
        let root = d.root();
        let mut b = Path::builder();
        b.move_to(laser_geom::point(0.0, 0.0));
        b.line_to(laser_geom::point(10.0, 0.0));
        d.push_shape(Shape::new("a", b.build(), Colour::BLACK, root));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = optimize(&mut d, &Config::default(), &cancel);

        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
