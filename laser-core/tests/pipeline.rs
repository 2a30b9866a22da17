//! End-to-end scenarios for the full pipeline, exercising `optimize()`
//! the way a caller handing it a whole document would.

use laser_core::{optimize, CancellationToken, Config};
use laser_path::{point, Colour, Drawing, Path, Shape};

fn line(drawing: &mut Drawing, id: &str, stroke: Colour, from: (f64, f64), to: (f64, f64)) {
    let root = drawing.root();
    let mut b = Path::builder();
    b.move_to(point(from.0, from.1));
    b.line_to(point(to.0, to.1));
    drawing.push_shape(Shape::new(id, b.build(), stroke, root));
}

fn rect(drawing: &mut Drawing, id: &str, stroke: Colour, origin: (f64, f64), size: (f64, f64)) {
    let root = drawing.root();
    let mut b = Path::builder();
    b.move_to(point(origin.0, origin.1));
    b.line_to(point(origin.0 + size.0, origin.1));
    b.line_to(point(origin.0 + size.0, origin.1 + size.1));
    b.line_to(point(origin.0, origin.1 + size.1));
    b.close();
    drawing.push_shape(Shape::new(id, b.build(), stroke, root));
}

/// Scenario: a single rectangle. Nothing to merge, nothing to drop — it
/// comes out as four atoms in cut order with the idle distance between
/// consecutive atoms near zero.
#[test]
fn simple_rectangle_survives_as_four_touching_atoms() {
    let mut drawing = Drawing::new();
    rect(&mut drawing, "rect", Colour::BLACK, (0.0, 0.0), (10.0, 10.0));

    let stats = optimize(&mut drawing, &Config::default(), &CancellationToken::new()).unwrap();

    assert_eq!(stats.num_paths, 4);
    assert!(stats.final_idle <= stats.initial_idle);
}

/// Scenario: the same line drawn twice on top of itself. The overlap
/// engine collapses the duplicate before ordering ever sees it.
#[test]
fn duplicate_line_is_removed() {
    let mut drawing = Drawing::new();
    line(&mut drawing, "a", Colour::BLACK, (0.0, 0.0), (10.0, 0.0));
    line(&mut drawing, "b", Colour::BLACK, (0.0, 0.0), (10.0, 0.0));

    let stats = optimize(&mut drawing, &Config::default(), &CancellationToken::new()).unwrap();

    assert_eq!(stats.num_paths, 1);
}

/// Scenario: two collinear, overlapping segments on the same line should
/// be replaced by their covering union, not left as two separate cuts.
#[test]
fn collinear_overlap_is_merged_into_one_covering_segment() {
    let mut drawing = Drawing::new();
    line(&mut drawing, "a", Colour::BLACK, (0.0, 0.0), (6.0, 0.0));
    line(&mut drawing, "b", Colour::BLACK, (4.0, 0.0), (10.0, 0.0));

    optimize(&mut drawing, &Config::default(), &CancellationToken::new()).unwrap();

    assert_eq!(drawing.shapes().len(), 1);
    let endpoints = drawing.shapes()[0].path.endpoints().unwrap();
    let xs = [endpoints.0.x, endpoints.1.x];
    assert!(xs.contains(&0.0) && xs.contains(&10.0));
}

/// Scenario: three atoms meeting at a Y-junction. The shared point is a
/// critical point and must never be fused across — the junction survives
/// as three (or more) separate cuts, never two.
#[test]
fn y_junction_keeps_all_three_branches_separate() {
    let mut drawing = Drawing::new();
    line(&mut drawing, "a", Colour::BLACK, (0.0, 0.0), (10.0, 0.0));
    line(&mut drawing, "b", Colour::BLACK, (10.0, 0.0), (20.0, 5.0));
    line(&mut drawing, "c", Colour::BLACK, (10.0, 0.0), (20.0, -5.0));

    let stats = optimize(&mut drawing, &Config::default(), &CancellationToken::new()).unwrap();

    assert_eq!(stats.num_paths, 3);
}

/// Scenario: a colour outside the palette is dropped entirely, while the
/// palette colour survives the full pipeline.
#[test]
fn unmanaged_colour_is_dropped_before_ordering() {
    let mut drawing = Drawing::new();
    line(&mut drawing, "cut", Colour::BLACK, (0.0, 0.0), (10.0, 0.0));
    line(&mut drawing, "stray", Colour::Rgb(0, 200, 0), (0.0, 0.0), (10.0, 0.0));

    let config = Config { palette: vec!["#000000".to_string()], ..Config::default() };
    optimize(&mut drawing, &config, &CancellationToken::new()).unwrap();

    assert_eq!(drawing.shapes().len(), 1);
    assert_eq!(drawing.shapes()[0].stroke, Colour::BLACK);
}

/// Scenario: ordering groups cuts by palette colour and renames them in
/// cut order, regardless of the order shapes were declared in.
#[test]
fn shapes_are_grouped_by_colour_and_renamed_in_cut_order() {
    let mut drawing = Drawing::new();
    line(&mut drawing, "red1", Colour::Rgb(0xff, 0, 0), (0.0, 0.0), (1.0, 0.0));
    line(&mut drawing, "black1", Colour::BLACK, (5.0, 5.0), (6.0, 5.0));
    line(&mut drawing, "red2", Colour::Rgb(0xff, 0, 0), (2.0, 0.0), (3.0, 0.0));

    let config = Config { palette: vec!["#ff0000".to_string(), "#000000".to_string()], ..Config::default() };
    optimize(&mut drawing, &config, &CancellationToken::new()).unwrap();

    let colours: Vec<Colour> = drawing.shapes().iter().map(|s| s.stroke).collect();
    let last_red = colours.iter().rposition(|&c| c == Colour::Rgb(0xff, 0, 0)).unwrap();
    let first_black = colours.iter().position(|&c| c == Colour::BLACK).unwrap();
    assert!(last_red < first_black);
    assert_eq!(drawing.shapes()[0].id, "chemin1");
}

/// B1: an empty drawing optimizes to an empty drawing with zeroed stats,
/// not an error.
#[test]
fn empty_drawing_is_not_an_error() {
    let mut drawing = Drawing::new();
    let stats = optimize(&mut drawing, &Config::default(), &CancellationToken::new()).unwrap();
    assert!(drawing.is_empty());
    assert_eq!(stats.num_paths, 0);
    assert_eq!(stats.total_cut_length, 0.0);
}

/// B2: a drawing made entirely of grey shapes has nothing for the cutting
/// pipeline to do, but the shapes themselves are preserved and renamed.
#[test]
fn all_grey_drawing_preserves_every_shape() {
    let mut drawing = Drawing::new();
    line(&mut drawing, "g1", Colour::Rgb(100, 100, 100), (0.0, 0.0), (1.0, 0.0));
    line(&mut drawing, "g2", Colour::Rgb(100, 100, 100), (0.0, 1.0), (1.0, 1.0));

    let stats = optimize(&mut drawing, &Config::default(), &CancellationToken::new()).unwrap();

    assert_eq!(drawing.shapes().len(), 2);
    assert_eq!(stats.num_paths, 0);
}

/// B3: disabling optimization skips ordering and reversal but every
/// earlier phase (grey split, colour filter, flatten, atomise, overlap,
/// merge) still runs.
#[test]
fn disabled_optimization_still_runs_earlier_phases() {
    let mut drawing = Drawing::new();
    line(&mut drawing, "a", Colour::BLACK, (0.0, 0.0), (10.0, 0.0));
    line(&mut drawing, "b", Colour::BLACK, (0.0, 0.0), (10.0, 0.0));

    let config = Config { optimization_enabled: false, ..Config::default() };
    optimize(&mut drawing, &config, &CancellationToken::new()).unwrap();

    assert_eq!(drawing.shapes().len(), 1);
}

/// Cancellation mid-pipeline surfaces as `Error::Cancelled`; the core
/// does not try to undo any mutation already applied to `drawing` — per
/// the documented contract, that's the caller's job.
#[test]
fn cancellation_is_reported_as_an_error() {
    let mut drawing = Drawing::new();
    rect(&mut drawing, "rect", Colour::BLACK, (0.0, 0.0), (10.0, 10.0));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = optimize(&mut drawing, &Config::default(), &cancel);

    assert!(result.is_err());
}
