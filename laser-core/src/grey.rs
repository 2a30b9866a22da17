use laser_path::{Colour, Drawing, Shape};

use crate::config::Config;
use crate::palette::Palette;

/// Detaches every shape whose fill or stroke is grey into a side list,
/// leaving the rest of the drawing to go through the pipeline. Grey
/// shapes are engraving targets, not cut paths, and bypass every other
/// phase (spec §2 step 1, §4 lifecycle note).
pub fn snapshot(drawing: &mut Drawing, config: &Config) -> Vec<Shape> {
    let is_grey = |c: Colour| c.is_grey_within(config.grey_tolerance);
    let (grey, rest): (Vec<Shape>, Vec<Shape>) =
        drawing.shapes().iter().cloned().partition(|s| is_grey(s.stroke) || s.fill.is_some_and(is_grey));
    *drawing.shapes_mut() = rest;
    grey
}

/// Reinserts the grey snapshot at the front of the drawing, renaming each
/// shape `chemin_gris{n}` and making its stroke transparent if that
/// stroke happens to be a configured cutting colour (so the engraving
/// pass and the cutting pass don't fight over the same stroke).
pub fn restore(drawing: &mut Drawing, grey: Vec<Shape>, palette: &Palette) {
    let mut restored: Vec<Shape> = grey
        .into_iter()
        .enumerate()
        .map(|(i, mut shape)| {
            shape.id = format!("chemin_gris{}", i + 1);
            if palette.contains(shape.stroke) {
                shape.stroke = Colour::None;
            }
            shape
        })
        .collect();
    restored.extend(drawing.shapes().iter().cloned());
    *drawing.shapes_mut() = restored;
}

#[test]
fn grey_shapes_are_detached_and_the_rest_survive() {
    use laser_path::Path;
    let mut d = Drawing::new();
    let root = d.root();
    let mut b = Path::builder();
    b.move_to(laser_geom::point(0.0, 0.0));
    b.line_to(laser_geom::point(1.0, 0.0));
    d.push_shape(Shape::new("grey", b.build(), Colour::Rgb(128, 128, 128), root));
    let mut b2 = Path::builder();
    b2.move_to(laser_geom::point(0.0, 0.0));
    b2.line_to(laser_geom::point(1.0, 0.0));
    d.push_shape(Shape::new("black", b2.build(), Colour::BLACK, root));

    let grey = snapshot(&mut d, &Config::default());

    assert_eq!(grey.len(), 1);
    assert_eq!(d.shapes().len(), 1);
    assert_eq!(d.shapes()[0].id, "black");
}

#[test]
fn restored_grey_stroke_becomes_transparent_if_it_is_a_cutting_colour() {
    use laser_path::Path;
    let mut d = Drawing::new();
    let root = d.root();
    let mut b = Path::builder();
    b.move_to(laser_geom::point(0.0, 0.0));
    b.line_to(laser_geom::point(1.0, 0.0));
    let grey = vec![Shape::new("g", b.build(), Colour::BLACK, root)];
    let palette = Palette::from_hex(&["#000000".to_string()]);

    restore(&mut d, grey, &palette);

    assert_eq!(d.shapes()[0].id, "chemin_gris1");
    assert_eq!(d.shapes()[0].stroke, Colour::None);
}
