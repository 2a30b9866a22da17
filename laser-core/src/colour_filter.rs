use laser_path::Drawing;

use crate::config::Config;
use crate::palette::Palette;

/// Deletes every shape whose stroke is not in the configured cutting
/// palette, when `Config::delete_unmanaged_colours` is set (spec §2
/// step 2).
pub fn run(drawing: &mut Drawing, config: &Config, palette: &Palette) {
    if !config.delete_unmanaged_colours || palette.is_empty() {
        return;
    }
    let before = drawing.shapes().len();
    drawing.shapes_mut().retain(|shape| palette.contains(shape.stroke));
    log::debug!("colour filter: {} -> {} shapes", before, drawing.shapes().len());
}

#[test]
fn shapes_outside_the_palette_are_dropped() {
    use laser_path::{Colour, Path, Shape};
    let mut d = Drawing::new();
    let root = d.root();
    let mut b = Path::builder();
    b.move_to(laser_geom::point(0.0, 0.0));
    b.line_to(laser_geom::point(1.0, 0.0));
    d.push_shape(Shape::new("a", b.build(), Colour::Rgb(0, 0xff, 0), root));
    let mut b2 = Path::builder();
    b2.move_to(laser_geom::point(0.0, 0.0));
    b2.line_to(laser_geom::point(1.0, 0.0));
    d.push_shape(Shape::new("b", b2.build(), Colour::BLACK, root));

    let palette = Palette::from_hex(&["#000000".to_string()]);
    run(&mut d, &Config::default(), &palette);

    assert_eq!(d.shapes().len(), 1);
    assert_eq!(d.shapes()[0].id, "b");
}

#[test]
fn disabled_option_keeps_everything() {
    use laser_path::{Colour, Path, Shape};
    let mut d = Drawing::new();
    let root = d.root();
    let mut b = Path::builder();
    b.move_to(laser_geom::point(0.0, 0.0));
    b.line_to(laser_geom::point(1.0, 0.0));
    d.push_shape(Shape::new("a", b.build(), Colour::Rgb(0, 0xff, 0), root));

    let config = Config { delete_unmanaged_colours: false, ..Config::default() };
    let palette = Palette::from_hex(&["#000000".to_string()]);
    run(&mut d, &config, &palette);

    assert_eq!(d.shapes().len(), 1);
}
