use laser_path::{Colour, Drawing, LayerId, PathCommand};
use xmlwriter::{Indent, Options, XmlWriter};

/// Serialises a [`Drawing`] to an SVG document string.
///
/// Layers round-trip as Inkscape layers (`inkscape:groupmode="layer"`,
/// `inkscape:label`); plain groups round-trip as bare `g` elements. Shapes
/// are written as `path` elements in drawing order — by the time a
/// drawing reaches this function that order is cut order, and the
/// element order in the file is what a laser controller reading the SVG
/// top-to-bottom would cut.
pub fn write_svg(drawing: &Drawing) -> String {
    let opts = Options { use_single_quote: false, indent: Indent::Spaces(2), attributes_indent: Indent::None };
    let mut w = XmlWriter::new(opts);

    w.start_element("svg");
    w.write_attribute("xmlns", "http://www.w3.org/2000/svg");
    w.write_attribute("xmlns:inkscape", "http://www.inkscape.org/namespaces/inkscape");
    w.write_attribute("version", "1.1");

    write_layer(&mut w, drawing, drawing.root());

    w.end_document()
}

fn write_layer(w: &mut XmlWriter, drawing: &Drawing, layer_id: LayerId) {
    for (id, shape) in drawing.shapes().iter().enumerate().filter(|(_, s)| s.parent_layer == layer_id) {
        write_shape(w, shape, id);
    }
    for child_id in drawing.child_layers(layer_id) {
        let child = drawing.layer(child_id);
        w.start_element("g");
        if child.is_layer {
            w.write_attribute("inkscape:groupmode", "layer");
            w.write_attribute("inkscape:label", &child.name);
        }
        w.write_attribute("id", &child.name);
        if child.transform != laser_geom::Transform::identity() {
            w.write_attribute("transform", &transform_attr(&child.transform));
        }
        write_layer(w, drawing, child_id);
        w.end_element();
    }
}

fn write_shape(w: &mut XmlWriter, shape: &laser_path::Shape, _id: usize) {
    w.start_element("path");
    w.write_attribute("id", &shape.id);
    w.write_attribute("d", &path_data(shape));
    w.write_attribute("style", &style_attr(shape));
    if !shape.has_identity_transform() {
        w.write_attribute("transform", &transform_attr(&shape.transform));
    }
    w.end_element();
}

fn path_data(shape: &laser_path::Shape) -> String {
    let mut d = String::new();
    for cmd in shape.path.commands() {
        match *cmd {
            PathCommand::Move(p) => d.push_str(&format!("M{},{} ", p.x, p.y)),
            PathCommand::Line(p) => d.push_str(&format!("L{},{} ", p.x, p.y)),
            PathCommand::Arc { rx, ry, x_rotation, large_arc, sweep, to } => d.push_str(&format!(
                "A{},{} {} {},{} {},{} ",
                rx,
                ry,
                x_rotation.to_degrees(),
                large_arc as u8,
                sweep as u8,
                to.x,
                to.y
            )),
            PathCommand::Cubic { ctrl1, ctrl2, to } => {
                d.push_str(&format!("C{},{} {},{} {},{} ", ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y))
            }
            PathCommand::Quadratic { ctrl, to } => d.push_str(&format!("Q{},{} {},{} ", ctrl.x, ctrl.y, to.x, to.y)),
            PathCommand::Close => d.push('Z'),
        }
    }
    d.trim_end().to_string()
}

fn style_attr(shape: &laser_path::Shape) -> String {
    let stroke = colour_css(shape.stroke);
    let fill = colour_css(shape.fill.unwrap_or(Colour::None));
    format!("stroke:{stroke};fill:{fill}")
}

fn colour_css(colour: Colour) -> String {
    colour.to_hex()
}

fn transform_attr(t: &laser_geom::Transform) -> String {
    format!("matrix({},{},{},{},{},{})", t.m11, t.m12, t.m21, t.m22, t.m31, t.m32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use laser_path::{point, Path, Shape};

    #[test]
    fn writes_a_single_line_as_a_path_element() {
        let mut drawing = Drawing::new();
        let root = drawing.root();
        let mut b = Path::builder();
        b.move_to(point(0.0, 0.0));
        b.line_to(point(10.0, 0.0));
        drawing.push_shape(Shape::new("chemin1", b.build(), Colour::BLACK, root));

        let svg = write_svg(&drawing);

        assert!(svg.contains("d=\"M0,0 L10,0\""));
        assert!(svg.contains("stroke:#000000"));
    }

    #[test]
    fn writes_layers_with_inkscape_attributes() {
        let mut drawing = Drawing::new();
        let layer = drawing.add_layer(drawing.root(), "Cuts", true);
        let mut b = Path::builder();
        b.move_to(point(0.0, 0.0));
        b.line_to(point(1.0, 0.0));
        drawing.push_shape(Shape::new("chemin1", b.build(), Colour::BLACK, layer));

        let svg = write_svg(&drawing);

        assert!(svg.contains("inkscape:groupmode=\"layer\""));
        assert!(svg.contains("inkscape:label=\"Cuts\""));
    }
}
