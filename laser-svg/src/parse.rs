use std::collections::HashMap;
use std::str::FromStr;

use laser_core::flatten::{circle_to_path, ellipse_to_path, line_to_path, polygon_to_path, polyline_to_path, rect_to_path};
use laser_geom::{point, Transform};
use laser_path::{Colour, Drawing, LayerId, Path, PathCommand, Shape};
use roxmltree::Node;

use crate::error::{Error, Result};

/// Parses an SVG document into a [`Drawing`].
///
/// Groups become [`laser_path::Layer`]s (Inkscape layers, marked by
/// `inkscape:groupmode="layer"`, are flagged as such but otherwise treated
/// like any other group); every other recognised drawable element becomes
/// a [`Shape`] under the group it was found in. Each shape keeps its own
/// `transform` attribute unbaked — [`laser_core::flatten::ungroup_and_bake`]
/// is the pipeline phase responsible for composing it with its ancestors'.
///
/// Text elements, and any element whose `style` mentions `font`, are
/// skipped: they are annotations, not cut geometry.
pub fn parse_svg(xml: &str) -> Result<Drawing> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(Error::NoRootElement);
    }

    let mut drawing = Drawing::new();
    let mut next_id = 1usize;
    let root_layer = drawing.root();
    walk(root, &mut drawing, root_layer, &mut next_id);
    Ok(drawing)
}

fn walk(node: Node, drawing: &mut Drawing, parent: LayerId, next_id: &mut usize) {
    for child in node.children().filter(Node::is_element) {
        let name = child.tag_name().name();
        match name {
            "defs" | "metadata" | "style" | "namedview" | "symbol" | "clipPath" | "mask" => continue,
            "text" | "tspan" | "textPath" | "flowRoot" => continue,
            "g" | "svg" => {
                let layer = push_layer(&child, drawing, parent);
                walk(child, drawing, layer, next_id);
            }
            "path" | "rect" | "circle" | "ellipse" | "line" | "polyline" | "polygon" => {
                if mentions_font(&child) {
                    continue;
                }
                if let Some(shape) = shape_from_element(&child, parent, next_id) {
                    drawing.push_shape(shape);
                }
            }
            _ => walk(child, drawing, parent, next_id),
        }
    }
}

fn mentions_font(node: &Node) -> bool {
    style_map(node).keys().any(|k| k.contains("font")) || node.attributes().any(|a| a.name().contains("font"))
}

fn push_layer(node: &Node, drawing: &mut Drawing, parent: LayerId) -> LayerId {
    let is_layer = node.attribute(("http://www.inkscape.org/namespaces/inkscape", "groupmode")) == Some("layer");
    let name = node
        .attribute(("http://www.inkscape.org/namespaces/inkscape", "label"))
        .or_else(|| node.attribute("id"))
        .unwrap_or("g")
        .to_string();
    let layer = drawing.add_layer(parent, name, is_layer);
    drawing.layer_mut(layer).transform = parse_transform(node.attribute("transform"));
    layer
}

fn shape_from_element(node: &Node, parent: LayerId, next_id: &mut usize) -> Option<Shape> {
    let path = match node.tag_name().name() {
        "path" => parse_path_data(node.attribute("d")?).ok()?,
        "rect" => {
            let w = attr_f64(node, "width", 0.0);
            let h = attr_f64(node, "height", 0.0);
            if w <= 0.0 || h <= 0.0 {
                return None;
            }
            rect_to_path(attr_f64(node, "x", 0.0), attr_f64(node, "y", 0.0), w, h)
        }
        "circle" => {
            let r = attr_f64(node, "r", 0.0);
            if r <= 0.0 {
                return None;
            }
            circle_to_path(attr_f64(node, "cx", 0.0), attr_f64(node, "cy", 0.0), r)
        }
        "ellipse" => {
            let rx = attr_f64(node, "rx", 0.0);
            let ry = attr_f64(node, "ry", 0.0);
            if rx <= 0.0 || ry <= 0.0 {
                return None;
            }
            ellipse_to_path(attr_f64(node, "cx", 0.0), attr_f64(node, "cy", 0.0), rx, ry)
        }
        "line" => line_to_path(
            attr_f64(node, "x1", 0.0),
            attr_f64(node, "y1", 0.0),
            attr_f64(node, "x2", 0.0),
            attr_f64(node, "y2", 0.0),
        ),
        "polyline" => polyline_to_path(&parse_points(node.attribute("points")?))?,
        "polygon" => polygon_to_path(&parse_points(node.attribute("points")?))?,
        _ => return None,
    };
    if path.is_empty() {
        return None;
    }

    let style = style_map(node);
    let stroke = resolve_colour(node, &style, "stroke").unwrap_or(Colour::None);
    let fill = resolve_colour(node, &style, "fill");

    let id = node.attribute("id").map(str::to_string).unwrap_or_else(|| {
        let id = format!("chemin{}", *next_id);
        *next_id += 1;
        id
    });

    let mut shape = Shape::new(id, path, stroke, parent);
    shape.fill = fill;
    shape.transform = parse_transform(node.attribute("transform"));
    Some(shape)
}

fn style_map(node: &Node) -> HashMap<String, String> {
    let mut map = HashMap::new();
    if let Some(style) = node.attribute("style") {
        for decl in style.split(';') {
            if let Some((k, v)) = decl.split_once(':') {
                map.insert(k.trim().to_lowercase(), v.trim().to_string());
            }
        }
    }
    map
}

fn resolve_colour(node: &Node, style: &HashMap<String, String>, property: &str) -> Option<Colour> {
    let raw = style.get(property).map(String::as_str).or_else(|| node.attribute(property))?;
    parse_colour(raw)
}

fn parse_colour(raw: &str) -> Option<Colour> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        return Some(Colour::None);
    }
    svgtypes::Color::from_str(raw).ok().map(|c| Colour::Rgb(c.red, c.green, c.blue))
}

fn parse_transform(attr: Option<&str>) -> Transform {
    let Some(attr) = attr else {
        return Transform::identity();
    };
    match svgtypes::Transform::from_str(attr) {
        Ok(t) => Transform::new(t.a, t.b, t.c, t.d, t.e, t.f),
        Err(_) => Transform::identity(),
    }
}

fn attr_f64(node: &Node, name: &str, default: f64) -> f64 {
    node.attribute(name).and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn parse_points(raw: &str) -> Vec<laser_geom::Point> {
    let numbers: Vec<f64> = raw.split(|c: char| c.is_whitespace() || c == ',').filter(|s| !s.is_empty()).filter_map(|s| s.parse().ok()).collect();
    numbers.chunks_exact(2).map(|pair| point(pair[0], pair[1])).collect()
}

/// Converts an SVG `d` attribute into absolute, non-shorthand
/// [`PathCommand`]s: the same normal form [`laser_core`]'s atomiser
/// expects to find already in place.
fn parse_path_data(d: &str) -> Result<Path> {
    let mut commands = Vec::new();
    let mut current = point(0.0, 0.0);
    let mut subpath_start = current;
    let mut last_cubic_ctrl: Option<laser_geom::Point> = None;
    let mut last_quad_ctrl: Option<laser_geom::Point> = None;

    for segment in svgtypes::PathParser::from(d) {
        let segment = segment.map_err(|e| Error::PathData { id: d.to_string(), source: e })?;
        let mut reflected_cubic = None;
        let mut reflected_quad = None;
        match segment {
            svgtypes::PathSegment::MoveTo { abs, x, y } => {
                current = resolve(abs, current, x, y);
                subpath_start = current;
                commands.push(PathCommand::Move(current));
            }
            svgtypes::PathSegment::LineTo { abs, x, y } => {
                current = resolve(abs, current, x, y);
                commands.push(PathCommand::Line(current));
            }
            svgtypes::PathSegment::HorizontalLineTo { abs, x } => {
                current = resolve(abs, current, x, if abs { current.y } else { 0.0 });
                commands.push(PathCommand::Line(current));
            }
            svgtypes::PathSegment::VerticalLineTo { abs, y } => {
                current = resolve(abs, current, if abs { current.x } else { 0.0 }, y);
                commands.push(PathCommand::Line(current));
            }
            svgtypes::PathSegment::CurveTo { abs, x1, y1, x2, y2, x, y } => {
                let ctrl1 = resolve(abs, current, x1, y1);
                let ctrl2 = resolve(abs, current, x2, y2);
                current = resolve(abs, current, x, y);
                commands.push(PathCommand::Cubic { ctrl1, ctrl2, to: current });
                reflected_cubic = Some(ctrl2);
            }
            svgtypes::PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                let ctrl1 = last_cubic_ctrl.map(|c| reflect(c, current)).unwrap_or(current);
                let ctrl2 = resolve(abs, current, x2, y2);
                current = resolve(abs, current, x, y);
                commands.push(PathCommand::Cubic { ctrl1, ctrl2, to: current });
                reflected_cubic = Some(ctrl2);
            }
            svgtypes::PathSegment::Quadratic { abs, x1, y1, x, y } => {
                let ctrl = resolve(abs, current, x1, y1);
                current = resolve(abs, current, x, y);
                commands.push(PathCommand::Quadratic { ctrl, to: current });
                reflected_quad = Some(ctrl);
            }
            svgtypes::PathSegment::SmoothQuadratic { abs, x, y } => {
                let ctrl = last_quad_ctrl.map(|c| reflect(c, current)).unwrap_or(current);
                current = resolve(abs, current, x, y);
                commands.push(PathCommand::Quadratic { ctrl, to: current });
                reflected_quad = Some(ctrl);
            }
            svgtypes::PathSegment::EllipticalArc { abs, rx, ry, x_axis_rotation, large_arc, sweep, x, y } => {
                current = resolve(abs, current, x, y);
                commands.push(PathCommand::Arc { rx, ry, x_rotation: x_axis_rotation.to_radians(), large_arc, sweep, to: current });
            }
            svgtypes::PathSegment::ClosePath { .. } => {
                commands.push(PathCommand::Close);
                current = subpath_start;
            }
        }
        last_cubic_ctrl = reflected_cubic;
        last_quad_ctrl = reflected_quad;
    }

    Ok(Path::from_commands(commands))
}

fn resolve(abs: bool, current: laser_geom::Point, x: f64, y: f64) -> laser_geom::Point {
    if abs {
        point(x, y)
    } else {
        point(current.x + x, current.y + y)
    }
}

/// Reflects `ctrl` through `about`, the SVG smooth-curve-continuation rule.
fn reflect(ctrl: laser_geom::Point, about: laser_geom::Point) -> laser_geom::Point {
    point(2.0 * about.x - ctrl.x, 2.0 * about.y - ctrl.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_rectangle() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg">
            <rect x="0" y="0" width="10" height="5" stroke="#ff0000" fill="none" id="r1"/>
        </svg>"##;
        let drawing = parse_svg(svg).unwrap();
        assert_eq!(drawing.shapes().len(), 1);
        assert_eq!(drawing.shapes()[0].stroke, Colour::Rgb(0xff, 0, 0));
        assert_eq!(drawing.shapes()[0].fill, Some(Colour::None));
    }

    #[test]
    fn parses_absolute_path_data_with_a_close() {
        let path = parse_path_data("M0,0 L10,0 L10,10 Z").unwrap();
        assert_eq!(path.commands().len(), 4);
        assert!(matches!(path.commands().last(), Some(PathCommand::Close)));
    }

    #[test]
    fn smooth_cubic_reflects_the_previous_control_point() {
        let path = parse_path_data("M0,0 C0,10 10,10 10,0 S20,-10 20,0").unwrap();
        assert_eq!(path.commands().len(), 3);
        match path.commands()[2] {
            PathCommand::Cubic { ctrl1, .. } => assert_eq!(ctrl1, point(10.0, -10.0)),
            _ => panic!("expected a cubic"),
        }
    }

    #[test]
    fn nested_groups_become_nested_layers() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg">
            <g transform="translate(5,0)">
                <line x1="0" y1="0" x2="1" y2="0" stroke="#000000"/>
            </g>
        </svg>"##;
        let drawing = parse_svg(svg).unwrap();
        assert_eq!(drawing.shapes().len(), 1);
        let group = drawing.shapes()[0].parent_layer;
        assert_ne!(group, drawing.root());
    }

    #[test]
    fn text_elements_are_skipped() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg">
            <text x="0" y="0">hello</text>
            <line x1="0" y1="0" x2="1" y2="0" stroke="#000000"/>
        </svg>"##;
        let drawing = parse_svg(svg).unwrap();
        assert_eq!(drawing.shapes().len(), 1);
    }

    #[test]
    fn elements_with_a_font_style_are_skipped() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg">
            <path d="M0,0 L1,0" style="stroke:#000000;font-family:Arial"/>
        </svg>"##;
        let drawing = parse_svg(svg).unwrap();
        assert!(drawing.is_empty());
    }
}
