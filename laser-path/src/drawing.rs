use crate::layer::{Layer, LayerId};
use crate::shape::Shape;

/// An ordered list of [`Shape`]s plus the layer tree they belong to.
/// Shape order is draw order until the ordering stage runs, after which
/// it is cut order.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Drawing {
    shapes: Vec<Shape>,
    layers: Vec<Layer>,
}

impl Drawing {
    /// An empty drawing with a single root layer.
    pub fn new() -> Self {
        Drawing {
            shapes: Vec::new(),
            layers: vec![Layer { name: "root".to_string(), ..Layer::default() }],
        }
    }

    pub fn root(&self) -> LayerId {
        LayerId(0)
    }

    pub fn add_layer(&mut self, parent: LayerId, name: impl Into<String>, is_layer: bool) -> LayerId {
        self.layers.push(Layer { name: name.into(), parent: Some(parent), is_layer, ..Layer::default() });
        LayerId(self.layers.len() - 1)
    }

    pub fn layer(&self, id: LayerId) -> &Layer {
        &self.layers[id.0]
    }

    pub fn layer_mut(&mut self, id: LayerId) -> &mut Layer {
        &mut self.layers[id.0]
    }

    /// Composes the transforms of `id` and every ancestor layer up to the
    /// root: `id`'s own transform is applied first (innermost), each
    /// ancestor's after, matching how nested `svg:g` transforms compose.
    pub fn accumulated_layer_transform(&self, id: LayerId) -> laser_geom::Transform {
        let layer = self.layer(id);
        match layer.parent {
            Some(parent) => layer.transform.then(&self.accumulated_layer_transform(parent)),
            None => layer.transform,
        }
    }

    /// The ids of `parent`'s direct children, in layer-creation order. A
    /// writer walking the layer tree (an SVG serializer, say) has no other
    /// way to discover it: the arena only exposes parent pointers.
    pub fn child_layers(&self, parent: LayerId) -> Vec<LayerId> {
        self.layers
            .iter()
            .enumerate()
            .filter(|(_, layer)| layer.parent == Some(parent))
            .map(|(i, _)| LayerId(i))
            .collect()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut Vec<Shape> {
        &mut self.shapes
    }

    pub fn push_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[test]
fn nested_layer_transforms_compose_child_first() {
    let mut d = Drawing::new();
    d.layer_mut(d.root()).transform = laser_geom::Transform::scale(2.0, 2.0);
    let child = d.add_layer(d.root(), "g", true);
    d.layer_mut(child).transform = laser_geom::Transform::translation(1.0, 0.0);
    let composed = d.accumulated_layer_transform(child);
    // Child translation happens first, then the parent's scale: (0,0) -> (1,0) -> (2,0).
    assert_eq!(composed.transform_point(laser_geom::point(0.0, 0.0)), laser_geom::point(2.0, 0.0));
}

#[test]
fn child_layers_lists_only_direct_children() {
    let mut d = Drawing::new();
    let a = d.add_layer(d.root(), "a", true);
    let _b = d.add_layer(a, "b", false);
    assert_eq!(d.child_layers(d.root()), vec![a]);
}

#[test]
fn new_drawing_has_a_root_layer() {
    let mut d = Drawing::new();
    assert!(d.is_empty());
    let child = d.add_layer(d.root(), "Layer 1", true);
    assert_eq!(d.layer(child).parent, Some(d.root()));
    assert!(d.layer(child).is_layer);
}
