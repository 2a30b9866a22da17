use crate::colour::Colour;
use crate::layer::LayerId;
use crate::path::Path;
use laser_geom::Transform;

/// A single drawable element: a path plus its colours and the layer it
/// lives in.
///
/// `transform` holds the shape's own affine transform as found in the
/// source document; the flattener composes it with every ancestor group's
/// transform, bakes the result into `path`, and resets this field to the
/// identity. Every shape the flattener hands back therefore has
/// `transform == Transform::identity()`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Shape {
    pub id: String,
    pub path: Path,
    pub stroke: Colour,
    pub fill: Option<Colour>,
    pub parent_layer: LayerId,
    pub transform: Transform,
}

impl Shape {
    pub fn new(id: impl Into<String>, path: Path, stroke: Colour, parent_layer: LayerId) -> Self {
        Shape {
            id: id.into(),
            path,
            stroke,
            fill: None,
            parent_layer,
            transform: Transform::identity(),
        }
    }

    pub fn has_identity_transform(&self) -> bool {
        self.transform == Transform::identity()
    }
}
