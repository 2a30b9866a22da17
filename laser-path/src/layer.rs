/// Index of a [`Layer`] within a [`crate::Drawing`]'s layer arena.
///
/// A plain arena index rather than an owning tree of `Rc`/`RefCell` nodes:
/// the merger and ordering engine only ever need "which layer does this
/// shape belong to", never to walk up and mutate ancestors, so the simpler
/// representation wins.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerId(pub(crate) usize);

/// A group in the source document: an `svg:g`, optionally an Inkscape
/// layer (`inkscape:groupmode="layer"`).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Layer {
    pub name: String,
    pub parent: Option<LayerId>,
    pub is_layer: bool,
    pub transform: laser_geom::Transform,
}

impl Default for Layer {
    fn default() -> Self {
        Layer { name: String::new(), parent: None, is_layer: false, transform: laser_geom::Transform::identity() }
    }
}
