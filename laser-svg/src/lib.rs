//! Reads and writes the SVG documents the laser-cut path optimizer operates
//! on, and the JSON "cutting catalogue" (known colours, their cut speeds,
//! and the palette last used) that sits alongside the optimizer's
//! configuration.
//!
//! Parsing follows the `roxmltree` + `svgtypes` split the SVG crates in
//! this ecosystem use: `roxmltree` walks the XML tree, `svgtypes` parses
//! the attribute values (`d`, `transform`, `fill`, `stroke`, lengths) once
//! an element has been picked out. Writing is the mirror image, built on
//! `xmlwriter`.

mod catalogue;
mod error;
mod parse;
mod write;

pub use catalogue::{Catalogue, CatalogueColour};
pub use error::{Error, Result};
pub use parse::parse_svg;
pub use write::write_svg;
