use thiserror::Error;

/// Errors produced while reading or writing an SVG document or catalogue
/// file. Per-element problems inside a well-formed document (an
/// unrecognised tag, a malformed colour) are logged and skipped rather
/// than raised here — only conditions that leave the whole document
/// unreadable are `Error` variants.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("document has no root `svg` element")]
    NoRootElement,

    #[error("malformed path data in `{id}`: {source}")]
    PathData { id: String, source: svgtypes::Error },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed catalogue JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
