use thiserror::Error;

/// Fatal errors from a pipeline run.
///
/// Per-element problems (a malformed path command, a degenerate segment)
/// are not represented here: they are recovered from locally by the phase
/// that detects them and never abort a run. Only conditions that leave the
/// whole pipeline unable to proceed are `Error` variants.
#[derive(Debug, Error)]
pub enum Error {
    #[error("the input drawing is not backed by a writable file")]
    UnsavedSource,

    #[error("optimization was cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
