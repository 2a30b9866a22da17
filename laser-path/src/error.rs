use thiserror::Error;

/// Errors produced while building or editing a [`crate::Path`].
///
/// These are local, recoverable conditions a caller checks for explicitly —
/// unlike `laser_core::Error`, nothing here aborts a whole optimization run.
#[derive(Debug, Error, PartialEq)]
pub enum PathError {
    #[error("path command `{command}` is malformed: {reason}")]
    MalformedCommand { command: String, reason: String },

    #[error("path has no commands")]
    Empty,

    #[error("path is not atomic: {reason}")]
    NotAtomic { reason: String },
}

#[test]
fn error_messages_are_descriptive() {
    let e = PathError::MalformedCommand { command: "A".to_string(), reason: "zero radius".to_string() };
    assert_eq!(e.to_string(), "path command `A` is malformed: zero radius");
}
