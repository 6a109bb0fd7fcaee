//! Error and warning values shared by generation and export.
//!
//! Configuration and parse failures are terminal and stay distinct;
//! geometry warnings ride along with a best-effort export result.

use thiserror::Error;

/// Generation failure. Raised before any node is created.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum MazeError {
    #[error("invalid maze configuration: {reason}")]
    InvalidConfiguration { reason: String },
}

impl MazeError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

/// Malformed path description. `offset` is a byte offset into the input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty path description")]
    Empty,
    #[error("unknown path command {command:?} at byte {offset}")]
    UnknownCommand { command: char, offset: usize },
    #[error("unexpected character {found:?} at byte {offset}")]
    UnexpectedChar { found: char, offset: usize },
    #[error("path must start with a move command (byte {offset})")]
    MissingMoveTo { offset: usize },
    #[error("command {command:?} got {count} arguments, expected a multiple of {arity} (byte {offset})")]
    BadArgumentCount {
        command: char,
        count: usize,
        arity: usize,
        offset: usize,
    },
    #[error("invalid number at byte {offset}")]
    InvalidNumber { offset: usize },
    #[error("invalid arc flag at byte {offset}, expected 0 or 1")]
    InvalidFlag { offset: usize },
    #[error("coordinate out of range in command at byte {offset}")]
    CoordinateOutOfRange { offset: usize },
}

/// Why a sub-path was dropped during offsetting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DegenerateKind {
    /// Fewer than two distinct points.
    ZeroLength,
    /// Two non-adjacent segments touch or cross.
    SelfIntersecting,
}

/// A sub-path skipped during offset/union; the rest of the geometry is kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("sub-path {subpath} skipped: {kind:?}")]
pub struct GeometryWarning {
    pub subpath: usize,
    pub kind: DegenerateKind,
}

/// Terminal export failure.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ExportError {
    #[error(transparent)]
    Config(#[from] MazeError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("export cancelled before stage {stage:?}")]
    Cancelled { stage: crate::export::Stage },
}
