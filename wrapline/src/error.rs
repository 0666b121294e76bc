//! Layout error types.

use thiserror::Error;

use crate::layout::cursor::ContainerKind;
use crate::layout::source::LeafId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("leaf {0:?} is not tracked")]
    UnknownLeaf(LeafId),

    #[error("leaf {0:?} is already laid out")]
    AlreadyIndexed(LeafId),

    #[error("range {start}..{end} out of bounds for sequence of length {len}")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },

    #[error("invalid target width: {0}")]
    InvalidWidth(f32),

    #[error("invalid gap: {0}")]
    InvalidGap(f32),

    #[error("{0:?} node has no children")]
    NotAContainer(ContainerKind),

    #[error("cursor over {found:?} used with {expected:?} container")]
    CursorMismatch {
        expected: ContainerKind,
        found: ContainerKind,
    },

    #[error("cursor offset {offset} out of range for container of length {len}")]
    CursorOutOfRange { offset: usize, len: usize },

    #[error("cannot move cursor at offset {offset} back by {steps}")]
    CursorUnderflow { offset: usize, steps: usize },

    #[error("cursor range is reversed: begin {begin} is after end {end}")]
    CursorRangeReversed { begin: usize, end: usize },

    #[error("column child {0} is not a row")]
    NotARow(usize),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
