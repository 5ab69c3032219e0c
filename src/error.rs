//! Error types for buffer operations.

use thiserror::Error;

/// Errors surfaced by buffer operations.
///
/// None of these are recoverable in a meaningful way: they indicate either
/// caller misuse (out-of-range access, impossible wide-character placement)
/// or a broken internal invariant (ring buffer over/underflow, which the
/// grid layer is responsible for preventing).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("cell out of range: row {row}, col {col}")]
    OutOfRange { row: isize, col: usize },

    #[error("line out of range: {0}")]
    LineOutOfRange(isize),

    #[error("column out of range: {col} (width {width})")]
    ColumnOutOfRange { col: usize, width: usize },

    #[error("ring buffer is full")]
    Overflow,

    #[error("ring buffer is empty")]
    Underflow,

    #[error("wide character does not fit at column {col} (width {width})")]
    WidePlacement { col: usize, width: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
