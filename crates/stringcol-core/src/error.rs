//! Whole-operation error taxonomy for columnar string transforms.
//!
//! Every kernel in this workspace is all-or-nothing: on any failure the
//! caller gets an error and no partial output column.

/// Errors from columnar string operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnError {
    /// A width (or similar size argument) outside its valid range.
    /// Widths must be at least 1; zero is rejected before any row is read.
    InvalidWidth(usize),
    /// The offsets table violates the column invariant
    /// (`offset[i] <= offset[i + 1]`, last offset == buffer length).
    InvalidOffsets { index: usize },
    /// The output character buffer could not be allocated.
    Allocation { bytes: usize },
    /// A row's bytes are not valid UTF-8.
    Encoding { row: usize },
    /// A kernel invariant was violated. This indicates a bug in the
    /// kernel itself, never bad caller input.
    Internal(&'static str),
}

impl std::fmt::Display for ColumnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWidth(w) => write!(f, "invalid width {w}: must be at least 1"),
            Self::InvalidOffsets { index } => {
                write!(f, "offsets table invalid at index {index}")
            }
            Self::Allocation { bytes } => {
                write!(f, "failed to allocate output buffer of {bytes} bytes")
            }
            Self::Encoding { row } => write!(f, "row {row} is not valid UTF-8"),
            Self::Internal(msg) => write!(f, "internal invariant violated: {msg}"),
        }
    }
}

impl std::error::Error for ColumnError {}
