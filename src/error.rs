//! Hard failures raised at the detector entry point.
//!
//! Only structurally invalid input is an error. Numeric dead ends inside the
//! pipeline (no periodicity, no correlation peak) resolve to the sentinel
//! values documented on [`GridResult`](crate::GridResult).
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DetectError {
    #[error("image is empty ({width}x{height})")]
    EmptyImage { width: usize, height: usize },

    #[error("image must span at least 2 pixels along each axis, got {width}x{height}")]
    TooSmall { width: usize, height: usize },

    #[error("unsupported channel count {0}; expected 1 (gray) or 3 (RGB)")]
    UnsupportedChannels(usize),

    #[error("row stride {stride} is smaller than the row length {row_bytes} bytes")]
    InvalidStride { stride: usize, row_bytes: usize },

    #[error("pixel buffer holds {actual} bytes, expected at least {expected}")]
    BufferTooShort { expected: usize, actual: usize },
}
