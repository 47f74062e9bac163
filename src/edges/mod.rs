//! Edge preprocessing: Sobel gradients and the normalized magnitude field.
//!
//! Tile sizes are estimated on the gradient magnitude of the luma plane
//! rescaled to `[0, 255]`; the phase stage works on luma projections instead.
//!
//! - Borders are handled by clamping indices (replicate).
//! - The field keeps the input geometry (`w × h`).

pub mod grad;

/// Per‑pixel gradients and the normalized detector input.
pub use grad::{gradient_field, sobel_gradients, Grad, GRADIENT_RANGE};
