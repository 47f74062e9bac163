//! Grid detector composing the preprocessing, spectral, period and phase
//! stages.
//!
//! Overview
//! - Validates the input buffer and reduces it to luma.
//! - Computes the normalized Sobel gradient magnitude once.
//! - Per axis: amplitude spectrum of the padded gradient field → tile size
//!   from clustered harmonic spacings → phase from the normalized
//!   cross-correlation of the luma projection with a line template.
//! - The axes share no state; they run under `rayon::join` unless
//!   [`GridParams::parallel_axes`] is off.
//!
//! Modules
//! - [`params`] – configuration types used by the detector and CLI.
//! - `pipeline` – the [`GridDetector`] implementation.

pub mod params;
mod pipeline;

pub use params::GridParams;
pub use pipeline::{detect_grid, GridDetector};
