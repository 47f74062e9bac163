#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod types;

// Stage modules – public for tooling and experiments.
pub mod config;
pub mod edges;
pub mod offset;
pub mod peaks;
pub mod period;
pub mod spectrum;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + results.
pub use crate::detector::{detect_grid, GridDetector, GridParams};
pub use crate::error::DetectError;
pub use crate::types::{Axis, GridResult, UNDETECTED_TILE, UNDETERMINED_OFFSET};

// Diagnostics returned by the detector.
pub use crate::diagnostics::{DetectionReport, NoopSink, PipelineTrace, TraceSink};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use tilegrid::prelude::*;
///
/// # fn main() -> Result<(), DetectError> {
/// let (w, h) = (640usize, 480usize);
/// let gray = vec![0u8; w * h];
/// let img = ImageU8::gray(w, h, &gray);
///
/// let det = GridDetector::new(GridParams::default());
/// let grid = det.detect(&img)?;
/// println!("tile={}x{} offset=({}, {})", grid.tile_x, grid.tile_y, grid.offset_x, grid.offset_y);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ImageU8, PixelFormat};
    pub use crate::{detect_grid, DetectError, GridDetector, GridParams, GridResult};
}

// --- Stage-level API (for tools & advanced users) ---------------------------

pub mod stages {
    // Stage runners.
    pub use crate::edges::{gradient_field, sobel_gradients};
    pub use crate::offset::{estimate_offset, OffsetEstimator};
    pub use crate::period::{estimate_tile_size, PeakClusterer};
    pub use crate::spectrum::SpectralAnalyzer;

    // Stage options and outputs.
    pub use crate::diagnostics::{AxisTrace, InputDescriptor, StageTiming, TimingBreakdown};
    pub use crate::offset::{OffsetEstimate, OffsetOptions, OffsetSource, Polarity};
    pub use crate::period::{
        CandidateCluster, ClusterMethod, PeriodEstimate, PeriodOptions, SpectralPeak,
    };
    pub use crate::spectrum::{AxisSpectrum, Spectra, SpectrumOptions};
}
