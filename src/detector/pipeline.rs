//! Detector pipeline orchestrating end-to-end grid detection.
//!
//! Typical usage:
//! ```no_run
//! use tilegrid::{GridDetector, GridParams};
//! use tilegrid::image::ImageU8;
//!
//! # fn example(gray: ImageU8) -> Result<(), tilegrid::DetectError> {
//! let detector = GridDetector::new(GridParams::default());
//! let grid = detector.detect(&gray)?;
//! println!("tile {}x{} offset ({}, {})", grid.tile_x, grid.tile_y, grid.offset_x, grid.offset_y);
//! # Ok(())
//! # }
//! ```

// Stages
// - Validate: reject degenerate geometry before touching pixels.
// - Luma: RGB → single channel, gray copied as-is.
// - Gradient: Sobel magnitude normalized to [0, 255].
// - Per axis (independent, optionally parallel):
//   spectrum → period (tile size) → offset (skipped when the tile is 0;
//   intensity projection first, edge profile when it has no peak).
// - Reporting: sink callbacks in X-then-Y order, then total timing.

use super::params::GridParams;
use crate::diagnostics::{DetectionReport, InputDescriptor, NoopSink, PipelineTrace, TraceSink};
use crate::edges::gradient_field;
use crate::error::DetectError;
use crate::image::{ImageF32, ImageU8};
use crate::offset::{OffsetEstimate, OffsetEstimator};
use crate::period::{PeakClusterer, PeriodEstimate};
use crate::spectrum::{AxisSpectrum, SpectralAnalyzer};
use crate::types::{Axis, GridResult};
use std::time::Instant;

/// Grid detector: tile size and phase per axis from a raster image.
#[derive(Clone, Debug, Default)]
pub struct GridDetector {
    params: GridParams,
    analyzer: SpectralAnalyzer,
    clusterer: PeakClusterer,
    phase: OffsetEstimator,
}

struct AxisOutcome {
    spectrum: AxisSpectrum,
    spectrum_ms: f64,
    period: PeriodEstimate,
    period_ms: f64,
    offset: OffsetEstimate,
    offset_ms: f64,
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

impl GridDetector {
    /// Create a detector with the supplied parameters.
    pub fn new(params: GridParams) -> Self {
        Self {
            params,
            analyzer: SpectralAnalyzer::new(params.spectrum),
            clusterer: PeakClusterer::new(params.period),
            phase: OffsetEstimator::new(params.offset),
        }
    }

    pub fn params(&self) -> &GridParams {
        &self.params
    }

    /// Replace all parameters.
    pub fn set_params(&mut self, params: GridParams) {
        *self = Self::new(params);
    }

    /// Update the minimum transform size.
    pub fn set_padding(&mut self, padding: usize) {
        let mut params = self.params;
        params.spectrum.padding = padding;
        self.set_params(params);
    }

    /// Enable or disable the Hann taper on the axis spectra.
    pub fn set_windowing(&mut self, windowing: bool) {
        let mut params = self.params;
        params.spectrum.windowing = windowing;
        self.set_params(params);
    }

    /// Detect the grid with no diagnostics.
    pub fn detect(&self, image: &ImageU8) -> Result<GridResult, DetectError> {
        self.detect_traced(image, &mut NoopSink)
    }

    /// Run the pipeline and collect the full [`PipelineTrace`].
    pub fn process_with_diagnostics(&self, image: &ImageU8) -> Result<DetectionReport, DetectError> {
        let mut trace = PipelineTrace::default();
        let grid = self.detect_traced(image, &mut trace)?;
        Ok(DetectionReport { grid, trace })
    }

    /// Detect the grid, reporting intermediate values to `sink`.
    pub fn detect_traced(
        &self,
        image: &ImageU8,
        sink: &mut dyn TraceSink,
    ) -> Result<GridResult, DetectError> {
        let total_start = Instant::now();
        image.validate()?;

        let (w, h) = (image.w, image.h);
        sink.input(&InputDescriptor {
            width: w,
            height: h,
            channels: image.channels(),
            padded_size: self.analyzer.padded_size(w, h),
        });

        let luma_start = Instant::now();
        let luma = image.to_luma();
        sink.timing("luma", elapsed_ms(luma_start));

        let grad_start = Instant::now();
        let field = gradient_field(&luma);
        sink.timing("gradient", elapsed_ms(grad_start));
        sink.gradient(&field);

        let (x, y) = if self.params.parallel_axes {
            rayon::join(
                || self.analyze_axis(&field, &luma, Axis::X),
                || self.analyze_axis(&field, &luma, Axis::Y),
            )
        } else {
            (
                self.analyze_axis(&field, &luma, Axis::X),
                self.analyze_axis(&field, &luma, Axis::Y),
            )
        };

        for outcome in [&x, &y] {
            let label = outcome.spectrum.axis.label();
            sink.spectrum(&outcome.spectrum);
            sink.timing(&format!("spectrum[{label}]"), outcome.spectrum_ms);
            sink.period(&outcome.period);
            sink.timing(&format!("period[{label}]"), outcome.period_ms);
            sink.offset(&outcome.offset);
            sink.timing(&format!("offset[{label}]"), outcome.offset_ms);
        }

        let grid = GridResult {
            width: w,
            height: h,
            tile_x: x.period.tile,
            tile_y: y.period.tile,
            offset_x: x.offset.offset,
            offset_y: y.offset.offset,
        };
        let total_ms = elapsed_ms(total_start);
        sink.finished(total_ms);
        log::debug!(
            "grid {}x{}: tile=({}, {}) offset=({}, {}) in {:.2} ms",
            w,
            h,
            grid.tile_x,
            grid.tile_y,
            grid.offset_x,
            grid.offset_y,
            total_ms
        );
        Ok(grid)
    }

    fn analyze_axis(&self, field: &ImageF32, luma: &ImageF32, axis: Axis) -> AxisOutcome {
        let start = Instant::now();
        let spectrum = self.analyzer.axis_spectrum(field, axis);
        let spectrum_ms = elapsed_ms(start);

        let start = Instant::now();
        let period = self.clusterer.estimate(&spectrum);
        let period_ms = elapsed_ms(start);

        let start = Instant::now();
        let offset = if period.is_detected() {
            self.phase.estimate_with_edges(
                &luma.projection_means(axis),
                &luma.step_means(axis),
                period.tile,
                axis,
            )
        } else {
            log::debug!("offset[{}]: tile undetected, skipping", axis.label());
            OffsetEstimate::undetermined(axis, period.tile)
        };
        let offset_ms = elapsed_ms(start);

        AxisOutcome {
            spectrum,
            spectrum_ms,
            period,
            period_ms,
            offset,
            offset_ms,
        }
    }
}

/// Detect the grid with default parameters.
pub fn detect_grid(image: &ImageU8) -> Result<GridResult, DetectError> {
    GridDetector::default().detect(image)
}
