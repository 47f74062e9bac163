use super::sink::TraceSink;
use super::timing::TimingBreakdown;
use crate::image::ImageF32;
use crate::offset::OffsetEstimate;
use crate::period::PeriodEstimate;
use crate::spectrum::AxisSpectrum;
use crate::types::{Axis, GridResult};
use serde::Serialize;

/// Result produced by [`GridDetector::process_with_diagnostics`](crate::GridDetector).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub grid: GridResult,
    pub trace: PipelineTrace,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    /// Side of the square transform buffer.
    pub padded_size: usize,
}

/// Intermediate results for one axis.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisTrace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spectrum: Option<AxisSpectrum>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<PeriodEstimate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<OffsetEstimate>,
}

/// Collecting [`TraceSink`]: keeps everything the detector reports.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    /// Gradient field fed to the spectral stage (not serialized).
    #[serde(skip)]
    pub gradient: Option<ImageF32>,
    pub x: AxisTrace,
    pub y: AxisTrace,
}

impl PipelineTrace {
    pub fn axis(&self, axis: Axis) -> &AxisTrace {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AxisTrace {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }
}

impl TraceSink for PipelineTrace {
    fn input(&mut self, input: &InputDescriptor) {
        self.input = *input;
    }

    fn gradient(&mut self, field: &ImageF32) {
        self.gradient = Some(field.clone());
    }

    fn spectrum(&mut self, spectrum: &AxisSpectrum) {
        self.axis_mut(spectrum.axis).spectrum = Some(spectrum.clone());
    }

    fn period(&mut self, estimate: &PeriodEstimate) {
        self.axis_mut(estimate.axis).period = Some(estimate.clone());
    }

    fn offset(&mut self, estimate: &OffsetEstimate) {
        self.axis_mut(estimate.axis).offset = Some(estimate.clone());
    }

    fn timing(&mut self, label: &str, elapsed_ms: f64) {
        self.timings.push(label, elapsed_ms);
    }

    fn finished(&mut self, total_ms: f64) {
        self.timings.total_ms = total_ms;
    }
}
