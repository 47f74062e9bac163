//! Observer hooks fed by the detector while it runs.
//!
//! Every callback has an empty default, so sinks only implement what they
//! need. Sinks observe copies of the intermediate values and cannot influence
//! the result. Per-axis callbacks always arrive X first, then Y, whether or not
//! the axes were computed in parallel.
use super::pipeline::InputDescriptor;
use crate::image::ImageF32;
use crate::offset::OffsetEstimate;
use crate::period::PeriodEstimate;
use crate::spectrum::AxisSpectrum;

pub trait TraceSink {
    /// Geometry of the validated input.
    fn input(&mut self, _input: &InputDescriptor) {}
    /// Normalized gradient-magnitude field.
    fn gradient(&mut self, _field: &ImageF32) {}
    fn spectrum(&mut self, _spectrum: &AxisSpectrum) {}
    fn period(&mut self, _estimate: &PeriodEstimate) {}
    fn offset(&mut self, _estimate: &OffsetEstimate) {}
    /// Duration of one named stage.
    fn timing(&mut self, _label: &str, _elapsed_ms: f64) {}
    /// Total duration of the run, reported last.
    fn finished(&mut self, _total_ms: f64) {}
}

/// Sink that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}
