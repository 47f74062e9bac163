//! Diagnostics data model exposed by the detector and the demo tooling.
//!
//! The detector reports intermediate values through the [`TraceSink`]
//! callbacks. [`PipelineTrace`] collects all of them and is what
//! [`DetectionReport`] carries next to the [`GridResult`](crate::GridResult);
//! [`NoopSink`] discards them.

pub mod pipeline;
pub mod sink;
pub mod timing;

pub use pipeline::{AxisTrace, DetectionReport, InputDescriptor, PipelineTrace};
pub use sink::{NoopSink, TraceSink};
pub use timing::{StageTiming, TimingBreakdown};
