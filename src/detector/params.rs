//! Parameter types configuring the detector stages.
//!
//! Every numeric constant of the pipeline lives here, grouped by stage. All
//! groups deserialize with per-field defaults so a configuration file only
//! needs to mention what it changes.

use crate::offset::OffsetOptions;
use crate::period::PeriodOptions;
use crate::spectrum::SpectrumOptions;
use serde::{Deserialize, Serialize};

/// Detector-wide parameters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParams {
    /// Transform size and amplitude scaling.
    pub spectrum: SpectrumOptions,
    /// Peak test and candidate clustering.
    pub period: PeriodOptions,
    /// Line template and correlation peak test.
    pub offset: OffsetOptions,
    /// Analyze the two axes concurrently.
    pub parallel_axes: bool,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            spectrum: SpectrumOptions::default(),
            period: PeriodOptions::default(),
            offset: OffsetOptions::default(),
            parallel_axes: true,
        }
    }
}
