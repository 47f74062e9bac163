//! Tile-size estimation from an axis spectrum.
//!
//! A regular grid with period `T` produces harmonics at `k / T` cycles per
//! pixel, so consecutive strong peaks on the positive frequency half are spaced
//! by `1 / T`. The estimator:
//!
//! 1. Keeps samples that are both the maximum of a sliding window and pass a
//!    prominence/width peak test. The window is measured in frequency bins of
//!    the unpadded projection, so its reach in cycles per pixel does not depend
//!    on the padding.
//! 2. Drops non-positive frequencies and peaks far below the strongest one.
//! 3. Refines each survivor to a sub-sample frequency and turns every gap
//!    between consecutive survivors into a candidate period `1 / (f[b] − f[a])`.
//! 4. Clusters the candidates and reports the rounded mean of the largest
//!    cluster. Ties go to the cluster with the smallest values.
//!
//! A missing harmonic yields a fraction of `T` (a doubled gap), a spurious
//! peak yields two unrelated values; both end up in small clusters.
//!
//! # Working range
//!
//! With the defaults a period is reported only when at least three consecutive
//! harmonic gaps agree. Harmonics above Nyquist do not exist, so tiles below
//! 9 px can never qualify, and on short projections (a few hundred pixels) the
//! weaker harmonics of tiles up to about 14 px often miss the prominence
//! test. Lowering [`PeriodOptions::min_cluster_size`] to 2 recovers such tiles
//! on clean input at the cost of spurious periods on pure noise. At the upper
//! end a tile needs at least two full periods in the image: tiles longer than
//! about half the projection are unreliable.
pub mod cluster1d;

pub use cluster1d::{Cluster1d, ClusterMethod, GreedyMerge, SingleLinkage};

use crate::peaks::{find_peaks, maximum_filter, refine_parabolic, PeakCriteria};
use crate::spectrum::AxisSpectrum;
use crate::types::{Axis, UNDETECTED_TILE};
use serde::{Deserialize, Serialize};

/// Options for [`PeakClusterer`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodOptions {
    /// Half-width of the sliding maximum filter in bins of the unpadded
    /// projection (one bin is `N / len` samples). Must stay below the
    /// harmonic spacing `len / T` bins of the largest expected tile.
    pub max_filter_bins: f64,
    /// Minimum peak prominence in dB.
    pub min_prominence: f64,
    /// Peaks more than this many dB below the strongest surviving peak are
    /// dropped.
    pub amplitude_range: f64,
    /// Maximum peak width at half prominence (samples).
    pub max_width: f64,
    /// Window the prominence base search is confined to (samples).
    pub prominence_window: usize,
    /// Candidates closer than this (pixels) are merged.
    pub cluster_distance: f64,
    /// Smallest dominant cluster accepted as a periodicity.
    pub min_cluster_size: usize,
    pub clustering: ClusterMethod,
}

impl Default for PeriodOptions {
    fn default() -> Self {
        Self {
            max_filter_bins: 2.0,
            min_prominence: 25.0,
            amplitude_range: 40.0,
            max_width: 50.0,
            prominence_window: 101,
            cluster_distance: 1.0,
            min_cluster_size: 3,
            clustering: ClusterMethod::SingleLinkage,
        }
    }
}

impl PeriodOptions {
    pub fn peak_criteria(&self) -> PeakCriteria {
        PeakCriteria {
            min_prominence: Some(self.min_prominence),
            min_width: None,
            max_width: Some(self.max_width),
            prominence_window: Some(self.prominence_window),
        }
    }

    /// Length in samples of the maximum filter applied to `spectrum`.
    pub fn max_filter_window(&self, spectrum: &AxisSpectrum) -> usize {
        let half = (self.max_filter_bins * spectrum.bin_spacing()).ceil().max(0.0) as usize;
        2 * half + 1
    }
}

/// Spectral peak retained for period estimation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectralPeak {
    pub index: usize,
    /// Cycles per pixel, refined between samples by a parabola through the
    /// peak and its neighbours.
    pub frequency: f64,
    /// Amplitude in dB.
    pub amplitude: f64,
    pub prominence: f64,
    pub width: f64,
    pub left_base: usize,
    pub right_base: usize,
}

/// Group of candidate periods.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateCluster {
    /// Indices into [`PeriodEstimate::candidates`].
    pub members: Vec<usize>,
    pub mean: f64,
}

impl CandidateCluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Outcome of tile-size estimation on one axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodEstimate {
    pub axis: Axis,
    /// Pixels per tile, 0 when undetected.
    pub tile: u32,
    /// Surviving peaks on the positive frequency half, ascending.
    pub peaks: Vec<SpectralPeak>,
    /// Candidate periods in pixels, one per consecutive peak pair.
    pub candidates: Vec<f64>,
    /// Candidate clusters in ascending value order.
    pub clusters: Vec<CandidateCluster>,
    /// Index of the dominant cluster, if any.
    pub dominant: Option<usize>,
    /// Length of the maximum filter used on this spectrum.
    pub max_filter_window: usize,
}

impl PeriodEstimate {
    fn undetected(axis: Axis, max_filter_window: usize) -> Self {
        Self {
            axis,
            tile: UNDETECTED_TILE,
            peaks: Vec::new(),
            candidates: Vec::new(),
            clusters: Vec::new(),
            dominant: None,
            max_filter_window,
        }
    }

    pub fn is_detected(&self) -> bool {
        self.tile != UNDETECTED_TILE
    }

    pub fn dominant_cluster(&self) -> Option<&CandidateCluster> {
        self.dominant.and_then(|i| self.clusters.get(i))
    }
}

/// Robust spectral peaks → candidate periods → dominant cluster.
#[derive(Clone, Debug, Default)]
pub struct PeakClusterer {
    options: PeriodOptions,
}

impl PeakClusterer {
    pub fn new(options: PeriodOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PeriodOptions {
        &self.options
    }

    /// Peaks of `spectrum` that are window maxima, pass the peak test, lie
    /// at positive frequency and within the amplitude range of the strongest.
    pub fn spectral_peaks(&self, spectrum: &AxisSpectrum) -> Vec<SpectralPeak> {
        let amp = &spectrum.amplitude;
        let filtered = maximum_filter(amp, self.options.max_filter_window(spectrum));
        let mut peaks: Vec<_> = find_peaks(amp, &self.options.peak_criteria())
            .into_iter()
            .filter(|p| amp[p.index] == filtered[p.index])
            .filter(|p| spectrum.frequency[p.index] > 0.0)
            .collect();

        let strongest = peaks.iter().map(|p| amp[p.index]).fold(f64::NEG_INFINITY, f64::max);
        peaks.retain(|p| amp[p.index] >= strongest - self.options.amplitude_range);

        let n = spectrum.padded_size as f64;
        let dc = spectrum.dc_index() as f64;
        peaks
            .into_iter()
            .map(|p| SpectralPeak {
                index: p.index,
                frequency: (refine_parabolic(amp, p.index) - dc) / n,
                amplitude: amp[p.index],
                prominence: p.prominence,
                width: p.width,
                left_base: p.left_base,
                right_base: p.right_base,
            })
            .collect()
    }

    pub fn estimate(&self, spectrum: &AxisSpectrum) -> PeriodEstimate {
        let axis = spectrum.axis;
        let max_filter_window = self.options.max_filter_window(spectrum);
        let peaks = self.spectral_peaks(spectrum);
        if peaks.len() < 2 {
            log::debug!(
                "period[{}]: {} spectral peak(s), periodicity not found",
                axis.label(),
                peaks.len()
            );
            return PeriodEstimate {
                peaks,
                ..PeriodEstimate::undetected(axis, max_filter_window)
            };
        }

        let candidates: Vec<f64> = peaks
            .windows(2)
            .map(|pair| 1.0 / (pair[1].frequency - pair[0].frequency))
            .collect();

        let clusters: Vec<CandidateCluster> = self
            .options
            .clustering
            .clusterer()
            .cluster(&candidates, self.options.cluster_distance)
            .into_iter()
            .map(|members| {
                let mean = members.iter().map(|&i| candidates[i]).sum::<f64>()
                    / members.len() as f64;
                CandidateCluster { members, mean }
            })
            .collect();

        // First of the largest clusters in ascending order.
        let dominant = clusters
            .iter()
            .enumerate()
            .fold(None::<(usize, usize)>, |best, (i, c)| match best {
                Some((_, len)) if len >= c.len() => best,
                _ => Some((i, c.len())),
            })
            .map(|(i, _)| i);

        let tile = match dominant.map(|i| &clusters[i]) {
            Some(c) if c.len() >= self.options.min_cluster_size && c.mean.is_finite() => {
                c.mean.round().max(0.0) as u32
            }
            Some(c) => {
                log::debug!(
                    "period[{}]: dominant cluster has {} member(s) (mean {:.2}), below {}",
                    axis.label(),
                    c.len(),
                    c.mean,
                    self.options.min_cluster_size
                );
                UNDETECTED_TILE
            }
            None => UNDETECTED_TILE,
        };

        log::debug!(
            "period[{}]: peaks={} candidates={} clusters={} tile={}",
            axis.label(),
            peaks.len(),
            candidates.len(),
            clusters.len(),
            tile
        );

        PeriodEstimate {
            axis,
            tile,
            peaks,
            candidates,
            clusters,
            dominant,
            max_filter_window,
        }
    }
}

/// Tile size along the spectrum's axis using `options`.
pub fn estimate_tile_size(spectrum: &AxisSpectrum, options: &PeriodOptions) -> PeriodEstimate {
    PeakClusterer::new(*options).estimate(spectrum)
}
