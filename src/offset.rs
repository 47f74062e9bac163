//! Grid phase along one axis by normalized cross-correlation.
//!
//! The template is one tile of an idealized ruled line: `line_width` zeros
//! followed by ones. Template and projection are made zero-mean. The template
//! is then correlated at every relative shift: index `n` of the result
//! corresponds to the template starting at projection sample `n − (T − 1)`.
//! Each correlation is normalized by the template energy and the energy of the
//! projection window it overlaps, which makes the score independent of local
//! contrast.
//!
//! Near both ends the overlap is partial and the scores are unreliable, so a
//! border fraction is discarded before peak picking. A positive peak means
//! the lines are darker than the fill; a negative one (found on the negated
//! score) means they are lighter. The most prominent peak of either sign wins.
//!
//! Tiles with alternating fills (checkerboards) average out in the intensity
//! projection. When it has no usable peak, [`OffsetEstimator::estimate_with_edges`]
//! repeats the search on the edge profile, which has a sharp spike at every
//! tile boundary, using a 1-pixel template.
use crate::peaks::{find_peaks, Peak, PeakCriteria};
use crate::types::{Axis, UNDETERMINED_OFFSET};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetOptions {
    /// Width in pixels of the template line.
    pub line_width: usize,
    /// Fraction of the score discarded at each end.
    pub border_fraction: f64,
    /// Accepted peak widths (samples).
    pub min_width: f64,
    pub max_width: f64,
    /// Added to the normalizer.
    pub epsilon: f64,
    /// Minimum prominence in units of the retained score's standard deviation.
    pub prominence_scale: f64,
    /// Retry on the edge profile when the intensity projection has no peak.
    pub edge_fallback: bool,
    /// Template line width used on the edge profile.
    pub edge_line_width: usize,
}

impl Default for OffsetOptions {
    fn default() -> Self {
        Self {
            line_width: 2,
            border_fraction: 0.1,
            min_width: 0.0,
            max_width: 5.0,
            epsilon: 1e-12,
            prominence_scale: 1.0,
            edge_fallback: true,
            edge_line_width: 1,
        }
    }
}

/// Contrast of the grid lines against the tile fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Polarity {
    DarkLines,
    BrightLines,
}

/// Profile the phase was measured on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OffsetSource {
    /// Mean intensity along the orthogonal axis.
    Intensity,
    /// Mean absolute intensity step between neighbouring pixels.
    Edges,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetEstimate {
    pub axis: Axis,
    pub tile: u32,
    /// Phase in `[0, tile)`, or -1 when undetermined.
    pub offset: i32,
    /// Full normalized cross-correlation, length `len + tile − 1`.
    pub ncc: Vec<f64>,
    /// Samples discarded at each end of `ncc`.
    pub border: usize,
    /// Index into `ncc` of the selected peak.
    pub best_index: Option<usize>,
    /// Line contrast, known only for offsets measured on intensity.
    pub polarity: Option<Polarity>,
    pub prominence: Option<f64>,
    /// Profile of the selected peak.
    pub source: Option<OffsetSource>,
}

impl OffsetEstimate {
    /// Estimate with no phase and no correlation.
    pub fn undetermined(axis: Axis, tile: u32) -> Self {
        Self {
            axis,
            tile,
            offset: UNDETERMINED_OFFSET,
            ncc: Vec::new(),
            border: 0,
            best_index: None,
            polarity: None,
            prominence: None,
            source: None,
        }
    }

    pub fn is_determined(&self) -> bool {
        self.offset != UNDETERMINED_OFFSET
    }
}

/// Binary line template of length `tile`, zero-mean.
pub fn line_template(tile: usize, line_width: usize) -> Vec<f64> {
    let dark = line_width.min(tile);
    let mut t: Vec<f64> = (0..tile).map(|i| if i < dark { 0.0 } else { 1.0 }).collect();
    subtract_mean(&mut t);
    t
}

fn subtract_mean(values: &mut [f64]) {
    if values.is_empty() {
        return;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter_mut().for_each(|v| *v -= mean);
}

/// Normalized cross-correlation of a zero-mean `template` against a zero-mean
/// `signal` at every shift with at least one sample of overlap.
pub fn normalized_cross_correlation(signal: &[f64], template: &[f64], epsilon: f64) -> Vec<f64> {
    let m = signal.len();
    let t = template.len();
    if m == 0 || t == 0 {
        return Vec::new();
    }
    let template_energy: f64 = template.iter().map(|v| v * v).sum();

    let mut prefix = Vec::with_capacity(m + 1);
    prefix.push(0.0f64);
    for &v in signal {
        let last = prefix[prefix.len() - 1];
        prefix.push(last + v * v);
    }

    (0..m + t - 1)
        .map(|n| {
            // Template sample j aligns with signal sample j + n - (t - 1).
            let j_lo = (t - 1).saturating_sub(n);
            let j_hi = (m + t - 1 - n).min(t);
            let start = n + j_lo + 1 - t;
            let corr: f64 = template[j_lo..j_hi]
                .iter()
                .zip(&signal[start..start + (j_hi - j_lo)])
                .map(|(a, b)| a * b)
                .sum();
            let energy = (prefix[start + (j_hi - j_lo)] - prefix[start]).max(0.0);
            corr / ((energy * template_energy).sqrt() + epsilon)
        })
        .collect()
}

fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n).sqrt()
}

/// Estimates the grid phase of intensity projections.
#[derive(Clone, Debug, Default)]
pub struct OffsetEstimator {
    options: OffsetOptions,
}

impl OffsetEstimator {
    pub fn new(options: OffsetOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &OffsetOptions {
        &self.options
    }

    /// Phase of a grid with period `tile` in the mean-intensity `projection`
    /// along `axis`.
    pub fn estimate(&self, projection: &[f64], tile: u32, axis: Axis) -> OffsetEstimate {
        self.correlate(projection, tile, axis, OffsetSource::Intensity)
    }

    /// Like [`estimate`](Self::estimate), retrying on the `edges` profile
    /// (see [`ImageF32::step_means`](crate::image::ImageF32::step_means)) when
    /// the intensity projection has no correlation peak.
    pub fn estimate_with_edges(
        &self,
        projection: &[f64],
        edges: &[f64],
        tile: u32,
        axis: Axis,
    ) -> OffsetEstimate {
        let intensity = self.estimate(projection, tile, axis);
        if intensity.is_determined() || !self.options.edge_fallback || tile == 0 {
            return intensity;
        }
        let from_edges = self.correlate(edges, tile, axis, OffsetSource::Edges);
        if from_edges.is_determined() {
            from_edges
        } else {
            intensity
        }
    }

    fn correlate(
        &self,
        profile: &[f64],
        tile: u32,
        axis: Axis,
        source: OffsetSource,
    ) -> OffsetEstimate {
        if tile == 0 || profile.is_empty() {
            return OffsetEstimate::undetermined(axis, tile);
        }
        let t = tile as usize;
        let line_width = match source {
            OffsetSource::Intensity => self.options.line_width,
            OffsetSource::Edges => self.options.edge_line_width,
        };
        let template = line_template(t, line_width);
        let mut signal = profile.to_vec();
        subtract_mean(&mut signal);
        let ncc = normalized_cross_correlation(&signal, &template, self.options.epsilon);

        let len = ncc.len();
        let border = ((self.options.border_fraction * len as f64).floor().max(0.0) as usize)
            .min(len / 2);
        let retained = &ncc[border..len - border];
        let threshold = population_std(retained) * self.options.prominence_scale;
        let criteria = PeakCriteria {
            min_prominence: Some(threshold),
            min_width: Some(self.options.min_width),
            max_width: Some(self.options.max_width),
            prominence_window: None,
        };

        let negated: Vec<f64> = retained.iter().map(|v| -v).collect();
        let positive = find_peaks(retained, &criteria);
        let negative = find_peaks(&negated, &criteria);
        let best = strongest(
            positive
                .iter()
                .map(|p| (p, Polarity::DarkLines))
                .chain(negative.iter().map(|p| (p, Polarity::BrightLines))),
        );

        let Some((peak, polarity)) = best else {
            log::debug!(
                "offset[{}]: no correlation peak on {:?} for tile {} (threshold {:.4})",
                axis.label(),
                source,
                tile,
                threshold
            );
            return OffsetEstimate {
                ncc,
                border,
                ..OffsetEstimate::undetermined(axis, tile)
            };
        };

        let best_index = border + peak.index;
        let offset = (best_index as i64 - (t as i64 - 1)).rem_euclid(t as i64) as i32;
        let polarity = (source == OffsetSource::Intensity).then_some(polarity);
        log::debug!(
            "offset[{}]: tile={} offset={} source={:?} polarity={:?} prominence={:.4}",
            axis.label(),
            tile,
            offset,
            source,
            polarity,
            peak.prominence
        );

        OffsetEstimate {
            axis,
            tile,
            offset,
            ncc,
            border,
            best_index: Some(best_index),
            polarity,
            prominence: Some(peak.prominence),
            source: Some(source),
        }
    }
}

fn strongest<'a>(
    peaks: impl Iterator<Item = (&'a Peak, Polarity)>,
) -> Option<(&'a Peak, Polarity)> {
    peaks.fold(None, |best, cur| match best {
        Some((b, _)) if b.prominence >= cur.0.prominence => best,
        _ => Some(cur),
    })
}

/// Phase of `projection` for a grid with period `tile`.
pub fn estimate_offset(
    projection: &[f64],
    tile: u32,
    axis: Axis,
    options: &OffsetOptions,
) -> OffsetEstimate {
    OffsetEstimator::new(*options).estimate(projection, tile, axis)
}
