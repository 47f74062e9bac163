//! 1D peak finding with prominence and width tests, plus a sliding maximum.
//!
//! Semantics follow the conventions common in signal-processing toolkits:
//!
//! - A local maximum is a sample strictly higher than its left neighbour and
//!   higher than the first differing sample to its right. Flat tops resolve to
//!   their midpoint (rounded down).
//! - Prominence is the height of the peak above the higher of its two bases.
//!   Each base is the lowest sample reached while walking outward until a
//!   higher sample (or the search window edge) is met.
//! - Width is measured at half the prominence, with linear interpolation,
//!   and never extends past the bases.
//!
//! The optional prominence window bounds the base search to `window / 2`
//! samples on each side. Without it, a deep isolated null far away from the peak
//! can inflate the prominence of every harmonic in a log spectrum.
use serde::{Deserialize, Serialize};

/// A peak that passed [`PeakCriteria`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peak {
    pub index: usize,
    pub prominence: f64,
    /// Width in samples at half prominence.
    pub width: f64,
    pub left_base: usize,
    pub right_base: usize,
}

/// Acceptance tests applied by [`find_peaks`]. `None` disables a bound.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakCriteria {
    pub min_prominence: Option<f64>,
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
    /// Length of the window the base search is confined to (values < 2 disable it).
    pub prominence_window: Option<usize>,
}

/// Local maxima of `x`, flat tops reduced to their midpoint.
pub fn local_maxima(x: &[f64]) -> Vec<usize> {
    let n = x.len();
    let mut out = Vec::new();
    if n < 3 {
        return out;
    }
    let last = n - 1;
    let mut i = 1;
    while i < last {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < last && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                out.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    out
}

/// Prominence of the peak at `peak` with its left and right base indices.
pub fn prominence(x: &[f64], peak: usize, window: Option<usize>) -> (f64, usize, usize) {
    let n = x.len();
    let mut lo = 0usize;
    let mut hi = n - 1;
    if let Some(wlen) = window.filter(|&w| w >= 2) {
        lo = peak.saturating_sub(wlen / 2);
        hi = (peak + wlen / 2).min(n - 1);
    }
    let top = x[peak];

    let mut left_base = peak;
    let mut left_min = top;
    let mut i = peak;
    loop {
        if x[i] > top {
            break;
        }
        if x[i] < left_min {
            left_min = x[i];
            left_base = i;
        }
        if i == lo {
            break;
        }
        i -= 1;
    }

    let mut right_base = peak;
    let mut right_min = top;
    let mut i = peak;
    while i <= hi && x[i] <= top {
        if x[i] < right_min {
            right_min = x[i];
            right_base = i;
        }
        i += 1;
    }

    (top - left_min.max(right_min), left_base, right_base)
}

/// Width of a peak at `rel_height` of its prominence, bounded by the bases.
pub fn width_at(
    x: &[f64],
    peak: usize,
    prominence: f64,
    left_base: usize,
    right_base: usize,
    rel_height: f64,
) -> f64 {
    let height = x[peak] - prominence * rel_height;

    let mut i = peak;
    while left_base < i && height < x[i] {
        i -= 1;
    }
    let mut left = i as f64;
    if x[i] < height {
        left += (height - x[i]) / (x[i + 1] - x[i]);
    }

    let mut i = peak;
    while i < right_base && height < x[i] {
        i += 1;
    }
    let mut right = i as f64;
    if x[i] < height {
        right -= (height - x[i]) / (x[i - 1] - x[i]);
    }

    right - left
}

/// Peaks of `x` that satisfy `criteria`, in ascending index order.
pub fn find_peaks(x: &[f64], criteria: &PeakCriteria) -> Vec<Peak> {
    local_maxima(x)
        .into_iter()
        .filter_map(|index| {
            let (prom, left_base, right_base) = prominence(x, index, criteria.prominence_window);
            if criteria.min_prominence.is_some_and(|min| prom < min) {
                return None;
            }
            let width = width_at(x, index, prom, left_base, right_base, 0.5);
            if criteria.min_width.is_some_and(|min| width < min)
                || criteria.max_width.is_some_and(|max| width > max)
            {
                return None;
            }
            Some(Peak {
                index,
                prominence: prom,
                width,
                left_base,
                right_base,
            })
        })
        .collect()
}

/// Sliding maximum over `size` samples centred on each index, with the signal
/// mirrored at both ends (`d c b a | a b c d | d c b a`).
pub fn maximum_filter(x: &[f64], size: usize) -> Vec<f64> {
    let n = x.len();
    if n == 0 || size <= 1 {
        return x.to_vec();
    }
    let before = size / 2;
    let after = size - 1 - before;
    let period = 2 * n as isize;
    let reflect = |k: isize| -> f64 {
        let m = k.rem_euclid(period) as usize;
        if m < n {
            x[m]
        } else {
            x[2 * n - 1 - m]
        }
    };
    let extended: Vec<f64> = (-(before as isize)..(n + after) as isize)
        .map(reflect)
        .collect();
    extended
        .windows(size)
        .map(|w| w.iter().copied().fold(f64::NEG_INFINITY, f64::max))
        .collect()
}

/// Sub-sample position of the peak at `index` from a parabola through it and
/// its two neighbours. Falls back to `index` at the ends or on a flat top.
pub fn refine_parabolic(x: &[f64], index: usize) -> f64 {
    if index == 0 || index + 1 >= x.len() {
        return index as f64;
    }
    let (l, c, r) = (x[index - 1], x[index], x[index + 1]);
    let denom = 2.0 * (l + r - 2.0 * c);
    if denom.abs() <= 1e-10 {
        return index as f64;
    }
    index as f64 + ((l - r) / denom).clamp(-0.5, 0.5)
}
