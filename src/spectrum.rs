//! Axis amplitude spectra of the gradient field.
//!
//! The field is placed in the top-left corner of an `N × N` zero buffer with
//! `N = max(width, height, padding)`. After centering zero frequency, the row
//! through the origin of the 2D transform describes periodicity along x and the
//! column through it periodicity along y.
//!
//! Those two slices are all the later stages read. The row at zero vertical
//! frequency is exactly the 1D transform of the column-sum projection padded to
//! `N` (and the column the transform of the row sums), so only two length-`N`
//! transforms are evaluated instead of the full `N²` grid.
//!
//! Amplitudes are in decibels, `20·log10(|c|·w + ε)`, where `w` is the optional
//! Hann taper (1 when disabled).
use crate::image::ImageF32;
use crate::types::Axis;
use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Options for [`SpectralAnalyzer`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumOptions {
    /// Minimum transform side. Larger values give finer frequency resolution.
    pub padding: usize,
    /// Multiply the centered magnitudes by a Hann taper before the logarithm.
    pub windowing: bool,
    /// Added to the magnitude before taking the logarithm.
    pub epsilon: f64,
}

impl Default for SpectrumOptions {
    fn default() -> Self {
        Self {
            padding: 4096,
            windowing: false,
            epsilon: 1e-8,
        }
    }
}

/// Centered amplitude spectrum along one axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisSpectrum {
    pub axis: Axis,
    /// Transform length `N`.
    pub padded_size: usize,
    /// Projection samples before zero padding.
    pub signal_len: usize,
    /// Signed frequency in cycles per pixel, ascending, zero at index `N / 2`.
    pub frequency: Vec<f64>,
    /// Amplitude in dB, aligned with `frequency`.
    pub amplitude: Vec<f64>,
}

impl AxisSpectrum {
    pub fn len(&self) -> usize {
        self.amplitude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amplitude.is_empty()
    }

    /// Index of the zero-frequency sample.
    pub fn dc_index(&self) -> usize {
        self.padded_size / 2
    }

    /// Samples per frequency bin of the unpadded projection (`N / len`), the
    /// spacing of the leakage side lobes around every peak.
    pub fn bin_spacing(&self) -> f64 {
        if self.signal_len == 0 {
            return 1.0;
        }
        self.padded_size as f64 / self.signal_len as f64
    }
}

/// Spectra for both axes of one field.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Spectra {
    pub x: AxisSpectrum,
    pub y: AxisSpectrum,
}

/// Computes [`AxisSpectrum`]s from gradient fields.
#[derive(Clone, Debug, Default)]
pub struct SpectralAnalyzer {
    options: SpectrumOptions,
}

impl SpectralAnalyzer {
    pub fn new(options: SpectrumOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SpectrumOptions {
        &self.options
    }

    /// Side of the square transform buffer for a `width × height` field.
    pub fn padded_size(&self, width: usize, height: usize) -> usize {
        width.max(height).max(self.options.padding)
    }

    /// Spectrum along `axis` of the padded field.
    pub fn axis_spectrum(&self, field: &ImageF32, axis: Axis) -> AxisSpectrum {
        let n = self.padded_size(field.w, field.h);
        let projection = field.projection_sums(axis);
        self.projection_spectrum(&projection, n, axis)
    }

    /// Both axis spectra, sharing one padded size.
    pub fn analyze(&self, field: &ImageF32) -> Spectra {
        Spectra {
            x: self.axis_spectrum(field, Axis::X),
            y: self.axis_spectrum(field, Axis::Y),
        }
    }

    /// Centered spectrum of a 1D projection zero-padded to `n` samples.
    ///
    /// Projections longer than `n` are truncated.
    pub fn projection_spectrum(&self, projection: &[f64], n: usize, axis: Axis) -> AxisSpectrum {
        if n == 0 {
            return AxisSpectrum {
                axis,
                padded_size: 0,
                signal_len: 0,
                frequency: Vec::new(),
                amplitude: Vec::new(),
            };
        }

        let mut buffer: Vec<Complex<f64>> = vec![Complex::new(0.0, 0.0); n];
        for (dst, &v) in buffer.iter_mut().zip(projection) {
            *dst = Complex::new(v, 0.0);
        }
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(n);
        fft.process(&mut buffer);

        let half = n / 2;
        let eps = self.options.epsilon;
        let frequency: Vec<f64> = (0..n).map(|j| (j as f64 - half as f64) / n as f64).collect();
        let amplitude: Vec<f64> = (0..n)
            .map(|j| {
                let c = buffer[(j + n - half) % n];
                let weight = if self.options.windowing {
                    hann(j, n)
                } else {
                    1.0
                };
                20.0 * (c.norm() * weight + eps).log10()
            })
            .collect();

        AxisSpectrum {
            axis,
            padded_size: n,
            signal_len: projection.len().min(n),
            frequency,
            amplitude,
        }
    }
}

fn hann(j: usize, n: usize) -> f64 {
    0.5 * (1.0 - (2.0 * PI * j as f64 / n as f64).cos())
}
