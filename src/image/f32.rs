//! Owned single-channel f32 image in row-major layout (stride == width).
//!
//! Used for the luma plane and the gradient field. Besides row access it
//! provides the axis projections consumed by the spectral and phase stages:
//! column sums/means collapse the rows (a signal along x), row sums/means
//! collapse the columns (a signal along y). Projections accumulate in f64.
use crate::types::Axis;

#[derive(Clone, Debug)]
pub struct ImageF32 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Number of f32 elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![0.0; w * h],
        }
    }
    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    /// Get the pixel value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    /// Set the pixel value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Smallest and largest sample, `None` for an empty image.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        let mut it = self.data.iter().copied();
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Sum over rows for every column (length `w`).
    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0f64; self.w];
        for y in 0..self.h {
            let row = &self.data[y * self.stride..y * self.stride + self.w];
            for (acc, &v) in sums.iter_mut().zip(row) {
                *acc += v as f64;
            }
        }
        sums
    }

    /// Sum over columns for every row (length `h`).
    pub fn row_sums(&self) -> Vec<f64> {
        (0..self.h)
            .map(|y| {
                self.data[y * self.stride..y * self.stride + self.w]
                    .iter()
                    .fold(0.0f64, |acc, &v| acc + v as f64)
            })
            .collect()
    }

    /// Projection whose index runs along `axis`, summed over the other axis.
    pub fn projection_sums(&self, axis: Axis) -> Vec<f64> {
        match axis {
            Axis::X => self.column_sums(),
            Axis::Y => self.row_sums(),
        }
    }

    /// Mean intensity along the orthogonal axis for every position on `axis`.
    pub fn projection_means(&self, axis: Axis) -> Vec<f64> {
        let (sums, count) = match axis {
            Axis::X => (self.column_sums(), self.h),
            Axis::Y => (self.row_sums(), self.w),
        };
        if count == 0 {
            return sums;
        }
        let inv = 1.0 / count as f64;
        sums.into_iter().map(|s| s * inv).collect()
    }

    /// Mean absolute step `|v(p) − v(p − 1)|` along `axis`, averaged over the
    /// orthogonal axis. The first sample has no predecessor and is 0.
    pub fn step_means(&self, axis: Axis) -> Vec<f64> {
        match axis {
            Axis::X => {
                let mut sums = vec![0.0f64; self.w];
                for y in 0..self.h {
                    let row = &self.data[y * self.stride..y * self.stride + self.w];
                    for (x, pair) in row.windows(2).enumerate() {
                        sums[x + 1] += (pair[1] as f64 - pair[0] as f64).abs();
                    }
                }
                if self.h > 0 {
                    let inv = 1.0 / self.h as f64;
                    sums.iter_mut().for_each(|s| *s *= inv);
                }
                sums
            }
            Axis::Y => {
                let mut means = vec![0.0f64; self.h];
                if self.w == 0 {
                    return means;
                }
                let inv = 1.0 / self.w as f64;
                for y in 1..self.h {
                    let prev = &self.data[(y - 1) * self.stride..(y - 1) * self.stride + self.w];
                    let row = &self.data[y * self.stride..y * self.stride + self.w];
                    let sum: f64 = row
                        .iter()
                        .zip(prev)
                        .map(|(&a, &b)| (a as f64 - b as f64).abs())
                        .sum();
                    means[y] = sum * inv;
                }
                means
            }
        }
    }

    /// Swap rows and columns.
    pub fn transposed(&self) -> ImageF32 {
        let mut out = ImageF32::new(self.h, self.w);
        for y in 0..self.h {
            for x in 0..self.w {
                out.set(y, x, self.get(x, y));
            }
        }
        out
    }
}

impl crate::image::traits::ImageView for ImageF32 {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

impl crate::image::traits::ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}
