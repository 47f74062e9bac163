//! Sobel gradients and the normalized gradient-magnitude field.
//!
//! - Convolves the 3×3 Sobel pair (`X` and `Y`) with border clamping.
//! - Outputs per‑pixel `gx`, `gy`, `mag = sqrt(gx^2+gy^2)`.
//! - [`gradient_field`] rescales the magnitude linearly onto `[0, 255]`.
//!
//! Grid lines are thin, high-contrast features. Their gradient magnitude is a
//! sparse periodic pulse train, whose spectrum shows sharp harmonics, while raw
//! intensity is dominated by low-frequency content.
//!
//! Complexity: O(W·H) per pass; memory: three float buffers.
use crate::image::{ImageF32, ImageView, ImageViewMut};

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Upper end of the normalized gradient range.
pub const GRADIENT_RANGE: f32 = 255.0;

/// Per‑pixel gradient buffers.
#[derive(Clone, Debug)]
pub struct Grad {
    /// Horizontal derivative (convolution with kernel X)
    pub gx: ImageF32,
    /// Vertical derivative (convolution with kernel Y)
    pub gy: ImageF32,
    /// Euclidean magnitude per pixel: `sqrt(gx^2 + gy^2)`
    pub mag: ImageF32,
}

fn gradients_with_kernels(l: &ImageF32, kernel_x: &Kernel3, kernel_y: &Kernel3) -> Grad {
    let w = l.w;
    let h = l.h;
    let mut gx = ImageF32::new(w, h);
    let mut gy = ImageF32::new(w, h);
    let mut mag = ImageF32::new(w, h);

    if w == 0 || h == 0 {
        return Grad { gx, gy, mag };
    }

    for y in 0..h {
        let y_idx = [y.saturating_sub(1), y, (y + 1).min(h - 1)];
        let rows = [l.row(y_idx[0]), l.row(y_idx[1]), l.row(y_idx[2])];
        let out_gx = gx.row_mut(y);
        let out_gy = gy.row_mut(y);
        let out_mag = mag.row_mut(y);
        for x in 0..w {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];

            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            for (ky, yy_row) in rows.iter().enumerate() {
                let kx_row = &kernel_x[ky];
                let ky_row = &kernel_y[ky];
                sum_x += yy_row[x_idx[0]] * kx_row[0]
                    + yy_row[x_idx[1]] * kx_row[1]
                    + yy_row[x_idx[2]] * kx_row[2];
                sum_y += yy_row[x_idx[0]] * ky_row[0]
                    + yy_row[x_idx[1]] * ky_row[1]
                    + yy_row[x_idx[2]] * ky_row[2];
            }

            out_gx[x] = sum_x;
            out_gy[x] = sum_y;
            out_mag[x] = (sum_x * sum_x + sum_y * sum_y).sqrt();
        }
    }

    Grad { gx, gy, mag }
}

/// Compute Sobel gradients on a single‑channel float image.
pub fn sobel_gradients(l: &ImageF32) -> Grad {
    gradients_with_kernels(l, &SOBEL_KERNEL_X, &SOBEL_KERNEL_Y)
}

/// Gradient magnitude of `luma`, linearly rescaled so its minimum maps to 0
/// and its maximum to [`GRADIENT_RANGE`].
///
/// A constant magnitude (zero range) yields an all-zero field.
pub fn gradient_field(luma: &ImageF32) -> ImageF32 {
    let mut mag = sobel_gradients(luma).mag;
    normalize_in_place(&mut mag);
    mag
}

fn normalize_in_place(img: &mut ImageF32) {
    let Some((lo, hi)) = img.min_max() else {
        return;
    };
    let range = hi - lo;
    if !(range > 0.0) || !range.is_finite() {
        img.data.iter_mut().for_each(|v| *v = 0.0);
        return;
    }
    let scale = GRADIENT_RANGE / range;
    for y in 0..img.h {
        for v in img.row_mut(y) {
            *v = (*v - lo) * scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical_line(w: usize, h: usize, x0: usize) -> ImageF32 {
        let mut img = ImageF32::new(w, h);
        for y in 0..h {
            for x in 0..w {
                img.set(x, y, if x == x0 || x == x0 + 1 { 0.0 } else { 200.0 });
            }
        }
        img
    }

    #[test]
    fn sobel_responds_only_across_a_vertical_line() {
        let img = vertical_line(12, 6, 5);
        let grad = sobel_gradients(&img);
        for y in 0..6 {
            assert_eq!(grad.gy.get(5, y), 0.0);
            assert_eq!(grad.gx.get(4, y), -800.0);
            assert_eq!(grad.gx.get(7, y), 800.0);
            assert_eq!(grad.mag.get(0, y), 0.0);
        }
    }

    #[test]
    fn gradient_field_spans_full_range() {
        let field = gradient_field(&vertical_line(12, 6, 5));
        let (lo, hi) = field.min_max().unwrap();
        assert_eq!(lo, 0.0);
        assert!((hi - GRADIENT_RANGE).abs() < 1e-4);
    }

    #[test]
    fn constant_image_gives_zero_field() {
        let mut img = ImageF32::new(8, 8);
        img.data.iter_mut().for_each(|v| *v = 77.0);
        let field = gradient_field(&img);
        assert!(field.data.iter().all(|&v| v == 0.0));
    }
}
