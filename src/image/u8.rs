//! Borrowed 8-bit input buffers (gray or interleaved RGB) and luma reduction.
use super::ImageF32;
use crate::error::DetectError;

const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

/// Sample layout of an [`ImageU8`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// One byte per pixel.
    Gray,
    /// Three interleaved bytes per pixel in R, G, B order.
    Rgb,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::Rgb => 3,
        }
    }

    pub fn from_channels(channels: usize) -> Result<Self, DetectError> {
        match channels {
            1 => Ok(PixelFormat::Gray),
            3 => Ok(PixelFormat::Rgb),
            other => Err(DetectError::UnsupportedChannels(other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub format: PixelFormat,
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    /// Tightly packed single-channel buffer.
    pub fn gray(w: usize, h: usize, data: &'a [u8]) -> Self {
        Self {
            w,
            h,
            stride: w,
            format: PixelFormat::Gray,
            data,
        }
    }

    /// Tightly packed interleaved RGB buffer.
    pub fn rgb(w: usize, h: usize, data: &'a [u8]) -> Self {
        Self {
            w,
            h,
            stride: w * 3,
            format: PixelFormat::Rgb,
            data,
        }
    }

    /// Tightly packed buffer with an explicit channel count (1 or 3).
    pub fn from_raw(w: usize, h: usize, channels: usize, data: &'a [u8]) -> Result<Self, DetectError> {
        let format = PixelFormat::from_channels(channels)?;
        Ok(Self {
            w,
            h,
            stride: w * channels,
            format,
            data,
        })
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.w * self.channels()
    }

    /// Raw bytes of row `y` (`w * channels` samples).
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.row_bytes()]
    }

    /// Checks the geometry before any pixel is touched.
    pub fn validate(&self) -> Result<(), DetectError> {
        if self.w == 0 || self.h == 0 {
            return Err(DetectError::EmptyImage {
                width: self.w,
                height: self.h,
            });
        }
        if self.w < 2 || self.h < 2 {
            return Err(DetectError::TooSmall {
                width: self.w,
                height: self.h,
            });
        }
        let row_bytes = self.row_bytes();
        if self.stride < row_bytes {
            return Err(DetectError::InvalidStride {
                stride: self.stride,
                row_bytes,
            });
        }
        let expected = (self.h - 1) * self.stride + row_bytes;
        if self.data.len() < expected {
            return Err(DetectError::BufferTooShort {
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    /// Reduce to single-channel luma in `[0, 255]`.
    ///
    /// RGB input uses the BT.601 weights. Gray input is copied as-is.
    pub fn to_luma(&self) -> ImageF32 {
        let mut out = ImageF32::new(self.w, self.h);
        for y in 0..self.h {
            let src = self.row(y);
            let dst = &mut out.data[y * self.w..(y + 1) * self.w];
            match self.format {
                PixelFormat::Gray => {
                    for (d, &s) in dst.iter_mut().zip(src) {
                        *d = s as f32;
                    }
                }
                PixelFormat::Rgb => {
                    for (d, px) in dst.iter_mut().zip(src.chunks_exact(3)) {
                        *d = LUMA_R * px[0] as f32 + LUMA_G * px[1] as f32 + LUMA_B * px[2] as f32;
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageView;

    #[test]
    fn rejects_unsupported_channels() {
        let data = vec![0u8; 16];
        let err = ImageU8::from_raw(2, 2, 4, &data).unwrap_err();
        assert_eq!(err, DetectError::UnsupportedChannels(4));
    }

    #[test]
    fn validate_reports_degenerate_geometry() {
        let empty: [u8; 0] = [];
        assert!(matches!(
            ImageU8::gray(0, 5, &empty).validate(),
            Err(DetectError::EmptyImage { .. })
        ));
        let one = [7u8];
        assert!(matches!(
            ImageU8::gray(1, 1, &one).validate(),
            Err(DetectError::TooSmall { .. })
        ));
        let short = [0u8; 5];
        assert!(matches!(
            ImageU8::gray(3, 2, &short).validate(),
            Err(DetectError::BufferTooShort {
                expected: 6,
                actual: 5
            })
        ));
        let strided = ImageU8 {
            w: 4,
            h: 2,
            stride: 3,
            format: PixelFormat::Gray,
            data: &[0u8; 8],
        };
        assert!(matches!(
            strided.validate(),
            Err(DetectError::InvalidStride { .. })
        ));
    }

    #[test]
    fn strided_rows_skip_padding() {
        let data = [1u8, 2, 99, 3, 4, 99];
        let img = ImageU8 {
            w: 2,
            h: 2,
            stride: 3,
            format: PixelFormat::Gray,
            data: &data,
        };
        assert!(img.validate().is_ok());
        let luma = img.to_luma();
        assert_eq!(luma.row(0), &[1.0, 2.0]);
        assert_eq!(luma.row(1), &[3.0, 4.0]);
    }

    #[test]
    fn rgb_luma_uses_bt601_weights() {
        let data = [255u8, 0, 0, 0, 255, 0, 0, 0, 255, 10, 10, 10];
        let img = ImageU8::rgb(2, 2, &data);
        let luma = img.to_luma();
        assert!((luma.get(0, 0) - 76.245).abs() < 1e-3);
        assert!((luma.get(1, 0) - 149.685).abs() < 1e-3);
        assert!((luma.get(0, 1) - 29.07).abs() < 1e-3);
        assert!((luma.get(1, 1) - 10.0).abs() < 1e-3);
    }
}
