use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Axis-aligned ruled grid drawn over a uniform fill.
#[derive(Clone, Copy, Debug)]
pub struct RuledGrid {
    pub width: usize,
    pub height: usize,
    /// Period of the vertical lines; `None` draws no vertical lines.
    pub tile_x: Option<usize>,
    /// Period of the horizontal lines; `None` draws no horizontal lines.
    pub tile_y: Option<usize>,
    pub offset_x: usize,
    pub offset_y: usize,
    pub line_width: usize,
    pub fill: u8,
    pub line: u8,
}

impl RuledGrid {
    /// Dark 2 px lines (40) on a light fill (200) with the same tile and offset
    /// on both axes.
    pub fn square(width: usize, height: usize, tile: usize, offset: usize) -> Self {
        Self {
            width,
            height,
            tile_x: Some(tile),
            tile_y: Some(tile),
            offset_x: offset,
            offset_y: offset,
            line_width: 2,
            fill: 200,
            line: 40,
        }
    }

    pub fn with_tiles(mut self, tile_x: usize, tile_y: usize) -> Self {
        self.tile_x = Some(tile_x);
        self.tile_y = Some(tile_y);
        self
    }

    pub fn with_offsets(mut self, offset_x: usize, offset_y: usize) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }

    pub fn with_colors(mut self, fill: u8, line: u8) -> Self {
        self.fill = fill;
        self.line = line;
        self
    }

    fn on_line(pos: usize, tile: Option<usize>, offset: usize, line_width: usize) -> bool {
        match tile {
            Some(t) if t > 0 => (pos + t - offset % t) % t < line_width,
            _ => false,
        }
    }

    /// Tightly packed 8-bit gray pixels.
    pub fn render(&self) -> Vec<u8> {
        assert!(self.width > 0 && self.height > 0, "image dimensions must be positive");
        let mut img = vec![self.fill; self.width * self.height];
        for y in 0..self.height {
            let row_on = Self::on_line(y, self.tile_y, self.offset_y, self.line_width);
            for x in 0..self.width {
                if row_on || Self::on_line(x, self.tile_x, self.offset_x, self.line_width) {
                    img[y * self.width + x] = self.line;
                }
            }
        }
        img
    }
}

/// Two-tone checkerboard: squares switch fill at `offset + k * tile` on each
/// axis.
#[derive(Clone, Copy, Debug)]
pub struct Checkerboard {
    pub width: usize,
    pub height: usize,
    pub tile_x: usize,
    pub tile_y: usize,
    pub offset_x: usize,
    pub offset_y: usize,
    pub light: u8,
    pub dark: u8,
}

impl Checkerboard {
    /// Squares of 220 and 30 with the same tile and offset on both axes.
    pub fn square(width: usize, height: usize, tile: usize, offset: usize) -> Self {
        Self {
            width,
            height,
            tile_x: tile,
            tile_y: tile,
            offset_x: offset,
            offset_y: offset,
            light: 220,
            dark: 30,
        }
    }

    pub fn with_tiles(mut self, tile_x: usize, tile_y: usize) -> Self {
        self.tile_x = tile_x;
        self.tile_y = tile_y;
        self
    }

    pub fn with_offsets(mut self, offset_x: usize, offset_y: usize) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }

    fn cell(pos: usize, tile: usize, offset: usize) -> i64 {
        (pos as i64 - offset as i64).div_euclid(tile as i64)
    }

    /// Tightly packed 8-bit gray pixels.
    pub fn render(&self) -> Vec<u8> {
        assert!(self.tile_x > 0 && self.tile_y > 0, "tiles must be positive");
        let mut img = vec![self.dark; self.width * self.height];
        for y in 0..self.height {
            let row = Self::cell(y, self.tile_y, self.offset_y);
            for x in 0..self.width {
                let col = Self::cell(x, self.tile_x, self.offset_x);
                if (row + col).rem_euclid(2) == 0 {
                    img[y * self.width + x] = self.light;
                }
            }
        }
        img
    }
}

/// Adds zero-mean Gaussian noise, rounding and clamping back to 8 bits.
pub fn add_gaussian_noise(pixels: &mut [u8], sigma: f64, seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = Normal::new(0.0, sigma).expect("Invalid noise params");
    for px in pixels.iter_mut() {
        let v = f64::from(*px) + normal.sample(&mut rng);
        *px = v.round().clamp(0.0, 255.0) as u8;
    }
}

/// Swaps rows and columns of a tightly packed gray buffer.
pub fn transpose_u8(pixels: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut out = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            out[x * height + y] = pixels[y * width + x];
        }
    }
    out
}

/// Replicates every gray sample into interleaved R, G, B.
pub fn gray_to_rgb(pixels: &[u8]) -> Vec<u8> {
    pixels.iter().flat_map(|&v| [v, v, v]).collect()
}

/// Copies a tightly packed gray buffer into rows of `stride` bytes, filling the
/// padding with `pad`.
pub fn with_stride(pixels: &[u8], width: usize, height: usize, stride: usize, pad: u8) -> Vec<u8> {
    assert!(stride >= width, "stride must cover the row");
    let mut out = vec![pad; stride * height];
    for y in 0..height {
        out[y * stride..y * stride + width].copy_from_slice(&pixels[y * width..(y + 1) * width]);
    }
    out
}
