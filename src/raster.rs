use anyhow::{ensure, Context};
use log::debug;

use crate::pixel::Pixel;

const BYTES_PER_PIXEL: usize = 4;

const TRIANGLE_X: (f64, f64) = (0.25, 0.60);
const BAR_X: (f64, f64) = (0.68, 0.80);
const GLYPH_Y: (f64, f64) = (0.20, 0.80);

/// Row-major RGBA image. Always exactly `width * height * 4` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}
impl PixelBuffer {
    pub fn new(width: u32, height: u32, fill: Pixel) -> Self {
        let data = fill.to_rgba().repeat(width as usize * height as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// Wraps an existing RGBA byte vector, refusing any length other than
    /// `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> anyhow::Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
            .with_context(|| format!("{width}x{height} image is too large"))?;
        ensure!(
            data.len() == expected,
            "{width}x{height} RGBA image needs {expected} bytes, got {}",
            data.len()
        );
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
        let i = self.index(x, y)?;
        let mut rgba = [0; BYTES_PER_PIXEL];
        rgba.copy_from_slice(&self.data[i..i + BYTES_PER_PIXEL]);
        Some(rgba.into())
    }

    /// Writes one pixel. Coordinates outside the image are ignored and
    /// reported by returning `false`.
    pub fn set(&mut self, x: u32, y: u32, pixel: Pixel) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.data[i..i + BYTES_PER_PIXEL].copy_from_slice(&pixel.to_rgba());
                true
            }
            None => false,
        }
    }

    pub fn fill_rect(&mut self, region: Region, pixel: Pixel) {
        for y in region.top..region.bottom {
            for x in region.left..region.right {
                self.set(x, y, pixel);
            }
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// Half-open pixel rectangle `[left, right) x [top, bottom)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}
impl Region {
    fn from_fractions(size: u32, (left, right): (f64, f64), (top, bottom): (f64, f64)) -> Self {
        Self {
            left: scale(size, left),
            right: scale(size, right),
            top: scale(size, top),
            bottom: scale(size, bottom),
        }
    }

    /// Bounding box of the play triangle.
    pub fn triangle(size: u32) -> Self {
        Self::from_fractions(size, TRIANGLE_X, GLYPH_Y)
    }

    /// The vertical "skip" bar.
    pub fn bar(size: u32) -> Self {
        Self::from_fractions(size, BAR_X, GLYPH_Y)
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }
}

fn scale(size: u32, fraction: f64) -> u32 {
    (size as f64 * fraction).floor() as u32
}

/// Filled width of triangle row `y`: grows to the full box width at the
/// middle row and shrinks back towards the bottom.
fn triangle_row_width(triangle: &Region, y: u32) -> u32 {
    let progress = (y - triangle.top) as f64 / triangle.height() as f64;
    let factor = if progress <= 0.5 {
        progress * 2.0
    } else {
        (1.0 - progress) * 2.0
    };
    (triangle.width() as f64 * factor).floor() as u32
}

/// Renders the `size`x`size` skip icon: a right-pointing triangle and a bar
/// in the foreground color over the background.
pub fn render_icon(size: u32) -> PixelBuffer {
    let mut buffer = PixelBuffer::new(size, size, Pixel::BACKGROUND);

    let triangle = Region::triangle(size);
    for y in triangle.top..triangle.bottom {
        let row_width = triangle_row_width(&triangle, y);
        for x in triangle.left..triangle.left + row_width {
            buffer.set(x, y, Pixel::FOREGROUND);
        }
    }

    let bar = Region::bar(size);
    buffer.fill_rect(bar, Pixel::FOREGROUND);

    debug!("Rendered {size}x{size} icon, triangle {triangle:?}, bar {bar:?}");
    buffer
}
