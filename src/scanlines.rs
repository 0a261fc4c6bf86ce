use anyhow::{bail, ensure};

use crate::chunks::ihdr::IHDRChunk;

/// Filter type "None": the row bytes are stored unchanged.
pub(crate) const FILTER_NONE: u8 = 0;

/// Lays out `pixels` as the raw image stream: every row prefixed with a
/// filter byte of 0. `pixels` holds `header.height` rows of equal length.
pub(crate) fn to_scanlines(pixels: &[u8], header: &IHDRChunk) -> Vec<u8> {
    let height = header.height as usize;
    let row_length = pixels.len().checked_div(height).unwrap_or(0);
    let mut data = Vec::with_capacity(pixels.len() + height);
    for y in 0..height {
        data.push(FILTER_NONE);
        data.extend_from_slice(&pixels[y * row_length..(y + 1) * row_length]);
    }
    data
}

/// Strips the filter bytes back off. Only unfiltered rows are accepted.
pub(crate) fn from_scanlines(data: &[u8], header: &IHDRChunk) -> anyhow::Result<Vec<u8>> {
    let scanline_size = header.scanline_size()?;
    let expected = header.image_data_size()?;
    ensure!(
        data.len() == expected,
        "Expected {expected} bytes of image data, found {}",
        data.len()
    );
    let mut pixels = Vec::with_capacity(data.len() - header.height as usize);
    for (y, scanline) in data.chunks_exact(scanline_size).enumerate() {
        match scanline[0] {
            FILTER_NONE => pixels.extend_from_slice(&scanline[1..]),
            other => bail!("Row {y} uses filter type {other}, only None is supported"),
        }
    }
    Ok(pixels)
}
