use anyhow::Context;
use log::debug;
use miniz_oxide::{deflate::compress_to_vec_zlib, inflate::decompress_to_vec_zlib};

use crate::{
    chunks::ihdr::IHDRChunk,
    scanlines::{from_scanlines, to_scanlines},
};

const COMPRESSION_LEVEL: u8 = 9;

/// Builds the zlib stream stored in IDAT from raw RGBA pixels.
pub(crate) fn compress_data(pixels: &[u8], header: &IHDRChunk) -> Vec<u8> {
    let data = to_scanlines(pixels, header);
    let compressed = compress_to_vec_zlib(&data, COMPRESSION_LEVEL);
    debug!(
        "Compressed {} bytes of scanlines into {} bytes",
        data.len(),
        compressed.len()
    );
    compressed
}

pub(crate) fn decompress_data(
    compressed_data: &[u8],
    header: &IHDRChunk,
) -> anyhow::Result<Vec<u8>> {
    let data =
        decompress_to_vec_zlib(compressed_data).context("Failed to decompress image data.")?;
    from_scanlines(&data, header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zlib_wrapped() {
        let header = IHDRChunk::rgba8(4, 4);
        let compressed = compress_data(&[7; 64], &header);
        // deflate with a 32K window
        assert_eq!(compressed[0], 0x78);
        assert_eq!(u16::from_be_bytes([compressed[0], compressed[1]]) % 31, 0);
    }

    #[test]
    fn restores_pixels() {
        let header = IHDRChunk::rgba8(3, 2);
        let pixels: Vec<u8> = (0..24).collect();
        let compressed = compress_data(&pixels, &header);
        assert_eq!(decompress_data(&compressed, &header).unwrap(), pixels);
    }

    #[test]
    fn garbage_is_an_error() {
        let header = IHDRChunk::rgba8(1, 1);
        assert!(decompress_data(&[1, 2, 3, 4], &header).is_err());
    }
}
