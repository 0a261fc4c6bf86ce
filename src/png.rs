use anyhow::ensure;
use log::debug;

use crate::{
    chunks::{
        ihdr::{ColorType, IHDRChunk, Interlacing},
        IDATChunk, IENDChunk, ParseableChunk,
    },
    decoder::{PNGDecoder, SIGNATURE},
    image_data::{compress_data, decompress_data},
    pixel::Pixel,
    raster::PixelBuffer,
};

/// An 8-bit RGBA, non-interlaced PNG image held fully in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PNG {
    pixels: PixelBuffer,
}

impl PNG {
    /// Fails when `pixels` is not exactly `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> anyhow::Result<Self> {
        Ok(Self {
            pixels: PixelBuffer::from_rgba(width, height, pixels)?,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        self.pixels.get(x, y)
    }

    pub fn into_pixels(self) -> PixelBuffer {
        self.pixels
    }

    /// Serializes the image as signature, IHDR, a single IDAT and IEND.
    pub fn encode(&self) -> Vec<u8> {
        let header = IHDRChunk::rgba8(self.width(), self.height());
        write_png(&header, self.pixels.as_bytes())
    }

    /// Reads back an image in the format `encode` writes. Other color
    /// types, bit depths, interlacing or filtered rows are refused.
    pub fn decode(bytes: &[u8]) -> anyhow::Result<Self> {
        let decoder = PNGDecoder::new(bytes)?;
        let (decoder, header) = decoder.parse_ihdr()?;
        check_supported(&header)?;
        let (decoder, compressed) = decoder.parse_idat()?;
        decoder.finish()?;
        let pixels = decompress_data(&compressed, &header)?;
        Self::new(header.width, header.height, pixels)
    }
}

impl From<PixelBuffer> for PNG {
    fn from(pixels: PixelBuffer) -> Self {
        Self { pixels }
    }
}

/// Encodes a raw RGBA buffer, failing fast when its length doesn't match
/// the dimensions.
pub fn encode_rgba(width: u32, height: u32, pixels: &[u8]) -> anyhow::Result<Vec<u8>> {
    let header = IHDRChunk::rgba8(width, height);
    let expected = header.image_data_size()? - height as usize;
    ensure!(
        pixels.len() == expected,
        "{width}x{height} RGBA image needs {expected} bytes, got {}",
        pixels.len()
    );
    Ok(write_png(&header, pixels))
}

fn write_png(header: &IHDRChunk, pixels: &[u8]) -> Vec<u8> {
    let compressed = compress_data(pixels, header);
    let mut bytes = SIGNATURE.to_vec();
    bytes.extend(header.to_bytes());
    bytes.extend(IDATChunk { data: &compressed }.to_bytes());
    bytes.extend(IENDChunk.to_bytes());
    debug!(
        "Encoded {}x{} image into {} bytes",
        header.width,
        header.height,
        bytes.len()
    );
    bytes
}

fn check_supported(header: &IHDRChunk) -> anyhow::Result<()> {
    ensure!(
        header.bit_depth == 8,
        "Unsupported bit depth {}",
        header.bit_depth
    );
    ensure!(
        header.color_type == ColorType::TruecolorWithAlpha,
        "Unsupported color type {:?}",
        header.color_type
    );
    ensure!(
        header.compression_method == 0,
        "Unknown compression method {}",
        header.compression_method
    );
    ensure!(
        header.filter_method == 0,
        "Unknown filter method {}",
        header.filter_method
    );
    ensure!(
        header.interlace_method == Interlacing::None,
        "Interlaced images are not supported"
    );
    Ok(())
}
