use std::{iter::Peekable, marker::PhantomData};

use anyhow::{anyhow, bail, Context};
use log::debug;
use nom::{bytes::complete::tag, IResult};

use crate::chunks::{ihdr::IHDRChunk, iter_chunks, Chunk, ChunkIter};

pub const SIGNATURE: &[u8; 8] = b"\x89PNG\x0d\x0a\x1a\x0a";

/// Reads a PNG front to back. The type parameter tracks which part of the
/// stream comes next, so the header can't be skipped and image data can't
/// be read twice.
pub struct PNGDecoder<'a, State>(Peekable<ChunkIter<'a>>, PhantomData<State>);

pub struct Start;
pub struct Header;
pub struct Data;

impl<'a> PNGDecoder<'a, Start> {
    pub fn new(data: &'a [u8]) -> anyhow::Result<Self> {
        let (rest, _) = parse_signature(data)
            .map_err(|_| anyhow!("input doesn't start with expected signature"))?;
        Ok(Self(iter_chunks(rest).peekable(), PhantomData))
    }

    pub fn parse_ihdr(mut self) -> anyhow::Result<(PNGDecoder<'a, Header>, IHDRChunk)> {
        match self.0.next() {
            Some(Ok(Chunk::IHDR(ihdr))) => {
                debug!("{ihdr:?}");
                Ok((PNGDecoder(self.0, PhantomData), ihdr))
            }
            Some(Ok(chunk)) => bail!(
                "Expected IHDR as the first chunk, found {}",
                String::from_utf8_lossy(chunk.chunk_type())
            ),
            Some(Err(e)) => Err(e.context("Failed to read IHDR")),
            None => bail!("Missing IHDR"),
        }
    }
}

impl<'a> PNGDecoder<'a, Header> {
    /// Concatenates the payloads of the consecutive IDAT chunks, skipping any
    /// ancillary chunks in front of them.
    pub fn parse_idat(mut self) -> anyhow::Result<(PNGDecoder<'a, Data>, Vec<u8>)> {
        let mut data = vec![];
        let mut idat_count = 0;
        while let Some(Ok(chunk)) = self.0.peek() {
            match chunk {
                Chunk::IDAT(_) => {}
                Chunk::Unknown(_) if idat_count == 0 => {}
                _ if idat_count > 0 => break,
                chunk => bail!(
                    "Found {} before any IDAT",
                    String::from_utf8_lossy(chunk.chunk_type())
                ),
            }
            match self.0.next() {
                Some(Ok(Chunk::IDAT(idat))) => {
                    data.extend_from_slice(idat.data);
                    idat_count += 1;
                }
                Some(Ok(chunk)) => debug!(
                    "Skipping {} chunk",
                    String::from_utf8_lossy(chunk.chunk_type())
                ),
                _ => (),
            }
        }
        if idat_count == 0 {
            let err = match self.0.next() {
                Some(Err(e)) => e,
                _ => anyhow!("Couldn't find an IDAT"),
            };
            return Err(err.context("Failed to read image data"));
        }
        debug!("Read {idat_count} IDAT chunk(s), {} bytes", data.len());
        Ok((PNGDecoder(self.0, PhantomData), data))
    }
}

impl PNGDecoder<'_, Data> {
    /// Consumes the remaining chunks, which must end with IEND.
    pub fn finish(self) -> anyhow::Result<()> {
        for chunk in self.0 {
            match chunk.context("Failed to read trailing chunks")? {
                Chunk::IEND => return Ok(()),
                Chunk::IDAT(_) => bail!("IDAT chunks must be consecutive"),
                Chunk::IHDR(_) => bail!("Found a second IHDR"),
                Chunk::Unknown(_) => (),
            }
        }
        bail!("Missing IEND")
    }
}

pub(crate) fn parse_signature(input: &[u8]) -> IResult<&[u8], &[u8]> {
    tag(SIGNATURE.as_slice())(input)
}
