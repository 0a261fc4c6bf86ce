use nom::{
    bytes::complete::{tag, take},
    combinator::{all_consuming, map_res},
    number::complete::be_u32,
    IResult,
};

use crate::crc::chunk_crc;

pub mod idat;
pub mod iend;
pub mod ihdr;

pub use idat::IDATChunk;
pub use iend::IENDChunk;
pub use ihdr::IHDRChunk;

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug)]
pub enum Chunk<'a> {
    IHDR(IHDRChunk),
    IDAT(IDATChunk<'a>),
    IEND,
    Unknown(RawChunk<'a>),
}
impl Chunk<'_> {
    pub fn chunk_type(&self) -> &[u8; 4] {
        match self {
            Chunk::IHDR(_) => IHDRChunk::HEADER,
            Chunk::IDAT(_) => IDATChunk::HEADER,
            Chunk::IEND => IENDChunk::HEADER,
            Chunk::Unknown(raw) => raw.chunk_type,
        }
    }

    pub fn payload_len(&self) -> usize {
        match self {
            Chunk::IHDR(ihdr) => ihdr.payload().len(),
            Chunk::IDAT(idat) => idat.data.len(),
            Chunk::IEND => 0,
            Chunk::Unknown(raw) => raw.chunk_data.len(),
        }
    }
}

#[derive(Debug)]
pub struct RawChunk<'a> {
    pub chunk_type: &'a [u8; 4],
    pub chunk_data: &'a [u8],
}

pub fn iter_chunks(source: &[u8]) -> ChunkIter {
    ChunkIter {
        source,
        finished: false,
    }
}

/// Walks the chunks following the signature. Stops after IEND or the first
/// malformed chunk, whichever comes first.
pub struct ChunkIter<'a> {
    source: &'a [u8],
    finished: bool,
}
impl<'a> ChunkIter<'a> {
    /// Bytes not consumed yet.
    pub fn remaining(&self) -> &'a [u8] {
        self.source
    }
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = anyhow::Result<Chunk<'a>>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match parse_chunk(self.source) {
            Ok((rest, chunk)) => {
                self.source = rest;
                if matches!(chunk, Chunk::IEND) {
                    self.finished = true;
                }
                Some(Ok(chunk))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e.to_owned().into()))
            }
        }
    }
}

pub(crate) fn parse_chunk(input: &[u8]) -> IResult<&[u8], Chunk<'_>> {
    let (rest, (header, chunk_data)) = valid_chunk(input)?;
    let chunk = match header {
        IHDRChunk::HEADER => {
            Chunk::IHDR(all_consuming(IHDRChunk::from_bytes)(chunk_data)?.1)
        }
        IDATChunk::HEADER => Chunk::IDAT(IDATChunk::from_bytes(chunk_data)?.1),
        IENDChunk::HEADER => {
            all_consuming(IENDChunk::from_bytes)(chunk_data)?;
            Chunk::IEND
        }
        _ => Chunk::Unknown(RawChunk {
            chunk_type: header,
            chunk_data,
        }),
    };
    Ok((rest, chunk))
}

/// Splits one chunk off `input`, returning its tag and payload once the
/// trailing CRC has been checked.
fn valid_chunk(input: &[u8]) -> IResult<&[u8], (&[u8; 4], &[u8])> {
    let (input, length) = be_u32(input)?;
    let (input, chunk_type) =
        map_res(take(4usize), <&[u8; 4] as TryFrom<&[u8]>>::try_from)(input)?;
    let (input, payload) = take(length)(input)?;
    let crc = chunk_crc(chunk_type, payload).to_be_bytes();
    let (input, _) = tag(crc.as_slice())(input)?;
    Ok((input, (chunk_type, payload)))
}

/// Frames `payload` as a chunk: length, tag, payload, then the CRC of tag
/// and payload. All integers are big-endian.
pub fn write_chunk(chunk_type: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(payload.len() + 12);
    bytes.extend((payload.len() as u32).to_be_bytes());
    bytes.extend(chunk_type);
    bytes.extend(payload);
    bytes.extend(chunk_crc(chunk_type, payload).to_be_bytes());
    bytes
}

pub trait ParseableChunk<'a>: Sized {
    type Payload: AsRef<[u8]>;
    const HEADER: &'static [u8; 4];

    fn from_bytes(chunk_data: &'a [u8]) -> IResult<&'a [u8], Self>;
    fn payload(&self) -> Self::Payload;

    fn to_bytes(&self) -> Vec<u8> {
        write_chunk(Self::HEADER, self.payload().as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framing() {
        let chunk = write_chunk(b"tEXt", b"hi");
        assert_eq!(&chunk[0..4], &[0, 0, 0, 2]);
        assert_eq!(&chunk[4..8], b"tEXt");
        assert_eq!(&chunk[8..10], b"hi");
        assert_eq!(chunk.len(), 14);
    }

    #[test]
    fn empty_iend() {
        assert_eq!(
            write_chunk(b"IEND", &[]),
            [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xae, 0x42, 0x60, 0x82]
        );
    }

    #[test]
    fn unknown_chunks_are_kept() {
        let bytes = write_chunk(b"tEXt", b"Comment");
        let (rest, chunk) = parse_chunk(&bytes).unwrap();
        assert!(rest.is_empty());
        match chunk {
            Chunk::Unknown(raw) => {
                assert_eq!(raw.chunk_type, b"tEXt");
                assert_eq!(raw.chunk_data, b"Comment");
            }
            other => panic!("unexpected chunk {other:?}"),
        }
    }

    #[test]
    fn bad_crc_is_rejected() {
        let mut bytes = write_chunk(b"IDAT", &[1, 2, 3]);
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        assert!(parse_chunk(&bytes).is_err());
    }

    #[test]
    fn truncated_chunk_is_rejected() {
        let bytes = write_chunk(b"IDAT", &[1, 2, 3]);
        assert!(parse_chunk(&bytes[..bytes.len() - 2]).is_err());
    }

    #[test]
    fn iteration_stops_at_iend() {
        let mut bytes = write_chunk(b"IDAT", &[9]);
        bytes.extend(IENDChunk.to_bytes());
        bytes.extend(b"trailing");
        let mut chunks = iter_chunks(&bytes);
        assert!(matches!(chunks.next(), Some(Ok(Chunk::IDAT(_)))));
        assert!(matches!(chunks.next(), Some(Ok(Chunk::IEND))));
        assert!(chunks.next().is_none());
        assert_eq!(chunks.remaining(), b"trailing");
    }

    #[test]
    fn iteration_stops_on_error() {
        let bytes = [0, 0, 0, 5, b'I', b'D'];
        let mut chunks = iter_chunks(&bytes);
        assert!(matches!(chunks.next(), Some(Err(_))));
        assert!(chunks.next().is_none());
    }
}
