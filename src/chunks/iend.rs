use super::ParseableChunk;
use nom::{combinator::eof, IResult};

pub struct IENDChunk;
impl<'a> ParseableChunk<'a> for IENDChunk {
    type Payload = [u8; 0];

    const HEADER: &'static [u8; 4] = b"IEND";

    fn from_bytes(chunk_data: &'a [u8]) -> IResult<&'a [u8], Self> {
        let (rest, _) = eof(chunk_data)?;
        Ok((rest, Self))
    }

    fn payload(&self) -> Self::Payload {
        []
    }
}
