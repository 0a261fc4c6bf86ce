/// Reflected CRC-32 polynomial used by PNG (and zlib, gzip, ...).
const POLYNOMIAL: u32 = 0xedb88320;

const fn byte_table() -> [u32; 256] {
    let mut table = [0; 256];
    let mut byte = 0;
    while byte < table.len() {
        let mut crc = byte as u32;
        let mut bit = 0;
        while bit < 8 {
            let carry = crc & 1;
            crc >>= 1;
            if carry != 0 {
                crc ^= POLYNOMIAL;
            }
            bit += 1;
        }
        table[byte] = crc;
        byte += 1;
    }
    table
}

static TABLE: [u32; 256] = byte_table();

/// Running CRC-32. Feed it with `update`, read the checksum with `finish`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Crc32(u32);
impl Crc32 {
    pub(crate) fn new() -> Self {
        Self(u32::MAX)
    }

    pub(crate) fn update(mut self, bytes: &[u8]) -> Self {
        for &b in bytes {
            self.0 = TABLE[(self.0 as u8 ^ b) as usize] ^ (self.0 >> 8);
        }
        self
    }

    pub(crate) fn finish(self) -> u32 {
        !self.0
    }
}

/// CRC over the chunk tag followed by the chunk payload.
pub(crate) fn chunk_crc(tag: &[u8; 4], payload: &[u8]) -> u32 {
    Crc32::new().update(tag).update(payload).finish()
}
