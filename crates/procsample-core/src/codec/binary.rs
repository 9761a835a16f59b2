//! Schema-tagged binary encoding shared by every record type.
//!
//! The envelope is `MAGIC (4 bytes) | VERSION (u16 LE) | payload | CRC32 (u32 LE)`.
//! `MAGIC` and `VERSION` identify the schema generation; a reader that sees
//! a version it does not understand reports [`Error::Schema`] rather than
//! guessing. The payload itself is encoded with `postcard`, whose
//! `#[serde(default)]`-friendly struct evolution carries the "unknown
//! fields get defaults" contract across schema changes — the exact byte
//! layout of the payload is not part of this library's external contract.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::Error;

const MAGIC: [u8; 4] = *b"PSC1";
const VERSION: u16 = 1;

/// Reusable binary encoder: one working buffer, reset before every record.
pub struct BinaryEncoder {
    buf: Vec<u8>,
}

impl BinaryEncoder {
    pub fn new() -> Self {
        Self { buf: Vec::with_capacity(256) }
    }

    /// Encodes `record`, returning an owned copy of the envelope bytes. The
    /// internal buffer is reset at the start of every call, so the
    /// returned `Vec` is independent of subsequent encodes.
    pub fn encode<T: Serialize>(&mut self, record: &T) -> Result<Vec<u8>, Error> {
        self.buf.clear();
        self.buf.extend_from_slice(&MAGIC);
        self.buf.extend_from_slice(&VERSION.to_le_bytes());

        let payload = postcard::to_allocvec(record)
            .map_err(|e| Error::Schema { message: e.to_string() })?;
        self.buf.extend_from_slice(&payload);

        let crc = crc32fast::hash(&self.buf);
        self.buf.extend_from_slice(&crc.to_le_bytes());

        Ok(self.buf.clone())
    }
}

impl Default for BinaryEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes one record previously produced by [`BinaryEncoder::encode`].
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    if bytes.len() < MAGIC.len() + 2 + 4 {
        return Err(Error::Schema { message: "envelope shorter than header + checksum".into() });
    }

    let (magic, rest) = bytes.split_at(MAGIC.len());
    if magic != MAGIC {
        return Err(Error::Schema { message: "bad magic".into() });
    }

    let (version_bytes, rest) = rest.split_at(2);
    let version = u16::from_le_bytes(version_bytes.try_into().unwrap());
    if version != VERSION {
        return Err(Error::Schema { message: format!("unsupported schema version {version}") });
    }

    let (payload, crc_bytes) = rest.split_at(rest.len() - 4);
    let expected = u32::from_le_bytes(crc_bytes.try_into().unwrap());
    let actual = crc32fast::hash(&bytes[..bytes.len() - 4]);
    if actual != expected {
        return Err(Error::Schema { message: "checksum mismatch".into() });
    }

    postcard::from_bytes(payload).map_err(|e| Error::Schema { message: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MemInfo;

    fn sample() -> MemInfo {
        MemInfo {
            timestamp: 1234,
            mem_total: 8_000_000,
            mem_free: 1_000_000,
            mem_available: 2_000_000,
            buffers: 100_000,
            cached: 500_000,
            swap_cached: 0,
            active: 3_000_000,
            inactive: 2_000_000,
            swap_total: 4_000_000,
            swap_free: 3_500_000,
        }
    }

    #[test]
    fn round_trips() {
        let mut encoder = BinaryEncoder::new();
        let bytes = encoder.encode(&sample()).unwrap();
        let decoded: MemInfo = decode(&bytes).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn encoder_is_reusable_across_records() {
        let mut encoder = BinaryEncoder::new();
        let first = encoder.encode(&sample()).unwrap();
        let mut other = sample();
        other.mem_total = 1;
        let second = encoder.encode(&other).unwrap();

        let decoded_first: MemInfo = decode(&first).unwrap();
        let decoded_second: MemInfo = decode(&second).unwrap();
        assert_eq!(decoded_first.mem_total, 8_000_000);
        assert_eq!(decoded_second.mem_total, 1);
    }

    #[test]
    fn rejects_corrupted_checksum() {
        let mut encoder = BinaryEncoder::new();
        let mut bytes = encoder.encode(&sample()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        let result: Result<MemInfo, Error> = decode(&bytes);
        assert!(matches!(result, Err(Error::Schema { .. })));
    }

    #[test]
    fn rejects_bad_magic() {
        let result: Result<MemInfo, Error> = decode(b"nope-not-a-record-at-all-0000");
        assert!(matches!(result, Err(Error::Schema { .. })));
    }
}
