//! Record type and its binary codec.
//!
//! A record is an opaque value plus the absolute offset assigned to it on
//! append. The offset embedded in the encoded bytes is authoritative: it is
//! written by the segment at append time, and a read returns whatever the
//! store holds.

use bytes::Bytes;

use crate::Error;

/// Header size: offset(8) + value length(4) = 12 bytes.
const HEADER_SIZE: usize = 12;

/// A single entry in the commit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    offset: u64,
    value: Bytes,
}

impl Record {
    /// Creates a record with the given offset and value.
    pub fn new(offset: u64, value: Bytes) -> Self {
        Self { offset, value }
    }

    /// Returns the absolute offset of this record.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the record's value.
    pub fn value(&self) -> &Bytes {
        &self.value
    }

    /// Consumes the record, returning its value.
    pub fn into_value(self) -> Bytes {
        self.value
    }

    /// Serializes the record to bytes.
    ///
    /// Format: `[offset:u64 BE][length:u32 BE][value]`
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_SIZE + self.value.len());

        buf.extend_from_slice(&self.offset.to_be_bytes());
        buf.extend_from_slice(&(self.value.len() as u32).to_be_bytes());
        buf.extend_from_slice(&self.value);

        buf
    }

    /// Deserializes a record from the exact bytes produced by [`encode`].
    ///
    /// Uses zero-copy slicing for the value via [`Bytes::slice`].
    ///
    /// # Errors
    ///
    /// - [`Error::TruncatedRecord`] if the buffer is shorter than a header
    /// - [`Error::RecordLengthMismatch`] if the length field disagrees with
    ///   the bytes actually present
    ///
    /// [`encode`]: Record::encode
    pub fn decode(data: &Bytes) -> Result<Self, Error> {
        if data.len() < HEADER_SIZE {
            return Err(Error::TruncatedRecord {
                expected: HEADER_SIZE,
                actual: data.len(),
            });
        }

        let offset = u64::from_be_bytes(
            data[0..8]
                .try_into()
                .expect("slice is exactly 8 bytes after bounds check"),
        );
        let length = u32::from_be_bytes(
            data[8..12]
                .try_into()
                .expect("slice is exactly 4 bytes after bounds check"),
        ) as usize;

        // The store hands back exactly one record, so any surplus or deficit
        // means the codec and the store disagree about where records end.
        if data.len() - HEADER_SIZE != length {
            return Err(Error::RecordLengthMismatch {
                claimed: length,
                actual: data.len() - HEADER_SIZE,
            });
        }

        let value = data.slice(HEADER_SIZE..HEADER_SIZE + length);

        Ok(Record { offset, value })
    }
}
