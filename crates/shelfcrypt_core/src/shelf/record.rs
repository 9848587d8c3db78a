//! Shelf record format.
//!
//! Records are length-prefixed so that a scan can recover boundaries
//! from the decrypted stream alone - the file carries no header and
//! no separate index. Layout, before file-level encryption:
//!
//! ```text
//! key_len: u32 LE | value_len: u32 LE | flags: u8 | key (UTF-8) | value (CBOR)
//! ```
//!
//! Tombstones set the flag bit and carry no value bytes.

use crate::error::{CoreError, CoreResult};

/// Size of the fixed record header in bytes.
pub(crate) const HEADER_SIZE: usize = 9;

/// Flags for shelf records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct RecordFlags(u8);

impl RecordFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Record is a tombstone (key deleted).
    pub const TOMBSTONE: Self = Self(0x01);

    /// Parses a flags byte, rejecting unknown bits.
    ///
    /// Any unknown bit means the stream is not positioned on a record
    /// header - typically a wrong password garbling the plaintext.
    pub fn from_byte(b: u8) -> CoreResult<Self> {
        if b & !0x01 != 0 {
            return Err(CoreError::corruption(format!(
                "unknown record flags byte {b:#04x}"
            )));
        }
        Ok(Self(b))
    }

    pub const fn as_byte(self) -> u8 {
        self.0
    }

    pub const fn is_tombstone(self) -> bool {
        self.0 & 0x01 != 0
    }
}

/// The fixed-size header at the front of every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RecordHeader {
    pub key_len: u32,
    pub value_len: u32,
    pub flags: RecordFlags,
}

impl RecordHeader {
    /// Decodes a header from exactly [`HEADER_SIZE`] bytes.
    pub fn decode(data: &[u8]) -> CoreResult<Self> {
        if data.len() < HEADER_SIZE {
            return Err(CoreError::corruption("truncated record header"));
        }

        let key_len = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        let value_len = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
        let flags = RecordFlags::from_byte(data[8])?;

        if flags.is_tombstone() && value_len != 0 {
            return Err(CoreError::corruption("tombstone record carries value bytes"));
        }

        Ok(Self {
            key_len,
            value_len,
            flags,
        })
    }
}

/// A shelf record ready to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Record {
    pub key: String,
    pub flags: RecordFlags,
    pub value: Vec<u8>,
}

impl Record {
    /// Creates a put record holding serialized value bytes.
    pub fn put(key: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            flags: RecordFlags::NONE,
            value,
        }
    }

    /// Creates a tombstone record.
    pub fn tombstone(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            flags: RecordFlags::TOMBSTONE,
            value: Vec::new(),
        }
    }

    /// Encodes the record to plaintext bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the key or value exceeds the u32 length
    /// prefix.
    pub fn encode(&self) -> CoreResult<Vec<u8>> {
        let key_len = u32::try_from(self.key.len())
            .map_err(|_| CoreError::corruption("record key exceeds length prefix"))?;
        let value_len = u32::try_from(self.value.len())
            .map_err(|_| CoreError::corruption("record value exceeds length prefix"))?;

        let mut buf = Vec::with_capacity(HEADER_SIZE + self.key.len() + self.value.len());
        buf.extend_from_slice(&key_len.to_le_bytes());
        buf.extend_from_slice(&value_len.to_le_bytes());
        buf.push(self.flags.as_byte());
        buf.extend_from_slice(self.key.as_bytes());
        buf.extend_from_slice(&self.value);

        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_record_layout() {
        let record = Record::put("key", vec![0xCA, 0xFE]);
        let encoded = record.encode().unwrap();

        assert_eq!(encoded.len(), HEADER_SIZE + 3 + 2);
        assert_eq!(&encoded[..4], &3u32.to_le_bytes());
        assert_eq!(&encoded[4..8], &2u32.to_le_bytes());
        assert_eq!(encoded[8], 0);
        assert_eq!(&encoded[9..12], b"key");
        assert_eq!(&encoded[12..], &[0xCA, 0xFE]);
    }

    #[test]
    fn tombstone_layout() {
        let record = Record::tombstone("gone");
        let encoded = record.encode().unwrap();

        assert_eq!(encoded.len(), HEADER_SIZE + 4);
        assert_eq!(encoded[8], 1);
    }

    #[test]
    fn header_roundtrip() {
        let record = Record::put("key", vec![1, 2, 3]);
        let encoded = record.encode().unwrap();

        let header = RecordHeader::decode(&encoded).unwrap();
        assert_eq!(header.key_len, 3);
        assert_eq!(header.value_len, 3);
        assert!(!header.flags.is_tombstone());
    }

    #[test]
    fn short_header_is_corruption() {
        let result = RecordHeader::decode(&[1, 2, 3]);
        assert!(matches!(result, Err(CoreError::Corruption { .. })));
    }

    #[test]
    fn unknown_flags_are_corruption() {
        let mut bytes = Record::put("k", vec![9]).encode().unwrap();
        bytes[8] = 0xF3;
        let result = RecordHeader::decode(&bytes);
        assert!(matches!(result, Err(CoreError::Corruption { .. })));
    }

    #[test]
    fn tombstone_with_value_is_corruption() {
        let mut bytes = Record::put("k", vec![9]).encode().unwrap();
        bytes[8] = 1; // claim tombstone while value_len is 1
        let result = RecordHeader::decode(&bytes);
        assert!(matches!(result, Err(CoreError::Corruption { .. })));
    }
}
