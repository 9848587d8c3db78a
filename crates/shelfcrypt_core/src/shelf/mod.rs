//! Encrypted persistent shelf.
//!
//! A shelf is a durable string-keyed mapping stored inside a
//! [`CipherFile`] as an append-only record log. Mutation never patches
//! ciphertext in place: `insert` appends a fresh record at end-of-file
//! and swings the in-memory index pointer, leaving the superseded
//! bytes behind as unreachable garbage. The index itself is never
//! persisted - it is rebuilt by scanning the log on every open.

mod record;

use crate::error::{CoreError, CoreResult};
use crate::file::CipherFile;
use crate::crypto::CipherAlgorithm;
use record::{Record, RecordHeader, HEADER_SIZE};
use shelfcrypt_codec::Value;
use shelfcrypt_storage::OpenMode;
use std::collections::HashMap;
use std::io::SeekFrom;
use std::path::Path;
use tracing::{debug, trace};

/// Location of a live value inside the encrypted file.
#[derive(Debug, Clone, Copy)]
struct ValueLocation {
    /// Logical offset of the serialized value bytes.
    offset: u64,
    /// Length of the serialized value bytes.
    len: u32,
}

/// A persistent, encrypted string-keyed mapping.
///
/// At most one live value exists per key; reassignment replaces.
/// Closing and reopening a shelf over the same file and password
/// reproduces exactly the live mapping from before the close.
///
/// # Example
///
/// ```no_run
/// use shelfcrypt_core::{CipherAlgorithm, Shelf};
/// use shelfcrypt_codec::Value;
///
/// let mut shelf = Shelf::open(CipherAlgorithm::Blowfish, "data.shelf".as_ref(), "password")?;
/// shelf.insert("key", Value::from("value"))?;
/// assert!(shelf.contains_key("key")?);
/// assert_eq!(shelf.get_or("notkey", Value::from("notvalue"))?, Value::from("notvalue"));
/// shelf.close()?;
/// # Ok::<(), shelfcrypt_core::CoreError>(())
/// ```
pub struct Shelf {
    /// `None` once closed.
    file: Option<CipherFile>,
    index: HashMap<String, ValueLocation>,
}

impl Shelf {
    /// Opens a shelf at `path`, constructing the encrypted file itself.
    ///
    /// The file is created if missing; an empty file yields an empty
    /// shelf.
    ///
    /// # Errors
    ///
    /// Returns an access error if the path cannot be opened, or
    /// [`CoreError::Corruption`] if the existing contents do not scan
    /// as valid records (the usual symptom of a wrong password).
    pub fn open(algorithm: CipherAlgorithm, path: &Path, password: &str) -> CoreResult<Self> {
        let file = CipherFile::open(algorithm, path, password, OpenMode::ReadWrite)?;
        Self::new(file)
    }

    /// Wraps an already-open encrypted file.
    ///
    /// Scans the whole file to rebuild the key index.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Corruption`] if the contents do not scan
    /// as valid records.
    pub fn new(mut file: CipherFile) -> CoreResult<Self> {
        let index = Self::build_index(&mut file)?;
        debug!(entries = index.len(), "shelf index rebuilt");
        Ok(Self {
            file: Some(file),
            index,
        })
    }

    /// Replays the record log and returns the live key index.
    fn build_index(file: &mut CipherFile) -> CoreResult<HashMap<String, ValueLocation>> {
        let size = file.len()?;
        let mut index = HashMap::new();
        let mut offset = file.seek(SeekFrom::Start(0))?;

        while offset < size {
            let header_bytes = file.read(Some(HEADER_SIZE))?;
            let header = RecordHeader::decode(&header_bytes)?;

            let body_len = u64::from(header.key_len) + u64::from(header.value_len);
            let remaining = size - (offset + HEADER_SIZE as u64);
            if body_len > remaining {
                return Err(CoreError::corruption(format!(
                    "record at offset {offset} extends {body_len} bytes past \
                     {remaining} remaining"
                )));
            }

            let key_bytes = file.read(Some(header.key_len as usize))?;
            let key = String::from_utf8(key_bytes)
                .map_err(|_| CoreError::corruption("record key is not valid UTF-8"))?;

            let value_offset = offset + HEADER_SIZE as u64 + u64::from(header.key_len);
            trace!(
                %key,
                offset,
                tombstone = header.flags.is_tombstone(),
                "scanned shelf record"
            );

            if header.flags.is_tombstone() {
                index.remove(&key);
            } else {
                index.insert(
                    key,
                    ValueLocation {
                        offset: value_offset,
                        len: header.value_len,
                    },
                );
            }

            offset = file.seek(SeekFrom::Start(value_offset + u64::from(header.value_len)))?;
        }

        Ok(index)
    }

    fn file_mut(&mut self) -> CoreResult<&mut CipherFile> {
        self.file.as_mut().ok_or(CoreError::Closed)
    }

    fn check_open(&self) -> CoreResult<()> {
        if self.file.is_none() {
            return Err(CoreError::Closed);
        }
        Ok(())
    }

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// The record is appended at end-of-file and flushed before the
    /// index entry is updated; superseded bytes stay in the file as
    /// unreachable garbage.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Closed`] after close, or a codec/storage
    /// error from serialization or the write.
    pub fn insert(&mut self, key: &str, value: Value) -> CoreResult<()> {
        self.check_open()?;
        let bytes = shelfcrypt_codec::to_bytes(&value)?;
        let record = Record::put(key, bytes);
        let encoded = record.encode()?;

        let file = self.file_mut()?;
        let end = file.seek(SeekFrom::End(0))?;
        file.write(&encoded)?;
        file.flush()?;

        let value_offset = end + HEADER_SIZE as u64 + key.len() as u64;
        self.index.insert(
            key.to_string(),
            ValueLocation {
                offset: value_offset,
                // encode() verified the length fits.
                len: record.value.len() as u32,
            },
        );

        Ok(())
    }

    /// Returns the value under `key`, or `None` when absent.
    ///
    /// This is the non-raising lookup: a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Closed`] after close, or a storage/codec
    /// error if the value bytes cannot be read back.
    pub fn get(&mut self, key: &str) -> CoreResult<Option<Value>> {
        self.check_open()?;
        let Some(location) = self.index.get(key).copied() else {
            return Ok(None);
        };

        let file = self.file_mut()?;
        file.seek(SeekFrom::Start(location.offset))?;
        let bytes = file.read(Some(location.len as usize))?;
        if bytes.len() < location.len as usize {
            return Err(CoreError::corruption("indexed value bytes missing"));
        }

        Ok(Some(shelfcrypt_codec::from_bytes(&bytes)?))
    }

    /// Returns the value under `key`, or `default` when absent.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub fn get_or(&mut self, key: &str, default: Value) -> CoreResult<Value> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Returns the value under `key`, failing when absent.
    ///
    /// This is the indexing form of lookup.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::KeyNotFound`] when the key is absent, and
    /// otherwise the same errors as [`get`](Self::get).
    pub fn fetch(&mut self, key: &str) -> CoreResult<Value> {
        self.get(key)?.ok_or_else(|| CoreError::key_not_found(key))
    }

    /// Removes `key` from the shelf by appending a tombstone.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::KeyNotFound`] when the key is absent, and
    /// [`CoreError::Closed`] after close.
    pub fn remove(&mut self, key: &str) -> CoreResult<()> {
        self.check_open()?;
        if !self.index.contains_key(key) {
            return Err(CoreError::key_not_found(key));
        }

        let encoded = Record::tombstone(key).encode()?;
        let file = self.file_mut()?;
        file.seek(SeekFrom::End(0))?;
        file.write(&encoded)?;
        file.flush()?;

        self.index.remove(key);
        Ok(())
    }

    /// Returns whether `key` is present. Index-only, O(1).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Closed`] after close.
    pub fn contains_key(&self, key: &str) -> CoreResult<bool> {
        self.check_open()?;
        Ok(self.index.contains_key(key))
    }

    /// Returns the number of live keys.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Closed`] after close.
    pub fn len(&self) -> CoreResult<usize> {
        self.check_open()?;
        Ok(self.index.len())
    }

    /// Returns whether the shelf holds no keys.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Closed`] after close.
    pub fn is_empty(&self) -> CoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Returns the live keys, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Closed`] after close.
    pub fn keys(&self) -> CoreResult<Vec<String>> {
        self.check_open()?;
        Ok(self.index.keys().cloned().collect())
    }

    /// Closes the underlying encrypted file and discards the index.
    ///
    /// Idempotent; every `set` already flushed its bytes, so no final
    /// write is needed beyond the file's own close.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the underlying close fails.
    pub fn close(&mut self) -> CoreResult<()> {
        if let Some(mut file) = self.file.take() {
            self.index.clear();
            file.close()?;
        }
        Ok(())
    }

    /// Returns `true` once [`close`](Self::close) has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }
}

impl std::fmt::Debug for Shelf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shelf")
            .field("entries", &self.index.len())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
