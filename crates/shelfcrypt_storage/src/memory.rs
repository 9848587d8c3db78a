//! In-memory byte store for testing.

use crate::error::{StorageError, StorageResult};
use crate::store::ByteStore;

/// An in-memory byte store.
///
/// This store keeps all data in a `Vec<u8>` and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral shelves that don't need persistence
///
/// # Example
///
/// ```rust
/// use shelfcrypt_storage::{ByteStore, MemoryStore};
///
/// let mut store = MemoryStore::new();
/// store.write_at(0, b"test data").unwrap();
/// assert_eq!(store.size().unwrap(), 9);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Vec<u8>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with pre-existing bytes.
    ///
    /// Useful for testing reopen scenarios.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Returns a copy of all bytes in the store.
    #[must_use]
    pub fn data(&self) -> Vec<u8> {
        self.data.clone()
    }
}

impl ByteStore for MemoryStore {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        let size = self.data.len() as u64;
        let start = offset as usize;
        let end = start.saturating_add(len);

        if offset > size || end > self.data.len() {
            return Err(StorageError::ReadPastEnd { offset, len, size });
        }

        Ok(self.data[start..end].to_vec())
    }

    fn write_at(&mut self, offset: u64, data: &[u8]) -> StorageResult<()> {
        if data.is_empty() {
            return Ok(());
        }

        let start = offset as usize;
        let end = start + data.len();

        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[start..end].copy_from_slice(data);

        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self.data.len() as u64)
    }

    fn flush(&mut self) -> StorageResult<()> {
        // Nothing buffered in memory
        Ok(())
    }

    fn sync(&mut self) -> StorageResult<()> {
        // No metadata to sync
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_new_is_empty() {
        let store = MemoryStore::new();
        assert_eq!(store.size().unwrap(), 0);
        assert!(store.data().is_empty());
    }

    #[test]
    fn memory_write_and_read() {
        let mut store = MemoryStore::new();
        store.write_at(0, b"hello world").unwrap();

        let data = store.read_at(0, 5).unwrap();
        assert_eq!(&data, b"hello");

        let data = store.read_at(6, 5).unwrap();
        assert_eq!(&data, b"world");
    }

    #[test]
    fn memory_overwrite_keeps_size() {
        let mut store = MemoryStore::new();
        store.write_at(0, b"hello world").unwrap();
        store.write_at(0, b"HELLO").unwrap();

        assert_eq!(store.size().unwrap(), 11);
        assert_eq!(store.read_at(0, 11).unwrap(), b"HELLO world");
    }

    #[test]
    fn memory_write_past_end_zero_fills() {
        let mut store = MemoryStore::new();
        store.write_at(0, b"ab").unwrap();
        store.write_at(4, b"cd").unwrap();

        assert_eq!(store.size().unwrap(), 6);
        assert_eq!(store.read_at(0, 6).unwrap(), b"ab\0\0cd");
    }

    #[test]
    fn memory_read_past_end_fails() {
        let mut store = MemoryStore::new();
        store.write_at(0, b"hello").unwrap();

        let result = store.read_at(10, 5);
        assert!(matches!(result, Err(StorageError::ReadPastEnd { .. })));

        let result = store.read_at(3, 10);
        assert!(matches!(result, Err(StorageError::ReadPastEnd { .. })));
    }

    #[test]
    fn memory_empty_write() {
        let mut store = MemoryStore::new();
        store.write_at(100, b"").unwrap();
        assert_eq!(store.size().unwrap(), 0);
    }

    #[test]
    fn memory_empty_read() {
        let mut store = MemoryStore::new();
        store.write_at(0, b"hello").unwrap();

        let data = store.read_at(2, 0).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn memory_with_data() {
        let store = MemoryStore::with_data(b"preloaded".to_vec());
        assert_eq!(store.size().unwrap(), 9);
        assert_eq!(store.read_at(0, 9).unwrap(), b"preloaded");
    }

    #[test]
    fn memory_flush_and_sync_succeed() {
        let mut store = MemoryStore::new();
        store.write_at(0, b"data").unwrap();
        assert!(store.flush().is_ok());
        assert!(store.sync().is_ok());
    }
}
