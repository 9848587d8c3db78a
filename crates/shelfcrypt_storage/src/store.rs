//! Byte-store trait definition.

use crate::error::StorageResult;

/// A low-level backing store for shelfcrypt.
///
/// Stores are **opaque byte sequences**. They provide positioned reads
/// and writes over a flat run of bytes. `shelfcrypt_core` owns all
/// interpretation - stores do not understand keystream alignment,
/// shelf records, or plaintext.
///
/// # Invariants
///
/// - `read_at` returns exactly the bytes previously written at that range
/// - `write_at` overwrites existing bytes or extends the store; a write
///   starting past the current end zero-fills the gap
/// - Writes never shrink the store
/// - `size` is the total number of bytes ever written, i.e. one past
///   the highest written offset
///
/// # Implementors
///
/// - [`super::MemoryStore`] - For testing
/// - [`super::FileStore`] - For persistent storage
pub trait ByteStore: Send {
    /// Reads `len` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The range extends beyond the current size
    /// - An I/O error occurs
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>>;

    /// Writes `data` at `offset`, overwriting or extending the store.
    ///
    /// Writing past the current end zero-fills the gap, matching OS
    /// file semantics. Empty writes are no-ops.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn write_at(&mut self, offset: u64, data: &[u8]) -> StorageResult<()>;

    /// Returns the current size of the store in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;

    /// Flushes all pending writes to the underlying medium.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush operation fails.
    fn flush(&mut self) -> StorageResult<()>;

    /// Syncs all data and metadata to durable storage.
    ///
    /// This is a stronger guarantee than `flush` - it ensures that
    /// file metadata (size, timestamps) is also durable.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync operation fails.
    fn sync(&mut self) -> StorageResult<()>;
}
