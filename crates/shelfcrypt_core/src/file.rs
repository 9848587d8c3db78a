//! Encrypted random-access file.

use crate::crypto::CipherAlgorithm;
use crate::error::{CoreError, CoreResult};
use crate::keystream::Keystream;
use shelfcrypt_storage::{ByteStore, FileStore, OpenMode};
use std::io::SeekFrom;
use std::path::Path;
use tracing::debug;

/// An encrypted file with ordinary read/write/seek semantics.
///
/// Callers see plaintext at logical byte offsets, exactly as with an
/// unencrypted file; the backing store only ever holds ciphertext.
/// Counter-mode keystream preserves length, so the ciphertext is
/// byte-for-byte as long as the plaintext - no header, no padding.
///
/// Seeking is an O(1) cursor update: keystream for any offset is
/// addressable directly, so skipped bytes are never processed.
///
/// # Example
///
/// ```no_run
/// use shelfcrypt_core::{CipherAlgorithm, CipherFile};
/// use shelfcrypt_storage::OpenMode;
/// use std::io::SeekFrom;
///
/// let mut file = CipherFile::open(
///     CipherAlgorithm::Aes256,
///     "secret.bin".as_ref(),
///     "password",
///     OpenMode::ReadWrite,
/// )?;
/// file.write(b"1234567890")?;
/// file.seek(SeekFrom::End(-2))?;
/// assert_eq!(file.read(None)?, b"90");
/// file.close()?;
/// # Ok::<(), shelfcrypt_core::CoreError>(())
/// ```
pub struct CipherFile {
    /// `None` once closed; every operation checks this first.
    store: Option<Box<dyn ByteStore>>,
    keystream: Keystream,
    pos: u64,
}

impl CipherFile {
    /// Opens an encrypted file at `path`, deriving key material from
    /// `password`.
    ///
    /// If the file already exists, its ciphertext length becomes the
    /// initial logical end-of-file. The cursor starts at 0.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] with an access error if the path
    /// cannot be opened in the requested mode.
    pub fn open(
        algorithm: CipherAlgorithm,
        path: &Path,
        password: &str,
        mode: OpenMode,
    ) -> CoreResult<Self> {
        debug!(?path, ?algorithm, ?mode, "opening cipher file");
        let store = FileStore::open(path, mode)?;
        Self::with_store(Box::new(store), algorithm, password)
    }

    /// Wraps an already-open byte store.
    ///
    /// The store's current size becomes the initial logical
    /// end-of-file; existing bytes are treated as ciphertext under the
    /// same password.
    ///
    /// # Errors
    ///
    /// Returns an error if key derivation fails.
    pub fn with_store(
        store: Box<dyn ByteStore>,
        algorithm: CipherAlgorithm,
        password: &str,
    ) -> CoreResult<Self> {
        let cipher = algorithm.build(password)?;
        Ok(Self {
            store: Some(store),
            keystream: Keystream::new(cipher),
            pos: 0,
        })
    }

    /// Reads up to `n` plaintext bytes from the cursor, or to
    /// end-of-file when `n` is `None`.
    ///
    /// Returns fewer bytes than requested when end-of-file intervenes,
    /// and an empty vector when the cursor is at or past end-of-file -
    /// never an error, never blocking. Advances the cursor by the
    /// number of bytes returned.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Closed`] after [`close`](Self::close), or
    /// a storage error if the underlying read fails.
    pub fn read(&mut self, n: Option<usize>) -> CoreResult<Vec<u8>> {
        let store = self.store.as_ref().ok_or(CoreError::Closed)?;
        let size = store.size()?;

        if self.pos >= size {
            return Ok(Vec::new());
        }

        let available = usize::try_from(size - self.pos).unwrap_or(usize::MAX);
        let len = n.map_or(available, |n| n.min(available));

        let mut data = store.read_at(self.pos, len)?;
        self.keystream.apply(self.pos, &mut data);
        self.pos += len as u64;

        Ok(data)
    }

    /// Encrypts `data` and writes it at the cursor, overwriting
    /// existing bytes or extending the file past the current end.
    ///
    /// Advances the cursor by `data.len()`. Writing never truncates.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Closed`] after [`close`](Self::close), or
    /// a storage error if the underlying write fails.
    pub fn write(&mut self, data: &[u8]) -> CoreResult<()> {
        let store = self.store.as_mut().ok_or(CoreError::Closed)?;
        if data.is_empty() {
            return Ok(());
        }

        let mut ciphertext = data.to_vec();
        self.keystream.apply(self.pos, &mut ciphertext);
        store.write_at(self.pos, &ciphertext)?;
        self.pos += data.len() as u64;

        Ok(())
    }

    /// Moves the cursor and returns the new position.
    ///
    /// `SeekFrom::End` accepts negative offsets, so "last N bytes"
    /// reads are a seek away. Seeking past end-of-file is permitted
    /// and does not extend the file; only a subsequent write does.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Seek`] if the resulting position would be
    /// negative, and [`CoreError::Closed`] after close.
    pub fn seek(&mut self, target: SeekFrom) -> CoreResult<u64> {
        let store = self.store.as_ref().ok_or(CoreError::Closed)?;

        let (base, offset) = match target {
            SeekFrom::Start(offset) => {
                self.pos = offset;
                return Ok(self.pos);
            }
            SeekFrom::Current(offset) => (self.pos, offset),
            SeekFrom::End(offset) => (store.size()?, offset),
        };

        let position = i128::from(base) + i128::from(offset);
        if position < 0 {
            return Err(CoreError::Seek {
                position: i64::try_from(position).unwrap_or(i64::MIN),
            });
        }

        // Backing stores are real files, so base fits in i64 and the
        // sum cannot exceed u64 range.
        self.pos = u64::try_from(position).unwrap_or(u64::MAX);
        Ok(self.pos)
    }

    /// Returns the current logical position. 0 immediately after open.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Closed`] after close.
    pub fn tell(&self) -> CoreResult<u64> {
        self.store.as_ref().ok_or(CoreError::Closed)?;
        Ok(self.pos)
    }

    /// Returns the logical length of the file in bytes.
    ///
    /// Ciphertext and plaintext lengths are identical.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Closed`] after close.
    pub fn len(&self) -> CoreResult<u64> {
        let store = self.store.as_ref().ok_or(CoreError::Closed)?;
        Ok(store.size()?)
    }

    /// Returns `true` if the file holds no bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Closed`] after close.
    pub fn is_empty(&self) -> CoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Flushes pending ciphertext to the backing store.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Closed`] after close.
    pub fn flush(&mut self) -> CoreResult<()> {
        let store = self.store.as_mut().ok_or(CoreError::Closed)?;
        store.flush()?;
        Ok(())
    }

    /// Flushes and releases the backing store. Idempotent.
    ///
    /// After the first call every other operation fails with
    /// [`CoreError::Closed`]; further `close` calls succeed silently.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the final flush or sync fails.
    pub fn close(&mut self) -> CoreResult<()> {
        if let Some(mut store) = self.store.take() {
            debug!("closing cipher file");
            store.flush()?;
            store.sync()?;
        }
        Ok(())
    }

    /// Returns `true` once [`close`](Self::close) has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.store.is_none()
    }

    /// Consumes the file and returns the raw ciphertext store.
    #[cfg(test)]
    pub(crate) fn into_store(mut self) -> Box<dyn ByteStore> {
        self.store.take().unwrap()
    }
}

impl std::fmt::Debug for CipherFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherFile")
            .field("pos", &self.pos)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::CipherAlgorithm;
    use shelfcrypt_storage::MemoryStore;

    fn memory_file(algorithm: CipherAlgorithm) -> CipherFile {
        CipherFile::with_store(Box::new(MemoryStore::new()), algorithm, "some pass").unwrap()
    }

    #[test]
    fn fresh_file_tells_zero() {
        for algorithm in CipherAlgorithm::all() {
            let file = memory_file(algorithm);
            assert_eq!(file.tell().unwrap(), 0);
        }
    }

    #[test]
    fn write_advances_position() {
        let data = b"some even more different test data";
        for algorithm in CipherAlgorithm::all() {
            let mut file = memory_file(algorithm);
            file.write(data).unwrap();
            assert_eq!(file.tell().unwrap(), data.len() as u64);
        }
    }

    #[test]
    fn write_then_read_from_start() {
        for algorithm in CipherAlgorithm::all() {
            let mut file = memory_file(algorithm);
            file.write(b"some test data").unwrap();
            file.seek(SeekFrom::Start(0)).unwrap();
            assert_eq!(file.read(None).unwrap(), b"some test data");
        }
    }

    #[test]
    fn ciphertext_same_length_as_plaintext() {
        for algorithm in CipherAlgorithm::all() {
            let mut file = memory_file(algorithm);
            file.write(b"0123456789A").unwrap(); // deliberately unaligned
            assert_eq!(file.len().unwrap(), 11);
        }
    }

    #[test]
    fn partial_read_advances_cursor() {
        let mut file = memory_file(CipherAlgorithm::Blowfish);
        file.write(b"hello world").unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();

        assert_eq!(file.read(Some(5)).unwrap(), b"hello");
        assert_eq!(file.tell().unwrap(), 5);
        assert_eq!(file.read(None).unwrap(), b" world");
    }

    #[test]
    fn read_clamped_at_eof() {
        let mut file = memory_file(CipherAlgorithm::TripleDes);
        file.write(b"abc").unwrap();
        file.seek(SeekFrom::Start(1)).unwrap();

        let data = file.read(Some(100)).unwrap();
        assert_eq!(data, b"bc");
        assert_eq!(file.tell().unwrap(), 3);
    }

    #[test]
    fn read_at_eof_returns_empty() {
        for algorithm in CipherAlgorithm::all() {
            let mut file = memory_file(algorithm);
            file.write(b"data").unwrap();

            assert!(file.read(None).unwrap().is_empty());
            assert!(file.read(Some(10)).unwrap().is_empty());

            file.seek(SeekFrom::Start(1000)).unwrap();
            assert!(file.read(None).unwrap().is_empty());
        }
    }

    #[test]
    fn overwrite_in_middle() {
        let mut file = memory_file(CipherAlgorithm::Aes256);
        file.write(b"hello world").unwrap();
        file.seek(SeekFrom::Start(6)).unwrap();
        file.write(b"earth").unwrap();

        file.seek(SeekFrom::Start(0)).unwrap();
        assert_eq!(file.read(None).unwrap(), b"hello earth");
        assert_eq!(file.len().unwrap(), 11);
    }

    #[test]
    fn seek_from_end_negative() {
        let mut file = memory_file(CipherAlgorithm::Blowfish);
        file.write(b"1234567890").unwrap();

        let pos = file.seek(SeekFrom::End(-2)).unwrap();
        assert_eq!(pos, 8);
        assert_eq!(file.read(None).unwrap(), b"90");
    }

    #[test]
    fn seek_relative() {
        let mut file = memory_file(CipherAlgorithm::Aes256);
        file.write(b"abcdef").unwrap();
        file.seek(SeekFrom::Start(2)).unwrap();
        file.seek(SeekFrom::Current(2)).unwrap();
        assert_eq!(file.read(Some(1)).unwrap(), b"e");
        file.seek(SeekFrom::Current(-4)).unwrap();
        assert_eq!(file.read(Some(1)).unwrap(), b"b");
    }

    #[test]
    fn seek_negative_fails() {
        let mut file = memory_file(CipherAlgorithm::Aes256);
        file.write(b"abc").unwrap();

        let result = file.seek(SeekFrom::End(-10));
        assert!(matches!(result, Err(CoreError::Seek { position: -7 })));

        let result = file.seek(SeekFrom::Current(-100));
        assert!(matches!(result, Err(CoreError::Seek { .. })));
    }

    #[test]
    fn seek_past_eof_does_not_extend() {
        let mut file = memory_file(CipherAlgorithm::Aes256);
        file.write(b"abc").unwrap();
        file.seek(SeekFrom::Start(100)).unwrap();
        assert_eq!(file.len().unwrap(), 3);
    }

    #[test]
    fn write_past_eof_extends() {
        let mut file = memory_file(CipherAlgorithm::Aes256);
        file.write(b"abc").unwrap();
        file.seek(SeekFrom::Start(5)).unwrap();
        file.write(b"xy").unwrap();
        assert_eq!(file.len().unwrap(), 7);

        file.seek(SeekFrom::Start(5)).unwrap();
        assert_eq!(file.read(None).unwrap(), b"xy");
    }

    #[test]
    fn reopen_with_same_password_decrypts() {
        let mut file = memory_file(CipherAlgorithm::TripleDes);
        file.write(b"Some more test data").unwrap();

        // The stored bytes are ciphertext.
        let store = file.into_store();
        assert_ne!(
            store.read_at(0, 19).unwrap(),
            b"Some more test data".to_vec()
        );

        let mut file =
            CipherFile::with_store(store, CipherAlgorithm::TripleDes, "some pass").unwrap();
        assert_eq!(file.read(None).unwrap(), b"Some more test data");
    }

    #[test]
    fn wrong_password_reads_garbage() {
        let mut file = memory_file(CipherAlgorithm::Aes256);
        file.write(b"Some more test data").unwrap();
        let store = file.into_store();

        let mut wrong =
            CipherFile::with_store(store, CipherAlgorithm::Aes256, "other pass").unwrap();
        assert_ne!(wrong.read(None).unwrap(), b"Some more test data".to_vec());
    }

    #[test]
    fn operations_after_close_fail() {
        let mut file = memory_file(CipherAlgorithm::Aes256);
        file.write(b"abc").unwrap();
        file.close().unwrap();

        assert!(file.is_closed());
        assert!(matches!(file.read(None), Err(CoreError::Closed)));
        assert!(matches!(file.write(b"x"), Err(CoreError::Closed)));
        assert!(matches!(file.seek(SeekFrom::Start(0)), Err(CoreError::Closed)));
        assert!(matches!(file.tell(), Err(CoreError::Closed)));
        assert!(matches!(file.flush(), Err(CoreError::Closed)));
    }

    #[test]
    fn close_is_idempotent() {
        let mut file = memory_file(CipherAlgorithm::Blowfish);
        file.close().unwrap();
        file.close().unwrap();
    }
}
