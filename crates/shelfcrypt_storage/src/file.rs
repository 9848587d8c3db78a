//! File-based byte store for persistent storage.

use crate::error::{StorageError, StorageResult};
use crate::store::ByteStore;
use parking_lot::RwLock;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// How a [`FileStore`] should be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Open an existing file for reading only. Fails if it does not exist.
    Read,
    /// Open for reading and writing, creating the file if missing.
    ReadWrite,
}

/// A file-based byte store.
///
/// This store provides persistent storage using OS file APIs.
/// Data survives process restarts.
///
/// # Durability
///
/// - `flush()` calls `File::flush()` to push data to the OS
/// - `sync()` calls `File::sync_all()` to ensure data is on disk
///
/// # Example
///
/// ```no_run
/// use shelfcrypt_storage::{ByteStore, FileStore, OpenMode};
/// use std::path::Path;
///
/// let mut store = FileStore::open(Path::new("data.bin"), OpenMode::ReadWrite).unwrap();
/// store.write_at(0, b"ciphertext").unwrap();
/// store.sync().unwrap();
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    file: RwLock<File>,
    size: RwLock<u64>,
}

impl FileStore {
    /// Opens a file store at the given path in the requested mode.
    ///
    /// The existing file length, if any, becomes the initial size.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Access`] if the file cannot be opened in
    /// the requested mode (missing file in [`OpenMode::Read`],
    /// permission denied, and so on).
    pub fn open(path: &Path, mode: OpenMode) -> StorageResult<Self> {
        let mut options = OpenOptions::new();
        options.read(true);
        if mode == OpenMode::ReadWrite {
            options.write(true).create(true).truncate(false);
        }

        let file = options
            .open(path)
            .map_err(|e| StorageError::access(path, e))?;

        let size = file
            .metadata()
            .map_err(|e| StorageError::access(path, e))?
            .len();

        Ok(Self {
            path: path.to_path_buf(),
            file: RwLock::new(file),
            size: RwLock::new(size),
        })
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteStore for FileStore {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        let size = *self.size.read();
        let end = offset.saturating_add(len as u64);

        if offset > size || end > size {
            return Err(StorageError::ReadPastEnd { offset, len, size });
        }

        if len == 0 {
            return Ok(Vec::new());
        }

        let mut file = self.file.write();
        file.seek(SeekFrom::Start(offset))?;

        let mut buffer = vec![0u8; len];
        file.read_exact(&mut buffer)?;

        Ok(buffer)
    }

    fn write_at(&mut self, offset: u64, data: &[u8]) -> StorageResult<()> {
        if data.is_empty() {
            return Ok(());
        }

        let mut file = self.file.write();
        let mut size = self.size.write();

        // Seeking past EOF and writing zero-fills the gap at the OS level.
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(data)?;

        let end = offset + data.len() as u64;
        if end > *size {
            *size = end;
        }

        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(*self.size.read())
    }

    fn flush(&mut self) -> StorageResult<()> {
        let mut file = self.file.write();
        file.flush()?;
        Ok(())
    }

    fn sync(&mut self) -> StorageResult<()> {
        let file = self.file.write();
        file.sync_all()?;
        Ok(())
    }
}
