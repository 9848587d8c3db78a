//! # shelfcrypt Storage
//!
//! Backing byte-store trait and implementations for shelfcrypt.
//!
//! This crate provides the lowest-level storage abstraction for
//! shelfcrypt. Stores are **opaque byte sequences** - they hold
//! ciphertext and do not interpret it. All encryption, cursor
//! tracking, and record format interpretation happens above this
//! crate, in `shelfcrypt_core`.
//!
//! ## Design Principles
//!
//! - Stores are flat byte sequences addressed by absolute offset
//! - Writes overwrite in place or extend; they never truncate
//! - No knowledge of keystreams, records, or shelf indexes
//!
//! ## Available Stores
//!
//! - [`MemoryStore`] - For testing and ephemeral storage
//! - [`FileStore`] - For persistent storage using OS file APIs
//!
//! ## Example
//!
//! ```rust
//! use shelfcrypt_storage::{ByteStore, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//! store.write_at(0, b"hello world").unwrap();
//! let data = store.read_at(6, 5).unwrap();
//! assert_eq!(&data, b"world");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod store;

pub use error::{StorageError, StorageResult};
pub use file::{FileStore, OpenMode};
pub use memory::MemoryStore;
pub use store::ByteStore;
