//! # shelfcrypt Core
//!
//! Password-encrypted random-access files and a persistent key-value
//! shelf built on top of them.
//!
//! This crate provides:
//! - Block-cipher adapters (AES-256, Blowfish, Triple DES) keyed from
//!   a password
//! - A counter-mode keystream engine that makes any block cipher
//!   seekable
//! - [`CipherFile`]: an encrypted file with ordinary read/write/seek
//!   semantics - bytes on disk are always ciphertext, byte-for-byte
//!   the same length as the plaintext
//! - [`Shelf`]: a durable string-keyed mapping stored as an
//!   append-only record log inside a [`CipherFile`]
//!
//! ## Example
//!
//! ```no_run
//! use shelfcrypt_core::{CipherAlgorithm, Shelf};
//! use shelfcrypt_codec::Value;
//!
//! let mut shelf = Shelf::open(CipherAlgorithm::Aes256, "data.shelf".as_ref(), "password")?;
//! shelf.insert("key", Value::from("value"))?;
//! assert_eq!(shelf.get("key")?, Some(Value::from("value")));
//! shelf.close()?;
//! # Ok::<(), shelfcrypt_core::CoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod crypto;
mod error;
mod file;
mod keystream;
mod shelf;

pub use crypto::{BlockCipher, CipherAlgorithm, KeyMaterial};
pub use error::{CoreError, CoreResult};
pub use file::CipherFile;
pub use keystream::Keystream;
pub use shelf::Shelf;

pub use shelfcrypt_storage::{ByteStore, FileStore, MemoryStore, OpenMode, StorageError};
