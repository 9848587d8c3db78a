//! Error types for shelfcrypt core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in shelfcrypt operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Backing store error, including access failures on open.
    #[error("storage error: {0}")]
    Storage(#[from] shelfcrypt_storage::StorageError),

    /// Value codec error.
    #[error("codec error: {0}")]
    Codec(#[from] shelfcrypt_codec::CodecError),

    /// A seek would have produced a negative position.
    #[error("seek to negative position {position}")]
    Seek {
        /// The negative position that was requested.
        position: i64,
    },

    /// Indexing access on a key that is not in the shelf.
    #[error("key not found: {key:?}")]
    KeyNotFound {
        /// The key that was looked up.
        key: String,
    },

    /// Operation attempted on a closed file or shelf.
    #[error("handle is closed")]
    Closed,

    /// Scan-on-open encountered bytes that cannot be parsed as record
    /// boundaries. With no integrity check in the format, a wrong
    /// password usually surfaces here.
    #[error("shelf corrupted: {message}")]
    Corruption {
        /// Description of the corruption.
        message: String,
    },

    /// The cipher rejected the derived key material.
    #[error("invalid key material: {message}")]
    InvalidKey {
        /// Description of the failure.
        message: String,
    },
}

impl CoreError {
    /// Creates a corruption error.
    pub fn corruption(message: impl Into<String>) -> Self {
        Self::Corruption {
            message: message.into(),
        }
    }

    /// Creates a key-not-found error.
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    /// Creates an invalid-key error.
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey {
            message: message.into(),
        }
    }
}
