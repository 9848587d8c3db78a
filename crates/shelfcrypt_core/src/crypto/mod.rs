//! Cipher adapters and password-derived key material.
//!
//! Every supported algorithm is exposed through the same narrow
//! capability: a fixed-size block encrypt function keyed by material
//! derived from a password. The keystream engine never needs the
//! decrypt direction - counter mode only ever encrypts counters.
//!
//! ## Key Derivation
//!
//! Keys are derived with HKDF-SHA256 from the password, expanded to
//! the algorithm's key length under a per-algorithm info string. The
//! on-disk format carries no header, so derivation is deterministic
//! from the password alone - there is nowhere to store a salt.
//!
//! ## Usage
//!
//! ```
//! use shelfcrypt_core::crypto::CipherAlgorithm;
//!
//! let cipher = CipherAlgorithm::Aes256.build("password")?;
//! let mut block = [0u8; 16];
//! cipher.encrypt_block(&mut block);
//! # Ok::<(), shelfcrypt_core::CoreError>(())
//! ```

mod ciphers;
mod key;

pub use ciphers::{Aes256Cipher, BlowfishCipher, TripleDesCipher};
pub use key::KeyMaterial;

use crate::error::CoreResult;

/// A block cipher keyed at construction time.
///
/// Implementations expose one fixed-size block transform. The
/// keystream engine drives this in counter mode; callers never see
/// chaining state because there is none.
pub trait BlockCipher: Send {
    /// The cipher's native block size in bytes.
    fn block_size(&self) -> usize;

    /// Encrypts one block in place.
    ///
    /// `block` must be exactly [`block_size`](Self::block_size) bytes.
    fn encrypt_block(&self, block: &mut [u8]);
}

/// The supported cipher algorithms.
///
/// All three are interchangeable implementations of the same
/// capability; they differ only in block size and key length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherAlgorithm {
    /// AES-256 (16-byte blocks, 32-byte key).
    Aes256,
    /// Blowfish (8-byte blocks, 56-byte key).
    Blowfish,
    /// Triple DES, EDE three-key variant (8-byte blocks, 24-byte key).
    TripleDes,
}

impl CipherAlgorithm {
    /// The cipher's native block size in bytes.
    #[must_use]
    pub fn block_size(self) -> usize {
        match self {
            Self::Aes256 => 16,
            Self::Blowfish | Self::TripleDes => 8,
        }
    }

    /// The derived key length in bytes.
    #[must_use]
    pub fn key_len(self) -> usize {
        match self {
            Self::Aes256 => 32,
            Self::Blowfish => 56,
            Self::TripleDes => 24,
        }
    }

    /// Domain separation label used during key derivation.
    fn info(self) -> &'static [u8] {
        match self {
            Self::Aes256 => b"shelfcrypt.keystream.aes256.v1",
            Self::Blowfish => b"shelfcrypt.keystream.blowfish.v1",
            Self::TripleDes => b"shelfcrypt.keystream.des3.v1",
        }
    }

    /// Derives key material from `password` and builds the cipher.
    ///
    /// # Errors
    ///
    /// Returns an error if key derivation fails or the cipher rejects
    /// the derived key.
    pub fn build(self, password: &str) -> CoreResult<Box<dyn BlockCipher>> {
        let key = KeyMaterial::derive(password, self.info(), self.key_len())?;
        Ok(match self {
            Self::Aes256 => Box::new(Aes256Cipher::new(&key)?),
            Self::Blowfish => Box::new(BlowfishCipher::new(&key)?),
            Self::TripleDes => Box::new(TripleDesCipher::new(&key)?),
        })
    }

    /// All supported algorithms, for parameterized tests.
    #[must_use]
    pub fn all() -> [Self; 3] {
        [Self::Aes256, Self::Blowfish, Self::TripleDes]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_sizes_match_builds() {
        for algorithm in CipherAlgorithm::all() {
            let cipher = algorithm.build("some pass").unwrap();
            assert_eq!(cipher.block_size(), algorithm.block_size());
        }
    }

    #[test]
    fn same_password_same_block() {
        for algorithm in CipherAlgorithm::all() {
            let a = algorithm.build("some pass").unwrap();
            let b = algorithm.build("some pass").unwrap();

            let mut block_a = vec![7u8; algorithm.block_size()];
            let mut block_b = vec![7u8; algorithm.block_size()];
            a.encrypt_block(&mut block_a);
            b.encrypt_block(&mut block_b);

            assert_eq!(block_a, block_b);
        }
    }

    #[test]
    fn different_password_different_block() {
        for algorithm in CipherAlgorithm::all() {
            let a = algorithm.build("some pass").unwrap();
            let b = algorithm.build("other pass").unwrap();

            let mut block_a = vec![0u8; algorithm.block_size()];
            let mut block_b = vec![0u8; algorithm.block_size()];
            a.encrypt_block(&mut block_a);
            b.encrypt_block(&mut block_b);

            assert_ne!(block_a, block_b);
        }
    }

    #[test]
    fn encrypt_changes_block() {
        for algorithm in CipherAlgorithm::all() {
            let cipher = algorithm.build("some pass").unwrap();
            let zeroes = vec![0u8; algorithm.block_size()];
            let mut block = zeroes.clone();
            cipher.encrypt_block(&mut block);
            assert_ne!(block, zeroes);
        }
    }
}
