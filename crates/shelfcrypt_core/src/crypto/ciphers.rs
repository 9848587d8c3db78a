//! Block cipher adapters over the RustCrypto implementations.

use crate::crypto::{BlockCipher, KeyMaterial};
use crate::error::{CoreError, CoreResult};
use aes::Aes256;
use blowfish::Blowfish;
use cipher::generic_array::GenericArray;
use cipher::{BlockEncrypt, KeyInit};
use des::TdesEde3;

/// AES-256 block cipher (16-byte blocks).
pub struct Aes256Cipher {
    inner: Aes256,
}

impl Aes256Cipher {
    /// Keys the cipher with 32 bytes of derived material.
    ///
    /// # Errors
    ///
    /// Returns an error if the key material has the wrong length.
    pub fn new(key: &KeyMaterial) -> CoreResult<Self> {
        let inner = Aes256::new_from_slice(key.as_bytes())
            .map_err(|_| CoreError::invalid_key("AES-256 requires a 32-byte key"))?;
        Ok(Self { inner })
    }
}

impl BlockCipher for Aes256Cipher {
    fn block_size(&self) -> usize {
        16
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        // Invariant: the keystream engine always passes exactly one block.
        debug_assert_eq!(block.len(), 16);
        self.inner
            .encrypt_block(GenericArray::from_mut_slice(block));
    }
}

/// Blowfish block cipher (8-byte blocks).
pub struct BlowfishCipher {
    inner: Blowfish,
}

impl BlowfishCipher {
    /// Keys the cipher with 56 bytes (448 bits) of derived material.
    ///
    /// # Errors
    ///
    /// Returns an error if the key material has the wrong length.
    pub fn new(key: &KeyMaterial) -> CoreResult<Self> {
        let inner = Blowfish::new_from_slice(key.as_bytes())
            .map_err(|_| CoreError::invalid_key("Blowfish requires a 56-byte key"))?;
        Ok(Self { inner })
    }
}

impl BlockCipher for BlowfishCipher {
    fn block_size(&self) -> usize {
        8
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        debug_assert_eq!(block.len(), 8);
        self.inner
            .encrypt_block(GenericArray::from_mut_slice(block));
    }
}

/// Triple DES block cipher, EDE three-key variant (8-byte blocks).
pub struct TripleDesCipher {
    inner: TdesEde3,
}

impl TripleDesCipher {
    /// Keys the cipher with 24 bytes of derived material.
    ///
    /// # Errors
    ///
    /// Returns an error if the key material has the wrong length.
    pub fn new(key: &KeyMaterial) -> CoreResult<Self> {
        let inner = TdesEde3::new_from_slice(key.as_bytes())
            .map_err(|_| CoreError::invalid_key("Triple DES requires a 24-byte key"))?;
        Ok(Self { inner })
    }
}

impl BlockCipher for TripleDesCipher {
    fn block_size(&self) -> usize {
        8
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        debug_assert_eq!(block.len(), 8);
        self.inner
            .encrypt_block(GenericArray::from_mut_slice(block));
    }
}
