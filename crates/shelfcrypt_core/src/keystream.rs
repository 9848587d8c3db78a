//! Counter-mode keystream engine.
//!
//! Turns a block cipher into a seekable stream cipher. Keystream for
//! block `n` is the encryption of `n` itself, so any byte offset can
//! be materialized without touching the bytes before it. That
//! property is what makes `seek` on an encrypted file an O(1)
//! metadata update.

use crate::crypto::BlockCipher;

/// A seekable keystream over a block cipher.
///
/// The keystream is a pure function of (key, offset): requesting the
/// same range twice returns identical bytes, and no chaining state is
/// carried between calls.
pub struct Keystream {
    cipher: Box<dyn BlockCipher>,
}

impl Keystream {
    /// Wraps a keyed block cipher.
    #[must_use]
    pub fn new(cipher: Box<dyn BlockCipher>) -> Self {
        Self { cipher }
    }

    /// The underlying cipher's block size in bytes.
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    /// Returns `len` keystream bytes for the range starting at the
    /// global byte `offset`.
    ///
    /// Whole counter blocks covering the range are generated, then the
    /// unused prefix of the first block and suffix of the last block
    /// are sliced off. `len == 0` returns empty.
    #[must_use]
    pub fn bytes(&self, offset: u64, len: usize) -> Vec<u8> {
        if len == 0 {
            return Vec::new();
        }

        let block_size = self.cipher.block_size();
        let mut counter = offset / block_size as u64;
        let skip = (offset % block_size as u64) as usize;
        let total = skip + len;

        let mut stream = Vec::with_capacity(total + block_size);
        let mut block = vec![0u8; block_size];

        while stream.len() < total {
            // The counter occupies the trailing 8 bytes big-endian;
            // wider blocks are zero-padded in front.
            block.fill(0);
            block[block_size - 8..].copy_from_slice(&counter.to_be_bytes());
            self.cipher.encrypt_block(&mut block);
            stream.extend_from_slice(&block);
            counter = counter.wrapping_add(1);
        }

        stream.truncate(total);
        stream.drain(..skip);
        stream
    }

    /// XORs the keystream for `offset` into `data` in place.
    ///
    /// Applying twice at the same offset is the identity, which is why
    /// the same call path serves both encryption and decryption.
    pub fn apply(&self, offset: u64, data: &mut [u8]) {
        let stream = self.bytes(offset, data.len());
        for (byte, key) in data.iter_mut().zip(stream) {
            *byte ^= key;
        }
    }
}

impl std::fmt::Debug for Keystream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keystream")
            .field("block_size", &self.cipher.block_size())
            .finish_non_exhaustive()
    }
}
