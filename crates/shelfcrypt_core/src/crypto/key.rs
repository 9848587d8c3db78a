//! Password-derived key material.

use crate::error::{CoreError, CoreResult};
use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Key material derived from a password.
///
/// Derived once per file/password pair at open time and owned by the
/// cipher for the lifetime of the handle. The bytes are zeroized when
/// dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    bytes: Vec<u8>,
}

impl KeyMaterial {
    /// Derives `len` bytes of key material from `password` using
    /// HKDF-SHA256 with the given domain separation `info`.
    ///
    /// Derivation is deterministic: the same password, info, and
    /// length always produce the same key. The file format has no
    /// header, so no salt is stored or used.
    ///
    /// # Errors
    ///
    /// Returns an error if the requested length exceeds what HKDF can
    /// expand.
    pub fn derive(password: &str, info: &[u8], len: usize) -> CoreResult<Self> {
        let hk = Hkdf::<Sha256>::new(None, password.as_bytes());

        let mut bytes = vec![0u8; len];
        hk.expand(info, &mut bytes)
            .map_err(|_| CoreError::invalid_key("HKDF expand failed"))?;

        Ok(Self { bytes })
    }

    /// Returns the key as a byte slice.
    ///
    /// # Security
    ///
    /// Be careful with this method - don't log or serialize the result.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
