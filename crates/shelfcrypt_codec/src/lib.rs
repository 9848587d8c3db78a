//! # shelfcrypt Codec
//!
//! Tagged value type and CBOR serialization for shelfcrypt.
//!
//! Shelf values are dynamically typed: a shelf can hold strings,
//! integers, byte strings, and recursively composed arrays and maps
//! under different keys. This crate defines that closed set of
//! variants as [`Value`] and serializes it with CBOR via `ciborium`.
//!
//! The round trip is exact: for every supported value,
//! `from_bytes(&to_bytes(&v)?)? == v`.
//!
//! ## Usage
//!
//! ```
//! use shelfcrypt_codec::{to_bytes, from_bytes, Value};
//!
//! let value = Value::Text("hello".to_string());
//! let bytes = to_bytes(&value).unwrap();
//! let decoded = from_bytes(&bytes).unwrap();
//! assert_eq!(value, decoded);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod value;

pub use error::{CodecError, CodecResult};
pub use value::Value;

/// Encodes a value to CBOR bytes.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn to_bytes(value: &Value) -> CodecResult<Vec<u8>> {
    let mut buffer = Vec::new();
    ciborium::into_writer(value, &mut buffer)
        .map_err(|e| CodecError::encode(e.to_string()))?;
    Ok(buffer)
}

/// Decodes a value from CBOR bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not a valid encoding of a
/// [`Value`], including trailing garbage after a complete value.
pub fn from_bytes(bytes: &[u8]) -> CodecResult<Value> {
    ciborium::from_reader(bytes).map_err(|e| CodecError::decode(e.to_string()))
}
