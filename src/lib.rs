//! # toon_binary
//!
//! A compact binary wire format for TOON (Token-Oriented Object Notation) data,
//! with a Serde bridge.
//!
//! ## What is TOON?
//!
//! TOON is a token-efficient notation for JSON-like data. It shares one value
//! model between a human-readable text form and this binary form. A value
//! survives a trip through either encoding unchanged, down to the sign of zero
//! and the bit pattern class of every float.
//!
//! ## Key Features
//!
//! - **Tabular Arrays**: Arrays of uniform records store their field names once
//! - **Exact Numbers**: Every number is an IEEE-754 double; `-0`, `Infinity`,
//!   `-Infinity` and `NaN` round-trip
//! - **Self-Framing**: Strings, arrays and objects carry their own lengths or
//!   end markers, so no outer framing is needed
//! - **Hostile Input Safe**: Truncated or corrupt input fails with a typed error
//!   carrying the byte offset; nesting depth is capped
//! - **Serde Compatible**: Any `#[derive(Serialize, Deserialize)]` type can be
//!   encoded and decoded
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! toon_binary = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Typed Data
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use toon_binary::{from_slice, to_vec};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User { id: 123, name: "Alice".to_string(), active: true };
//!
//! let bytes = to_vec(&user).unwrap();
//! let back: User = from_slice(&bytes).unwrap();
//! assert_eq!(user, back);
//! ```
//!
//! ### Dynamic Values
//!
//! ```rust
//! use toon_binary::{decode, encode, toon, DecodeOptions, EncodeOptions};
//!
//! let products = toon!([
//!     { "id": 1, "name": "Widget", "price": 9.99 },
//!     { "id": 2, "name": "Gadget", "price": 14.99 }
//! ]);
//!
//! let bytes = encode(&products, &EncodeOptions::default()).unwrap();
//! // Array header: tag, 2 rows, comma, 3 fields, then the field names once.
//! assert_eq!(&bytes[..5], &[0x07, 0x02, b',', 0x03, 0x02]);
//!
//! assert_eq!(decode(&bytes, &DecodeOptions::default()).unwrap(), products);
//! ```
//!
//! ## Pipeline
//!
//! [`encode`] normalizes the value (see [`normalize`]), folds keys when
//! [`KeyFolding::Safe`] is set, then walks the tree with the [`codec`].
//! [`decode`] runs the codec, rejects trailing bytes in strict mode, and expands
//! dotted paths when [`PathExpansion::Safe`] is set.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: `debug` when a top-level encode or
//! decode completes or fails, `trace` when an array is framed as a table. No
//! subscriber is installed.
//!
//! ## Format Specification
//!
//! The byte layout is documented in the [`format`] module.

pub mod codec;
pub mod de;
pub mod error;
pub mod folding;
pub mod format;
pub mod macros;
pub mod map;
pub mod options;
pub mod reader;
pub mod ser;
pub mod shape;
pub mod tag;
pub mod value;
pub mod writer;

pub use de::from_value;
pub use error::{Error, Result};
pub use folding::FoldConfig;
pub use map::ToonMap;
pub use options::{
    DecodeOptions, Delimiter, EncodeOptions, KeyFolding, PathExpansion, DEFAULT_MAX_DEPTH,
};
pub use ser::{to_value, ValueSerializer};
pub use shape::{classify, ArrayShape};
pub use tag::{Container, Tag};
pub use value::{normalize, Number, Value};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Encodes a value into TOON binary.
///
/// Absent members are dropped first, so the output always decodes to
/// `normalize(value)`.
///
/// # Examples
///
/// ```rust
/// use toon_binary::{encode, toon, EncodeOptions};
///
/// assert_eq!(encode(&toon!(null), &EncodeOptions::default()).unwrap(), vec![0x00]);
/// assert_eq!(encode(&toon!(""), &EncodeOptions::default()).unwrap(), vec![0x04, 0x00]);
/// assert_eq!(encode(&toon!({}), &EncodeOptions::default()).unwrap(), vec![0x05, 0xFF]);
/// ```
///
/// # Errors
///
/// Returns [`Error::LengthOverflow`] for strings or arrays longer than
/// `u32::MAX`, and [`Error::DepthLimitExceeded`] for values nested deeper than
/// `options.max_depth`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode(value: &Value, options: &EncodeOptions) -> Result<Vec<u8>> {
    let prepared = folding::fold_keys(value.normalized(), &FoldConfig::from(options));

    match codec::encode_value(&prepared, options) {
        Ok(bytes) => {
            debug!(
                bytes = bytes.len(),
                delimiter = ?options.delimiter,
                key_folding = ?options.key_folding,
                "encoded value"
            );
            Ok(bytes)
        }
        Err(err) => {
            debug!(error = %err, "encode failed");
            Err(err)
        }
    }
}

/// Decodes TOON binary into a value.
///
/// # Examples
///
/// ```rust
/// use toon_binary::{decode, toon, DecodeOptions};
///
/// let bytes = [0x05, 0x04, 0x01, b'x', 0x05, 0xFF, 0xFF];
/// assert_eq!(decode(&bytes, &DecodeOptions::default()).unwrap(), toon!({ "x": {} }));
/// ```
///
/// # Errors
///
/// Returns a decode error carrying the byte offset of the first malformed item.
/// In strict mode, trailing bytes, duplicate keys and path expansion conflicts
/// are errors as well.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode(input: &[u8], options: &DecodeOptions) -> Result<Value> {
    let result = codec::decode_value(input, options)
        .and_then(|value| folding::expand_paths(value, options));

    match &result {
        Ok(_) => debug!(bytes = input.len(), strict = options.strict, "decoded value"),
        Err(err) => debug!(offset = ?err.offset(), error = %err, "decode failed"),
    }
    result
}

/// Serialize any `T: Serialize` to TOON binary.
///
/// # Examples
///
/// ```rust
/// use toon_binary::to_vec;
///
/// let bytes = to_vec(&vec![true, false]).unwrap();
/// assert_eq!(bytes, vec![0x07, 0x02, b',', 0x00, 0x02, 0x01]);
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be represented (e.g., maps with
/// non-string keys).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    to_vec_with_options(value, &EncodeOptions::default())
}

/// Serialize any `T: Serialize` to TOON binary with custom options.
///
/// # Errors
///
/// Returns an error if the value cannot be represented.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec_with_options<T>(value: &T, options: &EncodeOptions) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    encode(&to_value(value)?, options)
}

/// Deserialize an instance of type `T` from TOON binary.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use toon_binary::{from_slice, to_vec};
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let bytes = to_vec(&[("x", 1), ("y", 2)].into_iter().collect::<std::collections::BTreeMap<_, _>>()).unwrap();
/// let point: Point = from_slice(&bytes).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the bytes are not valid TOON binary or do not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_slice_with_options(bytes, &DecodeOptions::default())
}

/// Deserialize an instance of type `T` from TOON binary with custom options.
///
/// # Errors
///
/// Returns an error if the bytes are not valid TOON binary or do not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_with_options<T>(bytes: &[u8], options: &DecodeOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(decode(bytes, options)?)
}
