//! Error types for TOON binary encoding and decoding.
//!
//! Errors fall into two families:
//!
//! - **Decode errors**: the input bytes are truncated, corrupt, or violate a
//!   strict-mode rule. Every decode error carries the byte offset at which the
//!   offending item starts.
//! - **Encode errors**: the caller handed over a value the wire format cannot
//!   represent. These indicate a programming error, not data corruption.
//!
//! Use [`Error::is_decode`] / [`Error::is_encode`] to tell them apart and
//! [`Error::offset`] to recover the position of a decode failure.
//!
//! ## Examples
//!
//! ```rust
//! use toon_binary::{decode, DecodeOptions, Error};
//!
//! // A string tag announcing 5 bytes, followed by only 2.
//! let result = decode(&[0x04, 0x05, b'h', b'i'], &DecodeOptions::default());
//!
//! match result {
//!     Err(err @ Error::UnexpectedEof { .. }) => {
//!         assert!(err.is_decode());
//!         assert_eq!(err.offset(), Some(2));
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while encoding or decoding TOON binary data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Input ended before a complete item could be read.
    #[error("decode error at byte {offset}: unexpected end of input")]
    UnexpectedEof { offset: usize },

    /// A varint ran past five bytes (35 payload bits).
    #[error("decode error at byte {offset}: malformed varint (more than 5 bytes)")]
    MalformedVarint { offset: usize },

    /// A string payload was not valid UTF-8.
    #[error("decode error at byte {offset}: invalid UTF-8 in string payload")]
    InvalidUtf8 { offset: usize },

    /// A delimiter byte (or character, when encoding) outside comma, tab and pipe.
    #[error("invalid delimiter {found:#04x} at byte {offset}: expected ',', '\\t' or '|'")]
    InvalidDelimiter { offset: usize, found: u32 },

    /// A structural tag was expected but another byte was found.
    #[error("decode error at byte {offset}: expected {expected}, found tag {found:#04x}")]
    UnexpectedTag {
        offset: usize,
        expected: &'static str,
        found: u8,
    },

    /// A primitive type tag outside Null/False/True/Number/String.
    #[error("decode error at byte {offset}: unknown type tag {tag:#04x}")]
    UnknownType { offset: usize, tag: u8 },

    /// The value has no binary representation.
    #[error("encode error: unsupported type: {0}")]
    UnsupportedType(String),

    /// A length or count does not fit the 32-bit varint range.
    #[error("encode error: length {length} exceeds the 32-bit limit of 4294967295")]
    LengthOverflow { length: usize },

    /// Containers nested deeper than the configured limit. Path expansion
    /// works on an already decoded tree and reports offset 0.
    #[error("nesting depth exceeds the limit of {limit} at byte {offset}")]
    DepthLimitExceeded { offset: usize, limit: usize },

    /// Strict mode: bytes left over after the root value.
    #[error("decode error at byte {offset}: trailing bytes after the root value")]
    TrailingBytes { offset: usize },

    /// Strict mode: an object key or tabular field name repeated.
    #[error("decode error at byte {offset}: duplicate key {key:?}")]
    DuplicateKey { offset: usize, key: String },

    /// Strict mode: a dotted path could not be expanded without overwriting a value.
    #[error("decode error: path expansion conflict at {path:?}")]
    PathConflict { path: String },

    /// Custom error raised through serde.
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an end-of-input error at `offset`.
    pub fn unexpected_eof(offset: usize) -> Self {
        Error::UnexpectedEof { offset }
    }

    /// Creates a structural tag mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_binary::Error;
    ///
    /// let err = Error::unexpected_tag(3, "end marker", 0x04);
    /// assert!(err.to_string().contains("expected end marker"));
    /// assert_eq!(err.offset(), Some(3));
    /// ```
    pub fn unexpected_tag(offset: usize, expected: &'static str, found: u8) -> Self {
        Error::UnexpectedTag {
            offset,
            expected,
            found,
        }
    }

    /// Creates an unsupported type error for values that cannot be encoded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_binary::Error;
    ///
    /// let err = Error::unsupported_type("array in primitive position");
    /// assert!(err.is_encode());
    /// assert_eq!(err.offset(), None);
    /// ```
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns the byte offset attached to this error, if any.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::UnexpectedEof { offset }
            | Error::MalformedVarint { offset }
            | Error::InvalidUtf8 { offset }
            | Error::InvalidDelimiter { offset, .. }
            | Error::UnexpectedTag { offset, .. }
            | Error::UnknownType { offset, .. }
            | Error::DepthLimitExceeded { offset, .. }
            | Error::TrailingBytes { offset }
            | Error::DuplicateKey { offset, .. } => Some(*offset),
            Error::UnsupportedType(_)
            | Error::LengthOverflow { .. }
            | Error::PathConflict { .. }
            | Error::Custom(_) => None,
        }
    }

    /// Returns `true` for errors that only the encoder raises.
    ///
    /// `InvalidDelimiter` and `DepthLimitExceeded` can come from either side and
    /// are classified by neither this method nor [`Error::is_decode`].
    #[must_use]
    pub fn is_encode(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedType(_) | Error::LengthOverflow { .. }
        )
    }

    /// Returns `true` for errors that only the decoder raises.
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Error::UnexpectedEof { .. }
                | Error::MalformedVarint { .. }
                | Error::InvalidUtf8 { .. }
                | Error::UnexpectedTag { .. }
                | Error::UnknownType { .. }
                | Error::TrailingBytes { .. }
                | Error::DuplicateKey { .. }
                | Error::PathConflict { .. }
        )
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
