//! Configuration options for TOON binary encoding and decoding.
//!
//! This module provides types to customize both directions of the codec:
//!
//! - [`EncodeOptions`]: delimiter recorded in array headers, key folding, depth limit
//! - [`DecodeOptions`]: strict validation, path expansion, depth limit
//! - [`Delimiter`]: comma, tab, or pipe
//!
//! ## Examples
//!
//! ```rust
//! use toon_binary::{encode, decode, toon, Delimiter, EncodeOptions, DecodeOptions, KeyFolding, PathExpansion};
//!
//! let value = toon!({ "server": { "http": { "port": 8080 } } });
//!
//! let options = EncodeOptions::new()
//!     .with_delimiter(Delimiter::Pipe)
//!     .with_key_folding(KeyFolding::Safe);
//! let bytes = encode(&value, &options).unwrap();
//!
//! let options = DecodeOptions::new().with_expand_paths(PathExpansion::Safe);
//! assert_eq!(decode(&bytes, &options).unwrap(), value);
//! ```

/// Maximum container nesting accepted by default, in both directions.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Delimiter choice for TOON arrays and tables.
///
/// The binary format records the delimiter in every array header so that a
/// value can be re-rendered as text with the same delimiter it was encoded
/// with. It never changes how an array is classified.
///
/// # Examples
///
/// ```rust
/// use toon_binary::Delimiter;
///
/// assert_eq!(Delimiter::Comma.as_byte(), 0x2C);
/// assert_eq!(Delimiter::Tab.as_byte(), 0x09);
/// assert_eq!(Delimiter::Pipe.as_byte(), 0x7C);
/// assert_eq!(Delimiter::from_byte(b'|'), Some(Delimiter::Pipe));
/// assert_eq!(Delimiter::from_byte(b';'), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
}

impl Delimiter {
    /// Returns the string representation of this delimiter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Comma => ",",
            Delimiter::Tab => "\t",
            Delimiter::Pipe => "|",
        }
    }

    /// Returns the wire byte of this delimiter.
    #[inline]
    #[must_use]
    pub const fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
            Delimiter::Pipe => b'|',
        }
    }

    /// Maps a wire byte back to a delimiter.
    #[inline]
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b',' => Some(Delimiter::Comma),
            b'\t' => Some(Delimiter::Tab),
            b'|' => Some(Delimiter::Pipe),
            _ => None,
        }
    }

    /// Maps a character to a delimiter.
    #[must_use]
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            ',' => Some(Delimiter::Comma),
            '\t' => Some(Delimiter::Tab),
            '|' => Some(Delimiter::Pipe),
            _ => None,
        }
    }
}

/// Encode-side key folding mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyFolding {
    /// Objects are encoded as they are.
    #[default]
    Off,
    /// Single-member object chains collapse into dotted keys (`a.b.c`)
    /// whenever [`PathExpansion::Safe`] can restore them.
    Safe,
}

/// Decode-side path expansion mode; the inverse of [`KeyFolding`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PathExpansion {
    /// Dotted keys stay as they are.
    #[default]
    Off,
    /// Dotted keys made of identifier segments expand into nested objects.
    Safe,
}

/// Configuration options for encoding.
///
/// # Examples
///
/// ```rust
/// use toon_binary::{EncodeOptions, Delimiter, KeyFolding};
///
/// let options = EncodeOptions::new()
///     .with_delimiter(Delimiter::Tab)
///     .with_key_folding(KeyFolding::Safe)
///     .with_flatten_depth(3);
///
/// assert_eq!(options.delimiter, Delimiter::Tab);
/// assert_eq!(options.flatten_depth, Some(3));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    pub delimiter: Delimiter,
    pub key_folding: KeyFolding,
    /// Maximum number of segments in a folded key; `None` means unbounded.
    pub flatten_depth: Option<usize>,
    pub max_depth: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            delimiter: Delimiter::default(),
            key_folding: KeyFolding::default(),
            flatten_depth: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EncodeOptions {
    /// Creates default options (comma delimiter, no key folding).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the delimiter recorded in array headers.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the key folding mode.
    #[must_use]
    pub fn with_key_folding(mut self, key_folding: KeyFolding) -> Self {
        self.key_folding = key_folding;
        self
    }

    /// Limits folded keys to `depth` segments.
    ///
    /// Values below 2 leave every object unfolded.
    #[must_use]
    pub fn with_flatten_depth(mut self, depth: usize) -> Self {
        self.flatten_depth = Some(depth);
        self
    }

    /// Sets the maximum container nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Configuration options for decoding.
///
/// # Examples
///
/// ```rust
/// use toon_binary::{DecodeOptions, PathExpansion};
///
/// let options = DecodeOptions::new();
/// assert!(options.strict);
///
/// let lenient = DecodeOptions::new()
///     .with_strict(false)
///     .with_expand_paths(PathExpansion::Safe);
/// assert!(!lenient.strict);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Rejects trailing bytes, duplicate keys, and path expansion conflicts.
    pub strict: bool,
    pub expand_paths: PathExpansion,
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            strict: true,
            expand_paths: PathExpansion::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    /// Creates default options (strict, no path expansion).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables strict validation.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the path expansion mode. Should mirror the encoder's [`KeyFolding`].
    #[must_use]
    pub fn with_expand_paths(mut self, expand_paths: PathExpansion) -> Self {
        self.expand_paths = expand_paths;
        self
    }

    /// Sets the maximum container nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_bytes_roundtrip() {
        for delimiter in [Delimiter::Comma, Delimiter::Tab, Delimiter::Pipe] {
            assert_eq!(Delimiter::from_byte(delimiter.as_byte()), Some(delimiter));
            let ch = delimiter.as_str().chars().next().unwrap();
            assert_eq!(Delimiter::from_char(ch), Some(delimiter));
        }
        assert_eq!(Delimiter::from_char(';'), None);
        assert_eq!(Delimiter::from_byte(0x00), None);
    }

    #[test]
    fn test_defaults() {
        let encode = EncodeOptions::default();
        assert_eq!(encode.delimiter, Delimiter::Comma);
        assert_eq!(encode.key_folding, KeyFolding::Off);
        assert_eq!(encode.flatten_depth, None);
        assert_eq!(encode.max_depth, DEFAULT_MAX_DEPTH);

        let decode = DecodeOptions::default();
        assert!(decode.strict);
        assert_eq!(decode.expand_paths, PathExpansion::Off);
    }
}
