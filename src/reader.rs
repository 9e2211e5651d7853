//! Bounds-checked cursor over encoded input.
//!
//! [`Reader`] borrows the input slice and advances a single cursor. Every read
//! checks the remaining length first and fails with a typed [`Error`] carrying
//! the byte offset at which the failing item starts; nothing panics on short
//! or corrupt input.
//!
//! ## Examples
//!
//! ```rust
//! use toon_binary::reader::Reader;
//! use toon_binary::Value;
//!
//! let mut reader = Reader::new(&[0x02, 0x04, 0x02, b'h', b'i']);
//! assert_eq!(reader.read_primitive().unwrap(), Value::Bool(true));
//! assert_eq!(reader.read_primitive().unwrap(), Value::from("hi"));
//! assert!(reader.is_empty());
//! ```

use crate::options::Delimiter;
use crate::tag::{Container, Tag};
use crate::{Error, Result, Value};

/// A decoded array header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayHeader {
    pub length: usize,
    pub delimiter: Delimiter,
    /// Field names of a tabular array; empty for a generic array.
    pub fields: Vec<String>,
}

impl ArrayHeader {
    #[inline]
    #[must_use]
    pub fn is_tabular(&self) -> bool {
        !self.fields.is_empty()
    }
}

/// Cursor over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    input: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Reader { input, position: 0 }
    }

    /// Offset of the next unread byte.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of unread bytes.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.input.len() - self.position
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Consumes `n` bytes, or fails without moving if fewer remain.
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::unexpected_eof(self.position));
        }
        let start = self.position;
        self.position += n;
        Ok(&self.input[start..self.position])
    }

    #[inline]
    pub fn read_byte(&mut self) -> Result<u8> {
        let byte = self.peek_byte()?;
        self.position += 1;
        Ok(byte)
    }

    #[inline]
    pub fn peek_byte(&self) -> Result<u8> {
        self.input
            .get(self.position)
            .copied()
            .ok_or(Error::unexpected_eof(self.position))
    }

    /// Reads a base-128 varint of at most five bytes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_binary::reader::Reader;
    /// use toon_binary::Error;
    ///
    /// assert_eq!(Reader::new(&[0xAC, 0x02]).read_varint(), Ok(300));
    ///
    /// let err = Reader::new(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]).read_varint();
    /// assert_eq!(err, Err(Error::MalformedVarint { offset: 0 }));
    /// ```
    pub fn read_varint(&mut self) -> Result<u64> {
        let start = self.position;
        let mut result: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            let byte = self.read_byte()?;
            result |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
            if shift > 28 {
                return Err(Error::MalformedVarint { offset: start });
            }
        }
    }

    /// Reads a varint used as a length or count.
    pub fn read_length(&mut self) -> Result<usize> {
        let start = self.position;
        let value = self.read_varint()?;
        usize::try_from(value).map_err(|_| Error::MalformedVarint { offset: start })
    }

    /// Reads 8 little-endian bytes as a double, bit for bit.
    pub fn read_double(&mut self) -> Result<f64> {
        let bytes = self.take(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(f64::from_le_bytes(raw))
    }

    /// Reads an untagged length-prefixed UTF-8 string, borrowing from the input.
    ///
    /// The declared length is checked against the remaining input before any
    /// bytes are touched.
    pub fn read_string(&mut self) -> Result<&'a str> {
        let length = self.read_length()?;
        let start = self.position;
        let bytes = self.take(length)?;
        std::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8 { offset: start })
    }

    pub fn read_delimiter(&mut self) -> Result<Delimiter> {
        let offset = self.position;
        let byte = self.read_byte()?;
        Delimiter::from_byte(byte).ok_or(Error::InvalidDelimiter {
            offset,
            found: u32::from(byte),
        })
    }

    fn expect_tag(&mut self, tag: Tag, expected: &'static str) -> Result<()> {
        let offset = self.position;
        let byte = self.read_byte()?;
        if byte == tag.as_byte() {
            Ok(())
        } else {
            Err(Error::unexpected_tag(offset, expected, byte))
        }
    }

    /// Reads an object member key: the string tag, then the string.
    pub fn read_key(&mut self) -> Result<&'a str> {
        self.expect_tag(Tag::String, "string key")?;
        self.read_string()
    }

    /// Reads an array header written by
    /// [`Writer::write_array_header`](crate::writer::Writer::write_array_header).
    pub fn read_array_header(&mut self) -> Result<ArrayHeader> {
        self.expect_tag(Tag::ArrayHeader, "array header")?;
        let length = self.read_length()?;
        let delimiter = self.read_delimiter()?;
        let count = self.read_length()?;

        // Every field name takes at least one byte.
        let mut fields = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            fields.push(self.read_string()?.to_string());
        }

        Ok(ArrayHeader {
            length,
            delimiter,
            fields,
        })
    }

    /// Reads a container start tag.
    pub fn read_start(&mut self) -> Result<Container> {
        let offset = self.position;
        let byte = self.read_byte()?;
        match Tag::from_byte(byte) {
            Some(Tag::ObjectStart) => Ok(Container::Object),
            Some(Tag::ArrayStart) => Ok(Container::Array),
            _ => Err(Error::unexpected_tag(offset, "container start", byte)),
        }
    }

    pub fn read_end(&mut self) -> Result<()> {
        self.expect_tag(Tag::End, "end marker")
    }

    /// Returns `true` if the next byte is the end marker, without consuming it.
    pub fn peek_end(&self) -> Result<bool> {
        Ok(self.peek_byte()? == Tag::End.as_byte())
    }

    /// Reads a tagged null, boolean, number or string.
    ///
    /// Any other tag fails with [`Error::UnknownType`].
    pub fn read_primitive(&mut self) -> Result<Value> {
        let offset = self.position;
        let byte = self.read_byte()?;
        match Tag::from_byte(byte) {
            Some(Tag::Null) => Ok(Value::Null),
            Some(Tag::False) => Ok(Value::Bool(false)),
            Some(Tag::True) => Ok(Value::Bool(true)),
            Some(Tag::Number) => Ok(Value::from(self.read_double()?)),
            Some(Tag::String) => Ok(Value::String(self.read_string()?.to_string())),
            _ => Err(Error::UnknownType { offset, tag: byte }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varint() {
        assert_eq!(Reader::new(&[0x00]).read_varint(), Ok(0));
        assert_eq!(Reader::new(&[0x7F]).read_varint(), Ok(127));
        assert_eq!(Reader::new(&[0x80, 0x01]).read_varint(), Ok(128));
        assert_eq!(
            Reader::new(&[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]).read_varint(),
            Ok(u64::from(u32::MAX))
        );
    }

    #[test]
    fn test_varint_eof_midway() {
        let mut reader = Reader::new(&[0x80]);
        assert_eq!(reader.read_varint(), Err(Error::UnexpectedEof { offset: 1 }));
    }

    #[test]
    fn test_varint_too_long() {
        let mut reader = Reader::new(&[0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]);
        assert_eq!(reader.read_varint(), Ok(0));
        assert_eq!(
            reader.read_varint(),
            Err(Error::MalformedVarint { offset: 1 })
        );
    }

    #[test]
    fn test_double() {
        let mut reader = Reader::new(&[0, 0, 0, 0, 0, 0, 0, 0x80]);
        let value = reader.read_double().unwrap();
        assert_eq!(value, 0.0);
        assert!(value.is_sign_negative());

        let mut short = Reader::new(&[0, 0, 0]);
        assert_eq!(short.read_double(), Err(Error::UnexpectedEof { offset: 0 }));
        assert_eq!(short.position(), 0);
    }

    #[test]
    fn test_string() {
        let mut reader = Reader::new(&[0x04, 0xF0, 0x9F, 0x98, 0x80]);
        assert_eq!(reader.read_string(), Ok("😀"));
        assert!(reader.is_empty());
    }

    #[test]
    fn test_string_shorter_than_declared() {
        let mut reader = Reader::new(&[0x05, b'h', b'i']);
        assert_eq!(reader.read_string(), Err(Error::UnexpectedEof { offset: 1 }));
    }

    #[test]
    fn test_string_huge_declared_length() {
        let mut reader = Reader::new(&[0xFF, 0xFF, 0xFF, 0xFF, 0x0F, b'x']);
        assert_eq!(reader.read_string(), Err(Error::UnexpectedEof { offset: 5 }));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut reader = Reader::new(&[0x02, 0xC3, 0x28]);
        assert_eq!(reader.read_string(), Err(Error::InvalidUtf8 { offset: 1 }));
    }

    #[test]
    fn test_delimiter() {
        let mut reader = Reader::new(&[0x2C, 0x09, 0x7C, 0x3B]);
        assert_eq!(reader.read_delimiter(), Ok(Delimiter::Comma));
        assert_eq!(reader.read_delimiter(), Ok(Delimiter::Tab));
        assert_eq!(reader.read_delimiter(), Ok(Delimiter::Pipe));
        assert_eq!(
            reader.read_delimiter(),
            Err(Error::InvalidDelimiter {
                offset: 3,
                found: 0x3B
            })
        );
    }

    #[test]
    fn test_key_requires_string_tag() {
        let mut reader = Reader::new(&[0x04, 0x01, b'k']);
        assert_eq!(reader.read_key(), Ok("k"));

        let mut reader = Reader::new(&[0x01, b'k']);
        assert_eq!(
            reader.read_key(),
            Err(Error::UnexpectedTag {
                offset: 0,
                expected: "string key",
                found: 0x01
            })
        );
    }

    #[test]
    fn test_array_header() {
        let bytes = [0x07, 0x02, 0x2C, 0x02, 0x01, b'a', 0x01, b'b'];
        let header = Reader::new(&bytes).read_array_header().unwrap();
        assert_eq!(
            header,
            ArrayHeader {
                length: 2,
                delimiter: Delimiter::Comma,
                fields: vec!["a".to_string(), "b".to_string()],
            }
        );
        assert!(header.is_tabular());

        let generic = Reader::new(&[0x07, 0x00, 0x7C, 0x00])
            .read_array_header()
            .unwrap();
        assert!(!generic.is_tabular());
        assert_eq!(generic.delimiter, Delimiter::Pipe);
    }

    #[test]
    fn test_array_header_huge_field_count() {
        let bytes = [0x07, 0x01, 0x2C, 0xFF, 0xFF, 0xFF, 0xFF, 0x0F];
        assert_eq!(
            Reader::new(&bytes).read_array_header(),
            Err(Error::UnexpectedEof { offset: 8 })
        );
    }

    #[test]
    fn test_structural_tags() {
        let mut reader = Reader::new(&[0x05, 0x06, 0xFF, 0x00]);
        assert_eq!(reader.read_start(), Ok(Container::Object));
        assert_eq!(reader.read_start(), Ok(Container::Array));
        assert_eq!(reader.peek_end(), Ok(true));
        assert_eq!(reader.read_end(), Ok(()));
        assert_eq!(reader.peek_end(), Ok(false));
        assert!(reader.read_end().is_err());
        assert_eq!(reader.peek_end(), Err(Error::UnexpectedEof { offset: 4 }));
    }

    #[test]
    fn test_read_start_rejects_primitives() {
        let mut reader = Reader::new(&[0x00]);
        assert!(matches!(
            reader.read_start(),
            Err(Error::UnexpectedTag { offset: 0, .. })
        ));
    }

    #[test]
    fn test_primitives() {
        let mut bytes = vec![0x00, 0x01, 0x02, 0x03];
        bytes.extend_from_slice(&2.5f64.to_le_bytes());
        let mut reader = Reader::new(&bytes);
        assert_eq!(reader.read_primitive(), Ok(Value::Null));
        assert_eq!(reader.read_primitive(), Ok(Value::Bool(false)));
        assert_eq!(reader.read_primitive(), Ok(Value::Bool(true)));
        assert_eq!(reader.read_primitive(), Ok(Value::from(2.5)));
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_unknown_primitive_tag() {
        for tag in [0x05u8, 0x06, 0x07, 0x08, 0xFF] {
            let bytes = [tag];
            assert_eq!(
                Reader::new(&bytes).read_primitive(),
                Err(Error::UnknownType { offset: 0, tag })
            );
        }
    }
}
