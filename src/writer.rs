//! Growable output buffer for the binary format.
//!
//! [`Writer`] owns a single `Vec<u8>` and appends primitives and structural
//! tags to it. Capacity doubles on growth, or jumps straight to the required
//! size when doubling is not enough. [`Writer::into_bytes`] hands the buffer
//! over trimmed to the written length.
//!
//! ## Examples
//!
//! ```rust
//! use toon_binary::writer::Writer;
//! use toon_binary::Value;
//!
//! let mut writer = Writer::new();
//! writer.write_primitive(&Value::from("hi")).unwrap();
//! assert_eq!(writer.into_bytes(), vec![0x04, 0x02, b'h', b'i']);
//! ```

use crate::options::Delimiter;
use crate::tag::{Container, Tag};
use crate::{Error, Result, Value};

const DEFAULT_CAPACITY: usize = 256;

/// Append-only binary writer.
#[derive(Debug, Clone)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Writer {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns the written bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the writer and returns exactly the written bytes.
    #[must_use]
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.buf.shrink_to_fit();
        self.buf
    }

    /// Makes room for `additional` more bytes.
    fn ensure_capacity(&mut self, additional: usize) {
        let len = self.buf.len();
        let required = len.saturating_add(additional);
        let capacity = self.buf.capacity();
        if required > capacity {
            let target = capacity.saturating_mul(2).max(required);
            self.buf.reserve_exact(target - len);
        }
    }

    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.ensure_capacity(1);
        self.buf.push(byte);
    }

    #[inline]
    pub fn write_tag(&mut self, tag: Tag) {
        self.write_byte(tag.as_byte());
    }

    /// Writes `value` as a minimal base-128 varint (1 to 5 bytes).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_binary::writer::Writer;
    ///
    /// let mut writer = Writer::new();
    /// writer.write_varint(300);
    /// assert_eq!(writer.as_bytes(), &[0xAC, 0x02]);
    /// ```
    pub fn write_varint(&mut self, mut value: u32) {
        self.ensure_capacity(5);
        loop {
            let byte = (value & 0x7F) as u8;
            value >>= 7;
            if value == 0 {
                self.buf.push(byte);
                return;
            }
            self.buf.push(byte | 0x80);
        }
    }

    /// Writes a length or count, failing if it exceeds `u32::MAX`.
    pub fn write_length(&mut self, length: usize) -> Result<()> {
        let value = u32::try_from(length).map_err(|_| Error::LengthOverflow { length })?;
        self.write_varint(value);
        Ok(())
    }

    /// Writes the 8 little-endian bytes of `value`, bit for bit.
    pub fn write_double(&mut self, value: f64) {
        self.ensure_capacity(8);
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes the UTF-8 byte length of `value` followed by its bytes. No tag.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        self.write_length(value.len())?;
        self.ensure_capacity(value.len());
        self.buf.extend_from_slice(value.as_bytes());
        Ok(())
    }

    pub fn write_delimiter(&mut self, delimiter: Delimiter) {
        self.write_byte(delimiter.as_byte());
    }

    /// Writes a delimiter given as a character.
    ///
    /// Fails with [`Error::InvalidDelimiter`] for anything but `,`, tab and `|`.
    pub fn write_delimiter_char(&mut self, ch: char) -> Result<()> {
        let delimiter = Delimiter::from_char(ch).ok_or(Error::InvalidDelimiter {
            offset: self.position(),
            found: ch as u32,
        })?;
        self.write_delimiter(delimiter);
        Ok(())
    }

    /// Writes an object member key: the string tag, then the string.
    pub fn write_key(&mut self, key: &str) -> Result<()> {
        self.write_tag(Tag::String);
        self.write_string(key)
    }

    /// Writes an array header.
    ///
    /// Layout: tag `0x07`, varint length, delimiter byte, varint field count,
    /// then each field name as an untagged string. `None` and an empty slice
    /// both write a field count of 0.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_binary::writer::Writer;
    /// use toon_binary::Delimiter;
    ///
    /// let mut writer = Writer::new();
    /// let fields = vec!["a".to_string()];
    /// writer.write_array_header(2, Delimiter::Pipe, Some(fields.as_slice())).unwrap();
    /// assert_eq!(writer.as_bytes(), &[0x07, 0x02, b'|', 0x01, 0x01, b'a']);
    /// ```
    pub fn write_array_header(
        &mut self,
        length: usize,
        delimiter: Delimiter,
        fields: Option<&[String]>,
    ) -> Result<()> {
        let fields = fields.unwrap_or(&[]);
        self.write_tag(Tag::ArrayHeader);
        self.write_length(length)?;
        self.write_delimiter(delimiter);
        self.write_length(fields.len())?;
        for field in fields {
            self.write_string(field)?;
        }
        Ok(())
    }

    pub fn write_start(&mut self, container: Container) {
        self.write_tag(container.tag());
    }

    pub fn write_end(&mut self) {
        self.write_tag(Tag::End);
    }

    /// Writes a tagged null, boolean, number or string.
    ///
    /// Arrays, objects and absent values fail with [`Error::UnsupportedType`];
    /// the codec frames those itself.
    pub fn write_primitive(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.write_tag(Tag::Null),
            Value::Bool(false) => self.write_tag(Tag::False),
            Value::Bool(true) => self.write_tag(Tag::True),
            Value::Number(n) => {
                self.write_tag(Tag::Number);
                self.write_double(n.as_f64());
            }
            Value::String(s) => {
                self.write_tag(Tag::String);
                self.write_string(s)?;
            }
            Value::Absent | Value::Array(_) | Value::Object(_) => {
                return Err(Error::UnsupportedType(format!(
                    "{} in primitive position",
                    value.type_name()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn varint_bytes(value: u32) -> Vec<u8> {
        let mut writer = Writer::new();
        writer.write_varint(value);
        writer.into_bytes()
    }

    #[test]
    fn test_varint_is_minimal() {
        assert_eq!(varint_bytes(0), vec![0x00]);
        assert_eq!(varint_bytes(127), vec![0x7F]);
        assert_eq!(varint_bytes(128), vec![0x80, 0x01]);
        assert_eq!(varint_bytes(16_383), vec![0xFF, 0x7F]);
        assert_eq!(varint_bytes(16_384), vec![0x80, 0x80, 0x01]);
        assert_eq!(varint_bytes(u32::MAX), vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
    }

    #[test]
    fn test_double_keeps_bits() {
        let mut writer = Writer::new();
        writer.write_double(-0.0);
        assert_eq!(writer.as_bytes(), &[0, 0, 0, 0, 0, 0, 0, 0x80]);

        let mut writer = Writer::new();
        writer.write_double(1.0);
        assert_eq!(writer.as_bytes(), &[0, 0, 0, 0, 0, 0, 0xF0, 0x3F]);
    }

    #[test]
    fn test_string_length_is_in_bytes() {
        let mut writer = Writer::new();
        writer.write_string("😀").unwrap();
        assert_eq!(writer.as_bytes(), &[0x04, 0xF0, 0x9F, 0x98, 0x80]);
    }

    #[test]
    fn test_key_is_tagged() {
        let mut writer = Writer::new();
        writer.write_key("x").unwrap();
        assert_eq!(writer.as_bytes(), &[0x04, 0x01, b'x']);
    }

    #[test]
    fn test_generic_header() {
        let mut writer = Writer::new();
        writer.write_array_header(3, Delimiter::Tab, None).unwrap();
        assert_eq!(writer.as_bytes(), &[0x07, 0x03, 0x09, 0x00]);

        let mut writer = Writer::new();
        writer.write_array_header(0, Delimiter::Comma, Some(&[][..])).unwrap();
        assert_eq!(writer.as_bytes(), &[0x07, 0x00, 0x2C, 0x00]);
    }

    #[test]
    fn test_delimiter_char() {
        let mut writer = Writer::new();
        writer.write_delimiter_char('|').unwrap();
        assert_eq!(writer.as_bytes(), &[0x7C]);

        let err = writer.write_delimiter_char(';').unwrap_err();
        assert_eq!(
            err,
            Error::InvalidDelimiter {
                offset: 1,
                found: ';' as u32
            }
        );
    }

    #[test]
    fn test_primitives() {
        let mut writer = Writer::new();
        writer.write_primitive(&Value::Null).unwrap();
        writer.write_primitive(&Value::from(false)).unwrap();
        writer.write_primitive(&Value::from(true)).unwrap();
        writer.write_primitive(&Value::from("")).unwrap();
        assert_eq!(writer.as_bytes(), &[0x00, 0x01, 0x02, 0x04, 0x00]);
    }

    #[test]
    fn test_containers_are_not_primitives() {
        let mut writer = Writer::new();
        for value in [Value::Array(vec![]), Value::Object(Default::default()), Value::Absent] {
            let err = writer.write_primitive(&value).unwrap_err();
            assert!(err.is_encode());
        }
        assert!(writer.is_empty());
    }

    #[test]
    fn test_structural_tags() {
        let mut writer = Writer::new();
        writer.write_start(Container::Object);
        writer.write_start(Container::Array);
        writer.write_end();
        assert_eq!(writer.as_bytes(), &[0x05, 0x06, 0xFF]);
    }

    #[test]
    fn test_growth() {
        let mut writer = Writer::with_capacity(1);
        writer.write_byte(1);
        writer.write_byte(2);
        assert!(writer.capacity() >= 2);

        // Doubling is not enough for a long string: grow to the exact need.
        let long = "x".repeat(100);
        writer.write_string(&long).unwrap();
        assert!(writer.capacity() >= 103);

        let bytes = writer.into_bytes();
        assert_eq!(bytes.len(), 103);
    }

    #[test]
    fn test_length_overflow() {
        let mut writer = Writer::new();
        let length = u32::MAX as usize + 1;
        assert_eq!(
            writer.write_length(length),
            Err(Error::LengthOverflow { length })
        );
    }
}
