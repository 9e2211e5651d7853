//! Recursive value encoder and decoder.
//!
//! The codec walks a [`Value`] tree on top of [`Writer`] and [`Reader`]. Objects
//! are framed by start/end tags with tagged keys. Arrays always start with an
//! array header; [`classify`] decides whether the header carries field names
//! (tabular) or not (generic).
//!
//! Nesting is capped by `max_depth` in both directions so hostile input cannot
//! exhaust the stack.
//!
//! The functions here operate on the wire layout only. Normalization, key
//! folding and path expansion happen in the crate-level [`encode`](crate::encode)
//! and [`decode`](crate::decode).

use crate::reader::Reader;
use crate::shape::{classify, ArrayShape};
use crate::tag::{Container, Tag};
use crate::writer::Writer;
use crate::{DecodeOptions, Delimiter, EncodeOptions, Error, Result, ToonMap, Value};
use std::collections::HashSet;
use tracing::trace;

/// Encodes `value` into a fresh buffer.
///
/// The value must already be normalized: [`Value::Absent`] anywhere in the
/// tree fails with [`Error::UnsupportedType`].
///
/// # Examples
///
/// ```rust
/// use toon_binary::codec::encode_value;
/// use toon_binary::{toon, EncodeOptions};
///
/// let bytes = encode_value(&toon!({ "x": {} }), &EncodeOptions::default()).unwrap();
/// assert_eq!(bytes, vec![0x05, 0x04, 0x01, b'x', 0x05, 0xFF, 0xFF]);
/// ```
pub fn encode_value(value: &Value, options: &EncodeOptions) -> Result<Vec<u8>> {
    let mut encoder = Encoder::new(options);
    encoder.write_value(value)?;
    Ok(encoder.into_bytes())
}

/// Decodes one root value from `input`.
///
/// In strict mode any bytes after the root value fail with
/// [`Error::TrailingBytes`].
pub fn decode_value(input: &[u8], options: &DecodeOptions) -> Result<Value> {
    let mut decoder = Decoder::new(input, options);
    let value = decoder.read_value()?;
    if options.strict && !decoder.reader.is_empty() {
        return Err(Error::TrailingBytes {
            offset: decoder.reader.position(),
        });
    }
    Ok(value)
}

/// Streams a value tree into a [`Writer`].
pub struct Encoder {
    writer: Writer,
    delimiter: Delimiter,
    max_depth: usize,
    depth: usize,
}

impl Encoder {
    #[must_use]
    pub fn new(options: &EncodeOptions) -> Self {
        Encoder {
            writer: Writer::new(),
            delimiter: options.delimiter,
            max_depth: options.max_depth,
            depth: 0,
        }
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.writer.into_bytes()
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(Error::DepthLimitExceeded {
                offset: self.writer.position(),
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub fn write_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Object(obj) => self.write_object(obj),
            Value::Array(items) => self.write_array(items),
            _ => self.writer.write_primitive(value),
        }
    }

    fn write_object(&mut self, obj: &ToonMap) -> Result<()> {
        self.enter()?;
        self.writer.write_start(Container::Object);
        for (key, value) in obj {
            self.writer.write_key(key)?;
            self.write_value(value)?;
        }
        self.writer.write_end();
        self.depth -= 1;
        Ok(())
    }

    fn write_array(&mut self, items: &[Value]) -> Result<()> {
        self.enter()?;
        match classify(items) {
            ArrayShape::Tabular { fields, rows } => {
                trace!(rows, fields = fields.len(), "tabular array");
                self.writer
                    .write_array_header(rows, self.delimiter, Some(fields.as_slice()))?;
                // Rows share the header's key order, so cells follow it.
                for row in items.iter().filter_map(Value::as_object) {
                    for cell in row.values() {
                        self.writer.write_primitive(cell)?;
                    }
                }
            }
            ArrayShape::Generic { length } => {
                self.writer.write_array_header(length, self.delimiter, None)?;
                for item in items {
                    self.write_value(item)?;
                }
            }
        }
        self.depth -= 1;
        Ok(())
    }
}

/// Rebuilds a value tree from a [`Reader`].
pub struct Decoder<'a> {
    reader: Reader<'a>,
    strict: bool,
    max_depth: usize,
    depth: usize,
}

impl<'a> Decoder<'a> {
    #[must_use]
    pub fn new(input: &'a [u8], options: &DecodeOptions) -> Self {
        Decoder {
            reader: Reader::new(input),
            strict: options.strict,
            max_depth: options.max_depth,
            depth: 0,
        }
    }

    /// Offset of the next unread byte.
    #[must_use]
    pub fn position(&self) -> usize {
        self.reader.position()
    }

    fn enter(&mut self, offset: usize) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(Error::DepthLimitExceeded {
                offset,
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Reads the next complete value.
    pub fn read_value(&mut self) -> Result<Value> {
        let offset = self.reader.position();
        let byte = self.reader.peek_byte()?;
        match Tag::from_byte(byte) {
            Some(tag) if tag.is_primitive() => self.reader.read_primitive(),
            Some(Tag::ObjectStart) => self.read_object(),
            Some(Tag::ArrayHeader) => self.read_array(),
            Some(_) => Err(Error::unexpected_tag(offset, "value", byte)),
            None => Err(Error::UnknownType { offset, tag: byte }),
        }
    }

    fn read_object(&mut self) -> Result<Value> {
        self.enter(self.reader.position())?;
        self.reader.read_start()?;

        let mut obj = ToonMap::new();
        while !self.reader.peek_end()? {
            let key_offset = self.reader.position();
            let key = self.reader.read_key()?;
            if self.strict && obj.contains_key(key) {
                return Err(Error::DuplicateKey {
                    offset: key_offset,
                    key: key.to_string(),
                });
            }
            let value = self.read_value()?;
            obj.insert(key.to_string(), value);
        }
        self.reader.read_end()?;

        self.depth -= 1;
        Ok(Value::Object(obj))
    }

    fn read_array(&mut self) -> Result<Value> {
        let start = self.reader.position();
        self.enter(start)?;
        let header = self.reader.read_array_header()?;

        if self.strict {
            let mut seen = HashSet::with_capacity(header.fields.len());
            for field in &header.fields {
                if !seen.insert(field.as_str()) {
                    return Err(Error::DuplicateKey {
                        offset: start,
                        key: field.clone(),
                    });
                }
            }
        }

        // Every element takes at least one byte.
        let mut items = Vec::with_capacity(header.length.min(self.reader.remaining()));
        if header.is_tabular() {
            trace!(
                rows = header.length,
                fields = header.fields.len(),
                "tabular array"
            );
            for _ in 0..header.length {
                let mut row = ToonMap::with_capacity(header.fields.len());
                for field in &header.fields {
                    row.insert(field.clone(), self.reader.read_primitive()?);
                }
                items.push(Value::Object(row));
            }
        } else {
            for _ in 0..header.length {
                items.push(self.read_value()?);
            }
        }

        self.depth -= 1;
        Ok(Value::Array(items))
    }
}
