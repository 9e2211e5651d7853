//! Wire tags of the TOON binary format.
//!
//! Every value on the wire starts with one tag byte. The set is closed: any
//! byte not listed in [`Tag`] is rejected by the decoder.

/// A tag byte of the binary format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    Null = 0x00,
    False = 0x01,
    True = 0x02,
    /// Followed by an 8-byte little-endian double.
    Number = 0x03,
    /// Followed by a varint byte length and that many UTF-8 bytes.
    String = 0x04,
    /// Followed by key/value pairs until [`Tag::End`].
    ObjectStart = 0x05,
    /// Reserved. Never written; rejected in value position.
    ArrayStart = 0x06,
    /// Followed by length, delimiter, field list, then the elements.
    ArrayHeader = 0x07,
    /// Closes an object.
    End = 0xFF,
}

impl Tag {
    #[inline]
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Tag> {
        match byte {
            0x00 => Some(Tag::Null),
            0x01 => Some(Tag::False),
            0x02 => Some(Tag::True),
            0x03 => Some(Tag::Number),
            0x04 => Some(Tag::String),
            0x05 => Some(Tag::ObjectStart),
            0x06 => Some(Tag::ArrayStart),
            0x07 => Some(Tag::ArrayHeader),
            0xFF => Some(Tag::End),
            _ => None,
        }
    }

    /// Returns `true` for the tags [`Reader::read_primitive`](crate::reader::Reader::read_primitive) accepts.
    #[must_use]
    pub const fn is_primitive(self) -> bool {
        matches!(
            self,
            Tag::Null | Tag::False | Tag::True | Tag::Number | Tag::String
        )
    }
}

/// The two containers a start tag can open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Container {
    Object,
    Array,
}

impl Container {
    #[must_use]
    pub const fn tag(self) -> Tag {
        match self {
            Container::Object => Tag::ObjectStart,
            Container::Array => Tag::ArrayStart,
        }
    }
}
