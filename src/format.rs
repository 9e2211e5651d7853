//! # TOON Binary Format Reference
//!
//! This module documents the byte layout produced by [`encode`](crate::encode)
//! and accepted by [`decode`](crate::decode). It contains no code.
//!
//! ## Overview
//!
//! A document is exactly one value. Every value starts with a one-byte tag.
//! There is no magic number, version byte or outer length; strings and arrays
//! carry their own lengths and objects are closed by an end marker.
//!
//! ## Tags
//!
//! | Byte   | Name          | Payload                                           |
//! |--------|---------------|---------------------------------------------------|
//! | `0x00` | `Null`        | none                                              |
//! | `0x01` | `False`       | none                                              |
//! | `0x02` | `True`        | none                                              |
//! | `0x03` | `Number`      | 8 bytes, IEEE-754 double, little-endian           |
//! | `0x04` | `String`      | varint byte length, then UTF-8 bytes              |
//! | `0x05` | `ObjectStart` | members until `0xFF`                              |
//! | `0x06` | `ArrayStart`  | reserved, never written, rejected when read       |
//! | `0x07` | `ArrayHeader` | array header, then elements                       |
//! | `0xFF` | `End`         | none                                              |
//!
//! Any other byte in value position is an unknown type.
//!
//! ## Varints
//!
//! Unsigned integers (lengths and field counts) use LEB128: seven bits per
//! byte, least significant group first, high bit set on every byte except the
//! last.
//!
//! ```text
//! 0       -> 00
//! 127     -> 7F
//! 128     -> 80 01
//! 300     -> AC 02
//! 2^32-1  -> FF FF FF FF 0F
//! ```
//!
//! A varint has at most five bytes; a fifth byte with the continuation bit set
//! is malformed. Values above `u32::MAX` cannot be written.
//!
//! ## Numbers
//!
//! Every number is a double. Integers are not special-cased, so `1` is
//! `03 00 00 00 00 00 00 F0 3F`. The bits are copied as-is: `-0`, both
//! infinities and `NaN` survive a round trip.
//!
//! ## Strings
//!
//! The length counts UTF-8 bytes, not characters. `"😀"` is
//! `04 04 F0 9F 98 80`. The empty string is `04 00`.
//!
//! ## Objects
//!
//! ```text
//! 05 (04 <key> <value>)* FF
//! ```
//!
//! Keys are written as tagged strings. Members appear in insertion order.
//! `{}` is `05 FF`; `{"x": {}}` is `05 04 01 78 05 FF FF`.
//!
//! ## Arrays
//!
//! ```text
//! 07 <length> <delimiter> <field count> (<field name>)* <elements>
//! ```
//!
//! The delimiter byte is one of `0x2C` (`,`), `0x09` (tab) or `0x7C` (`|`). It
//! is carried so the text form can be reproduced; it does not affect how
//! elements are read. Field names are untagged (varint length and UTF-8).
//!
//! A field count of zero means a generic array: `length` tagged values follow.
//!
//! A non-zero field count means a tabular array: `length` rows follow, each
//! holding one tagged primitive per field, in header order.
//!
//! An array is written tabular when it is non-empty, every element is an
//! object with at least one member, every object has the same keys in the
//! same order, and every member value is a primitive. Otherwise it is generic.
//!
//! ```text
//! [{"a":1,"b":2},{"a":3,"b":4}]
//!
//! 07 02 2C 02 01 61 01 62          header: 2 rows, ',', fields a b
//! 03 <1.0> 03 <2.0>                row 0
//! 03 <3.0> 03 <4.0>                row 1
//! ```
//!
//! ## Key Folding
//!
//! With [`KeyFolding::Safe`](crate::KeyFolding::Safe) the encoder collapses
//! chains of single-member objects into one dotted key before writing, so
//! `{"a":{"b":{"c":1}}}` is written as `{"a.b.c":1}`. Only keys made of ASCII
//! letters, digits and `_`, not starting with a digit, are folded. With
//! [`PathExpansion::Safe`](crate::PathExpansion::Safe) the decoder reverses
//! this.
//!
//! ## Errors
//!
//! Decoding never panics and never reads past the input. Each failure carries
//! the byte offset where the offending item starts:
//!
//! - input ends early: `UnexpectedEof`
//! - varint running past five bytes: `MalformedVarint`
//! - string bytes are not UTF-8: `InvalidUtf8`
//! - delimiter byte outside the three above: `InvalidDelimiter`
//! - wrong structural tag, including `0x06` and a stray `0xFF`: `UnexpectedTag`
//! - unrecognized tag byte: `UnknownType`
//! - nesting deeper than the configured limit: `DepthLimitExceeded`
//!
//! In strict mode (the default) bytes after the root value, repeated object
//! keys, repeated header fields and conflicting dotted paths are rejected too.
