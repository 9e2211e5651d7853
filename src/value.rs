//! Dynamic value representation for TOON data.
//!
//! This module provides the [`Value`] enum, the canonical model both TOON
//! encodings (text and binary) serialize, and [`normalize`], which removes
//! absent members before a value is encoded or compared.
//!
//! ## Core Types
//!
//! - [`Value`]: null, boolean, number, string, array, object, plus the
//!   transient [`Value::Absent`] marker
//! - [`Number`]: an IEEE-754 double whose equality is bit-exact, so `-0`,
//!   `Infinity`, `-Infinity` and `NaN` all round-trip observably
//!
//! ## Creating Values
//!
//! ```rust
//! use toon_binary::{toon, Value};
//!
//! let null = Value::Null;
//! let boolean = Value::from(true);
//! let number = Value::from(42);
//! let text = Value::from("hello");
//!
//! let obj = toon!({
//!     "name": "Alice",
//!     "age": 30
//! });
//! assert!(obj.is_object());
//! ```
//!
//! ## Host Type Conversions
//!
//! Dates and big integers have no wire type of their own. They convert to the
//! closest TOON value when a [`Value`] is built:
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use num_bigint::BigInt;
//! use toon_binary::Value;
//!
//! let date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
//! assert_eq!(Value::from(date).as_str(), Some("2024-01-15T10:30:00.000Z"));
//!
//! // Inside the safe integer range: a number. Outside: a decimal string.
//! assert_eq!(Value::from(BigInt::from(42)).as_i64(), Some(42));
//! let huge: BigInt = "9007199254740993".parse().unwrap();
//! assert_eq!(Value::from(huge).as_str(), Some("9007199254740993"));
//! ```

use crate::ToonMap;
use chrono::{DateTime, SecondsFormat, Utc};
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed representation of any TOON value.
///
/// # Examples
///
/// ```rust
/// use toon_binary::{Number, Value};
///
/// let null = Value::Null;
/// let num = Value::Number(Number::from(42));
/// let text = Value::String("hello".to_string());
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert!(text.is_string());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    /// A missing member or element. Removed by [`normalize`]; never encoded and
    /// never produced by decoding.
    Absent,
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(ToonMap),
}

/// A double-precision number.
///
/// Equality compares bit patterns, except that every NaN equals every other
/// NaN. `Number::from(0.0) != Number::from(-0.0)`.
///
/// # Examples
///
/// ```rust
/// use toon_binary::Number;
///
/// assert_eq!(Number::from(f64::NAN), Number::from(f64::NAN));
/// assert_ne!(Number::from(0.0), Number::from(-0.0));
/// assert_eq!(Number::from(42).as_i64(), Some(42));
/// assert_eq!(Number::from(42.5).as_i64(), None);
/// assert!(Number::from(f64::INFINITY).is_special());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Number(f64);

impl Number {
    /// Largest integer a double represents exactly together with all smaller ones.
    pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

    #[inline]
    #[must_use]
    pub const fn from_f64(value: f64) -> Self {
        Number(value)
    }

    #[inline]
    #[must_use]
    pub const fn as_f64(&self) -> f64 {
        self.0
    }

    /// Returns `true` for finite values with no fractional part.
    #[inline]
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.0.is_finite() && self.0.fract() == 0.0
    }

    /// Returns `true` for `Infinity`, `-Infinity` and `NaN`.
    #[inline]
    #[must_use]
    pub fn is_special(&self) -> bool {
        !self.0.is_finite()
    }

    #[inline]
    #[must_use]
    pub fn is_negative_zero(&self) -> bool {
        self.0 == 0.0 && self.0.is_sign_negative()
    }

    /// Converts to `i64` when the value is integral and inside the `i64` range.
    ///
    /// `-0` converts to `0`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        // 2^63 is exact as a double; the range is half-open.
        if self.is_integer()
            && self.0 >= -9_223_372_036_854_775_808.0
            && self.0 < 9_223_372_036_854_775_808.0
        {
            Some(self.0 as i64)
        } else {
            None
        }
    }

    /// Converts to `u64` when the value is integral, non-negative, and in range.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        if self.is_integer() && self.0 >= 0.0 && self.0 < 18_446_744_073_709_551_616.0 {
            Some(self.0 as u64)
        } else {
            None
        }
    }

    /// Returns the value as an integer if it lies in the safe integer range.
    pub(crate) fn as_safe_integer(&self) -> Option<i64> {
        self.as_i64()
            .filter(|i| i.abs() <= Self::MAX_SAFE_INTEGER && !self.is_negative_zero())
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        (self.0.is_nan() && other.0.is_nan()) || self.0.to_bits() == other.0.to_bits()
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_nan() {
            write!(f, "NaN")
        } else if self.0.is_infinite() {
            write!(f, "{}", if self.0 > 0.0 { "Infinity" } else { "-Infinity" })
        } else if self.is_negative_zero() {
            write!(f, "-0")
        } else if let Some(i) = self.as_safe_integer() {
            write!(f, "{}", i)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

macro_rules! impl_number_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Number(f64::from(value))
                }
            }

            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(Number::from(value))
                }
            }
        )*
    };
}

impl_number_from!(i8, i16, i32, u8, u16, u32, f32, f64);

// Integers wider than a double's mantissa. `Number` rounds them; `Value`
// keeps them exact as decimal strings outside the safe integer range.
macro_rules! impl_wide_integer_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Number(value as f64)
                }
            }

            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    match i64::try_from(value) {
                        Ok(i) if is_safe_integer(i) => Value::Number(Number(i as f64)),
                        _ => Value::String(value.to_string()),
                    }
                }
            }
        )*
    };
}

impl_wide_integer_from!(i64, isize, u64, usize, i128, u128);

fn is_safe_integer(i: i64) -> bool {
    (-Number::MAX_SAFE_INTEGER..=Number::MAX_SAFE_INTEGER).contains(&i)
}

impl Value {
    #[inline]
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns `true` for values that can sit in a tabular row: null, booleans,
    /// numbers and strings.
    #[inline]
    #[must_use]
    pub const fn is_primitive(&self) -> bool {
        matches!(
            self,
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
        )
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    /// If the value is an integral number in `i64` range, returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_binary::Value;
    ///
    /// assert_eq!(Value::from(42).as_i64(), Some(42));
    /// assert_eq!(Value::from(42.5).as_i64(), None);
    /// assert_eq!(Value::from("42").as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ToonMap> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Human-readable name of the variant, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Returns a normalized copy of this value. See [`normalize`].
    #[must_use]
    pub fn normalized(&self) -> Value {
        normalize(self.clone())
    }
}

/// Removes every [`Value::Absent`] object member and array element.
///
/// Later array elements shift left to fill the gap. A root `Absent` becomes
/// `Null`. The result never contains `Absent`.
///
/// # Examples
///
/// ```rust
/// use toon_binary::{normalize, toon, Value};
///
/// let mut value = toon!({ "a": 1, "b": [1, 2] });
/// if let Value::Object(obj) = &mut value {
///     obj.insert("gone".to_string(), Value::Absent);
/// }
///
/// assert_eq!(normalize(value), toon!({ "a": 1, "b": [1, 2] }));
/// assert_eq!(normalize(Value::Absent), Value::Null);
/// ```
#[must_use]
pub fn normalize(value: Value) -> Value {
    match value {
        Value::Absent => Value::Null,
        other => strip_absent(other),
    }
}

fn strip_absent(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter(|item| !item.is_absent())
                .map(strip_absent)
                .collect(),
        ),
        Value::Object(members) => Value::Object(
            members
                .into_iter()
                .filter(|(_, member)| !member.is_absent())
                .map(|(key, member)| (key, strip_absent(member)))
                .collect(),
        ),
        other => other,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => write!(f, "absent"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Array(arr) => {
                write!(f, "[")?;
                for (i, item) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Object(obj) => {
                write!(f, "{{")?;
                for (i, (key, member)) in obj.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{:?}:{}", key, member)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.as_safe_integer() {
            Some(i) => serializer.serialize_i64(i),
            None => serializer.serialize_f64(self.0),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Absent | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let present = arr.iter().filter(|item| !item.is_absent());
                let mut seq = serializer.serialize_seq(Some(present.clone().count()))?;
                for element in present {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                use serde::ser::SerializeMap;
                let present = obj.iter().filter(|(_, member)| !member.is_absent());
                let mut map = serializer.serialize_map(Some(present.clone().count()))?;
                for (k, v) in present {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid TOON value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::from(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Value::from(value))
            }

            fn visit_i128<E>(self, value: i128) -> Result<Self::Value, E> {
                Ok(Value::from(value))
            }

            fn visit_u128<E>(self, value: u128) -> Result<Self::Value, E> {
                Ok(Value::from(value))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::from(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = ToonMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

// TryFrom implementations for extracting values from Value
impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Number(n) => n.as_i64().ok_or_else(|| {
                crate::Error::custom(format!("cannot convert number {} to i64", n))
            }),
            _ => Err(crate::Error::custom(format!(
                "expected integer, found {}",
                value.type_name()
            ))),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Number(n) => Ok(n.as_f64()),
            _ => Err(crate::Error::custom(format!(
                "expected number, found {}",
                value.type_name()
            ))),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            _ => Err(crate::Error::custom(format!(
                "expected bool, found {}",
                value.type_name()
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(crate::Error::custom(format!(
                "expected string, found {}",
                value.type_name()
            ))),
        }
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<ToonMap> for Value {
    fn from(value: ToonMap) -> Self {
        Value::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Dates become ISO-8601 strings with millisecond precision.
impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::String(value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

/// Big integers become numbers inside the safe integer range and decimal
/// strings outside it, so no precision is lost silently.
impl From<&BigInt> for Value {
    fn from(value: &BigInt) -> Self {
        match i64::try_from(value) {
            Ok(i) if is_safe_integer(i) => Value::from(i),
            _ => Value::String(value.to_string()),
        }
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::from(&value)
    }
}
