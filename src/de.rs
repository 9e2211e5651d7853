//! Conversion from [`Value`] into Rust data structures.
//!
//! [`Value`] implements serde's `Deserializer`, so any `T: DeserializeOwned`
//! can be rebuilt from a decoded tree with [`from_value`].
//!
//! Numbers are offered to visitors as `u64` or `i64` when they are integral
//! and inside the safe integer range, and as `f64` otherwise. `-0` always
//! arrives as `f64` so its sign survives. Fields typed `i64`, `u64`, `i128`
//! or `u128` also accept the decimal strings that [`to_value`](crate::to_value)
//! produces for integers beyond the safe range.
//!
//! ## Examples
//!
//! ```rust
//! use serde::Deserialize;
//! use toon_binary::{from_value, toon};
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Reading {
//!     sensor: String,
//!     value: f64,
//!     note: Option<String>,
//! }
//!
//! let reading: Reading = from_value(toon!({
//!     "sensor": "t1",
//!     "value": 21,
//!     "note": null
//! }))
//! .unwrap();
//!
//! assert_eq!(
//!     reading,
//!     Reading { sensor: "t1".to_string(), value: 21.0, note: None }
//! );
//! ```

use crate::{Error, Number, Result, ToonMap, Value};
use serde::de::{self, DeserializeOwned, Deserializer, IntoDeserializer};
use serde::forward_to_deserialize_any;

/// Deserializes a `T` from a [`Value`].
///
/// # Errors
///
/// Returns [`Error::Custom`] when the value's shape does not match `T`.
///
/// # Examples
///
/// ```rust
/// use toon_binary::{from_value, toon};
///
/// let numbers: Vec<u8> = from_value(toon!([1, 2, 3])).unwrap();
/// assert_eq!(numbers, vec![1, 2, 3]);
///
/// assert!(from_value::<Vec<u8>>(toon!([256])).is_err());
/// ```
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(value)
}

fn visit_number<'de, V>(n: Number, visitor: V) -> Result<V::Value>
where
    V: de::Visitor<'de>,
{
    match n.as_safe_integer() {
        Some(i) if i >= 0 => visitor.visit_u64(i as u64),
        Some(i) => visitor.visit_i64(i),
        None => visitor.visit_f64(n.as_f64()),
    }
}

/// Integer visitors also accept the decimal strings that wide integers are
/// stored as, and integral numbers outside the safe range.
fn visit_integer<'de, V>(value: Value, visitor: V) -> Result<V::Value>
where
    V: de::Visitor<'de>,
{
    match value {
        Value::Number(n) if !n.is_negative_zero() => match (n.as_u64(), n.as_i64()) {
            (Some(u), _) => visitor.visit_u64(u),
            (None, Some(i)) => visitor.visit_i64(i),
            (None, None) => visitor.visit_f64(n.as_f64()),
        },
        Value::String(s) => visit_wide_integer(s, visitor),
        other => other.deserialize_any(visitor),
    }
}

fn visit_wide_integer<'de, V>(s: String, visitor: V) -> Result<V::Value>
where
    V: de::Visitor<'de>,
{
    let safe = Number::MAX_SAFE_INTEGER.unsigned_abs();
    match s.parse::<i128>() {
        Ok(i) if i.unsigned_abs() > u128::from(safe) => {
            if let Ok(u) = u64::try_from(i) {
                visitor.visit_u64(u)
            } else if let Ok(i) = i64::try_from(i) {
                visitor.visit_i64(i)
            } else {
                visitor.visit_i128(i)
            }
        }
        Ok(_) => visitor.visit_string(s),
        Err(_) => match s.parse::<u128>() {
            Ok(u) => visitor.visit_u128(u),
            Err(_) => visitor.visit_string(s),
        },
    }
}

impl<'de> de::Deserializer<'de> for Value {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::Absent | Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(n) => visit_number(n, visitor),
            Value::String(s) => visitor.visit_string(s),
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
        }
    }

    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visit_integer(self, visitor)
    }

    fn deserialize_i128<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visit_integer(self, visitor)
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visit_integer(self, visitor)
    }

    fn deserialize_u128<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visit_integer(self, visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::Absent | Value::Null => visitor.visit_none(),
            other => visitor.visit_some(other),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Object(obj) if obj.len() == 1 => match obj.into_iter().next() {
                Some((variant, value)) => visitor.visit_enum(EnumDeserializer::new(variant, value)),
                None => Err(Error::custom("expected enum variant")),
            },
            other => Err(Error::custom(format!(
                "expected enum as string or single-member object, found {}",
                other.type_name()
            ))),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 u8 u16 u32 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(value).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: ToonMap) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(Value::String(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(value),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Value,
}

impl EnumDeserializer {
    fn new(variant: String, value: Value) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(Value::String(self.variant))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Value,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Value::Null => Ok(()),
            other => Err(Error::custom(format!(
                "expected unit variant, found {}",
                other.type_name()
            ))),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self.value)
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            _ => Err(Error::custom("expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
            _ => Err(Error::custom("expected struct variant")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toon;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Deserialize, Debug, PartialEq)]
    enum Command {
        Stop,
        Speed(u32),
        Move(i32, i32),
        Rename { to: String },
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Wrapper(Vec<Command>);

    #[test]
    fn test_enum_forms() {
        let commands: Wrapper = from_value(toon!([
            "Stop",
            { "Speed": 30 },
            { "Move": [1, (-2)] },
            { "Rename": { "to": "x" } }
        ]))
        .unwrap();
        assert_eq!(
            commands,
            Wrapper(vec![
                Command::Stop,
                Command::Speed(30),
                Command::Move(1, -2),
                Command::Rename { to: "x".to_string() },
            ])
        );
    }

    #[test]
    fn test_enum_rejects_multi_member_object() {
        let result: Result<Command> = from_value(toon!({ "Stop": null, "Speed": 1 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_integer_ranges() {
        assert_eq!(from_value::<i8>(toon!((-128))).unwrap(), -128);
        assert!(from_value::<u32>(toon!((-1))).is_err());
        assert!(from_value::<i64>(toon!(1.5)).is_err());
        assert_eq!(from_value::<f32>(toon!(2)).unwrap(), 2.0);
    }

    #[test]
    fn test_wide_integers_from_strings() {
        assert_eq!(
            from_value::<u64>(toon!("18446744073709551615")).unwrap(),
            u64::MAX
        );
        assert_eq!(
            from_value::<i64>(toon!("-9007199254740993")).unwrap(),
            -9_007_199_254_740_993
        );
        assert_eq!(
            from_value::<i128>(toon!("-170141183460469231731687303715884105728")).unwrap(),
            i128::MIN
        );
        assert_eq!(from_value::<u128>(toon!("18446744073709551616")).unwrap(), 1 << 64);

        // Short decimal strings are still strings.
        assert!(from_value::<u64>(toon!("12")).is_err());
        assert!(from_value::<u64>(toon!("-18446744073709551616")).is_err());
        assert_eq!(
            from_value::<String>(toon!("9007199254740993")).unwrap(),
            "9007199254740993"
        );
    }

    #[test]
    fn test_integral_numbers_beyond_safe_range() {
        let value = Value::Number(Number::from(2f64.powi(60)));
        assert_eq!(from_value::<u64>(value.clone()).unwrap(), 1 << 60);
        assert_eq!(from_value::<f64>(value).unwrap(), 2f64.powi(60));
        assert!(from_value::<u64>(Value::from(-0.0)).is_err());
    }

    #[test]
    fn test_negative_zero_stays_float() {
        let value: f64 = from_value(Value::from(-0.0)).unwrap();
        assert!(value == 0.0 && value.is_sign_negative());
    }

    #[test]
    fn test_special_floats() {
        let values: Vec<f64> =
            from_value(Value::Array(vec![Value::from(f64::INFINITY), Value::from(f64::NAN)]))
                .unwrap();
        assert_eq!(values[0], f64::INFINITY);
        assert!(values[1].is_nan());
    }

    #[test]
    fn test_options_and_maps() {
        let map: HashMap<String, Option<bool>> =
            from_value(toon!({ "yes": true, "unknown": null })).unwrap();
        assert_eq!(map.get("yes"), Some(&Some(true)));
        assert_eq!(map.get("unknown"), Some(&None));
    }

    #[test]
    fn test_value_roundtrips_through_itself() {
        let value = toon!({ "a": [1, "b", null, { "c": false }] });
        let back: Value = from_value(value.clone()).unwrap();
        assert_eq!(back, value);
    }
}
