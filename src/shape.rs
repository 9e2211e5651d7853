//! Array shape analysis.
//!
//! TOON saves most of its space on arrays of uniform records: the field names
//! are written once in the array header and each row carries only its values.
//! [`classify`] decides whether an array qualifies. The text and binary
//! encoders share this one decision, so an array is tabular in both forms or
//! in neither.
//!
//! ## Examples
//!
//! ```rust
//! use toon_binary::{classify, toon, ArrayShape};
//!
//! let users = toon!([
//!     { "id": 1, "name": "Alice" },
//!     { "id": 2, "name": "Bob" }
//! ]);
//!
//! match classify(users.as_array().unwrap()) {
//!     ArrayShape::Tabular { fields, rows } => {
//!         assert_eq!(fields, vec!["id", "name"]);
//!         assert_eq!(rows, 2);
//!     }
//!     ArrayShape::Generic { .. } => unreachable!(),
//! }
//! ```

use crate::Value;

/// The framing chosen for one array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrayShape {
    /// Every element is an object with the same ordered keys and only
    /// primitive values.
    Tabular { fields: Vec<String>, rows: usize },
    /// Anything else. Elements are encoded one by one.
    Generic { length: usize },
}

impl ArrayShape {
    /// Number of elements in the classified array.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ArrayShape::Tabular { rows, .. } => *rows,
            ArrayShape::Generic { length } => *length,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_tabular(&self) -> bool {
        matches!(self, ArrayShape::Tabular { .. })
    }

    /// Field names of a tabular array; `None` for generic arrays.
    #[must_use]
    pub fn fields(&self) -> Option<&[String]> {
        match self {
            ArrayShape::Tabular { fields, .. } => Some(fields),
            ArrayShape::Generic { .. } => None,
        }
    }
}

/// Classifies an array as tabular or generic.
///
/// An array is tabular when it is non-empty, every element is an object, the
/// first object has at least one key, every object has exactly the first
/// object's keys in the same order, and every member value is a primitive.
///
/// # Examples
///
/// ```rust
/// use toon_binary::{classify, toon, ArrayShape};
///
/// // Same keys, but one row holds a nested array.
/// let mixed = toon!([{ "a": 1 }, { "a": [1] }]);
/// assert_eq!(classify(mixed.as_array().unwrap()), ArrayShape::Generic { length: 2 });
///
/// // Key order is part of the record shape.
/// let reordered = toon!([{ "a": 1, "b": 2 }, { "b": 3, "a": 4 }]);
/// assert!(!classify(reordered.as_array().unwrap()).is_tabular());
/// ```
#[must_use]
pub fn classify(elements: &[Value]) -> ArrayShape {
    let generic = ArrayShape::Generic {
        length: elements.len(),
    };

    let first = match elements.first() {
        Some(Value::Object(obj)) if !obj.is_empty() => obj,
        _ => return generic,
    };

    for element in elements {
        let obj = match element {
            Value::Object(obj) => obj,
            _ => return generic,
        };

        if obj.len() != first.len() || !obj.keys().eq(first.keys()) {
            return generic;
        }

        if !obj.values().all(Value::is_primitive) {
            return generic;
        }
    }

    ArrayShape::Tabular {
        fields: first.keys().cloned().collect(),
        rows: elements.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToonMap;

    fn record(pairs: &[(&str, Value)]) -> Value {
        Value::Object(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<ToonMap>(),
        )
    }

    #[test]
    fn test_uniform_records_are_tabular() {
        let rows = vec![
            record(&[("a", Value::from(1)), ("b", Value::from("x"))]),
            record(&[("a", Value::Null), ("b", Value::from(true))]),
        ];
        assert_eq!(
            classify(&rows),
            ArrayShape::Tabular {
                fields: vec!["a".to_string(), "b".to_string()],
                rows: 2,
            }
        );
    }

    #[test]
    fn test_single_record_is_tabular() {
        let rows = vec![record(&[("only", Value::from(1))])];
        assert!(classify(&rows).is_tabular());
    }

    #[test]
    fn test_empty_array_is_generic() {
        assert_eq!(classify(&[]), ArrayShape::Generic { length: 0 });
    }

    #[test]
    fn test_empty_objects_are_generic() {
        let rows = vec![record(&[]), record(&[])];
        assert_eq!(classify(&rows), ArrayShape::Generic { length: 2 });
    }

    #[test]
    fn test_primitives_are_generic() {
        let items = vec![Value::from(1), Value::from(2)];
        assert_eq!(classify(&items), ArrayShape::Generic { length: 2 });
    }

    #[test]
    fn test_mixed_elements_are_generic() {
        let items = vec![record(&[("a", Value::from(1))]), Value::from(2)];
        assert!(!classify(&items).is_tabular());
    }

    #[test]
    fn test_key_mismatch_is_generic() {
        let rows = vec![
            record(&[("a", Value::from(1))]),
            record(&[("a", Value::from(1)), ("b", Value::from(2))]),
        ];
        assert!(!classify(&rows).is_tabular());

        let rows = vec![
            record(&[("a", Value::from(1)), ("b", Value::from(2))]),
            record(&[("a", Value::from(1))]),
        ];
        assert!(!classify(&rows).is_tabular());
    }

    #[test]
    fn test_nested_values_are_generic() {
        let nested_object = vec![
            record(&[("a", Value::from(1))]),
            record(&[("a", record(&[("b", Value::from(2))]))]),
        ];
        assert!(!classify(&nested_object).is_tabular());

        let nested_array = vec![record(&[("a", Value::Array(vec![]))])];
        assert!(!classify(&nested_array).is_tabular());

        let absent = vec![record(&[("a", Value::Absent)])];
        assert!(!classify(&absent).is_tabular());
    }

    #[test]
    fn test_shape_accessors() {
        let shape = ArrayShape::Tabular {
            fields: vec!["x".to_string()],
            rows: 3,
        };
        assert_eq!(shape.len(), 3);
        assert_eq!(shape.fields(), Some(&["x".to_string()][..]));
        assert!(ArrayShape::Generic { length: 0 }.is_empty());
        assert_eq!(ArrayShape::Generic { length: 1 }.fields(), None);
    }
}
