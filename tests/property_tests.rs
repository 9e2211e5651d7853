//! Property-based tests for the core codec guarantees.
//!
//! These complement the byte-level tests in `wire_format_tests.rs` by
//! checking round trips and truncation handling across generated trees.

use proptest::collection::vec;
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use toon_binary::folding::{expand_paths, fold_keys, FoldConfig};
use toon_binary::{
    decode, encode, from_slice, normalize, to_vec, DecodeOptions, Delimiter, EncodeOptions,
    KeyFolding, PathExpansion, ToonMap, Value,
};

fn arb_number() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<f64>(),
        (-1000i32..1000).prop_map(f64::from),
        Just(f64::NAN),
        Just(-0.0),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
    ]
    .prop_map(Value::from)
}

fn arb_primitive() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        arb_number(),
        "\\PC{0,12}".prop_map(Value::String),
    ]
}

fn arb_tree(key: BoxedStrategy<String>, leaf: BoxedStrategy<Value>) -> BoxedStrategy<Value> {
    leaf.prop_recursive(4, 64, 6, move |inner| {
        prop_oneof![
            vec(inner.clone(), 0..6).prop_map(Value::Array),
            vec((key.clone(), inner), 0..6)
                .prop_map(|members| Value::Object(members.into_iter().collect::<ToonMap>())),
        ]
    })
    .boxed()
}

/// Any tree, with arbitrary unicode keys and absent values mixed in.
fn arb_value() -> BoxedStrategy<Value> {
    let leaf = prop_oneof![9 => arb_primitive(), 1 => Just(Value::Absent)].boxed();
    arb_tree("\\PC{0,8}".boxed(), leaf)
}

/// Trees whose keys are all identifiers, so folding is always reversible.
fn arb_identifier_value() -> BoxedStrategy<Value> {
    arb_tree("[a-zA-Z_][a-zA-Z0-9_]{0,5}".boxed(), arb_primitive().boxed())
}

/// Uniform records, which encode in the tabular layout.
fn arb_table() -> impl Strategy<Value = Value> {
    proptest::collection::btree_set("[a-z]{1,6}", 1..5).prop_flat_map(|fields| {
        let fields: Vec<String> = fields.into_iter().collect();
        let width = fields.len();
        vec(vec(arb_primitive(), width), 1..8).prop_map(move |rows| {
            Value::Array(
                rows.into_iter()
                    .map(|cells| Value::Object(fields.iter().cloned().zip(cells).collect()))
                    .collect(),
            )
        })
    })
}

fn arb_delimiter() -> impl Strategy<Value = Delimiter> {
    prop_oneof![
        Just(Delimiter::Comma),
        Just(Delimiter::Tab),
        Just(Delimiter::Pipe)
    ]
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct Record {
    id: u32,
    label: String,
    score: Option<i32>,
    flags: Vec<bool>,
}

fn arb_record() -> impl Strategy<Value = Record> {
    (
        any::<u32>(),
        "\\PC{0,10}",
        proptest::option::of(any::<i32>()),
        vec(any::<bool>(), 0..4),
    )
        .prop_map(|(id, label, score, flags)| Record {
            id,
            label,
            score,
            flags,
        })
}

proptest! {
    #[test]
    fn prop_roundtrip_is_normalized_identity(value in arb_value(), delimiter in arb_delimiter()) {
        let options = EncodeOptions::new().with_delimiter(delimiter);
        let bytes = encode(&value, &options).unwrap();
        let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
        prop_assert_eq!(decoded, normalize(value));
    }

    #[test]
    fn prop_encoding_is_deterministic(value in arb_value()) {
        let options = EncodeOptions::default();
        prop_assert_eq!(encode(&value, &options).unwrap(), encode(&value, &options).unwrap());
    }

    #[test]
    fn prop_tables_roundtrip(table in arb_table()) {
        let bytes = encode(&table, &EncodeOptions::default()).unwrap();
        prop_assert_eq!(bytes[0], 0x07);
        prop_assert_ne!(bytes[3], 0x00);
        prop_assert_eq!(decode(&bytes, &DecodeOptions::default()).unwrap(), table);
    }

    #[test]
    fn prop_every_strict_prefix_fails(value in arb_value()) {
        let bytes = encode(&value, &EncodeOptions::default()).unwrap();
        for end in 0..bytes.len() {
            prop_assert!(decode(&bytes[..end], &DecodeOptions::default()).is_err());
        }
    }

    #[test]
    fn prop_arbitrary_bytes_never_panic(bytes in vec(any::<u8>(), 0..64)) {
        let _ = decode(&bytes, &DecodeOptions::default());
        let _ = decode(&bytes, &DecodeOptions::new().with_strict(false));
    }

    #[test]
    fn prop_fold_then_expand_is_identity(value in arb_identifier_value()) {
        let folded = fold_keys(value.clone(), &FoldConfig::new(KeyFolding::Safe));
        let options = DecodeOptions::new().with_expand_paths(PathExpansion::Safe);
        let expanded = expand_paths(folded, &options).unwrap();
        prop_assert_eq!(expanded, value);
    }

    #[test]
    fn prop_folded_encoding_roundtrips(value in arb_identifier_value(), depth in 0usize..5) {
        let encode_options = EncodeOptions::new()
            .with_key_folding(KeyFolding::Safe)
            .with_flatten_depth(depth);
        let decode_options = DecodeOptions::new().with_expand_paths(PathExpansion::Safe);

        let bytes = encode(&value, &encode_options).unwrap();
        prop_assert_eq!(decode(&bytes, &decode_options).unwrap(), value);
    }

    #[test]
    fn prop_record_roundtrip(records in vec(arb_record(), 0..10)) {
        let bytes = to_vec(&records).unwrap();
        let back: Vec<Record> = from_slice(&bytes).unwrap();
        prop_assert_eq!(back, records);
    }

    #[test]
    fn prop_i32_roundtrip(n in any::<i32>()) {
        let bytes = to_vec(&n).unwrap();
        prop_assert_eq!(from_slice::<i32>(&bytes).unwrap(), n);
    }

    #[test]
    fn prop_i64_roundtrip(n in any::<i64>()) {
        let bytes = to_vec(&n).unwrap();
        prop_assert_eq!(from_slice::<i64>(&bytes).unwrap(), n);
    }

    #[test]
    fn prop_u64_roundtrip(n in any::<u64>()) {
        let bytes = to_vec(&n).unwrap();
        prop_assert_eq!(from_slice::<u64>(&bytes).unwrap(), n);
    }

    #[test]
    fn prop_string_length_prefix(s in "\\PC{0,40}") {
        let bytes = to_vec(&s).unwrap();
        prop_assert_eq!(from_slice::<String>(&bytes).unwrap(), s);
    }
}
