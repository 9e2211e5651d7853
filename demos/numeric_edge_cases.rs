//! Numbers that text formats lose: -0, infinities, NaN and big integers.
//!
//! Run with: cargo run --example numeric_edge_cases

use num_bigint::BigInt;
use std::error::Error;
use toon_binary::{decode, encode, DecodeOptions, EncodeOptions, Value};

fn main() -> Result<(), Box<dyn Error>> {
    let samples = [
        0.0,
        -0.0,
        1e6,
        0.1 + 0.2,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NAN,
        f64::MIN_POSITIVE,
    ];

    for n in samples {
        let value = Value::from(n);
        let bytes = encode(&value, &EncodeOptions::default())?;
        let back = decode(&bytes, &DecodeOptions::default())?;

        let bits = back.as_f64().map(f64::to_bits);
        assert_eq!(bits, Some(n.to_bits()));
        println!("{value} -> {bytes:02X?}");
    }

    // Past 2^53 integers cannot be stored as doubles, so they become strings.
    for big in [
        BigInt::from(9_007_199_254_740_991_i64),
        BigInt::from(9_007_199_254_740_993_i64),
    ] {
        let value = Value::from(&big);
        println!("{big} -> {} ({value})", value.type_name());
    }

    Ok(())
}
