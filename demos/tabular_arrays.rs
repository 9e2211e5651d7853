//! Tabular array packing for homogeneous structs.
//!
//! Run with: cargo run --example tabular_arrays

use serde::{Deserialize, Serialize};
use std::error::Error;
use toon_binary::{classify, from_slice, to_value, to_vec, ArrayShape};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    in_stock: bool,
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() -> Result<(), Box<dyn Error>> {
    let products = vec![
        Product {
            sku: "WIDGET-001".into(),
            name: "Super Widget".into(),
            price: 29.99,
            in_stock: true,
        },
        Product {
            sku: "GADGET-002".into(),
            name: "Mega Gadget".into(),
            price: 49.99,
            in_stock: false,
        },
        Product {
            sku: "TOOL-003".into(),
            name: "Ultra Tool".into(),
            price: 19.99,
            in_stock: true,
        },
    ];

    let value = to_value(&products)?;
    if let Some(rows) = value.as_array() {
        match classify(rows) {
            ArrayShape::Tabular { fields, rows } => {
                println!("tabular: {rows} rows, fields {fields:?}");
            }
            ArrayShape::Generic { length } => println!("generic: {length} elements"),
        }
    }

    let bytes = to_vec(&products)?;
    let json = serde_json::to_vec(&products)?;
    println!("TOON binary: {} bytes", bytes.len());
    println!("JSON:        {} bytes", json.len());
    println!("header: {}", hex(&bytes[..bytes.len().min(32)]));

    let products_back: Vec<Product> = from_slice(&bytes)?;
    assert_eq!(products, products_back);
    println!("✓ Round-trip successful");

    Ok(())
}
