//! Key folding on encode and path expansion on decode.
//!
//! Run with: cargo run --example key_folding

use std::error::Error;
use toon_binary::{decode, encode, toon, DecodeOptions, EncodeOptions, KeyFolding, PathExpansion};

fn main() -> Result<(), Box<dyn Error>> {
    let config = toon!({
        "server": { "http": { "port": 8080 } },
        "database": { "primary": { "host": "db1", "pool": 16 } },
        "log.level": "debug"
    });

    let plain = encode(&config, &EncodeOptions::default())?;
    let folded = encode(
        &config,
        &EncodeOptions::new().with_key_folding(KeyFolding::Safe),
    )?;
    println!("plain:  {} bytes", plain.len());
    println!("folded: {} bytes", folded.len());

    // Without expansion the dotted keys come back as written.
    let raw = decode(&folded, &DecodeOptions::default())?;
    println!("raw:      {raw}");

    let expanded = decode(
        &folded,
        &DecodeOptions::new().with_expand_paths(PathExpansion::Safe),
    )?;
    println!("expanded: {expanded}");

    // "log.level" was a literal key, so expansion turns it into a nested object.
    assert_eq!(
        expanded,
        toon!({
            "server": { "http": { "port": 8080 } },
            "database": { "primary": { "host": "db1", "pool": 16 } },
            "log": { "level": "debug" }
        })
    );

    // Conflicting paths are rejected in strict mode.
    let conflict = toon!({ "a.b": 1, "a": 2 });
    let bytes = encode(&conflict, &EncodeOptions::default())?;
    let result = decode(
        &bytes,
        &DecodeOptions::new().with_expand_paths(PathExpansion::Safe),
    );
    println!("conflict: {}", result.map_or_else(|e| e.to_string(), |v| v.to_string()));

    Ok(())
}
