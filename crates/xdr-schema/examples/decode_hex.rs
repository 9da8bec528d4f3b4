//! Decodes a hex-encoded linked list of ranges and prints the value tree.
//!
//! ```text
//! cargo run --example decode_hex -- 0000000500000009000000010000000a0000000b00000000
//! ```

use xdr_schema::{Codec, Registry, TextEncoding, Value};

const SAMPLE: &str = "0000000500000009000000010000000a0000000b00000000";

fn print_value(value: &Value, indent: usize) {
    let pad = "  ".repeat(indent);
    match value {
        Value::Struct(s) => {
            println!("{}{} {{", pad, s.name().unwrap_or("struct"));
            for (name, field) in s.fields() {
                println!("{}  {}:", pad, name);
                print_value(field, indent + 2);
            }
            println!("{}}}", pad);
        }
        Value::Array(items) => {
            println!("{}[{} items]", pad, items.len());
            for item in items {
                print_value(item, indent + 1);
            }
        }
        Value::Absent => println!("{}(absent)", pad),
        Value::Opaque(bytes) => println!("{}0x{}", pad, TextEncoding::Hex.encode(bytes)),
        other => println!("{}{:?}", pad, other),
    }
}

fn main() {
    let input = std::env::args().nth(1).unwrap_or_else(|| SAMPLE.to_string());

    let mut registry = Registry::new();
    let span = registry
        .create("Span", [("begin", Codec::INT), ("end", Codec::INT)])
        .expect("Failed to register Span");
    let list = registry
        .create(
            "SpanList",
            [
                ("span", Codec::from(&span)),
                ("next", Codec::option(Codec::reference("SpanList"))),
            ],
        )
        .expect("Failed to register SpanList");

    println!("Input: {} bytes", input.len() / 2);
    let value = match list.from_xdr(&TextEncoding::Hex.decode(&input).expect("Invalid hex")) {
        Ok(value) => value,
        Err(err) => {
            eprintln!("Decode failed ({:?}): {}", err.kind(), err);
            std::process::exit(1);
        }
    };

    print_value(&Value::Struct(value), 0);
}
