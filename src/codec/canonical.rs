//! Deterministic text rendering of decoded values.
//!
//! # Format
//! - array: `[a,b,c]`
//! - integer: decimal digits, `-` only when negative
//! - bytes: `0x` + lowercase hex (`0x` alone when empty); quoted as a JSON
//!   string when it sits inside an array or map
//! - map: `{"key":value,...}` in entry order
//! - scalar: its JSON literal
//!
//! Downstream consumers compare these strings byte for byte, so the output
//! carries no whitespace and never reorders entries.

use std::fmt::Write;

use crate::codec::DecodedValue;

/// Render a decoded value as its canonical string.
pub fn stringify(value: &DecodedValue) -> String {
    let mut out = String::new();
    write_value(&mut out, value, false);
    out
}

fn write_value(out: &mut String, value: &DecodedValue, nested: bool) {
    match value {
        DecodedValue::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item, true);
            }
            out.push(']');
        }
        DecodedValue::Uint(n) => {
            let _ = write!(out, "{}", n);
        }
        DecodedValue::Int(n) => {
            let _ = write!(out, "{}", n);
        }
        DecodedValue::Bytes(bytes) => {
            if nested {
                out.push('"');
            }
            out.push_str("0x");
            out.push_str(&hex::encode(bytes));
            if nested {
                out.push('"');
            }
        }
        DecodedValue::Map(entries) => {
            out.push('{');
            for (i, (key, item)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::Value::String(key.clone()).to_string());
                out.push(':');
                write_value(out, item, true);
            }
            out.push('}');
        }
        DecodedValue::Scalar(scalar) => out.push_str(&scalar.to_string()),
    }
}
