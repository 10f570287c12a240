//! Ready-made identity functions.
//!
//! Identities are SHA-256 digests of a canonical rendering of the decoded
//! element, truncated to a non-negative 31-bit integer so they round-trip
//! through flat keys as plain decimal segments.

use crate::set::SetFn;
use crate::value::FieldValue;
use sha2::{Digest, Sha256};

/// Identity of a string
pub fn hash_string(s: &str) -> i64 {
    let digest = Sha256::digest(s.as_bytes());
    let head = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    i64::from(head & 0x7fff_ffff)
}

/// Identity of any decoded value, computed from its content only
pub fn hash_value(value: &FieldValue) -> i64 {
    let mut canonical = String::new();
    render(value, &mut canonical);
    hash_string(&canonical)
}

/// A [`SetFn`] hashing the whole element with [`hash_value`]
pub fn hash_value_identity() -> SetFn {
    std::sync::Arc::new(hash_value)
}

fn render(value: &FieldValue, out: &mut String) {
    match value {
        FieldValue::Bool(b) => out.push_str(&b.to_string()),
        FieldValue::Int(i) => out.push_str(&i.to_string()),
        FieldValue::Float(f) => out.push_str(&format!("{:?}", f)),
        FieldValue::String(s) => out.push_str(&format!("{:?}", s)),
        FieldValue::List(items) => {
            out.push('[');
            for item in items {
                render(item, out);
                out.push(',');
            }
            out.push(']');
        }
        FieldValue::Map(m) | FieldValue::Object(m) => {
            out.push('{');
            for (k, v) in m {
                out.push_str(&format!("{:?}=", k));
                render(v, out);
                out.push(';');
            }
            out.push('}');
        }
        FieldValue::Set(s) => {
            out.push('<');
            for (code, _) in s.iter() {
                out.push_str(&code.to_string());
                out.push(',');
            }
            out.push('>');
        }
    }
}
