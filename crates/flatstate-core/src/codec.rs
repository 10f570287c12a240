//! Flat attribute codec.
//!
//! Stored state is a flat `key -> string` map. Each decoded value occupies
//! one or more flat keys derived from its address:
//!
//! | Kind   | Keys                                              |
//! |--------|---------------------------------------------------|
//! | scalar | `addr`                                            |
//! | List   | `addr.#` (count), `addr.0` .. `addr.N-1`           |
//! | Map    | `addr.<key>` per entry (`addr.#` is bookkeeping)   |
//! | Set    | `addr.<identity>[.<subfield>]`, `addr.#`           |
//! | Object | `addr.<field>` per named sub-field                 |

use crate::errors::{FieldError, Result};
use crate::schema::{Schema, ValueType};
use crate::value::FieldValue;
use std::collections::BTreeMap;

/// Segment holding the element count of a List, Map or Set
pub const COUNT_SEGMENT: &str = "#";

/// Alternate map count segment written by some differs; ignored on read
pub const MAP_COUNT_SEGMENT: &str = "%";

/// Separator between address segments in a flat key
pub const KEY_SEPARATOR: char = '.';

/// Build an owned address from string segments
pub fn address(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

/// Split a dotted flat key back into an address
pub fn parse_address(key: &str) -> Vec<String> {
    if key.is_empty() {
        return Vec::new();
    }
    key.split(KEY_SEPARATOR).map(str::to_string).collect()
}

/// The flat key addressing `address`
pub fn flat_key(address: &[String]) -> String {
    address.join(".")
}

/// The address of one child of `address`
pub fn child_address(address: &[String], segment: impl Into<String>) -> Vec<String> {
    let mut child = Vec::with_capacity(address.len() + 1);
    child.extend_from_slice(address);
    child.push(segment.into());
    child
}

/// The count key of the container at `address`
pub fn count_key(address: &[String]) -> String {
    format!("{}.{}", flat_key(address), COUNT_SEGMENT)
}

/// The prefix shared by every child key of `address`, trailing dot included
pub fn child_prefix(address: &[String]) -> String {
    format!("{}.", flat_key(address))
}

/// True for count bookkeeping segments, which never name a child
pub fn is_count_segment(segment: &str) -> bool {
    segment == COUNT_SEGMENT || segment == MAP_COUNT_SEGMENT
}

/// First segment of a key suffix: the list index, map key or set identity
pub fn first_segment(suffix: &str) -> &str {
    suffix.split(KEY_SEPARATOR).next().unwrap_or(suffix)
}

/// Parse a set identity segment
///
/// # Errors
///
/// Returns `InvalidIdentity` if the segment is not a decimal integer.
pub fn parse_identity(segment: &str, key: &str) -> Result<i64> {
    segment
        .parse::<i64>()
        .map_err(|_| FieldError::InvalidIdentity {
            key: key.to_string(),
            segment: segment.to_string(),
        })
}

/// Decode the payload of a `#` count key
///
/// # Errors
///
/// Returns `Decode` unless the payload is a non-negative integer.
pub fn decode_count(raw: &str, key: &str) -> Result<usize> {
    let fail = || FieldError::Decode {
        key: key.to_string(),
        expected: ValueType::Int,
        raw: raw.to_string(),
    };
    match decode_primitive(raw, ValueType::Int, key)? {
        FieldValue::Int(n) => usize::try_from(n).map_err(|_| fail()),
        _ => Err(fail()),
    }
}

/// Length of a list from its count payload and the suffixes of the keys
/// stored under its prefix
///
/// Without a count the length is one past the highest index present. Every
/// element occupies at least one key, so a length above the number of
/// stored keys is malformed. `None` means nothing is stored for the list.
///
/// # Errors
///
/// Returns `Decode` for a malformed count, or for a length that overflows
/// or exceeds the keys stored under the list.
pub fn list_len<'k, I>(count: Option<&str>, suffixes: I, key: &str) -> Result<Option<usize>>
where
    I: IntoIterator<Item = &'k str>,
{
    let mut stored = 0usize;
    let mut highest: Option<usize> = None;
    for suffix in suffixes {
        let segment = first_segment(suffix);
        if is_count_segment(segment) {
            continue;
        }
        stored += 1;
        if let Ok(i) = segment.parse::<usize>() {
            highest = Some(highest.map_or(i, |h| h.max(i)));
        }
    }

    let too_long = |raw: String| FieldError::Decode {
        key: key.to_string(),
        expected: ValueType::Int,
        raw,
    };
    let len = match (count, highest) {
        (Some(raw), _) => decode_count(raw, key)?,
        (None, Some(i)) => i
            .checked_add(1)
            .ok_or_else(|| too_long(i.to_string()))?,
        (None, None) => return Ok(None),
    };
    if len > stored {
        return Err(too_long(len.to_string()));
    }
    Ok(Some(len))
}

/// Decode one flat payload as the scalar Kind `value_type`
///
/// An empty payload decodes to the Kind's zero value.
///
/// # Errors
///
/// Returns `Decode` when the payload does not parse, or when `value_type`
/// is not a scalar Kind.
pub fn decode_primitive(raw: &str, value_type: ValueType, key: &str) -> Result<FieldValue> {
    let fail = || FieldError::Decode {
        key: key.to_string(),
        expected: value_type,
        raw: raw.to_string(),
    };

    match value_type {
        ValueType::String => Ok(FieldValue::String(raw.to_string())),
        _ if raw.is_empty() && value_type.is_scalar() => match value_type {
            ValueType::Bool => Ok(FieldValue::Bool(false)),
            ValueType::Int => Ok(FieldValue::Int(0)),
            _ => Ok(FieldValue::Float(0.0)),
        },
        ValueType::Bool => match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(FieldValue::Bool(true)),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(FieldValue::Bool(false)),
            _ => Err(fail()),
        },
        ValueType::Int => raw.parse::<i64>().map(FieldValue::Int).map_err(|_| fail()),
        ValueType::Float => raw.parse::<f64>().map(FieldValue::Float).map_err(|_| fail()),
        _ => Err(fail()),
    }
}

/// Encode a scalar value as its flat payload
///
/// # Errors
///
/// Returns `ValueMismatch` if `value` is not a scalar of Kind `value_type`.
pub fn encode_primitive(value: &FieldValue, value_type: ValueType, key: &str) -> Result<String> {
    match (value_type, value) {
        (ValueType::Bool, FieldValue::Bool(b)) => Ok(b.to_string()),
        (ValueType::Int, FieldValue::Int(i)) => Ok(i.to_string()),
        (ValueType::Float, FieldValue::Float(f)) => Ok(f.to_string()),
        (ValueType::String, FieldValue::String(s)) => Ok(s.clone()),
        _ => Err(mismatch(key, value_type, value)),
    }
}

/// Flatten a decoded value into the flat keys it occupies under `address`
///
/// # Errors
///
/// - `ValueMismatch` if the value's shape disagrees with `schema`
/// - `AddressNotFound` for an object entry with no sub-field schema
/// - schema errors for malformed container nodes
pub fn flatten(
    address: &[String],
    value: &FieldValue,
    schema: &Schema,
) -> Result<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    flatten_into(address, value, schema, &mut out)?;
    Ok(out)
}

fn flatten_into(
    address: &[String],
    value: &FieldValue,
    schema: &Schema,
    out: &mut BTreeMap<String, String>,
) -> Result<()> {
    let key = flat_key(address);
    schema.validate(&key)?;

    match (schema.value_type, value) {
        (ValueType::List, FieldValue::List(items)) => {
            let elem = schema.elem_schema(&key)?;
            out.insert(count_key(address), items.len().to_string());
            for (i, item) in items.iter().enumerate() {
                flatten_into(&child_address(address, i.to_string()), item, elem, out)?;
            }
        }
        (ValueType::Map, FieldValue::Map(entries)) => {
            let elem = schema.elem_schema(&key)?;
            out.insert(count_key(address), entries.len().to_string());
            for (k, v) in entries {
                let child = child_address(address, k.clone());
                let child_key = flat_key(&child);
                out.insert(child_key.clone(), encode_primitive(v, elem.value_type, &child_key)?);
            }
        }
        (ValueType::Set, FieldValue::Set(set)) => {
            let elem = schema.elem_schema(&key)?;
            out.insert(count_key(address), set.len().to_string());
            for (code, item) in set.iter() {
                flatten_into(&child_address(address, code.to_string()), item, elem, out)?;
            }
        }
        (ValueType::Object, FieldValue::Object(fields)) => {
            for (name, v) in fields {
                let child = child_address(address, name.clone());
                let sub = schema
                    .fields
                    .get(name)
                    .ok_or_else(|| FieldError::AddressNotFound {
                        address: flat_key(&child),
                    })?;
                flatten_into(&child, v, sub, out)?;
            }
        }
        (kind, v) if kind.is_scalar() => {
            out.insert(key.clone(), encode_primitive(v, kind, &key)?);
        }
        (kind, v) => return Err(mismatch(&key, kind, v)),
    }
    Ok(())
}

fn mismatch(key: &str, expected: ValueType, found: &FieldValue) -> FieldError {
    let found = match found {
        FieldValue::Bool(_) => "bool",
        FieldValue::Int(_) => "int",
        FieldValue::Float(_) => "float",
        FieldValue::String(_) => "string",
        FieldValue::List(_) => "list",
        FieldValue::Map(_) => "map",
        FieldValue::Set(_) => "set",
        FieldValue::Object(_) => "object",
    };
    FieldError::ValueMismatch {
        key: key.to_string(),
        expected,
        found: found.to_string(),
    }
}
