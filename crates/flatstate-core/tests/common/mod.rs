//! Shared fixtures for reader tests

#![allow(dead_code)]

use flatstate_core::{
    BasicMapReader, FieldValue, InstanceDiff, ResourceAttrDiff, Schema, SchemaMap, SetFn,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Identity of an element: its `index` sub-field, or the element itself
/// when it is an integer
pub fn index_identity() -> SetFn {
    Arc::new(|v: &FieldValue| match v {
        FieldValue::Int(i) => *i,
        other => other.field("index").and_then(FieldValue::as_int).unwrap_or(0),
    })
}

/// Object element with an `index` and a `value`
pub fn indexed_object() -> Schema {
    Schema::object([("index", Schema::int()), ("value", Schema::string())])
}

/// Schema covering every Kind
pub fn full_schema() -> SchemaMap {
    let mut s = SchemaMap::new();
    s.insert("bool".to_string(), Schema::bool());
    s.insert("int".to_string(), Schema::int());
    s.insert("float".to_string(), Schema::float());
    s.insert("string".to_string(), Schema::string());
    s.insert("stringComputed".to_string(), Schema::string());
    s.insert("list".to_string(), Schema::list(Schema::string()));
    s.insert("listInt".to_string(), Schema::list(Schema::int()));
    s.insert(
        "listMap".to_string(),
        Schema::list(Schema::map(Schema::string())),
    );
    s.insert("map".to_string(), Schema::map(Schema::string()));
    s.insert("mapRemove".to_string(), Schema::map(Schema::string()));
    s.insert("tags".to_string(), Schema::map(Schema::string()));
    s.insert("set".to_string(), Schema::set(Schema::int(), index_identity()));
    s.insert(
        "setDeep".to_string(),
        Schema::set(indexed_object(), index_identity()),
    );
    s.insert(
        "setChange".to_string(),
        Schema::set(indexed_object(), index_identity()),
    );
    s.insert("password".to_string(), Schema::string().sensitive());
    s
}

/// Flat state from `(key, payload)` pairs
pub fn state<const N: usize>(pairs: [(&str, &str); N]) -> BasicMapReader {
    BasicMapReader::from_iter(pairs)
}

/// Diff from `(key, delta)` pairs
pub fn diff<const N: usize>(pairs: [(&str, ResourceAttrDiff); N]) -> InstanceDiff {
    pairs
        .into_iter()
        .fold(InstanceDiff::new(), |d, (k, delta)| d.attr(k, delta))
}

pub fn string_map<const N: usize>(pairs: [(&str, &str); N]) -> FieldValue {
    FieldValue::Map(
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), FieldValue::from(v)))
            .collect::<BTreeMap<_, _>>(),
    )
}

pub fn indexed(index: i64, value: &str) -> FieldValue {
    FieldValue::Object(BTreeMap::from([
        ("index".to_string(), FieldValue::Int(index)),
        ("value".to_string(), FieldValue::from(value)),
    ]))
}
