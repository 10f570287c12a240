//! Decoded attribute values
//!
//! Flat storage has no type tags; a value is decoded eagerly into the
//! variant matching its schema Kind at the codec boundary and travels
//! through the readers in that typed form.

use crate::set::Set;
use serde::Serialize;
use std::collections::BTreeMap;

/// A decoded value, one variant per schema Kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
    Set(Set),
    Object(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Entries of a Map or an Object
    pub fn as_map(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            FieldValue::Map(m) | FieldValue::Object(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&Set> {
        match self {
            FieldValue::Set(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a named sub-field of an Object (or a key of a Map)
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.as_map().and_then(|m| m.get(name))
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}
