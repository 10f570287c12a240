//! Reading decoded fields straight from flat stored state.

use crate::codec::{
    child_address, child_prefix, count_key, decode_primitive, first_segment, flat_key,
    is_count_segment, list_len, parse_identity,
};
use crate::errors::Result;
use crate::reader::{read_object_field, FieldReadResult, FieldReader};
use crate::schema::navigator::field_schema;
use crate::schema::{Schema, SchemaMap, ValueType};
use crate::set::Set;
use crate::value::FieldValue;
use std::collections::BTreeMap;

/// Raw access to a flat `key -> payload` store
pub trait MapReader {
    /// The payload stored at exactly `key`
    fn access(&self, key: &str) -> Option<&str>;

    /// Every `(key, payload)` whose key starts with `prefix`, in key order
    fn range_prefix<'s>(&'s self, prefix: &str) -> Vec<(&'s str, &'s str)>;
}

/// A single flat map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicMapReader(pub BTreeMap<String, String>);

impl BasicMapReader {
    pub fn new(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for BasicMapReader {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl MapReader for BasicMapReader {
    fn access(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    fn range_prefix<'s>(&'s self, prefix: &str) -> Vec<(&'s str, &'s str)> {
        prefix_range(&self.0, prefix).collect()
    }
}

/// Ordered, named flat maps; a later level shadows an earlier one per key
#[derive(Debug, Clone, Default)]
pub struct MultiMapReader {
    levels: Vec<(String, BTreeMap<String, String>)>,
}

impl MultiMapReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a level above every existing level
    pub fn with_level(mut self, name: impl Into<String>, map: BTreeMap<String, String>) -> Self {
        self.levels.push((name.into(), map));
        self
    }

    /// The payload stored at `key` in one named level only
    pub fn access_level(&self, level: &str, key: &str) -> Option<&str> {
        self.levels
            .iter()
            .find(|(name, _)| name == level)
            .and_then(|(_, m)| m.get(key))
            .map(String::as_str)
    }
}

impl MapReader for MultiMapReader {
    fn access(&self, key: &str) -> Option<&str> {
        self.levels
            .iter()
            .rev()
            .find_map(|(_, m)| m.get(key))
            .map(String::as_str)
    }

    fn range_prefix<'s>(&'s self, prefix: &str) -> Vec<(&'s str, &'s str)> {
        let mut merged = BTreeMap::new();
        for (_, m) in &self.levels {
            merged.extend(prefix_range(m, prefix));
        }
        merged.into_iter().collect()
    }
}

fn prefix_range<'s>(
    map: &'s BTreeMap<String, String>,
    prefix: &str,
) -> impl Iterator<Item = (&'s str, &'s str)> {
    let owned = prefix.to_string();
    map.range(owned.clone()..)
        .take_while(move |(k, _)| k.starts_with(&owned))
        .map(|(k, v)| (k.as_str(), v.as_str()))
}

/// Base reader: decodes fields from a flat map using the schema
///
/// Raw storage has no notion of pending computation, so every result from
/// this reader has `computed == false`.
pub struct MapFieldReader<'a, M: MapReader> {
    pub schema: &'a SchemaMap,
    pub map: M,
}

impl<'a, M: MapReader> MapFieldReader<'a, M> {
    pub fn new(schema: &'a SchemaMap, map: M) -> Self {
        Self { schema, map }
    }

    fn read_primitive(&self, address: &[String], schema: &Schema) -> Result<FieldReadResult> {
        let key = flat_key(address);
        match self.map.access(&key) {
            None => Ok(FieldReadResult::missing(schema)),
            Some(raw) => Ok(FieldReadResult::present(decode_primitive(
                raw,
                schema.value_type,
                &key,
            )?)),
        }
    }

    fn read_list(&self, address: &[String], schema: &Schema) -> Result<FieldReadResult> {
        let count = count_key(address);
        let prefix = child_prefix(address);
        let stored = self.map.range_prefix(&prefix);
        let len = list_len(
            self.map.access(&count),
            stored.iter().map(|(k, _)| &k[prefix.len()..]),
            &count,
        )?;
        let Some(len) = len else {
            return Ok(FieldReadResult::missing(schema));
        };

        let mut items = Vec::with_capacity(len);
        for i in 0..len {
            items.push(self.read_field(&child_address(address, i.to_string()))?.value);
        }
        Ok(FieldReadResult::present(FieldValue::List(items)))
    }

    fn read_map(&self, address: &[String], schema: &Schema) -> Result<FieldReadResult> {
        let elem = schema.elem_schema(&flat_key(address))?;
        let prefix = child_prefix(address);
        let mut exists = false;
        let mut result = BTreeMap::new();
        for (k, raw) in self.map.range_prefix(&prefix) {
            exists = true;
            let suffix = &k[prefix.len()..];
            if is_count_segment(suffix) {
                continue;
            }
            result.insert(suffix.to_string(), decode_primitive(raw, elem.value_type, k)?);
        }

        if !exists {
            return Ok(FieldReadResult::missing(schema));
        }
        Ok(FieldReadResult::present(FieldValue::Map(result)))
    }

    fn read_set(&self, address: &[String], schema: &Schema) -> Result<FieldReadResult> {
        let set_fn = schema.identity_fn(&flat_key(address))?.clone();
        let prefix = child_prefix(address);
        let mut exists = false;
        let mut identities = BTreeMap::new();
        for (k, _) in self.map.range_prefix(&prefix) {
            exists = true;
            let segment = first_segment(&k[prefix.len()..]);
            if is_count_segment(segment) {
                continue;
            }
            identities.insert(parse_identity(segment, k)?, segment.to_string());
        }

        if !exists {
            return Ok(FieldReadResult::missing(schema));
        }

        let mut set = Set::new(set_fn);
        for (code, segment) in identities {
            let raw = self.read_field(&child_address(address, segment))?;
            set.add_with_code(code, raw.value);
        }
        Ok(FieldReadResult::present(FieldValue::Set(set)))
    }
}

impl<M: MapReader> FieldReader for MapFieldReader<'_, M> {
    fn read_field(&self, address: &[String]) -> Result<FieldReadResult> {
        let schema = field_schema(address, self.schema)?;
        tracing::trace!(
            address = %flat_key(address),
            kind = %schema.value_type,
            "map reader read"
        );

        match schema.value_type {
            ValueType::Bool | ValueType::Int | ValueType::Float | ValueType::String => {
                self.read_primitive(address, schema)
            }
            ValueType::List => self.read_list(address, schema),
            ValueType::Map => self.read_map(address, schema),
            ValueType::Set => self.read_set(address, schema),
            ValueType::Object => read_object_field(self, address, schema),
        }
    }
}
