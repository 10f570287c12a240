//! Diff overlay reader.
//!
//! [`DiffFieldReader`] answers "what will this field look like once the
//! pending change-set is applied?" by merging an [`InstanceDiff`] onto any
//! underlying [`FieldReader`]. The merge rule is chosen by the Kind of the
//! addressed schema node:
//!
//! - **Scalar**: the delta at the field's key wins; without one the
//!   underlying result passes through untouched.
//! - **List**: element positions come from the underlying list; each
//!   element is merged recursively. With no underlying list, the length is
//!   one past the highest index named by a non-removed delta key, and may
//!   not exceed the number of such keys.
//! - **Map**: underlying keys plus delta keys, minus removed keys.
//! - **Set**: underlying identities plus identities named by delta keys.
//!   Each element is merged by its own rule and kept while it still exists.
//!   Elements keep their stored identity.
//! - **Object**: every named sub-field is merged by its own rule.
//!
//! A computed delta at the field's own key, or at the count key of a
//! container, makes the whole field computed without looking further.
//!
//! The overlay never mutates the diff or the underlying reader.

use crate::codec::{
    child_address, child_prefix, count_key, decode_primitive, first_segment, flat_key,
    is_count_segment, list_len, parse_identity,
};
use crate::diff::InstanceDiff;
use crate::errors::Result;
use crate::reader::{read_object_field, FieldReadResult, FieldReader};
use crate::schema::navigator::field_schema;
use crate::schema::{Schema, SchemaMap, ValueType};
use crate::set::Set;
use crate::value::FieldValue;
use flatstate_core_types::sensitive::Payload;
use std::collections::BTreeMap;

/// Reads fields as they will be after `diff` is applied on top of `source`
pub struct DiffFieldReader<'a> {
    pub schema: &'a SchemaMap,
    pub diff: &'a InstanceDiff,
    pub source: &'a dyn FieldReader,
}

impl<'a> DiffFieldReader<'a> {
    pub fn new(schema: &'a SchemaMap, diff: &'a InstanceDiff, source: &'a dyn FieldReader) -> Self {
        Self {
            schema,
            diff,
            source,
        }
    }

    fn read_primitive(
        &self,
        address: &[String],
        key: &str,
        schema: &Schema,
    ) -> Result<FieldReadResult> {
        let Some(delta) = self.diff.get(key) else {
            return self.source.read_field(address);
        };

        tracing::trace!(
            flat_key = key,
            old = %Payload::new(&delta.old, schema.sensitive),
            new = %Payload::new(&delta.new, schema.sensitive),
            "applying scalar delta"
        );
        Ok(FieldReadResult::present(decode_primitive(
            &delta.new,
            schema.value_type,
            key,
        )?))
    }

    fn read_list(&self, address: &[String], schema: &Schema) -> Result<FieldReadResult> {
        let base = self.source.read_field(address)?;
        if base.computed {
            return Ok(base);
        }

        let len = if base.exists {
            base.value.as_list().map_or(0, <[FieldValue]>::len)
        } else {
            // no underlying list: size it from the indices deltas add
            let prefix = child_prefix(address);
            let added = self
                .diff
                .with_prefix(&prefix)
                .filter(|(_, delta)| !delta.new_removed)
                .map(|(k, _)| &k[prefix.len()..]);
            match list_len(None, added, &flat_key(address))? {
                Some(len) => len,
                None => return Ok(FieldReadResult::missing(schema)),
            }
        };

        let mut items = Vec::with_capacity(len);
        for i in 0..len {
            items.push(self.read_field(&child_address(address, i.to_string()))?.value);
        }
        Ok(FieldReadResult::present(FieldValue::List(items)))
    }

    fn read_map(&self, address: &[String], schema: &Schema) -> Result<FieldReadResult> {
        let elem = schema.elem_schema(&flat_key(address))?;
        let base = self.source.read_field(address)?;
        if base.computed {
            return Ok(base);
        }

        let mut result = match base.value {
            FieldValue::Map(m) if base.exists => m,
            _ => BTreeMap::new(),
        };

        let prefix = child_prefix(address);
        for (k, delta) in self.diff.with_prefix(&prefix) {
            let map_key = &k[prefix.len()..];
            // counts are differ bookkeeping, never map entries
            if is_count_segment(map_key) {
                continue;
            }
            if delta.new_removed {
                result.remove(map_key);
                continue;
            }
            let value = if delta.new_computed {
                elem.zero_value()
            } else {
                decode_primitive(&delta.new, elem.value_type, k)?
            };
            result.insert(map_key.to_string(), value);
        }

        if !base.exists && result.is_empty() {
            return Ok(FieldReadResult::missing(schema));
        }
        Ok(FieldReadResult::present(FieldValue::Map(result)))
    }

    fn read_set(&self, address: &[String], schema: &Schema) -> Result<FieldReadResult> {
        let set_fn = schema.identity_fn(&flat_key(address))?.clone();
        let base = self.source.read_field(address)?;
        if base.computed {
            return Ok(base);
        }

        // identity -> key segment to read the element under
        let mut identities: BTreeMap<i64, String> = BTreeMap::new();
        if base.exists {
            if let FieldValue::Set(existing) = &base.value {
                identities.extend(existing.codes().map(|code| (code, code.to_string())));
            }
        }

        // identities named by delta keys; elements emptied by removals drop
        // out below when their merged read no longer exists
        let prefix = child_prefix(address);
        for (k, _) in self.diff.with_prefix(&prefix) {
            let segment = first_segment(&k[prefix.len()..]);
            if is_count_segment(segment) {
                continue;
            }
            let code = parse_identity(segment, k)?;
            identities.insert(code, segment.to_string());
        }

        let mut set = Set::new(set_fn);
        for (code, segment) in identities {
            let element = self.read_field(&child_address(address, segment))?;
            if element.exists {
                set.add_with_code(code, element.value);
            }
        }

        if !base.exists && set.is_empty() {
            return Ok(FieldReadResult::missing(schema));
        }
        Ok(FieldReadResult::present(FieldValue::Set(set)))
    }
}

impl FieldReader for DiffFieldReader<'_> {
    fn read_field(&self, address: &[String]) -> Result<FieldReadResult> {
        let schema = field_schema(address, self.schema)?;
        let key = flat_key(address);

        if let Some(delta) = self.diff.get(&key) {
            if delta.new_computed {
                tracing::debug!(flat_key = %key, kind = %schema.value_type, "field is computed");
                return Ok(FieldReadResult::computed(schema));
            }
            if delta.new_removed {
                tracing::trace!(flat_key = %key, "field is removed");
                return Ok(FieldReadResult::missing(schema));
            }
        }

        if schema.value_type.is_container() {
            if let Some(count) = self.diff.get(&count_key(address)) {
                if count.new_computed {
                    tracing::debug!(flat_key = %key, kind = %schema.value_type, "container count is computed");
                    return Ok(FieldReadResult::computed(schema));
                }
            }
        }

        match schema.value_type {
            ValueType::Bool | ValueType::Int | ValueType::Float | ValueType::String => {
                self.read_primitive(address, &key, schema)
            }
            ValueType::List => self.read_list(address, schema),
            ValueType::Map => self.read_map(address, schema),
            ValueType::Set => self.read_set(address, schema),
            ValueType::Object => read_object_field(self, address, schema),
        }
    }
}
