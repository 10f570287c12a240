//! Field readers.
//!
//! Every reader answers one question: what is the decoded value of the
//! field at this address? Readers compose: the diff overlay reads through
//! any other reader, including another overlay, and the multi-level reader
//! picks between named layers.
//!
//! ## Readers
//!
//! - [`MapFieldReader`]: decodes straight from flat stored state
//! - [`DiffFieldReader`]: merges a change-set onto an underlying reader
//! - [`MultiLevelFieldReader`]: selects across ordered, named layers

pub mod diff;
pub mod map;
pub mod multi_level;

use crate::codec::child_address;
use crate::errors::Result;
use crate::schema::Schema;
use crate::value::FieldValue;
use serde::Serialize;
use std::collections::BTreeMap;

pub use diff::DiffFieldReader;
pub use map::{BasicMapReader, MapFieldReader, MapReader, MultiMapReader};
pub use multi_level::MultiLevelFieldReader;

/// The outcome of reading one field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldReadResult {
    /// Decoded value, or the Kind's zero value when absent or computed
    pub value: FieldValue,
    /// Some layer holds a value for this field
    pub exists: bool,
    /// The value is a placeholder; the real value arrives later
    pub computed: bool,
}

impl FieldReadResult {
    /// No value at any layer
    pub fn missing(schema: &Schema) -> Self {
        Self {
            value: schema.zero_value(),
            exists: false,
            computed: false,
        }
    }

    /// A value that will only be known once the change is executed
    pub fn computed(schema: &Schema) -> Self {
        Self {
            value: schema.zero_value(),
            exists: true,
            computed: true,
        }
    }

    /// A known, decoded value
    pub fn present(value: FieldValue) -> Self {
        Self {
            value,
            exists: true,
            computed: false,
        }
    }
}

/// Capability to read a schema-addressed field
pub trait FieldReader {
    /// Read the field at `address`
    ///
    /// # Errors
    ///
    /// Address, decode and schema errors are returned as soon as they are
    /// hit; no partial result is produced.
    fn read_field(&self, address: &[String]) -> Result<FieldReadResult>;
}

/// Read an object by reading every named sub-field through `reader`
///
/// Sub-fields without a value appear with their zero value. The object
/// exists if at least one sub-field does.
///
/// # Errors
///
/// Propagates the first error raised by a sub-field read.
pub fn read_object_field(
    reader: &dyn FieldReader,
    address: &[String],
    schema: &Schema,
) -> Result<FieldReadResult> {
    let mut result = BTreeMap::new();
    let mut exists = false;
    for name in schema.fields.keys() {
        let raw = reader.read_field(&child_address(address, name.clone()))?;
        exists |= raw.exists;
        result.insert(name.clone(), raw.value);
    }

    if !exists {
        return Ok(FieldReadResult::missing(schema));
    }
    Ok(FieldReadResult::present(FieldValue::Object(result)))
}
