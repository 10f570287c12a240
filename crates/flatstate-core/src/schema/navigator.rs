//! Address resolution against a schema tree.
//!
//! An address is the ordered list of segments naming one field: literal
//! names for top-level fields, object sub-fields and map keys, and index or
//! identity segments when descending into a list or set element.

use crate::codec::flat_key;
use crate::errors::{FieldError, Result};
use crate::schema::{Schema, SchemaMap, ValueType};

/// Resolve every schema node along `address`.
///
/// The returned vector has one node per address segment; the last entry
/// governs the addressed field. Each node on the path is checked against
/// the container invariants as it is visited.
///
/// # Errors
///
/// - `AddressNotFound` for an empty address, an unknown top-level field or
///   an unknown object sub-field
/// - `InvalidTraversal` when the address continues below a scalar
/// - `MissingElem`, `MissingSetFn`, `InvalidMapElem` for malformed nodes
pub fn addr_to_schema<'s>(address: &[String], schema: &'s SchemaMap) -> Result<Vec<&'s Schema>> {
    let first = address.first().ok_or_else(|| FieldError::AddressNotFound {
        address: String::new(),
    })?;
    let mut current = schema
        .get(first)
        .ok_or_else(|| FieldError::AddressNotFound {
            address: first.clone(),
        })?;
    current.validate(first)?;

    let mut result = Vec::with_capacity(address.len());
    result.push(current);

    for depth in 1..address.len() {
        let parent = flat_key(&address[..depth]);
        let here = flat_key(&address[..=depth]);
        let next = match current.value_type {
            ValueType::List | ValueType::Map | ValueType::Set => current.elem_schema(&parent)?,
            ValueType::Object => current.fields.get(&address[depth]).ok_or_else(|| {
                FieldError::AddressNotFound {
                    address: here.clone(),
                }
            })?,
            kind => {
                return Err(FieldError::InvalidTraversal {
                    address: here,
                    kind,
                })
            }
        };
        next.validate(&here)?;
        result.push(next);
        current = next;
    }

    Ok(result)
}

/// Resolve only the node governing `address`.
///
/// # Errors
///
/// Same as [`addr_to_schema`].
pub fn field_schema<'s>(address: &[String], schema: &'s SchemaMap) -> Result<&'s Schema> {
    let mut nodes = addr_to_schema(address, schema)?;
    nodes.pop().ok_or_else(|| FieldError::AddressNotFound {
        address: flat_key(address),
    })
}
