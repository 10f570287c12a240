//! Static type schema for resource attributes
//!
//! A [`Schema`] node describes the Kind of one field and, for containers,
//! the schema of its elements. Objects (nested blocks) carry a named map of
//! sub-field schemas; sets carry the identity function used to address
//! their elements.

pub mod navigator;

use crate::errors::{FieldError, Result};
use crate::set::{Set, SetFn};
use crate::value::FieldValue;
use std::collections::BTreeMap;
use std::fmt;

pub use navigator::addr_to_schema;

/// Named sub-field schemas of an object or a resource
pub type SchemaMap = BTreeMap<String, Schema>;

/// The Kind of a schema node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    Int,
    Float,
    String,
    List,
    Map,
    Set,
    Object,
}

impl ValueType {
    /// True for Bool, Int, Float and String
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            ValueType::Bool | ValueType::Int | ValueType::Float | ValueType::String
        )
    }

    /// True for List, Map and Set, the Kinds that require an element schema
    pub fn is_container(&self) -> bool {
        matches!(self, ValueType::List | ValueType::Map | ValueType::Set)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::List => "list",
            ValueType::Map => "map",
            ValueType::Set => "set",
            ValueType::Object => "object",
        };
        f.write_str(name)
    }
}

/// One node of the schema tree
#[derive(Clone)]
pub struct Schema {
    pub value_type: ValueType,
    /// Element schema, required for List, Map and Set
    pub elem: Option<Box<Schema>>,
    /// Sub-field schemas, used by Object
    pub fields: SchemaMap,
    /// Identity function, required for Set
    pub set_fn: Option<SetFn>,
    /// Payloads of this field are redacted in log output
    pub sensitive: bool,
}

impl Schema {
    /// Create a bare node of the given Kind with no element, fields or identity
    pub fn new(value_type: ValueType) -> Self {
        Self {
            value_type,
            elem: None,
            fields: SchemaMap::new(),
            set_fn: None,
            sensitive: false,
        }
    }

    pub fn bool() -> Self {
        Self::new(ValueType::Bool)
    }

    pub fn int() -> Self {
        Self::new(ValueType::Int)
    }

    pub fn float() -> Self {
        Self::new(ValueType::Float)
    }

    pub fn string() -> Self {
        Self::new(ValueType::String)
    }

    pub fn list(elem: Schema) -> Self {
        Self::new(ValueType::List).with_elem(elem)
    }

    pub fn map(elem: Schema) -> Self {
        Self::new(ValueType::Map).with_elem(elem)
    }

    pub fn set(elem: Schema, set_fn: SetFn) -> Self {
        Self::new(ValueType::Set).with_elem(elem).with_set_fn(set_fn)
    }

    /// Create an object node from its named sub-fields
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        let mut schema = Self::new(ValueType::Object);
        schema.fields = fields.into_iter().map(|(k, v)| (k.into(), v)).collect();
        schema
    }

    pub fn with_elem(mut self, elem: Schema) -> Self {
        self.elem = Some(Box::new(elem));
        self
    }

    pub fn with_set_fn(mut self, set_fn: SetFn) -> Self {
        self.set_fn = Some(set_fn);
        self
    }

    /// Mark payloads of this field as sensitive
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Element schema of a container node
    ///
    /// # Errors
    ///
    /// Returns `MissingElem` when the node has none.
    pub fn elem_schema(&self, address: &str) -> Result<&Schema> {
        self.elem.as_deref().ok_or_else(|| FieldError::MissingElem {
            address: address.to_string(),
            kind: self.value_type,
        })
    }

    /// Identity function of a Set node
    ///
    /// # Errors
    ///
    /// Returns `MissingSetFn` when the node has none.
    pub fn identity_fn(&self, address: &str) -> Result<&SetFn> {
        self.set_fn.as_ref().ok_or_else(|| FieldError::MissingSetFn {
            address: address.to_string(),
        })
    }

    /// Check the container invariants of this node (not its descendants)
    ///
    /// # Errors
    ///
    /// - `MissingElem` if a List, Map or Set has no element schema
    /// - `MissingSetFn` if a Set has no identity function
    /// - `InvalidMapElem` if a Map element is not a scalar
    pub fn validate(&self, address: &str) -> Result<()> {
        if self.value_type.is_container() {
            let elem = self.elem_schema(address)?;
            if self.value_type == ValueType::Map && !elem.value_type.is_scalar() {
                return Err(FieldError::InvalidMapElem {
                    address: address.to_string(),
                    elem: elem.value_type,
                });
            }
        }
        if self.value_type == ValueType::Set {
            self.identity_fn(address)?;
        }
        Ok(())
    }

    /// The zero value of this node's Kind
    ///
    /// A Set without an identity function falls back to an identity of 0
    /// for every element; navigation rejects such nodes before any read.
    pub fn zero_value(&self) -> FieldValue {
        match self.value_type {
            ValueType::Bool => FieldValue::Bool(false),
            ValueType::Int => FieldValue::Int(0),
            ValueType::Float => FieldValue::Float(0.0),
            ValueType::String => FieldValue::String(String::new()),
            ValueType::List => FieldValue::List(Vec::new()),
            ValueType::Map => FieldValue::Map(BTreeMap::new()),
            ValueType::Set => {
                let set_fn = self
                    .set_fn
                    .clone()
                    .unwrap_or_else(|| std::sync::Arc::new(|_: &FieldValue| 0));
                FieldValue::Set(Set::new(set_fn))
            }
            ValueType::Object => FieldValue::Object(BTreeMap::new()),
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("value_type", &self.value_type)
            .field("elem", &self.elem)
            .field("fields", &self.fields)
            .field("set_fn", &self.set_fn.as_ref().map(|_| "<fn>"))
            .field("sensitive", &self.sensitive)
            .finish()
    }
}
