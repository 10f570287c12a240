//! Flatstate Core - schema-directed reads over flattened resource state
//!
//! Resource state is stored as a flat `key -> string` map (`tags.env`,
//! `zones.#`, `ingress.8213.port`). This crate decodes that map back into
//! typed values under a schema, and overlays pending change-sets on top of
//! it so callers can see what a resource will look like once a plan runs.
//!
//! - Schema model and address resolution
//! - Flat key codec (decode, encode, flatten)
//! - Sets keyed by a caller-supplied identity function
//! - Readers: flat map, diff overlay, multi-level

pub mod codec;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod reader;
pub mod schema;
pub mod set;
pub mod value;

// Re-export commonly used types
pub use codec::address;
pub use diff::{InstanceDiff, ResourceAttrDiff};
pub use errors::{ExError, ExErrorKind, FieldError, Result};
pub use reader::{
    BasicMapReader, DiffFieldReader, FieldReadResult, FieldReader, MapFieldReader, MapReader,
    MultiLevelFieldReader, MultiMapReader,
};
pub use schema::{Schema, SchemaMap, ValueType};
pub use set::{hash_value_identity, Set, SetFn};
pub use value::FieldValue;
