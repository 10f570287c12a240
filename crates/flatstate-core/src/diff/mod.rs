//! Change-set model.
//!
//! A diff maps flat keys to [`ResourceAttrDiff`] deltas. It is produced once
//! per plan cycle by the differ and consumed read-only by the overlay
//! reader.
//!
//! ## Guarantees
//!
//! - **Immutability**: readers only ever borrow a diff; nothing in this
//!   crate mutates one after it is built.
//! - **Determinism**: attributes are held in a `BTreeMap`, so iteration and
//!   serialization order are stable.

pub mod model;

pub use model::{InstanceDiff, ResourceAttrDiff};
