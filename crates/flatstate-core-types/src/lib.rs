//! Core types shared across flatstate facilities
//!
//! This crate provides foundational types used by both the error and
//! logging facilities of the reconciliation core:
//!
//! - **Schema constants**: Canonical structured-log field keys and event names
//! - **Sensitive data**: `Sensitive<T>` marker for redacting attribute payloads

pub mod schema;
pub mod sensitive;

pub use sensitive::Sensitive;
