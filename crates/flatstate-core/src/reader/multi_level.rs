//! Reading across ordered, named layers of readers.
//!
//! A resource's view of one field typically stacks several sources: the
//! persisted `state`, the pending `diff` overlay on top of it, and values
//! `set` during the current step. [`MultiLevelFieldReader`] keeps those
//! readers by level name and answers either for one exact level or for the
//! topmost level (up to a bound) that holds the field.
//!
//! `read_field_merge` is the operation boundary of this crate:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! The readers underneath only use `tracing::debug!` / `tracing::trace!`.

use crate::codec::flat_key;
use crate::errors::{FieldError, Result};
use crate::reader::{FieldReadResult, FieldReader};
use crate::schema::navigator::field_schema;
use crate::schema::SchemaMap;
use crate::{log_op_end, log_op_error, log_op_start};
use std::collections::BTreeMap;

/// Ordered, named layers of readers over one schema
pub struct MultiLevelFieldReader<'a> {
    schema: &'a SchemaMap,
    levels: Vec<String>,
    readers: BTreeMap<String, &'a dyn FieldReader>,
}

impl<'a> MultiLevelFieldReader<'a> {
    /// Declare the levels, lowest first
    pub fn new<I, S>(schema: &'a SchemaMap, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            schema,
            levels: levels.into_iter().map(Into::into).collect(),
            readers: BTreeMap::new(),
        }
    }

    /// Attach the reader serving `level`
    ///
    /// # Errors
    ///
    /// Returns `UnknownLevel` if `level` was not declared.
    pub fn set_level(&mut self, level: &str, reader: &'a dyn FieldReader) -> Result<()> {
        self.check_level(level)?;
        self.readers.insert(level.to_string(), reader);
        Ok(())
    }

    /// Declared level names, lowest first
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    fn check_level(&self, level: &str) -> Result<()> {
        if self.levels.iter().any(|l| l == level) {
            Ok(())
        } else {
            Err(FieldError::UnknownLevel {
                level: level.to_string(),
            })
        }
    }

    /// Read `address` from exactly one level
    ///
    /// A declared level with no reader attached reads as missing.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLevel` for an undeclared level, and otherwise
    /// whatever the level's reader returns.
    pub fn read_field_exact(&self, address: &[String], level: &str) -> Result<FieldReadResult> {
        self.check_level(level)?;
        match self.readers.get(level) {
            Some(reader) => reader.read_field(address),
            None => Ok(FieldReadResult::missing(field_schema(
                address,
                self.schema,
            )?)),
        }
    }

    /// Read `address` from the highest level, up to and including `level`,
    /// where the field exists
    ///
    /// When no level holds the field the result is missing.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLevel` for an undeclared level, or the first error
    /// raised by a level's reader.
    pub fn read_field_merge(&self, address: &[String], level: &str) -> Result<FieldReadResult> {
        let key = flat_key(address);
        log_op_start!("read_field_merge", address = %key, level = level);
        let start = std::time::Instant::now();

        let result = self.merge_up_to(address, level).map_err(|e| {
            log_op_error!(
                "read_field_merge",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                address = %key
            );
            e
        })?;

        log_op_end!(
            "read_field_merge",
            duration_ms = start.elapsed().as_millis() as u64,
            address = %key,
            exists = result.exists,
            computed = result.computed
        );

        Ok(result)
    }

    fn merge_up_to(&self, address: &[String], level: &str) -> Result<FieldReadResult> {
        self.check_level(level)?;
        let mut result = FieldReadResult::missing(field_schema(address, self.schema)?);
        for name in &self.levels {
            if let Some(reader) = self.readers.get(name) {
                let out = reader.read_field(address)?;
                if out.exists {
                    tracing::trace!(address = %flat_key(address), level = %name, "level holds field");
                    result = out;
                }
            }
            if name == level {
                break;
            }
        }
        Ok(result)
    }
}

impl FieldReader for MultiLevelFieldReader<'_> {
    /// Merge across every declared level
    fn read_field(&self, address: &[String]) -> Result<FieldReadResult> {
        match self.levels.last() {
            Some(top) => self.merge_up_to(address, top),
            None => Ok(FieldReadResult::missing(field_schema(
                address,
                self.schema,
            )?)),
        }
    }
}
