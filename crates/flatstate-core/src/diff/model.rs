//! Diff types.
//!
//! Both types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Optional flags default to `false` when absent from serialized input.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The delta for one flat key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceAttrDiff {
    /// Payload before the change
    #[serde(default)]
    pub old: String,
    /// Payload after the change; not authoritative when `new_computed`
    #[serde(default)]
    pub new: String,
    /// The new value is only known after the change is executed
    #[serde(default)]
    pub new_computed: bool,
    /// The key is absent after the change
    #[serde(default)]
    pub new_removed: bool,
    /// Changing this key forces the resource to be replaced
    #[serde(default)]
    pub requires_new: bool,
}

impl ResourceAttrDiff {
    /// A plain `old -> new` change
    pub fn change(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
            ..Self::default()
        }
    }

    /// A change whose new value is not yet known
    pub fn computed(old: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new_computed: true,
            ..Self::default()
        }
    }

    /// A removal of the key
    pub fn removed() -> Self {
        Self {
            new_removed: true,
            ..Self::default()
        }
    }

    /// Mark the change as forcing replacement
    pub fn with_requires_new(mut self) -> Self {
        self.requires_new = true;
        self
    }
}

/// All attribute deltas of one resource instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceDiff {
    /// Flat key -> delta
    #[serde(default)]
    pub attributes: BTreeMap<String, ResourceAttrDiff>,
    /// The whole instance is being destroyed
    #[serde(default)]
    pub destroy: bool,
}

impl InstanceDiff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add the delta for `key`
    pub fn attr(mut self, key: impl Into<String>, delta: ResourceAttrDiff) -> Self {
        self.attributes.insert(key.into(), delta);
        self
    }

    /// The delta recorded for exactly `key`
    pub fn get(&self, key: &str) -> Option<&ResourceAttrDiff> {
        self.attributes.get(key)
    }

    /// Every delta whose key starts with `prefix`, in key order
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a ResourceAttrDiff)> + 'a {
        self.attributes
            .range::<str, _>((std::ops::Bound::Included(prefix), std::ops::Bound::Unbounded))
            .take_while(move |(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.as_str(), v))
    }

    /// True if any delta forces replacement
    pub fn requires_new(&self) -> bool {
        self.attributes.values().any(|d| d.requires_new)
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && !self.destroy
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }
}
