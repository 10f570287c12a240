//! Hash-identified sets
//!
//! A [`Set`] stores each element under an integer identity derived from
//! the element's decoded content by the schema's identity function.
//! Structurally equal elements share an identity and collapse into one;
//! enumeration is always in ascending identity order.

pub mod identity;

use crate::value::FieldValue;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub use identity::{hash_string, hash_value, hash_value_identity};

/// Identity function of a set: a pure function of the element's content
pub type SetFn = Arc<dyn Fn(&FieldValue) -> i64 + Send + Sync>;

/// Unordered collection deduplicated by identity
#[derive(Clone)]
pub struct Set {
    f: SetFn,
    m: BTreeMap<i64, FieldValue>,
}

impl Set {
    /// Create an empty set with the given identity function
    pub fn new(f: SetFn) -> Self {
        Self {
            f,
            m: BTreeMap::new(),
        }
    }

    /// Create a set from values, computing each identity
    pub fn from_values<I>(f: SetFn, values: I) -> Self
    where
        I: IntoIterator<Item = FieldValue>,
    {
        let mut set = Self::new(f);
        for v in values {
            set.add(v);
        }
        set
    }

    /// Identity of `item` under this set's function
    pub fn code(&self, item: &FieldValue) -> i64 {
        (self.f)(item)
    }

    /// Add an element, returning its identity
    ///
    /// An element whose identity collides with an existing one replaces it.
    pub fn add(&mut self, item: FieldValue) -> i64 {
        let code = self.code(&item);
        self.m.insert(code, item);
        code
    }

    /// Add an element under an identity that is already known
    ///
    /// Used when the identity comes from storage rather than from content.
    pub fn add_with_code(&mut self, code: i64, item: FieldValue) {
        self.m.insert(code, item);
    }

    /// Remove the element with the same identity as `item`
    pub fn remove(&mut self, item: &FieldValue) -> Option<FieldValue> {
        let code = self.code(item);
        self.m.remove(&code)
    }

    pub fn contains(&self, item: &FieldValue) -> bool {
        self.m.contains_key(&self.code(item))
    }

    pub fn contains_code(&self, code: i64) -> bool {
        self.m.contains_key(&code)
    }

    pub fn get(&self, code: i64) -> Option<&FieldValue> {
        self.m.get(&code)
    }

    pub fn len(&self) -> usize {
        self.m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.m.is_empty()
    }

    /// Identities in ascending order
    pub fn codes(&self) -> impl Iterator<Item = i64> + '_ {
        self.m.keys().copied()
    }

    /// `(identity, element)` pairs in ascending identity order
    pub fn iter(&self) -> impl Iterator<Item = (i64, &FieldValue)> + '_ {
        self.m.iter().map(|(k, v)| (*k, v))
    }

    /// Elements in ascending identity order
    pub fn list(&self) -> Vec<FieldValue> {
        self.m.values().cloned().collect()
    }

    /// Elements of either set; on a shared identity `other` wins
    pub fn union(&self, other: &Set) -> Set {
        let mut result = self.clone();
        for (code, v) in other.iter() {
            result.m.insert(code, v.clone());
        }
        result
    }

    /// Elements whose identity is in both sets, taken from `self`
    pub fn intersection(&self, other: &Set) -> Set {
        let m = self
            .m
            .iter()
            .filter(|(code, _)| other.m.contains_key(code))
            .map(|(code, v)| (*code, v.clone()))
            .collect();
        Set {
            f: self.f.clone(),
            m,
        }
    }

    /// Elements of `self` whose identity is absent from `other`
    pub fn difference(&self, other: &Set) -> Set {
        let m = self
            .m
            .iter()
            .filter(|(code, _)| !other.m.contains_key(code))
            .map(|(code, v)| (*code, v.clone()))
            .collect();
        Set {
            f: self.f.clone(),
            m,
        }
    }
}

impl PartialEq for Set {
    fn eq(&self, other: &Self) -> bool {
        self.m == other.m
    }
}

impl fmt::Debug for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.m.iter()).finish()
    }
}

impl Serialize for Set {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.m.len()))?;
        for v in self.m.values() {
            seq.serialize_element(v)?;
        }
        seq.end()
    }
}
