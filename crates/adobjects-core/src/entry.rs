//! Raw search rows
//!
//! The loosely-typed attribute model returned by a directory search before any
//! typed adapter has looked at it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A raw attribute value as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum AttributeValue {
    /// No value (absent or cleared).
    #[default]
    Null,
    /// A single textual value.
    String(String),
    /// Multiple textual values in store order.
    Array(Vec<String>),
    /// A binary blob (e.g. `objectSid`, `objectGUID`).
    Binary(Vec<u8>),
    /// Multiple binary values in store order (e.g. `userCertificate`).
    BinaryArray(Vec<Vec<u8>>),
}

impl AttributeValue {
    /// Create a null value.
    pub fn null() -> Self {
        AttributeValue::Null
    }

    /// Create a binary value.
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        AttributeValue::Binary(bytes.into())
    }

    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Check if this value carries no data at all.
    pub fn is_empty(&self) -> bool {
        match self {
            AttributeValue::Null => true,
            AttributeValue::String(s) => s.is_empty(),
            AttributeValue::Array(arr) => arr.is_empty(),
            AttributeValue::Binary(b) => b.is_empty(),
            AttributeValue::BinaryArray(values) => values.is_empty(),
        }
    }

    /// Get the first textual value, if any.
    pub fn first(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            AttributeValue::Array(arr) => arr.first().map(String::as_str),
            _ => None,
        }
    }

    /// Get all textual values (works for both single and multi-valued).
    pub fn as_strings(&self) -> Vec<&str> {
        match self {
            AttributeValue::String(s) => vec![s.as_str()],
            AttributeValue::Array(arr) => arr.iter().map(String::as_str).collect(),
            _ => vec![],
        }
    }

    /// Get the raw bytes if this is a binary value.
    ///
    /// For a multi-valued binary attribute this is the first value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            AttributeValue::Binary(b) => Some(b),
            AttributeValue::BinaryArray(values) => values.first().map(Vec::as_slice),
            _ => None,
        }
    }

    /// Get all binary values.
    pub fn as_byte_values(&self) -> Vec<&[u8]> {
        match self {
            AttributeValue::Binary(b) => vec![b.as_slice()],
            AttributeValue::BinaryArray(values) => values.iter().map(Vec::as_slice).collect(),
            _ => vec![],
        }
    }

    /// Check if this is multi-valued.
    pub fn is_multi_valued(&self) -> bool {
        matches!(
            self,
            AttributeValue::Array(_) | AttributeValue::BinaryArray(_)
        )
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(values: Vec<String>) -> Self {
        AttributeValue::Array(values)
    }
}

impl From<Vec<&str>> for AttributeValue {
    fn from(values: Vec<&str>) -> Self {
        AttributeValue::Array(values.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(bytes: Vec<u8>) -> Self {
        AttributeValue::Binary(bytes)
    }
}

impl From<Vec<Vec<u8>>> for AttributeValue {
    fn from(values: Vec<Vec<u8>>) -> Self {
        AttributeValue::BinaryArray(values)
    }
}

/// One search result row: a distinguished name and its attributes.
///
/// Attribute names are matched case-insensitively, as LDAP does. Names are
/// stored lower-cased, which also gives the map a stable iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    dn: String,
    attributes: BTreeMap<String, AttributeValue>,
}

impl RawEntry {
    /// Create an entry with no attributes.
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Distinguished name of the entry.
    pub fn dn(&self) -> &str {
        &self.dn
    }

    /// Set an attribute value.
    pub fn set(&mut self, name: &str, value: impl Into<AttributeValue>) {
        self.attributes.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Set an attribute using builder pattern.
    pub fn with(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Get an attribute value.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(&name.to_ascii_lowercase())
    }

    /// Check if an attribute exists with a non-empty value.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_empty())
    }

    /// Remove an attribute.
    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        self.attributes.remove(&name.to_ascii_lowercase())
    }

    /// Check whether `objectClass` contains the given class.
    pub fn has_object_class(&self, class: &str) -> bool {
        self.get("objectClass").is_some_and(|v| {
            v.as_strings()
                .iter()
                .any(|c| c.eq_ignore_ascii_case(class))
        })
    }

    /// Get all (lower-cased) attribute names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Get the number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check if the entry has no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterate over all attributes.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttributeValue)> {
        self.attributes.iter()
    }
}
