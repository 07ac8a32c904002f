//! WAPI object models
//!
//! Every resource the client manages implements [`WapiObject`]: it knows its
//! wire resource type, the fields a GET should return, and an optional
//! extensible-attribute search filter. Field names on the structs follow the
//! WAPI JSON names; empty values are omitted on the wire.

pub mod dns;
pub mod grid;
pub mod ipam;
pub mod refs;

pub use dns::*;
pub use grid::*;
pub use ipam::*;
pub use refs::*;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

/// A domain value that can be sent to the WAPI
pub trait WapiObject: Send + Sync {
    /// Wire resource type name (e.g. `networkview`, `record:a`)
    fn object_type(&self) -> &str;

    /// Fields returned by a GET when the caller did not override them
    fn default_return_fields(&self) -> &'static [&'static str];

    /// Client-side state that never goes on the wire as a regular field
    fn base(&self) -> &ObjectBase;

    /// Canonical JSON form of the object
    fn to_json(&self) -> Result<Value, serde_json::Error>;

    /// Fields to request with `_return_fields` on a GET
    fn return_fields(&self) -> Vec<String> {
        match &self.base().return_fields {
            Some(fields) => fields.clone(),
            None => self
                .default_return_fields()
                .iter()
                .map(|f| (*f).to_string())
                .collect(),
        }
    }

    /// Extensible-attribute search filter applied on a GET
    fn ea_search(&self) -> &EaSearch {
        &self.base().ea_search
    }
}

/// Non-serialized per-object state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectBase {
    /// Overrides the default return fields when set
    pub return_fields: Option<Vec<String>>,
    pub ea_search: EaSearch,
}

/// Extensible attributes attached to an object
///
/// Serialized as `{"name": {"value": v}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, EaValue>", into = "BTreeMap<String, EaValue>")]
pub struct Ea(BTreeMap<String, Value>);

/// Wire form of a single extensible attribute value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EaValue {
    pub value: Value,
}

impl Ea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Add an attribute, returning `self` for chaining
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

impl Deref for Ea {
    type Target = BTreeMap<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Ea {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Ea {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Ea(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<BTreeMap<String, EaValue>> for Ea {
    fn from(map: BTreeMap<String, EaValue>) -> Self {
        Ea(map.into_iter().map(|(k, v)| (k, v.value)).collect())
    }
}

impl From<Ea> for BTreeMap<String, EaValue> {
    fn from(ea: Ea) -> Self {
        ea.0.into_iter().map(|(k, value)| (k, EaValue { value })).collect()
    }
}

/// Extensible-attribute search filter
///
/// Serialized with the WAPI `*` prefix on every key: `{"*name": v}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EaSearch(BTreeMap<String, Value>);

impl EaSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Add a filter, returning `self` for chaining
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

impl Serialize for EaSearch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (format!("*{k}"), v)))
    }
}

impl From<Ea> for EaSearch {
    fn from(ea: Ea) -> Self {
        EaSearch(ea.0)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for EaSearch {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        EaSearch(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Render a boolean the way the grid stores boolean EAs
pub fn ea_bool(value: bool) -> Value {
    Value::String(if value { "True" } else { "False" }.to_string())
}

/// Implements [`WapiObject`] and the builder helpers for a struct that has a
/// `base: ObjectBase` field.
macro_rules! wapi_object {
    ($ty:ident, $object_type:literal, [$($field:literal),* $(,)?]) => {
        impl $ty {
            /// Wire resource type of this object
            pub const OBJECT_TYPE: &'static str = $object_type;

            /// Request only these fields on a GET
            pub fn with_return_fields<I, S>(mut self, fields: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                self.base.return_fields = Some(fields.into_iter().map(Into::into).collect());
                self
            }

            /// Filter a GET by extensible attributes
            pub fn with_ea_search(mut self, search: $crate::models::EaSearch) -> Self {
                self.base.ea_search = search;
                self
            }
        }

        impl $crate::models::WapiObject for $ty {
            fn object_type(&self) -> &str {
                $object_type
            }

            fn default_return_fields(&self) -> &'static [&'static str] {
                &[$($field),*]
            }

            fn base(&self) -> &$crate::models::ObjectBase {
                &self.base
            }

            fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
                serde_json::to_value(self)
            }
        }
    };
}

pub(crate) use wapi_object;
