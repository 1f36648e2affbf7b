//! The record interface consumed by the core.
//!
//! A `TypedRecord` carries its fully-qualified type name, a `name -> value`
//! mapping for its declared properties, and a salt store: a `name -> 32
//! byte salt` mapping over this record's own primitive leaf fields. Nested
//! records carry their own independent salt stores.
//!
//! `BTreeMap` is used for both maps so that accidental iteration is at
//! least deterministic — but the engine never iterates these maps directly
//! to decide hash order. Declaration order always comes from the schema
//! (`SchemaProvider::properties`); these maps are looked up by name.

use crate::compat::{BTreeMap, String, Vec};
use crate::limits::DIGEST_BYTES;
use crate::value::Value;

/// A 32-byte salt bound to one primitive field of one record.
pub type Salt = [u8; DIGEST_BYTES];

#[derive(Debug, Clone, PartialEq)]
pub struct TypedRecord {
    type_name: String,
    values: BTreeMap<String, Value>,
    salts: BTreeMap<String, Salt>,
}

impl TypedRecord {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            values: BTreeMap::new(),
            salts: BTreeMap::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Set a property value. Builder-style, for convenient construction.
    pub fn with_value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn set_value(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.values.get_mut(name)
    }

    pub fn get_salt(&self, name: &str) -> Option<&Salt> {
        self.salts.get(name)
    }

    pub fn set_salt(&mut self, name: impl Into<String>, salt: Salt) {
        self.salts.insert(name.into(), salt);
    }

    /// Every property name with a salt currently recorded. Used by tests
    /// exercising the salt-freshness property.
    pub fn salted_names(&self) -> Vec<&String> {
        self.salts.keys().collect()
    }
}
