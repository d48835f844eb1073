//! Entity: an insertion-ordered bag of typed properties addressed by
//! `PartitionKey` and `RowKey`.

use indexmap::IndexMap;

use crate::{EdmType, Property, Result, Value};

pub const PARTITION_KEY: &str = "PartitionKey";
pub const ROW_KEY: &str = "RowKey";

/// A table record.
///
/// The keys are ordinary `String` properties stored in the same map as
/// everything else; the key accessors are views over that map. An entity is
/// always constructible, missing keys are judged at submission time
/// (see [`crate::payload::ensure_keys`]).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Entity {
    properties: IndexMap<String, Property>,
}

impl Entity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_keys(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        let mut entity = Self::new();
        entity.set_partition_key(partition_key);
        entity.set_row_key(row_key);
        entity
    }

    /// Insert or replace a property.
    ///
    /// A replaced property keeps the position of the one it replaces.
    pub fn set_property(&mut self, name: impl Into<String>, property: Property) {
        self.properties.insert(name.into(), property);
    }

    /// Validate and insert a property, inferring the type when `edm_type` is `None`.
    ///
    /// # Errors
    /// Returns `Error::Validation` if the value does not fit the type; the
    /// entity is left untouched.
    pub fn add_property(
        &mut self,
        name: impl Into<String>,
        edm_type: Option<EdmType>,
        value: impl Into<Value>,
    ) -> Result<()> {
        let name = name.into();
        let property = Property::create(&name, edm_type, value)?;
        self.set_property(name, property);
        Ok(())
    }

    #[must_use]
    pub fn partition_key(&self) -> Option<&str> {
        self.key(PARTITION_KEY)
    }

    pub fn set_partition_key(&mut self, key: impl Into<String>) {
        self.set_property(PARTITION_KEY, Property::string(key));
    }

    #[must_use]
    pub fn row_key(&self) -> Option<&str> {
        self.key(ROW_KEY)
    }

    pub fn set_row_key(&mut self, key: impl Into<String>) {
        self.set_property(ROW_KEY, Property::string(key));
    }

    // null or non-string key properties read as absent
    fn key(&self, name: &str) -> Option<&str> {
        self.property_value(name).and_then(Value::as_str)
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    #[must_use]
    pub fn property_value(&self, name: &str) -> Option<&Value> {
        self.property(name).map(Property::value)
    }

    #[must_use]
    pub fn properties(&self) -> &IndexMap<String, Property> {
        &self.properties
    }

    #[must_use]
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Property> {
        self.properties.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl<'a> IntoIterator for &'a Entity {
    type Item = (&'a String, &'a Property);
    type IntoIter = indexmap::map::Iter<'a, String, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
