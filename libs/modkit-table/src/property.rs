use crate::{EdmType, Error, Result, Value};

/// A single value tagged with its EDM type.
///
/// The pair is validated once on construction and never changes afterwards;
/// replacing a property on an entity replaces the whole `Property`.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    edm_type: EdmType,
    value: Value,
}

impl Property {
    /// Build a property for `name`, inferring the type when `edm_type` is `None`.
    ///
    /// `name` is only used to describe a rejected value.
    ///
    /// # Errors
    /// Returns `Error::Validation` if the value is not acceptable for the
    /// explicit or inferred type.
    pub fn create(name: &str, edm_type: Option<EdmType>, value: impl Into<Value>) -> Result<Self> {
        let value = value.into();
        let edm_type = edm_type.unwrap_or_else(|| EdmType::infer(&value));
        if let Err(reason) = edm_type.check(&value) {
            tracing::debug!(property = name, edm_type = %edm_type, %reason, "Rejected property value");
            return Err(Error::Validation {
                property: Some(name.to_owned()),
                edm_type,
                reason,
            });
        }
        Ok(Self { edm_type, value })
    }

    /// Build an unnamed property of an explicit type.
    ///
    /// # Errors
    /// Returns `Error::Validation` if `value` is not acceptable for `edm_type`.
    pub fn new(edm_type: EdmType, value: impl Into<Value>) -> Result<Self> {
        let value = value.into();
        edm_type.validate(&value)?;
        Ok(Self { edm_type, value })
    }

    /// Build an unnamed property with an inferred type.
    ///
    /// # Errors
    /// Returns `Error::Validation` for integers outside the `Int32` range.
    pub fn inferred(value: impl Into<Value>) -> Result<Self> {
        let value = value.into();
        Self::new(EdmType::infer(&value), value)
    }

    /// String properties cannot fail validation.
    pub(crate) fn string(value: impl Into<String>) -> Self {
        Self {
            edm_type: EdmType::String,
            value: Value::String(value.into()),
        }
    }

    #[must_use]
    pub fn edm_type(&self) -> EdmType {
        self.edm_type
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Payload text for this property, `None` when the value is null.
    #[must_use]
    pub fn encoded(&self) -> Option<String> {
        self.edm_type.encode(&self.value)
    }
}
