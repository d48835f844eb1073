//! Submission-side view of an entity.
//!
//! The transport layer turns `EncodedProperty` rows into whatever document
//! format it speaks; the text of each row is the EDM payload encoding.

use crate::entity::{PARTITION_KEY, ROW_KEY};
use crate::{EdmType, Entity, Error, Property, Result, Value};

/// One property ready for the wire. `text` is `None` for a null value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedProperty {
    pub name: String,
    pub edm_type: EdmType,
    pub text: Option<String>,
}

impl EncodedProperty {
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.text.is_none()
    }
}

/// Check that both key properties carry a value.
///
/// # Errors
/// Returns `Error::MissingKey` naming the first absent key.
pub fn ensure_keys(entity: &Entity) -> Result<()> {
    if entity.partition_key().is_none() {
        return Err(Error::MissingKey(PARTITION_KEY));
    }
    if entity.row_key().is_none() {
        return Err(Error::MissingKey(ROW_KEY));
    }
    Ok(())
}

/// Encode every property of an entity, in insertion order.
///
/// # Errors
/// Returns `Error::MissingKey` if the entity cannot be submitted.
pub fn encode_entity(entity: &Entity) -> Result<Vec<EncodedProperty>> {
    if let Err(err) = ensure_keys(entity) {
        tracing::debug!(error = %err, "Refusing to encode entity");
        return Err(err);
    }
    let encoded: Vec<_> = entity
        .iter()
        .map(|(name, property)| EncodedProperty {
            name: name.clone(),
            edm_type: property.edm_type(),
            text: property.encoded(),
        })
        .collect();
    tracing::trace!(
        partition_key = entity.partition_key(),
        row_key = entity.row_key(),
        properties = encoded.len(),
        "Encoded entity"
    );
    Ok(encoded)
}

/// Rebuild an entity from `(name, type name, text)` rows as returned by the service.
///
/// A missing type name means `Edm.String`; a missing text means null.
///
/// # Errors
/// Returns `Error::UnknownEdmType` or `Error::Decode` for the first bad row.
pub fn decode_entity<'a, I>(rows: I) -> Result<Entity>
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>, Option<&'a str>)>,
{
    let mut entity = Entity::new();
    for (name, type_name, text) in rows {
        let edm_type = type_name.map_or(Ok(EdmType::String), str::parse::<EdmType>)?;
        let value = match text {
            Some(text) => edm_type.decode(text).inspect_err(|err| {
                tracing::debug!(property = name, error = %err, "Failed to decode property");
            })?,
            None => Value::Null,
        };
        entity.set_property(name, Property::create(name, Some(edm_type), value)?);
    }
    Ok(entity)
}
