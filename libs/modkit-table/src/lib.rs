//! Typed entity model and filter builder for table storage.
//!
//! Entities carry an ordered bag of properties, each tagged with one of the
//! primitive EDM types and validated when it is created. Filters are small
//! immutable trees that render to the `$filter` predicate syntax expected by
//! the table service.
//!
//! ```rust,ignore
//! use modkit_table::{EdmType, Entity, filter};
//!
//! let mut entity = Entity::with_keys("p", "r");
//! entity.add_property("n", Some(EdmType::Int32), 23)?;
//!
//! let f = filter::apply_eq(filter::apply_property_name("n"), filter::apply_constant(23));
//! assert_eq!(f.to_string(), "(n eq 23)");
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod edm;
pub mod entity;
pub mod filter;
pub mod limits;
pub mod payload;
pub mod property;
pub mod query;
pub mod value;

pub use edm::EdmType;
pub use entity::{Entity, PARTITION_KEY, ROW_KEY};
pub use filter::{BinaryOperator, Filter, UnaryOperator, serialize};
pub use limits::TableLimits;
pub use payload::{EncodedProperty, decode_entity, encode_entity, ensure_keys};
pub use property::Property;
pub use query::{Query, QueryEntitiesOptions, QueryTablesOptions};
pub use value::Value;

/// Unified error type for the table model.
///
/// Every error is returned synchronously to the caller; nothing in this crate
/// retries or panics on bad input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A value does not satisfy the validation rule of its EDM type.
    #[error("invalid {edm_type} value{}: {reason}", describe_property(.property.as_deref()))]
    Validation {
        property: Option<String>,
        edm_type: EdmType,
        reason: String,
    },

    /// Wire text could not be decoded as the given EDM type.
    #[error("cannot decode {edm_type} value: {reason}")]
    Decode { edm_type: EdmType, reason: String },

    #[error("unknown EDM type: {0}")]
    UnknownEdmType(String),

    /// The entity lacks one of the key properties required for submission.
    #[error("entity is missing required key property '{0}'")]
    MissingKey(&'static str),

    #[error("invalid $top: {0}")]
    InvalidTop(u32),

    #[error("invalid $filter: {0}")]
    InvalidFilter(String),
}

fn describe_property(property: Option<&str>) -> String {
    property.map(|p| format!(" for property '{p}'")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, Error>;
