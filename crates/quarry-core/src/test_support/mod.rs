//! Shared fixtures for core unit tests.

mod executor;

pub use executor::MockExecutor;

use crate::{
    schema::{EntityDescriptor, EntityName},
    template::{DialectId, Templates},
    value::ValueType,
};
use std::sync::Arc;

pub const CAT_TYPE: &str = "com.example.domain.Cat";
pub const PRODUCT_TYPE: &str = "com.example.domain.Product";

#[must_use]
pub fn cat_name() -> EntityName {
    EntityName::new(CAT_TYPE)
}

/// `Cat` with a self-referencing `kittens` collection and `mate` reference.
#[must_use]
pub fn cat() -> EntityDescriptor {
    EntityDescriptor::new(cat_name())
        .field("id", ValueType::Int)
        .field("name", ValueType::Text)
        .field("bodyWeight", ValueType::Float)
        .field("birthdate", ValueType::Date)
        .field("alive", ValueType::Bool)
        .field(
            "kittens",
            ValueType::Collection(Box::new(ValueType::Entity(cat_name()))),
        )
        .field("mate", ValueType::Entity(cat_name()))
}

#[must_use]
pub fn product() -> EntityDescriptor {
    EntityDescriptor::new(EntityName::new(PRODUCT_TYPE).with_table("PRODUCTS"))
        .field("id", ValueType::Int)
        .field("name", ValueType::Text)
        .field("price", ValueType::Float)
        .field(
            "tags",
            ValueType::Collection(Box::new(ValueType::Text)),
        )
}

/// Field path by name; panics on a fixture typo.
#[must_use]
pub fn field(descriptor: &EntityDescriptor, name: &str) -> crate::expr::Path {
    descriptor
        .get(name)
        .cloned()
        .unwrap_or_else(|| panic!("fixture has no field {name}"))
}

#[must_use]
pub fn templates(dialect: DialectId) -> Arc<Templates> {
    Arc::new(Templates::for_dialect(dialect))
}
