//! `catalog-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the entity marker trait and the field-scoped error model shared
//! by the category and product modules.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, Field, FieldError, ValidationErrors};
pub use id::{CategoryId, ProductId};
pub use value_object::ValueObject;
