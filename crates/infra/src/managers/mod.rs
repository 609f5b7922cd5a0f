//! Category and product managers (application-level orchestration).
//!
//! A manager is built per request around an injected [`CatalogStore`] handle.
//! It validates input with the pure domain types, resolves cross-entity
//! references through the gateway and translates gateway failures into the
//! caller-facing [`CatalogError`] taxonomy:
//!
//! ```text
//! input ─▶ validate (field errors) ─▶ resolve references ─▶ gateway write
//!                                                             │
//!                           Conflict ─▶ row still exists? ────┤
//!                                          no  ─▶ NotFound    │
//!                                          yes ─▶ Conflict    │
//! ```
//!
//! [`CatalogStore`]: crate::store::CatalogStore

pub mod categories;
pub mod products;

use thiserror::Error;

use catalog_core::{CategoryId, FieldError, ValidationErrors};

use crate::store::StoreError;

pub use categories::CategoryManager;
pub use products::ProductManager;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// One or more fields failed validation; nothing was persisted.
    ///
    /// `selected_category_id` is the category a re-rendered product form should
    /// pre-select (always `None` for categories).
    #[error("validation failed: {errors}")]
    Validation {
        errors: ValidationErrors,
        selected_category_id: Option<CategoryId>,
    },

    /// The product's category does not exist; nothing was persisted.
    #[error("reference not found: {error}")]
    ReferenceNotFound {
        error: FieldError,
        selected_category_id: Option<CategoryId>,
    },

    /// The target entity does not exist (including a concurrent delete).
    #[error("not found")]
    NotFound,

    /// The row was concurrently modified; no merge or retry is attempted.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Store(StoreError),
}

impl CatalogError {
    pub fn invalid(errors: ValidationErrors) -> Self {
        Self::Validation {
            errors,
            selected_category_id: None,
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict(msg) => CatalogError::Conflict(msg),
            StoreError::NotFound => CatalogError::NotFound,
            other => CatalogError::Store(other),
        }
    }
}

/// Settle a write that the gateway rejected as a conflict: a vanished row is
/// reported as `NotFound`, anything else propagates as `Conflict`.
pub(crate) fn settle_conflict(msg: String, still_exists: bool) -> CatalogError {
    if still_exists {
        CatalogError::Conflict(msg)
    } else {
        tracing::warn!(%msg, "row vanished before commit; reporting not found");
        CatalogError::NotFound
    }
}
