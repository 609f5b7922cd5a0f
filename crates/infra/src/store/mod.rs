//! Persistence gateway for catalog entities.
//!
//! The gateway owns identity and concurrency: it assigns ids on insert and
//! stamps every row with a `revision` that an update must present unchanged.
//! It knows nothing about validation or about the category/product relationship
//! beyond storing the product's `category_id`.

pub mod in_memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use catalog_categories::{Category, NewCategory};
use catalog_core::{CategoryId, ProductId};
use catalog_products::{NewProduct, ProductRecord};

pub use in_memory::InMemoryCatalogStore;
pub use sqlite::SqliteCatalogStore;

/// A row as held by the gateway: the value plus its concurrency token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stored<T> {
    pub value: T,
    /// Starts at 1 on insert; incremented by every successful update.
    pub revision: i64,
}

impl<T> Stored<T> {
    pub fn new(value: T, revision: i64) -> Self {
        Self { value, revision }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matched the id + revision presented by an update (the row was
    /// modified or removed since it was read).
    #[error("concurrency conflict: {0}")]
    Conflict(String),

    /// A delete matched no row.
    #[error("not found")]
    NotFound,

    /// A stored row could not be turned back into a domain value.
    #[error("corrupt row: {0}")]
    Corrupt(String),

    /// The in-memory tables are unusable (a writer panicked).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage abstraction the managers read and write through.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_category(&self, id: CategoryId) -> Result<Option<Stored<Category>>, StoreError>;
    /// All categories in ascending id (= insertion) order.
    async fn list_categories(&self) -> Result<Vec<Stored<Category>>, StoreError>;
    async fn insert_category(&self, new: NewCategory) -> Result<Stored<Category>, StoreError>;
    async fn update_category(&self, row: Stored<Category>) -> Result<Stored<Category>, StoreError>;
    async fn remove_category(&self, id: CategoryId) -> Result<(), StoreError>;
    async fn category_exists(&self, id: CategoryId) -> Result<bool, StoreError>;

    async fn find_product(&self, id: ProductId) -> Result<Option<Stored<ProductRecord>>, StoreError>;
    /// All products in ascending id (= insertion) order.
    async fn list_products(&self) -> Result<Vec<Stored<ProductRecord>>, StoreError>;
    async fn insert_product(&self, new: NewProduct) -> Result<Stored<ProductRecord>, StoreError>;
    async fn update_product(
        &self,
        row: Stored<ProductRecord>,
    ) -> Result<Stored<ProductRecord>, StoreError>;
    async fn remove_product(&self, id: ProductId) -> Result<(), StoreError>;
    async fn product_exists(&self, id: ProductId) -> Result<bool, StoreError>;
}

#[async_trait]
impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    async fn find_category(&self, id: CategoryId) -> Result<Option<Stored<Category>>, StoreError> {
        (**self).find_category(id).await
    }

    async fn list_categories(&self) -> Result<Vec<Stored<Category>>, StoreError> {
        (**self).list_categories().await
    }

    async fn insert_category(&self, new: NewCategory) -> Result<Stored<Category>, StoreError> {
        (**self).insert_category(new).await
    }

    async fn update_category(&self, row: Stored<Category>) -> Result<Stored<Category>, StoreError> {
        (**self).update_category(row).await
    }

    async fn remove_category(&self, id: CategoryId) -> Result<(), StoreError> {
        (**self).remove_category(id).await
    }

    async fn category_exists(&self, id: CategoryId) -> Result<bool, StoreError> {
        (**self).category_exists(id).await
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<Stored<ProductRecord>>, StoreError> {
        (**self).find_product(id).await
    }

    async fn list_products(&self) -> Result<Vec<Stored<ProductRecord>>, StoreError> {
        (**self).list_products().await
    }

    async fn insert_product(&self, new: NewProduct) -> Result<Stored<ProductRecord>, StoreError> {
        (**self).insert_product(new).await
    }

    async fn update_product(
        &self,
        row: Stored<ProductRecord>,
    ) -> Result<Stored<ProductRecord>, StoreError> {
        (**self).update_product(row).await
    }

    async fn remove_product(&self, id: ProductId) -> Result<(), StoreError> {
        (**self).remove_product(id).await
    }

    async fn product_exists(&self, id: ProductId) -> Result<bool, StoreError> {
        (**self).product_exists(id).await
    }
}
