use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use catalog_categories::{Category, NewCategory};
use catalog_core::{CategoryId, Entity, ProductId};
use catalog_products::{NewProduct, ProductRecord};

use super::{CatalogStore, StoreError, Stored};

#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<CategoryId, Stored<Category>>,
    products: BTreeMap<ProductId, Stored<ProductRecord>>,
    // Last issued ids; never rewound, so deleted ids are not reused.
    last_category_id: i64,
    last_product_id: i64,
}

/// In-memory catalog gateway.
///
/// Intended for tests/dev. Ids are issued from monotonically increasing
/// counters and `BTreeMap` keeps listing order equal to insertion order.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    tables: RwLock<Tables>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("catalog tables lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("catalog tables lock poisoned".to_string()))
    }
}

fn stale(kind: &str, id: impl core::fmt::Display) -> StoreError {
    StoreError::Conflict(format!("{kind} {id} was modified or deleted since it was read"))
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn find_category(&self, id: CategoryId) -> Result<Option<Stored<Category>>, StoreError> {
        Ok(self.read()?.categories.get(&id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Stored<Category>>, StoreError> {
        Ok(self.read()?.categories.values().cloned().collect())
    }

    async fn insert_category(&self, new: NewCategory) -> Result<Stored<Category>, StoreError> {
        let mut tables = self.write()?;
        let id = CategoryId::new(tables.last_category_id + 1)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        tables.last_category_id = id.get();

        let row = Stored::new(Category::new(id, new.name), 1);
        tables.categories.insert(id, row.clone());
        Ok(row)
    }

    async fn update_category(&self, row: Stored<Category>) -> Result<Stored<Category>, StoreError> {
        let mut tables = self.write()?;
        let id = row.value.id();
        match tables.categories.get_mut(&id) {
            Some(current) if current.revision == row.revision => {
                *current = Stored::new(row.value, row.revision + 1);
                Ok(current.clone())
            }
            _ => Err(stale("category", id)),
        }
    }

    async fn remove_category(&self, id: CategoryId) -> Result<(), StoreError> {
        match self.write()?.categories.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }

    async fn category_exists(&self, id: CategoryId) -> Result<bool, StoreError> {
        Ok(self.read()?.categories.contains_key(&id))
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<Stored<ProductRecord>>, StoreError> {
        Ok(self.read()?.products.get(&id).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Stored<ProductRecord>>, StoreError> {
        Ok(self.read()?.products.values().cloned().collect())
    }

    async fn insert_product(&self, new: NewProduct) -> Result<Stored<ProductRecord>, StoreError> {
        let mut tables = self.write()?;
        let id = ProductId::new(tables.last_product_id + 1)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        tables.last_product_id = id.get();

        let row = Stored::new(ProductRecord::from_new(id, new), 1);
        tables.products.insert(id, row.clone());
        Ok(row)
    }

    async fn update_product(
        &self,
        row: Stored<ProductRecord>,
    ) -> Result<Stored<ProductRecord>, StoreError> {
        let mut tables = self.write()?;
        let id = row.value.id;
        match tables.products.get_mut(&id) {
            Some(current) if current.revision == row.revision => {
                *current = Stored::new(row.value, row.revision + 1);
                Ok(current.clone())
            }
            _ => Err(stale("product", id)),
        }
    }

    async fn remove_product(&self, id: ProductId) -> Result<(), StoreError> {
        match self.write()?.products.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }

    async fn product_exists(&self, id: ProductId) -> Result<bool, StoreError> {
        Ok(self.read()?.products.contains_key(&id))
    }
}
