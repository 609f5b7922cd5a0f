use catalog_categories::{Category, CategoryName, NewCategory};
use catalog_core::{CategoryId, Entity};

use super::{CatalogError, settle_conflict};
use crate::store::{CatalogStore, StoreError};

/// Enforces category invariants and orchestrates the category lifecycle.
#[derive(Debug, Clone)]
pub struct CategoryManager<S> {
    store: S,
}

impl<S> CategoryManager<S>
where
    S: CatalogStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self
            .store
            .list_categories()
            .await?
            .into_iter()
            .map(|row| row.value)
            .collect())
    }

    pub async fn get(&self, id: CategoryId) -> Result<Category, CatalogError> {
        self.store
            .find_category(id)
            .await?
            .map(|row| row.value)
            .ok_or(CatalogError::NotFound)
    }

    pub async fn create(&self, name: Option<&str>) -> Result<Category, CatalogError> {
        let name = CategoryName::parse(name).map_err(|e| CatalogError::invalid(e.into()))?;

        let row = self.store.insert_category(NewCategory::new(name)).await?;
        tracing::info!(category_id = %row.value.id(), "category created");
        Ok(row.value)
    }

    /// Replace the category's name.
    pub async fn update(&self, id: CategoryId, name: Option<&str>) -> Result<Category, CatalogError> {
        let name = CategoryName::parse(name).map_err(|e| CatalogError::invalid(e.into()))?;

        let mut row = self
            .store
            .find_category(id)
            .await?
            .ok_or(CatalogError::NotFound)?;
        row.value.rename(name);

        match self.store.update_category(row).await {
            Ok(saved) => {
                tracing::info!(category_id = %id, revision = saved.revision, "category updated");
                Ok(saved.value)
            }
            Err(StoreError::Conflict(msg)) => {
                let still_exists = self.store.category_exists(id).await?;
                Err(settle_conflict(msg, still_exists))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the category. Products referencing it are left untouched.
    pub async fn delete(&self, id: CategoryId) -> Result<(), CatalogError> {
        self.store.remove_category(id).await?;
        tracing::info!(category_id = %id, "category deleted");
        Ok(())
    }
}
