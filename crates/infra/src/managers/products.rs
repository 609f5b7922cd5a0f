use std::collections::HashMap;

use rust_decimal::Decimal;

use catalog_categories::Category;
use catalog_core::{CategoryId, Entity, Field, FieldError, ProductId, ValidationErrors};
use catalog_products::{NewProduct, Price, Product, ProductChanges, ProductName};

use super::{CatalogError, settle_conflict};
use crate::store::{CatalogStore, StoreError, Stored};

const CATEGORY_NOT_FOUND: &str = "Category not found";

/// Enforces product invariants, including the mandatory category reference.
#[derive(Debug, Clone)]
pub struct ProductManager<S> {
    store: S,
}

impl<S> ProductManager<S>
where
    S: CatalogStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All products, each with its category resolved.
    pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        let rows = self.store.list_products().await?;
        let categories: HashMap<CategoryId, Category> = self
            .store
            .list_categories()
            .await?
            .into_iter()
            .map(|row| (row.value.id(), row.value))
            .collect();

        Ok(rows
            .into_iter()
            .map(|row| {
                let category = categories.get(&row.value.category_id).cloned();
                Product::resolve(row.value, category)
            })
            .collect())
    }

    pub async fn get(&self, id: ProductId) -> Result<Product, CatalogError> {
        let row = self
            .store
            .find_product(id)
            .await?
            .ok_or(CatalogError::NotFound)?;
        let category = self.resolve_category(Some(row.value.category_id)).await?;
        Ok(Product::resolve(row.value, category.map(|c| c.value)))
    }

    pub async fn create(
        &self,
        category_id: Option<CategoryId>,
        name: Option<&str>,
        price: Option<Decimal>,
    ) -> Result<Product, CatalogError> {
        let (name, price) = validate(name, price).map_err(CatalogError::invalid)?;

        let category = self
            .resolve_category(category_id)
            .await?
            .ok_or_else(|| category_not_found(None))?;

        let row = self
            .store
            .insert_product(NewProduct {
                name,
                price,
                category_id: category.value.id(),
            })
            .await?;

        tracing::info!(
            product_id = %row.value.id,
            category_id = %category.value.id(),
            "product created"
        );
        Ok(Product::resolve(row.value, Some(category.value)))
    }

    /// Whole-entity replacement of name, price and category.
    pub async fn update(
        &self,
        id: ProductId,
        category_id: Option<CategoryId>,
        name: Option<&str>,
        price: Option<Decimal>,
    ) -> Result<Product, CatalogError> {
        // Both lookups run before any validation short-circuit.
        let existing = self.store.find_product(id).await?;
        let requested = self.resolve_category(category_id).await?;

        let mut row = existing.ok_or(CatalogError::NotFound)?;
        let current_category_id = row.value.category_id;

        let (name, price) = match validate(name, price) {
            Ok(v) => v,
            Err(errors) => {
                let reselect = requested
                    .as_ref()
                    .map(|c| c.value.id())
                    .unwrap_or(current_category_id);
                return Err(CatalogError::Validation {
                    errors,
                    selected_category_id: Some(reselect),
                });
            }
        };

        let category = requested.ok_or_else(|| category_not_found(Some(current_category_id)))?;

        let changed = row.value.apply(ProductChanges {
            name,
            price,
            category_id: category.value.id(),
        });

        match self.store.update_product(row).await {
            Ok(saved) => {
                tracing::info!(
                    product_id = %id,
                    revision = saved.revision,
                    changed = ?changed,
                    "product updated"
                );
                Ok(Product::resolve(saved.value, Some(category.value)))
            }
            Err(StoreError::Conflict(msg)) => {
                let still_exists = self.store.product_exists(id).await?;
                Err(settle_conflict(msg, still_exists))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        let row = self
            .store
            .find_product(id)
            .await?
            .ok_or(CatalogError::NotFound)?;

        self.store.remove_product(row.value.id).await?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    async fn resolve_category(
        &self,
        id: Option<CategoryId>,
    ) -> Result<Option<Stored<Category>>, CatalogError> {
        match id {
            Some(id) => Ok(self.store.find_category(id).await?),
            None => Ok(None),
        }
    }
}

fn validate(
    name: Option<&str>,
    price: Option<Decimal>,
) -> Result<(ProductName, Price), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let name = errors.collect(ProductName::parse(name));
    let price = errors.collect(Price::parse(price));

    match (name, price) {
        (Some(name), Some(price)) => Ok((name, price)),
        _ => Err(errors),
    }
}

fn category_not_found(reselect: Option<CategoryId>) -> CatalogError {
    CatalogError::ReferenceNotFound {
        error: FieldError::new(Field::SelectedCategoryId, CATEGORY_NOT_FOUND),
        selected_category_id: reselect,
    }
}
