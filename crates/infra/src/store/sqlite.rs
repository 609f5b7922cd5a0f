//! SQLite-backed catalog gateway.
//!
//! Prices are stored as integer cents. `products.category_id` deliberately has
//! no foreign-key constraint: deleting a category leaves its products in place
//! with a dangling reference.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use catalog_categories::{Category, CategoryName, NewCategory};
use catalog_core::{CategoryId, Entity, ProductId};
use catalog_products::{NewProduct, Price, ProductName, ProductRecord};

use super::{CatalogStore, StoreError, Stored};

#[derive(Debug, Clone)]
pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    /// Open a pool for `url` and create the schema if needed.
    ///
    /// In-memory databases live and die with a single connection, so the pool
    /// is pinned to one connection that is never recycled.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool_options = if is_in_memory(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;
        let store = Self::from_pool(pool);
        store.migrate().await?;
        tracing::info!(url, "sqlite catalog store ready");
        Ok(store)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                id       INTEGER PRIMARY KEY AUTOINCREMENT,
                name     TEXT    NOT NULL,
                revision INTEGER NOT NULL DEFAULT 1
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT    NOT NULL,
                price_cents INTEGER NOT NULL CHECK (price_cents BETWEEN 0 AND 100000000),
                category_id INTEGER NOT NULL,
                revision    INTEGER NOT NULL DEFAULT 1
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// `sqlite::memory:` style paths and `?mode=memory` URLs both open a database
/// private to its connection.
fn is_in_memory(url: &str) -> bool {
    if url.contains(":memory:") {
        return true;
    }
    url.split_once('?').is_some_and(|(_, query)| {
        query
            .split('&')
            .any(|pair| pair.eq_ignore_ascii_case("mode=memory"))
    })
}

fn corrupt(what: &str, err: impl core::fmt::Display) -> StoreError {
    StoreError::Corrupt(format!("{what}: {err}"))
}

fn category_from_row(row: &SqliteRow) -> Result<Stored<Category>, StoreError> {
    let id = CategoryId::new(row.try_get("id")?).map_err(|e| corrupt("categories.id", e))?;
    let name: String = row.try_get("name")?;
    let name =
        CategoryName::parse(Some(&name)).map_err(|e| corrupt("categories.name", e))?;
    Ok(Stored::new(Category::new(id, name), row.try_get("revision")?))
}

fn product_from_row(row: &SqliteRow) -> Result<Stored<ProductRecord>, StoreError> {
    let id = ProductId::new(row.try_get("id")?).map_err(|e| corrupt("products.id", e))?;
    let name: String = row.try_get("name")?;
    let name = ProductName::parse(Some(&name)).map_err(|e| corrupt("products.name", e))?;
    let price =
        Price::from_cents(row.try_get("price_cents")?).map_err(|e| corrupt("products.price", e))?;
    let category_id = CategoryId::new(row.try_get("category_id")?)
        .map_err(|e| corrupt("products.category_id", e))?;

    Ok(Stored::new(
        ProductRecord {
            id,
            name,
            price,
            category_id,
        },
        row.try_get("revision")?,
    ))
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn find_category(&self, id: CategoryId) -> Result<Option<Stored<Category>>, StoreError> {
        sqlx::query("SELECT id, name, revision FROM categories WHERE id = ?1")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?
            .as_ref()
            .map(category_from_row)
            .transpose()
    }

    async fn list_categories(&self) -> Result<Vec<Stored<Category>>, StoreError> {
        sqlx::query("SELECT id, name, revision FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(category_from_row)
            .collect()
    }

    async fn insert_category(&self, new: NewCategory) -> Result<Stored<Category>, StoreError> {
        let result = sqlx::query("INSERT INTO categories (name, revision) VALUES (?1, 1)")
            .bind(new.name.as_str())
            .execute(&self.pool)
            .await?;

        let id = CategoryId::new(result.last_insert_rowid())
            .map_err(|e| corrupt("categories.id", e))?;
        Ok(Stored::new(Category::new(id, new.name), 1))
    }

    async fn update_category(&self, row: Stored<Category>) -> Result<Stored<Category>, StoreError> {
        let id = row.value.id();
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = ?1, revision = revision + 1
            WHERE id = ?2 AND revision = ?3
            "#,
        )
        .bind(row.value.name().as_str())
        .bind(id.get())
        .bind(row.revision)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!(
                "category {id} was modified or deleted since it was read"
            )));
        }
        Ok(Stored::new(row.value, row.revision + 1))
    }

    async fn remove_category(&self, id: CategoryId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn category_exists(&self, id: CategoryId) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1) AS found")
            .bind(id.get())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get::<i64, _>("found")? != 0)
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<Stored<ProductRecord>>, StoreError> {
        sqlx::query(
            "SELECT id, name, price_cents, category_id, revision FROM products WHERE id = ?1",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?
        .as_ref()
        .map(product_from_row)
        .transpose()
    }

    async fn list_products(&self) -> Result<Vec<Stored<ProductRecord>>, StoreError> {
        sqlx::query(
            "SELECT id, name, price_cents, category_id, revision FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(product_from_row)
        .collect()
    }

    async fn insert_product(&self, new: NewProduct) -> Result<Stored<ProductRecord>, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO products (name, price_cents, category_id, revision)
            VALUES (?1, ?2, ?3, 1)
            "#,
        )
        .bind(new.name.as_str())
        .bind(new.price.cents())
        .bind(new.category_id.get())
        .execute(&self.pool)
        .await?;

        let id = ProductId::new(result.last_insert_rowid())
            .map_err(|e| corrupt("products.id", e))?;
        Ok(Stored::new(ProductRecord::from_new(id, new), 1))
    }

    async fn update_product(
        &self,
        row: Stored<ProductRecord>,
    ) -> Result<Stored<ProductRecord>, StoreError> {
        let id = row.value.id;
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?1, price_cents = ?2, category_id = ?3, revision = revision + 1
            WHERE id = ?4 AND revision = ?5
            "#,
        )
        .bind(row.value.name.as_str())
        .bind(row.value.price.cents())
        .bind(row.value.category_id.get())
        .bind(id.get())
        .bind(row.revision)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!(
                "product {id} was modified or deleted since it was read"
            )));
        }
        Ok(Stored::new(row.value, row.revision + 1))
    }

    async fn remove_product(&self, id: ProductId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn product_exists(&self, id: ProductId) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM products WHERE id = ?1) AS found")
            .bind(id.get())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get::<i64, _>("found")? != 0)
    }
}
