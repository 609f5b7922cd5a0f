use std::sync::Arc;

use anyhow::Context;

use catalog_infra::{
    AppConfig, CatalogStore, CategoryManager, InMemoryCatalogStore, ProductManager,
    SqliteCatalogStore,
};

pub type SharedStore = Arc<dyn CatalogStore>;

/// Shared handles injected into every handler; managers are built per request.
#[derive(Clone)]
pub struct AppServices {
    store: SharedStore,
}

impl AppServices {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCatalogStore::new()))
    }

    pub fn categories(&self) -> CategoryManager<SharedStore> {
        CategoryManager::new(self.store.clone())
    }

    pub fn products(&self) -> ProductManager<SharedStore> {
        ProductManager::new(self.store.clone())
    }
}

/// Pick the persistence gateway from configuration.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match config.database_url.as_deref() {
        Some(url) => {
            let store = SqliteCatalogStore::connect(url, config.max_connections)
                .await
                .with_context(|| format!("failed to open catalog database at {url}"))?;
            Ok(AppServices::new(Arc::new(store)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory catalog store (data is lost on exit)");
            Ok(AppServices::in_memory())
        }
    }
}
