//! Infrastructure layer: persistence gateway, managers, configuration.

pub mod config;
pub mod managers;
pub mod store;


pub use config::{AppConfig, ConfigError};
pub use managers::{CatalogError, CategoryManager, ProductManager};
pub use store::{CatalogStore, InMemoryCatalogStore, SqliteCatalogStore, StoreError, Stored};
