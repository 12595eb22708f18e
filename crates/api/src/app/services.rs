//! Storage backend wiring.

use std::sync::Arc;

use shop_infra::{
    CatalogStore, InMemoryCatalogStore, PostgresCatalogStore, StorageConfig, StoreResult,
};

/// Shared handle to the catalog store, injected into every handler.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn CatalogStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// In-memory store (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCatalogStore::new()))
    }

    pub async fn from_config(storage: &StorageConfig) -> StoreResult<Self> {
        match storage {
            StorageConfig::InMemory => {
                tracing::info!("using in-memory catalog store");
                Ok(Self::in_memory())
            }
            StorageConfig::Postgres {
                database_url,
                max_connections,
            } => {
                tracing::info!(max_connections, "using postgres catalog store");
                let store = PostgresCatalogStore::connect(database_url, *max_connections).await?;
                Ok(Self::new(Arc::new(store)))
            }
        }
    }

    pub fn store(&self) -> &dyn CatalogStore {
        self.store.as_ref()
    }
}
