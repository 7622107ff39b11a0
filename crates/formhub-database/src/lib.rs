//! # formhub-database
//!
//! Document persistence for FormHub: an in-memory store and a PostgreSQL
//! JSONB store behind the [`DocumentStore`] trait, the tenant isolation
//! guard every tenant-scoped read and write passes through, and typed
//! repositories on top of it.

pub mod connection;
pub mod isolation;
pub mod migration;
pub mod repositories;
pub mod store;

use std::sync::Arc;

use tracing::info;

use formhub_core::config::{DatabaseConfig, StoreProvider};
use formhub_core::result::AppResult;
use formhub_core::traits::DocumentStore;

pub use connection::DatabasePool;
pub use isolation::{TenantContext, TenantIsolationGuard};
pub use store::{MemoryDocumentStore, PgDocumentStore};

/// Build the configured document store, running migrations when asked to.
pub async fn connect_store(config: &DatabaseConfig) -> AppResult<Arc<dyn DocumentStore>> {
    match config.provider {
        StoreProvider::Memory => {
            info!("Using in-memory document store");
            Ok(Arc::new(MemoryDocumentStore::new()))
        }
        StoreProvider::Postgres => {
            let pool = DatabasePool::connect(config).await?;
            if config.run_migrations {
                migration::run_migrations(pool.pool()).await?;
            }
            Ok(Arc::new(PgDocumentStore::new(pool.into_pool())))
        }
    }
}
