mod memory_store;
mod postgres_store;
mod r#trait;

pub use memory_store::MemoryStore;
pub use postgres_store::{create_pool, PgSocialStore};
pub use r#trait::{ContentCounters, ContentQuery, GraphCounters, SocialStore};

use crate::config::{Config, StoreBackend};
use error_types::SocialResult;
use std::sync::Arc;
use tracing::info;

/// Build the store selected by `STORE_BACKEND`; PostgreSQL stores are migrated
/// before they are handed out.
pub async fn connect(config: &Config) -> SocialResult<Arc<dyn SocialStore>> {
    match config.store.backend {
        StoreBackend::Memory => {
            info!("Using in-memory social store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let pool = create_pool(&config.database).await?;
            let store = PgSocialStore::new(pool);
            store.migrate().await?;
            Ok(Arc::new(store))
        }
    }
}
