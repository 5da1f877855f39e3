//! Cadence social graph and activity feed engine
//!
//! Wires the social services and the feed assembler over one shared
//! [`SocialStore`].

use error_types::SocialResult;
use feed_service::{FeedAssembler, FeedConfig};
use social_service::repository::{self, MemoryStore, SocialStore};
use social_service::services::{ContentService, CounterService, EngagementService, FollowService};
use social_service::Config;
use std::sync::Arc;
use tracing::info;

pub use error_types::SocialError;

/// Every service of the engine, sharing one store
#[derive(Clone)]
pub struct Engine {
    pub store: Arc<dyn SocialStore>,
    pub follows: FollowService,
    pub engagement: EngagementService,
    pub content: ContentService,
    pub counters: CounterService,
    pub feed: FeedAssembler,
}

impl Engine {
    pub fn from_store(store: Arc<dyn SocialStore>, feed_config: FeedConfig) -> Self {
        Self {
            follows: FollowService::new(store.clone()),
            engagement: EngagementService::new(store.clone()),
            content: ContentService::new(store.clone()),
            counters: CounterService::new(store.clone()),
            feed: FeedAssembler::new(store.clone(), feed_config),
            store,
        }
    }

    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::new()), FeedConfig::default())
    }

    /// Store backend from `config`, feed limits from the environment
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store = repository::connect(config).await?;
        let feed_config = FeedConfig::from_env()?;
        info!(backend = ?config.store.backend, "Engine ready");
        Ok(Self::from_store(store, feed_config))
    }

    pub async fn health_check(&self) -> SocialResult<()> {
        self.store.health_check().await
    }
}
