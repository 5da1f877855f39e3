use crate::cursor::FeedCursor;
use crate::models::{ActivityEvent, ActivityKind};
use error_types::SocialResult;
use social_service::repository::{ContentQuery, SocialStore};
use std::sync::Arc;
use uuid::Uuid;

/// One kind of activity a feed is assembled from
#[async_trait::async_trait]
pub trait ActivitySource: Send + Sync {
    fn kind(&self) -> ActivityKind;

    /// Up to `limit` of the most recent events by `authors`, visible to
    /// `viewer`, strictly older than `before` when set. Sorted by
    /// `(occurred_at, entity_id)` descending.
    async fn recent(
        &self,
        authors: &[Uuid],
        viewer: Option<Uuid>,
        before: Option<FeedCursor>,
        limit: usize,
    ) -> SocialResult<Vec<ActivityEvent>>;
}

/// Activity derived from content records: an entity's creation is the event
pub struct ContentActivitySource {
    store: Arc<dyn SocialStore>,
    kind: ActivityKind,
}

impl ContentActivitySource {
    pub fn new(store: Arc<dyn SocialStore>, kind: ActivityKind) -> Self {
        Self { store, kind }
    }

    /// One source per activity kind
    pub fn all(store: Arc<dyn SocialStore>) -> Vec<Arc<dyn ActivitySource>> {
        ActivityKind::ALL
            .into_iter()
            .map(|kind| Arc::new(Self::new(store.clone(), kind)) as Arc<dyn ActivitySource>)
            .collect()
    }
}

#[async_trait::async_trait]
impl ActivitySource for ContentActivitySource {
    fn kind(&self) -> ActivityKind {
        self.kind
    }

    async fn recent(
        &self,
        authors: &[Uuid],
        viewer: Option<Uuid>,
        before: Option<FeedCursor>,
        limit: usize,
    ) -> SocialResult<Vec<ActivityEvent>> {
        if authors.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let query = ContentQuery {
            kind: self.kind.entity_kind(),
            owners: authors.to_vec(),
            viewer,
            before: before.map(|cursor| cursor.key()),
            limit,
        };

        let rows = self.store.recent_content(&query).await?;
        Ok(rows
            .into_iter()
            .map(|entity| ActivityEvent {
                kind: self.kind,
                entity_id: entity.id,
                actor_id: entity.owner_id,
                occurred_at: entity.created_at,
            })
            .collect())
    }
}
