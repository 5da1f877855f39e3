use super::merge::merge_desc;
use super::sources::{ActivitySource, ContentActivitySource};
use crate::config::FeedConfig;
use crate::cursor::{FeedCursor, FeedPosition};
use crate::models::{ActivityEvent, FeedItem};
use error_types::{sanitize_limit, SocialError, SocialResult};
use futures::future::try_join_all;
use social_service::domain::Page;
use social_service::repository::SocialStore;
use social_service::services::FollowService;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Builds activity feeds by merging per-source streams on read.
///
/// Each source is asked for a bounded window (one page plus one item, or
/// enough to reach a legacy offset page), never the whole history.
#[derive(Clone)]
pub struct FeedAssembler {
    store: Arc<dyn SocialStore>,
    follows: FollowService,
    sources: Vec<Arc<dyn ActivitySource>>,
    config: FeedConfig,
}

impl FeedAssembler {
    /// Song uploads, playlist creations and album releases
    pub fn new(store: Arc<dyn SocialStore>, config: FeedConfig) -> Self {
        let sources = ContentActivitySource::all(store.clone());
        Self::with_sources(store, sources, config)
    }

    pub fn with_sources(
        store: Arc<dyn SocialStore>,
        sources: Vec<Arc<dyn ActivitySource>>,
        config: FeedConfig,
    ) -> Self {
        Self {
            follows: FollowService::new(store.clone()),
            store,
            sources,
            config,
        }
    }

    /// Activity of accounts `viewer_id` follows. Following nobody yields an
    /// empty page.
    #[instrument(skip(self))]
    pub async fn get_feed(
        &self,
        viewer_id: Uuid,
        position: FeedPosition,
        limit: u32,
    ) -> SocialResult<Page<FeedItem>> {
        let limit = self.limit(limit);
        let following = self.follows.following_ids(viewer_id).await?;

        if following.is_empty() {
            debug!(viewer = %viewer_id, "Viewer follows nobody");
            return Ok(Page::empty(position.page_number(), limit));
        }

        self.assemble(&following, Some(viewer_id), position, limit)
            .await
    }

    /// Activity of a single profile, as seen by `viewer_id`
    #[instrument(skip(self))]
    pub async fn get_user_activity(
        &self,
        profile_id: Uuid,
        viewer_id: Option<Uuid>,
        position: FeedPosition,
        limit: u32,
    ) -> SocialResult<Page<FeedItem>> {
        let limit = self.limit(limit);
        if self.store.get_account(profile_id).await?.is_none() {
            return Err(SocialError::not_found("account", profile_id));
        }

        self.assemble(&[profile_id], viewer_id, position, limit)
            .await
    }

    fn limit(&self, limit: u32) -> u32 {
        sanitize_limit(limit, self.config.max_limit, self.config.default_limit)
    }

    async fn assemble(
        &self,
        authors: &[Uuid],
        viewer: Option<Uuid>,
        position: FeedPosition,
        limit: u32,
    ) -> SocialResult<Page<FeedItem>> {
        let page_size = limit as usize;
        let fetch = position.fetch_size(page_size);
        let before = position.before();

        // A failing source fails the whole page
        let streams = try_join_all(
            self.sources
                .iter()
                .map(|source| source.recent(authors, viewer, before, fetch)),
        )
        .await
        .map_err(|e| {
            warn!(error = %e, "Activity source failed");
            e
        })?;

        let mut window: Vec<ActivityEvent> = merge_desc(streams, fetch)
            .into_iter()
            .skip(position.skip(page_size))
            .collect();
        let has_more = window.len() > page_size;
        window.truncate(page_size);

        let next_cursor = if has_more {
            window
                .last()
                .map(|event| FeedCursor::new(event.occurred_at, event.entity_id).encode())
        } else {
            None
        };

        let items = self.resolve(window, viewer).await?;
        Ok(Page {
            items,
            page: position.page_number(),
            limit,
            has_more,
            next_cursor,
        })
    }

    /// Attach titles and usernames. Events whose entity or actor has gone, or
    /// whose entity is no longer visible, are dropped.
    async fn resolve(
        &self,
        events: Vec<ActivityEvent>,
        viewer: Option<Uuid>,
    ) -> SocialResult<Vec<FeedItem>> {
        if events.is_empty() {
            return Ok(Vec::new());
        }

        let entity_ids: Vec<Uuid> = events.iter().map(|e| e.entity_id).collect();
        let actor_ids: Vec<Uuid> = events
            .iter()
            .map(|e| e.actor_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let (entities, actors) = tokio::try_join!(
            self.store.get_contents(&entity_ids),
            self.store.get_accounts(&actor_ids)
        )?;
        let entities: HashMap<Uuid, _> = entities.into_iter().map(|e| (e.id, e)).collect();
        let usernames: HashMap<Uuid, String> =
            actors.into_iter().map(|a| (a.id, a.username)).collect();

        Ok(events
            .into_iter()
            .filter_map(|event| {
                let Some(entity) = entities.get(&event.entity_id) else {
                    debug!(entity = %event.entity_id, "Skipping event for missing entity");
                    return None;
                };
                if !entity.visible_to(viewer) {
                    debug!(entity = %event.entity_id, "Skipping event for hidden entity");
                    return None;
                }
                let Some(actor_username) = usernames.get(&event.actor_id) else {
                    debug!(actor = %event.actor_id, "Skipping event for missing actor");
                    return None;
                };
                Some(FeedItem {
                    title: entity.title.clone(),
                    actor_username: actor_username.clone(),
                    event,
                })
            })
            .collect())
    }
}
