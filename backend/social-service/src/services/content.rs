use super::require_account;
use crate::domain::{AccountRole, ContentEntity, EntityKind};
use crate::metrics;
use crate::repository::SocialStore;
use error_types::{validate_char_length, SocialError, SocialResult};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

pub const MAX_TITLE_CHARS: usize = 200;

/// Publishing and lifecycle of songs, albums and playlists
#[derive(Clone)]
pub struct ContentService {
    store: Arc<dyn SocialStore>,
}

impl ContentService {
    pub fn new(store: Arc<dyn SocialStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn publish(
        &self,
        kind: EntityKind,
        owner_id: Uuid,
        title: &str,
        is_public: bool,
    ) -> SocialResult<ContentEntity> {
        let title = title.trim();
        validate_char_length("title", title, 1, MAX_TITLE_CHARS)?;
        require_account(self.store.as_ref(), owner_id).await?;

        let entity = ContentEntity::new(kind, owner_id, title, is_public);
        self.store.insert_content(entity.clone()).await?;

        info!(kind = %kind, entity = %entity.id, owner = %owner_id, "Content published");
        Ok(entity)
    }

    /// Owner only
    #[instrument(skip(self))]
    pub async fn set_visibility(
        &self,
        kind: EntityKind,
        entity_id: Uuid,
        requester_id: Uuid,
        is_public: bool,
    ) -> SocialResult<()> {
        let entity = self.load(kind, entity_id).await?;
        if entity.owner_id != requester_id {
            return Err(SocialError::forbidden(format!("change visibility of {}", kind)));
        }

        if !self.store.set_visibility(kind, entity_id, is_public).await? {
            return Err(SocialError::not_found(kind.as_str(), entity_id));
        }
        info!(kind = %kind, entity = %entity_id, is_public, "Visibility changed");
        Ok(())
    }

    /// Owner or admin. Comments go first so a retry after a partial failure
    /// still finds the entity.
    #[instrument(skip(self))]
    pub async fn delete(
        &self,
        kind: EntityKind,
        entity_id: Uuid,
        requester_id: Uuid,
    ) -> SocialResult<()> {
        let entity = self.load(kind, entity_id).await?;
        if entity.owner_id != requester_id {
            let requester = require_account(self.store.as_ref(), requester_id).await?;
            if requester.role != AccountRole::Admin {
                return Err(SocialError::forbidden(format!("delete {}", kind)));
            }
        }

        let removed_comments = self.store.delete_comments_for(kind, entity_id).await?;
        if !self.store.delete_content(kind, entity_id).await? {
            debug!(kind = %kind, entity = %entity_id, "Content already deleted");
            metrics::record_conflict_ignored("delete_content");
        }

        info!(
            kind = %kind,
            entity = %entity_id,
            removed_comments,
            "Content deleted"
        );
        Ok(())
    }

    pub async fn get(&self, kind: EntityKind, entity_id: Uuid) -> SocialResult<ContentEntity> {
        self.load(kind, entity_id).await
    }

    async fn load(&self, kind: EntityKind, entity_id: Uuid) -> SocialResult<ContentEntity> {
        self.store
            .get_content(kind, entity_id)
            .await?
            .ok_or_else(|| SocialError::not_found(kind.as_str(), entity_id))
    }
}
