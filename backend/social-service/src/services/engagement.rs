use super::{page_request, require_account};
use crate::domain::{
    timestamp_now, Comment, CommentSummary, EntityKind, LikeState, Page, ShareState,
};
use crate::metrics;
use crate::repository::SocialStore;
use error_types::{validate_char_length, SocialError, SocialResult};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

pub const MAX_COMMENT_CHARS: usize = 1000;

/// Likes, comments and shares on songs, albums and playlists
#[derive(Clone)]
pub struct EngagementService {
    store: Arc<dyn SocialStore>,
}

impl EngagementService {
    pub fn new(store: Arc<dyn SocialStore>) -> Self {
        Self { store }
    }

    /// Flip `actor_id`'s like. Membership and counter change in one record
    /// update, so concurrent toggles by the same actor settle by parity.
    #[instrument(skip(self))]
    pub async fn toggle_like(
        &self,
        kind: EntityKind,
        entity_id: Uuid,
        actor_id: Uuid,
    ) -> SocialResult<LikeState> {
        require_account(self.store.as_ref(), actor_id).await?;

        let state = self
            .store
            .toggle_like(kind, entity_id, actor_id)
            .await?
            .ok_or_else(|| SocialError::not_found(kind.as_str(), entity_id))?;

        debug!(
            entity = %entity_id,
            actor = %actor_id,
            liked = state.liked,
            likes_count = state.likes_count,
            "Like toggled"
        );
        Ok(state)
    }

    /// Append a comment; its timestamp never precedes the entity's previous one
    #[instrument(skip(self, body))]
    pub async fn add_comment(
        &self,
        kind: EntityKind,
        entity_id: Uuid,
        author_id: Uuid,
        body: &str,
    ) -> SocialResult<CommentSummary> {
        validate_char_length("body", body, 1, MAX_COMMENT_CHARS)?;
        require_account(self.store.as_ref(), author_id).await?;
        if self.store.get_content(kind, entity_id).await?.is_none() {
            return Err(SocialError::not_found(kind.as_str(), entity_id));
        }

        let comment = self
            .store
            .insert_comment(Comment {
                id: Uuid::new_v4(),
                entity_kind: kind,
                entity_id,
                author_id,
                body: body.to_string(),
                created_at: timestamp_now(),
            })
            .await?;

        if self
            .store
            .adjust_comments_count(kind, entity_id, 1)
            .await?
            .is_none()
        {
            warn!(entity = %entity_id, comment = %comment.id, "Entity removed while commenting");
        }

        info!(entity = %entity_id, comment = %comment.id, author = %author_id, "Comment added");
        Ok(comment.into())
    }

    /// Only the author may remove a comment. A comment removed concurrently
    /// after the permission check is a no-op.
    #[instrument(skip(self))]
    pub async fn remove_comment(&self, comment_id: Uuid, requester_id: Uuid) -> SocialResult<()> {
        let comment = self
            .store
            .get_comment(comment_id)
            .await?
            .ok_or_else(|| SocialError::not_found("comment", comment_id))?;

        if comment.author_id != requester_id {
            return Err(SocialError::forbidden("remove comment"));
        }

        let Some(removed) = self.store.delete_comment(comment_id).await? else {
            debug!(comment = %comment_id, "Comment already removed");
            metrics::record_conflict_ignored("remove_comment");
            return Ok(());
        };

        self.store
            .adjust_comments_count(removed.entity_kind, removed.entity_id, -1)
            .await?;

        info!(comment = %comment_id, entity = %removed.entity_id, "Comment removed");
        Ok(())
    }

    /// Comments on an entity, oldest first
    #[instrument(skip(self))]
    pub async fn list_comments(
        &self,
        kind: EntityKind,
        entity_id: Uuid,
        page: u32,
        limit: u32,
    ) -> SocialResult<Page<CommentSummary>> {
        let request = page_request(page, limit)?;
        if self.store.get_content(kind, entity_id).await?.is_none() {
            return Err(SocialError::not_found(kind.as_str(), entity_id));
        }

        let comments = self
            .store
            .list_comments(kind, entity_id, request.offset(), request.limit as usize + 1)
            .await?;
        Ok(Page::from_overfetch(comments, request).map(CommentSummary::from))
    }

    /// Shares are not deduplicated per account
    #[instrument(skip(self))]
    pub async fn share_content(&self, kind: EntityKind, entity_id: Uuid) -> SocialResult<ShareState> {
        let shares_count = self
            .store
            .increment_shares(kind, entity_id)
            .await?
            .ok_or_else(|| SocialError::not_found(kind.as_str(), entity_id))?;
        Ok(ShareState { shares_count })
    }
}
