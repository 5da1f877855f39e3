use crate::domain::{
    Account, Comment, ContentEntity, EntityKind, FollowEdge, LikeState, MembershipSide, SetOp,
};
use chrono::{DateTime, Utc};
use error_types::SocialResult;
use uuid::Uuid;

/// Account counters as stored, before or after a reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphCounters {
    pub followers_count: i64,
    pub following_count: i64,
}

/// Content counters as stored, before or after a reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentCounters {
    pub likes_count: i64,
    pub comments_count: i64,
}

/// Recent-content query backing one feed source.
///
/// Results are ordered by `(created_at, id)` descending, restricted to
/// `owners`, filtered by visibility for `viewer`, and strictly older than
/// `before` when set.
#[derive(Debug, Clone)]
pub struct ContentQuery {
    pub kind: EntityKind,
    pub owners: Vec<Uuid>,
    pub viewer: Option<Uuid>,
    pub before: Option<(DateTime<Utc>, Uuid)>,
    pub limit: usize,
}

/// Storage contract for the social graph.
///
/// The only atomicity an implementation must provide is a conditional update
/// of a single record. Every method below touches exactly one record (or one
/// unique key) per call; operations spanning several records are composed by
/// the services and healed by reconciliation when they drift.
#[async_trait::async_trait]
pub trait SocialStore: Send + Sync {
    // ========= Accounts =========

    async fn insert_account(&self, account: Account) -> SocialResult<()>;

    async fn get_account(&self, id: Uuid) -> SocialResult<Option<Account>>;

    /// Batch lookup; missing ids are silently absent from the result
    async fn get_accounts(&self, ids: &[Uuid]) -> SocialResult<Vec<Account>>;

    /// Add or remove `other` in one embedded set of `account_id`. The matching
    /// counter moves by exactly the set delta inside the same record update.
    ///
    /// Returns `None` when the account does not exist, otherwise whether the
    /// set changed.
    async fn update_membership(
        &self,
        account_id: Uuid,
        side: MembershipSide,
        other: Uuid,
        op: SetOp,
    ) -> SocialResult<Option<bool>>;

    /// Overwrite both embedded sets and derive both counters from them.
    /// Returns the counters that were stored before the overwrite.
    async fn overwrite_graph_cache(
        &self,
        account_id: Uuid,
        follower_ids: &[Uuid],
        following_ids: &[Uuid],
    ) -> SocialResult<Option<GraphCounters>>;

    /// Ascending id order, for batched sweeps
    async fn list_account_ids(&self, after: Option<Uuid>, limit: usize) -> SocialResult<Vec<Uuid>>;

    // ========= Follow edges =========

    /// Insert-if-absent on (follower, followee); true if a new edge was written
    async fn insert_edge(&self, edge: &FollowEdge) -> SocialResult<bool>;

    /// Delete-if-present; true if an edge was removed
    async fn delete_edge(&self, follower_id: Uuid, followee_id: Uuid) -> SocialResult<bool>;

    /// Delete-if-present else insert, as one conditional mutation on the edge key.
    /// Returns true when the edge exists afterwards.
    async fn toggle_edge(&self, edge: &FollowEdge) -> SocialResult<bool>;

    async fn edge_exists(&self, follower_id: Uuid, followee_id: Uuid) -> SocialResult<bool>;

    /// Edges pointing at `followee_id`, newest first
    async fn followers_of(
        &self,
        followee_id: Uuid,
        offset: usize,
        limit: usize,
    ) -> SocialResult<Vec<FollowEdge>>;

    /// Edges leaving `follower_id`, newest first
    async fn following_of(
        &self,
        follower_id: Uuid,
        offset: usize,
        limit: usize,
    ) -> SocialResult<Vec<FollowEdge>>;

    async fn all_follower_ids(&self, followee_id: Uuid) -> SocialResult<Vec<Uuid>>;

    async fn all_following_ids(&self, follower_id: Uuid) -> SocialResult<Vec<Uuid>>;

    // ========= Content =========

    async fn insert_content(&self, entity: ContentEntity) -> SocialResult<()>;

    async fn get_content(&self, kind: EntityKind, id: Uuid) -> SocialResult<Option<ContentEntity>>;

    /// Lookup by id regardless of kind
    async fn find_content(&self, id: Uuid) -> SocialResult<Option<ContentEntity>>;

    async fn get_contents(&self, ids: &[Uuid]) -> SocialResult<Vec<ContentEntity>>;

    async fn delete_content(&self, kind: EntityKind, id: Uuid) -> SocialResult<bool>;

    async fn set_visibility(&self, kind: EntityKind, id: Uuid, is_public: bool)
        -> SocialResult<bool>;

    /// Remove `actor_id` from `liked_by` if present, else add it; `likes_count`
    /// moves by the same delta. `None` when the entity does not exist.
    async fn toggle_like(
        &self,
        kind: EntityKind,
        id: Uuid,
        actor_id: Uuid,
    ) -> SocialResult<Option<LikeState>>;

    /// Counter never drops below zero
    async fn adjust_comments_count(
        &self,
        kind: EntityKind,
        id: Uuid,
        delta: i64,
    ) -> SocialResult<Option<i64>>;

    async fn increment_shares(&self, kind: EntityKind, id: Uuid) -> SocialResult<Option<i64>>;

    /// Set `likes_count = |liked_by|` from the record's own set and overwrite
    /// `comments_count`. Returns (before, after).
    async fn reconcile_content_counters(
        &self,
        kind: EntityKind,
        id: Uuid,
        comments_count: i64,
    ) -> SocialResult<Option<(ContentCounters, ContentCounters)>>;

    async fn recent_content(&self, query: &ContentQuery) -> SocialResult<Vec<ContentEntity>>;

    /// Ascending id order, for batched sweeps
    async fn list_content_ids(
        &self,
        after: Option<Uuid>,
        limit: usize,
    ) -> SocialResult<Vec<(EntityKind, Uuid)>>;

    // ========= Comments =========

    /// Append a comment. The stored `created_at` is clamped so it is never
    /// earlier than the previous comment on the same entity.
    async fn insert_comment(&self, comment: Comment) -> SocialResult<Comment>;

    async fn get_comment(&self, id: Uuid) -> SocialResult<Option<Comment>>;

    /// Returns the removed comment, `None` if it was already gone
    async fn delete_comment(&self, id: Uuid) -> SocialResult<Option<Comment>>;

    /// Oldest first
    async fn list_comments(
        &self,
        kind: EntityKind,
        entity_id: Uuid,
        offset: usize,
        limit: usize,
    ) -> SocialResult<Vec<Comment>>;

    async fn count_comments(&self, kind: EntityKind, entity_id: Uuid) -> SocialResult<i64>;

    async fn delete_comments_for(&self, kind: EntityKind, entity_id: Uuid) -> SocialResult<u64>;

    /// Health check (optional)
    async fn health_check(&self) -> SocialResult<()> {
        Ok(())
    }
}
