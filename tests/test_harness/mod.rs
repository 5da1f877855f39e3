//! Test Harness Module
//!
//! Provides fixtures for the cross-service integration tests:
//! - In-memory engine with seeded accounts and content
//! - Fault-injecting store wrapper for partial-failure scenarios

#![allow(dead_code)]

use cadence::Engine;
use chrono::{DateTime, Duration, TimeZone, Utc};
use error_types::{SocialError, SocialResult};
use feed_service::FeedConfig;
use social_service::domain::{
    Account, AccountRole, Comment, ContentEntity, EntityKind, FollowEdge, LikeState,
    MembershipSide, SetOp,
};
use social_service::repository::{
    ContentCounters, ContentQuery, GraphCounters, MemoryStore, SocialStore,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Fixed base instant so feed ordering is deterministic
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(secs)
}

/// Engine over a [`FaultyStore`], with direct handles on both layers
pub struct TestEnvironment {
    pub engine: Engine,
    pub faults: Arc<FaultyStore>,
    pub memory: Arc<MemoryStore>,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let memory = Arc::new(MemoryStore::new());
        let faults = Arc::new(FaultyStore::new(memory.clone()));
        let engine = Engine::from_store(faults.clone(), FeedConfig::default());
        Self {
            engine,
            faults,
            memory,
        }
    }

    pub async fn account(&self, username: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.memory
            .insert_account(Account::new(id, username, AccountRole::Artist))
            .await
            .expect("Failed to insert account");
        id
    }

    /// Content with a controlled creation time
    pub async fn content_at(
        &self,
        kind: EntityKind,
        owner: Uuid,
        title: &str,
        secs: i64,
    ) -> Uuid {
        let mut entity = ContentEntity::new(kind, owner, title, true);
        entity.created_at = at(secs);
        let id = entity.id;
        self.memory
            .insert_content(entity)
            .await
            .expect("Failed to insert content");
        id
    }

    pub async fn account_state(&self, id: Uuid) -> Account {
        self.memory
            .get_account(id)
            .await
            .expect("Failed to read account")
            .expect("Account should exist")
    }

    pub async fn content_state(&self, kind: EntityKind, id: Uuid) -> ContentEntity {
        self.memory
            .get_content(kind, id)
            .await
            .expect("Failed to read content")
            .expect("Content should exist")
    }
}

/// Store operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    UpdateMembership,
    InsertEdge,
    AdjustCommentsCount,
    RecentContent,
    GetContents,
}

#[derive(Debug, Clone, Copy)]
struct Plan {
    /// Calls that still succeed before the fault fires
    skip: u32,
    /// Failures left; `None` fails until healed
    remaining: Option<u32>,
}

/// Delegates to a [`MemoryStore`], failing selected operations with
/// `StorageUnavailable`.
pub struct FaultyStore {
    inner: Arc<MemoryStore>,
    armed: Mutex<HashMap<Fault, Plan>>,
}

impl FaultyStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            armed: Mutex::new(HashMap::new()),
        }
    }

    pub fn fail_always(&self, fault: Fault) {
        self.arm(fault, 0, None);
    }

    pub fn fail_times(&self, fault: Fault, times: u32) {
        self.arm(fault, 0, Some(times));
    }

    /// Let `ok_calls` through, then fail until healed
    pub fn fail_after(&self, fault: Fault, ok_calls: u32) {
        self.arm(fault, ok_calls, None);
    }

    pub fn heal(&self) {
        self.armed.lock().unwrap().clear();
    }

    fn arm(&self, fault: Fault, skip: u32, remaining: Option<u32>) {
        self.armed
            .lock()
            .unwrap()
            .insert(fault, Plan { skip, remaining });
    }

    fn check(&self, fault: Fault) -> SocialResult<()> {
        let mut armed = self.armed.lock().unwrap();
        let Some(plan) = armed.get_mut(&fault) else {
            return Ok(());
        };
        if plan.skip > 0 {
            plan.skip -= 1;
            return Ok(());
        }
        let fire = match plan.remaining.as_mut() {
            None => true,
            Some(0) => false,
            Some(left) => {
                *left -= 1;
                true
            }
        };
        if fire {
            Err(SocialError::storage(anyhow::anyhow!(
                "injected fault: {:?}",
                fault
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl SocialStore for FaultyStore {
    async fn insert_account(&self, account: Account) -> SocialResult<()> {
        self.inner.insert_account(account).await
    }

    async fn get_account(&self, id: Uuid) -> SocialResult<Option<Account>> {
        self.inner.get_account(id).await
    }

    async fn get_accounts(&self, ids: &[Uuid]) -> SocialResult<Vec<Account>> {
        self.inner.get_accounts(ids).await
    }

    async fn update_membership(
        &self,
        account_id: Uuid,
        side: MembershipSide,
        other: Uuid,
        op: SetOp,
    ) -> SocialResult<Option<bool>> {
        self.check(Fault::UpdateMembership)?;
        self.inner
            .update_membership(account_id, side, other, op)
            .await
    }

    async fn overwrite_graph_cache(
        &self,
        account_id: Uuid,
        follower_ids: &[Uuid],
        following_ids: &[Uuid],
    ) -> SocialResult<Option<GraphCounters>> {
        self.inner
            .overwrite_graph_cache(account_id, follower_ids, following_ids)
            .await
    }

    async fn list_account_ids(&self, after: Option<Uuid>, limit: usize) -> SocialResult<Vec<Uuid>> {
        self.inner.list_account_ids(after, limit).await
    }

    async fn insert_edge(&self, edge: &FollowEdge) -> SocialResult<bool> {
        self.check(Fault::InsertEdge)?;
        self.inner.insert_edge(edge).await
    }

    async fn delete_edge(&self, follower_id: Uuid, followee_id: Uuid) -> SocialResult<bool> {
        self.inner.delete_edge(follower_id, followee_id).await
    }

    async fn toggle_edge(&self, edge: &FollowEdge) -> SocialResult<bool> {
        self.inner.toggle_edge(edge).await
    }

    async fn edge_exists(&self, follower_id: Uuid, followee_id: Uuid) -> SocialResult<bool> {
        self.inner.edge_exists(follower_id, followee_id).await
    }

    async fn followers_of(
        &self,
        followee_id: Uuid,
        offset: usize,
        limit: usize,
    ) -> SocialResult<Vec<FollowEdge>> {
        self.inner.followers_of(followee_id, offset, limit).await
    }

    async fn following_of(
        &self,
        follower_id: Uuid,
        offset: usize,
        limit: usize,
    ) -> SocialResult<Vec<FollowEdge>> {
        self.inner.following_of(follower_id, offset, limit).await
    }

    async fn all_follower_ids(&self, followee_id: Uuid) -> SocialResult<Vec<Uuid>> {
        self.inner.all_follower_ids(followee_id).await
    }

    async fn all_following_ids(&self, follower_id: Uuid) -> SocialResult<Vec<Uuid>> {
        self.inner.all_following_ids(follower_id).await
    }

    async fn insert_content(&self, entity: ContentEntity) -> SocialResult<()> {
        self.inner.insert_content(entity).await
    }

    async fn get_content(&self, kind: EntityKind, id: Uuid) -> SocialResult<Option<ContentEntity>> {
        self.inner.get_content(kind, id).await
    }

    async fn find_content(&self, id: Uuid) -> SocialResult<Option<ContentEntity>> {
        self.inner.find_content(id).await
    }

    async fn get_contents(&self, ids: &[Uuid]) -> SocialResult<Vec<ContentEntity>> {
        self.check(Fault::GetContents)?;
        self.inner.get_contents(ids).await
    }

    async fn delete_content(&self, kind: EntityKind, id: Uuid) -> SocialResult<bool> {
        self.inner.delete_content(kind, id).await
    }

    async fn set_visibility(
        &self,
        kind: EntityKind,
        id: Uuid,
        is_public: bool,
    ) -> SocialResult<bool> {
        self.inner.set_visibility(kind, id, is_public).await
    }

    async fn toggle_like(
        &self,
        kind: EntityKind,
        id: Uuid,
        actor_id: Uuid,
    ) -> SocialResult<Option<LikeState>> {
        self.inner.toggle_like(kind, id, actor_id).await
    }

    async fn adjust_comments_count(
        &self,
        kind: EntityKind,
        id: Uuid,
        delta: i64,
    ) -> SocialResult<Option<i64>> {
        self.check(Fault::AdjustCommentsCount)?;
        self.inner.adjust_comments_count(kind, id, delta).await
    }

    async fn increment_shares(&self, kind: EntityKind, id: Uuid) -> SocialResult<Option<i64>> {
        self.inner.increment_shares(kind, id).await
    }

    async fn reconcile_content_counters(
        &self,
        kind: EntityKind,
        id: Uuid,
        comments_count: i64,
    ) -> SocialResult<Option<(ContentCounters, ContentCounters)>> {
        self.inner
            .reconcile_content_counters(kind, id, comments_count)
            .await
    }

    async fn recent_content(&self, query: &ContentQuery) -> SocialResult<Vec<ContentEntity>> {
        self.check(Fault::RecentContent)?;
        self.inner.recent_content(query).await
    }

    async fn list_content_ids(
        &self,
        after: Option<Uuid>,
        limit: usize,
    ) -> SocialResult<Vec<(EntityKind, Uuid)>> {
        self.inner.list_content_ids(after, limit).await
    }

    async fn insert_comment(&self, comment: Comment) -> SocialResult<Comment> {
        self.inner.insert_comment(comment).await
    }

    async fn get_comment(&self, id: Uuid) -> SocialResult<Option<Comment>> {
        self.inner.get_comment(id).await
    }

    async fn delete_comment(&self, id: Uuid) -> SocialResult<Option<Comment>> {
        self.inner.delete_comment(id).await
    }

    async fn list_comments(
        &self,
        kind: EntityKind,
        entity_id: Uuid,
        offset: usize,
        limit: usize,
    ) -> SocialResult<Vec<Comment>> {
        self.inner.list_comments(kind, entity_id, offset, limit).await
    }

    async fn count_comments(&self, kind: EntityKind, entity_id: Uuid) -> SocialResult<i64> {
        self.inner.count_comments(kind, entity_id).await
    }

    async fn delete_comments_for(&self, kind: EntityKind, entity_id: Uuid) -> SocialResult<u64> {
        self.inner.delete_comments_for(kind, entity_id).await
    }
}
