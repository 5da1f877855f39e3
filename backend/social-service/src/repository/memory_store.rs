//! In-memory social store
//!
//! Each `DashMap` entry is one record; `get_mut`/`entry` hold the shard lock
//! for the duration of a conditional update, which is exactly the
//! single-record atomicity the services rely on. Used by tests and by the
//! `memory` store backend.

use super::{ContentCounters, ContentQuery, GraphCounters, SocialStore};
use crate::domain::{
    Account, Comment, ContentEntity, EntityKind, FollowEdge, LikeState, MembershipSide, SetOp,
};
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use error_types::SocialResult;
use std::collections::{BTreeSet, HashSet};
use uuid::Uuid;

/// Append order and latest timestamp of one entity's comments
#[derive(Debug, Clone)]
struct CommentThread {
    last_at: DateTime<Utc>,
    ids: Vec<Uuid>,
}

#[derive(Default)]
pub struct MemoryStore {
    accounts: DashMap<Uuid, Account>,
    edges: DashMap<(Uuid, Uuid), FollowEdge>,
    /// followee -> followers, maintained under the edge entry lock
    followers_index: DashMap<Uuid, BTreeSet<Uuid>>,
    /// follower -> followees
    following_index: DashMap<Uuid, BTreeSet<Uuid>>,
    content: DashMap<Uuid, ContentEntity>,
    comments: DashMap<Uuid, Comment>,
    threads: DashMap<Uuid, CommentThread>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite `likes_count` without touching `liked_by`.
    ///
    /// Operator tooling for drift drills; never called by the services.
    pub fn force_likes_count(&self, id: Uuid, likes_count: i64) -> bool {
        match self.content.get_mut(&id) {
            Some(mut entity) => {
                entity.likes_count = likes_count;
                true
            }
            None => false,
        }
    }

    /// Overwrite `comments_count` without touching the comment index.
    pub fn force_comments_count(&self, id: Uuid, comments_count: i64) -> bool {
        match self.content.get_mut(&id) {
            Some(mut entity) => {
                entity.comments_count = comments_count;
                true
            }
            None => false,
        }
    }

    /// Overwrite both account counters without touching the embedded sets.
    pub fn force_graph_counters(&self, id: Uuid, counters: GraphCounters) -> bool {
        match self.accounts.get_mut(&id) {
            Some(mut account) => {
                account.followers_count = counters.followers_count;
                account.following_count = counters.following_count;
                true
            }
            None => false,
        }
    }

    /// Drop an account id from an embedded set without touching edges or counters.
    pub fn force_remove_membership(&self, id: Uuid, side: MembershipSide, other: Uuid) -> bool {
        match self.accounts.get_mut(&id) {
            Some(mut account) => match side {
                MembershipSide::Followers => account.follower_ids.remove(&other),
                MembershipSide::Following => account.following_ids.remove(&other),
            },
            None => false,
        }
    }

    fn sorted_edges(mut edges: Vec<FollowEdge>, key: impl Fn(&FollowEdge) -> Uuid) -> Vec<FollowEdge> {
        edges.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| key(b).cmp(&key(a)))
        });
        edges
    }

    // Called with the edge entry held; lock order is always edges then index.
    fn link(&self, follower_id: Uuid, followee_id: Uuid) {
        self.followers_index
            .entry(followee_id)
            .or_default()
            .insert(follower_id);
        self.following_index
            .entry(follower_id)
            .or_default()
            .insert(followee_id);
    }

    fn unlink(&self, follower_id: Uuid, followee_id: Uuid) {
        if let Some(mut followers) = self.followers_index.get_mut(&followee_id) {
            followers.remove(&follower_id);
        }
        if let Some(mut following) = self.following_index.get_mut(&follower_id) {
            following.remove(&followee_id);
        }
    }

    /// Ids out of an index, copied so no index guard is held afterwards
    fn indexed(index: &DashMap<Uuid, BTreeSet<Uuid>>, id: Uuid) -> Vec<Uuid> {
        index
            .get(&id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Edges for `(follower, followee)` pairs, skipping pairs removed meanwhile
    fn edges_for(&self, pairs: impl Iterator<Item = (Uuid, Uuid)>) -> Vec<FollowEdge> {
        pairs
            .filter_map(|key| self.edges.get(&key).map(|e| e.clone()))
            .collect()
    }

    fn page<T>(items: Vec<T>, offset: usize, limit: usize) -> Vec<T> {
        items.into_iter().skip(offset).take(limit).collect()
    }
}

#[async_trait::async_trait]
impl SocialStore for MemoryStore {
    async fn insert_account(&self, account: Account) -> SocialResult<()> {
        self.accounts.insert(account.id, account);
        Ok(())
    }

    async fn get_account(&self, id: Uuid) -> SocialResult<Option<Account>> {
        Ok(self.accounts.get(&id).map(|a| a.clone()))
    }

    async fn get_accounts(&self, ids: &[Uuid]) -> SocialResult<Vec<Account>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.accounts.get(id).map(|a| a.clone()))
            .collect())
    }

    async fn update_membership(
        &self,
        account_id: Uuid,
        side: MembershipSide,
        other: Uuid,
        op: SetOp,
    ) -> SocialResult<Option<bool>> {
        let Some(mut account) = self.accounts.get_mut(&account_id) else {
            return Ok(None);
        };
        let account = &mut *account;
        let (set, counter) = match side {
            MembershipSide::Followers => (&mut account.follower_ids, &mut account.followers_count),
            MembershipSide::Following => (&mut account.following_ids, &mut account.following_count),
        };
        let changed = match op {
            SetOp::Add => set.insert(other),
            SetOp::Remove => set.remove(&other),
        };
        if changed {
            *counter += match op {
                SetOp::Add => 1,
                SetOp::Remove => -1,
            };
        }
        Ok(Some(changed))
    }

    async fn overwrite_graph_cache(
        &self,
        account_id: Uuid,
        follower_ids: &[Uuid],
        following_ids: &[Uuid],
    ) -> SocialResult<Option<GraphCounters>> {
        let Some(mut account) = self.accounts.get_mut(&account_id) else {
            return Ok(None);
        };
        let before = GraphCounters {
            followers_count: account.followers_count,
            following_count: account.following_count,
        };
        account.follower_ids = follower_ids.iter().copied().collect::<BTreeSet<_>>();
        account.following_ids = following_ids.iter().copied().collect::<BTreeSet<_>>();
        account.followers_count = account.follower_ids.len() as i64;
        account.following_count = account.following_ids.len() as i64;
        Ok(Some(before))
    }

    async fn list_account_ids(&self, after: Option<Uuid>, limit: usize) -> SocialResult<Vec<Uuid>> {
        let mut ids: Vec<Uuid> = self
            .accounts
            .iter()
            .map(|a| *a.key())
            .filter(|id| after.map_or(true, |after| *id > after))
            .collect();
        ids.sort();
        ids.truncate(limit);
        Ok(ids)
    }

    async fn insert_edge(&self, edge: &FollowEdge) -> SocialResult<bool> {
        match self.edges.entry((edge.follower_id, edge.followee_id)) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                let _held = slot.insert(edge.clone());
                self.link(edge.follower_id, edge.followee_id);
                Ok(true)
            }
        }
    }

    async fn delete_edge(&self, follower_id: Uuid, followee_id: Uuid) -> SocialResult<bool> {
        match self.edges.entry((follower_id, followee_id)) {
            Entry::Occupied(existing) => {
                self.unlink(follower_id, followee_id);
                existing.remove();
                Ok(true)
            }
            Entry::Vacant(_) => Ok(false),
        }
    }

    async fn toggle_edge(&self, edge: &FollowEdge) -> SocialResult<bool> {
        match self.edges.entry((edge.follower_id, edge.followee_id)) {
            Entry::Occupied(existing) => {
                self.unlink(edge.follower_id, edge.followee_id);
                existing.remove();
                Ok(false)
            }
            Entry::Vacant(slot) => {
                let _held = slot.insert(edge.clone());
                self.link(edge.follower_id, edge.followee_id);
                Ok(true)
            }
        }
    }

    async fn edge_exists(&self, follower_id: Uuid, followee_id: Uuid) -> SocialResult<bool> {
        Ok(self.edges.contains_key(&(follower_id, followee_id)))
    }

    async fn followers_of(
        &self,
        followee_id: Uuid,
        offset: usize,
        limit: usize,
    ) -> SocialResult<Vec<FollowEdge>> {
        let followers = Self::indexed(&self.followers_index, followee_id);
        let edges = self.edges_for(followers.into_iter().map(|f| (f, followee_id)));
        let edges = Self::sorted_edges(edges, |e| e.follower_id);
        Ok(Self::page(edges, offset, limit))
    }

    async fn following_of(
        &self,
        follower_id: Uuid,
        offset: usize,
        limit: usize,
    ) -> SocialResult<Vec<FollowEdge>> {
        let following = Self::indexed(&self.following_index, follower_id);
        let edges = self.edges_for(following.into_iter().map(|f| (follower_id, f)));
        let edges = Self::sorted_edges(edges, |e| e.followee_id);
        Ok(Self::page(edges, offset, limit))
    }

    async fn all_follower_ids(&self, followee_id: Uuid) -> SocialResult<Vec<Uuid>> {
        Ok(Self::indexed(&self.followers_index, followee_id))
    }

    async fn all_following_ids(&self, follower_id: Uuid) -> SocialResult<Vec<Uuid>> {
        Ok(Self::indexed(&self.following_index, follower_id))
    }

    async fn insert_content(&self, entity: ContentEntity) -> SocialResult<()> {
        self.content.insert(entity.id, entity);
        Ok(())
    }

    async fn get_content(&self, kind: EntityKind, id: Uuid) -> SocialResult<Option<ContentEntity>> {
        Ok(self
            .content
            .get(&id)
            .filter(|e| e.kind == kind)
            .map(|e| e.clone()))
    }

    async fn find_content(&self, id: Uuid) -> SocialResult<Option<ContentEntity>> {
        Ok(self.content.get(&id).map(|e| e.clone()))
    }

    async fn get_contents(&self, ids: &[Uuid]) -> SocialResult<Vec<ContentEntity>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.content.get(id).map(|e| e.clone()))
            .collect())
    }

    async fn delete_content(&self, kind: EntityKind, id: Uuid) -> SocialResult<bool> {
        Ok(self.content.remove_if(&id, |_, e| e.kind == kind).is_some())
    }

    async fn set_visibility(
        &self,
        kind: EntityKind,
        id: Uuid,
        is_public: bool,
    ) -> SocialResult<bool> {
        match self.content.get_mut(&id) {
            Some(mut entity) if entity.kind == kind => {
                entity.is_public = is_public;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn toggle_like(
        &self,
        kind: EntityKind,
        id: Uuid,
        actor_id: Uuid,
    ) -> SocialResult<Option<LikeState>> {
        let Some(mut entity) = self.content.get_mut(&id) else {
            return Ok(None);
        };
        if entity.kind != kind {
            return Ok(None);
        }
        let liked = if entity.liked_by.remove(&actor_id) {
            entity.likes_count -= 1;
            false
        } else {
            entity.liked_by.insert(actor_id);
            entity.likes_count += 1;
            true
        };
        Ok(Some(LikeState {
            liked,
            likes_count: entity.likes_count,
        }))
    }

    async fn adjust_comments_count(
        &self,
        kind: EntityKind,
        id: Uuid,
        delta: i64,
    ) -> SocialResult<Option<i64>> {
        match self.content.get_mut(&id) {
            Some(mut entity) if entity.kind == kind => {
                entity.comments_count = (entity.comments_count + delta).max(0);
                Ok(Some(entity.comments_count))
            }
            _ => Ok(None),
        }
    }

    async fn increment_shares(&self, kind: EntityKind, id: Uuid) -> SocialResult<Option<i64>> {
        match self.content.get_mut(&id) {
            Some(mut entity) if entity.kind == kind => {
                entity.shares_count += 1;
                Ok(Some(entity.shares_count))
            }
            _ => Ok(None),
        }
    }

    async fn reconcile_content_counters(
        &self,
        kind: EntityKind,
        id: Uuid,
        comments_count: i64,
    ) -> SocialResult<Option<(ContentCounters, ContentCounters)>> {
        match self.content.get_mut(&id) {
            Some(mut entity) if entity.kind == kind => {
                let before = ContentCounters {
                    likes_count: entity.likes_count,
                    comments_count: entity.comments_count,
                };
                entity.likes_count = entity.liked_by.len() as i64;
                entity.comments_count = comments_count;
                let after = ContentCounters {
                    likes_count: entity.likes_count,
                    comments_count: entity.comments_count,
                };
                Ok(Some((before, after)))
            }
            _ => Ok(None),
        }
    }

    async fn recent_content(&self, query: &ContentQuery) -> SocialResult<Vec<ContentEntity>> {
        let owners: HashSet<Uuid> = query.owners.iter().copied().collect();
        let mut rows: Vec<ContentEntity> = self
            .content
            .iter()
            .filter(|e| e.kind == query.kind && owners.contains(&e.owner_id))
            .filter(|e| e.visible_to(query.viewer))
            .filter(|e| {
                query
                    .before
                    .map_or(true, |before| (e.created_at, e.id) < before)
            })
            .map(|e| e.clone())
            .collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        rows.truncate(query.limit);
        Ok(rows)
    }

    async fn list_content_ids(
        &self,
        after: Option<Uuid>,
        limit: usize,
    ) -> SocialResult<Vec<(EntityKind, Uuid)>> {
        let mut ids: Vec<(EntityKind, Uuid)> = self
            .content
            .iter()
            .filter(|e| after.map_or(true, |after| e.id > after))
            .map(|e| (e.kind, e.id))
            .collect();
        ids.sort_by_key(|(_, id)| *id);
        ids.truncate(limit);
        Ok(ids)
    }

    async fn insert_comment(&self, mut comment: Comment) -> SocialResult<Comment> {
        // The thread entry lock orders appends on one entity
        let mut thread = self
            .threads
            .entry(comment.entity_id)
            .or_insert_with(|| CommentThread {
                last_at: comment.created_at,
                ids: Vec::new(),
            });
        if thread.last_at > comment.created_at {
            comment.created_at = thread.last_at;
        } else {
            thread.last_at = comment.created_at;
        }
        thread.ids.push(comment.id);
        self.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn get_comment(&self, id: Uuid) -> SocialResult<Option<Comment>> {
        Ok(self.comments.get(&id).map(|c| c.clone()))
    }

    async fn delete_comment(&self, id: Uuid) -> SocialResult<Option<Comment>> {
        let Some((_, removed)) = self.comments.remove(&id) else {
            return Ok(None);
        };
        if let Some(mut thread) = self.threads.get_mut(&removed.entity_id) {
            thread.ids.retain(|c| *c != id);
        }
        Ok(Some(removed))
    }

    async fn list_comments(
        &self,
        kind: EntityKind,
        entity_id: Uuid,
        offset: usize,
        limit: usize,
    ) -> SocialResult<Vec<Comment>> {
        let ids = match self.threads.get(&entity_id) {
            Some(thread) => thread.ids.clone(),
            None => return Ok(Vec::new()),
        };
        let comments = ids
            .iter()
            .filter_map(|id| self.comments.get(id).map(|c| c.clone()))
            .filter(|c| c.entity_kind == kind)
            .collect();
        Ok(Self::page(comments, offset, limit))
    }

    async fn count_comments(&self, kind: EntityKind, entity_id: Uuid) -> SocialResult<i64> {
        let ids = match self.threads.get(&entity_id) {
            Some(thread) => thread.ids.clone(),
            None => return Ok(0),
        };
        Ok(ids
            .iter()
            .filter(|id| {
                self.comments
                    .get(*id)
                    .map_or(false, |c| c.entity_kind == kind)
            })
            .count() as i64)
    }

    async fn delete_comments_for(&self, kind: EntityKind, entity_id: Uuid) -> SocialResult<u64> {
        let Some((_, thread)) = self.threads.remove(&entity_id) else {
            return Ok(0);
        };
        let removed = thread
            .ids
            .iter()
            .filter(|id| {
                self.comments
                    .remove_if(*id, |_, c| c.entity_kind == kind)
                    .is_some()
            })
            .count();
        Ok(removed as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{timestamp_now, AccountRole};
    use chrono::Duration;
    use std::sync::Arc;

    fn comment_at(entity: &ContentEntity, at: DateTime<Utc>) -> Comment {
        Comment {
            id: Uuid::new_v4(),
            entity_kind: entity.kind,
            entity_id: entity.id,
            author_id: Uuid::new_v4(),
            body: "nice".into(),
            created_at: at,
        }
    }

    #[tokio::test]
    async fn test_toggle_edge_flips_presence() {
        let store = MemoryStore::new();
        let edge = FollowEdge::new(Uuid::new_v4(), Uuid::new_v4());

        assert!(store.toggle_edge(&edge).await.unwrap());
        assert!(store.edge_exists(edge.follower_id, edge.followee_id).await.unwrap());
        assert!(!store.toggle_edge(&edge).await.unwrap());
        assert!(!store.edge_exists(edge.follower_id, edge.followee_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_edge_is_insert_if_absent() {
        let store = MemoryStore::new();
        let edge = FollowEdge::new(Uuid::new_v4(), Uuid::new_v4());
        assert!(store.insert_edge(&edge).await.unwrap());
        assert!(!store.insert_edge(&edge).await.unwrap());
        assert_eq!(store.all_follower_ids(edge.followee_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_edge_indexes_track_every_mutation() {
        let store = MemoryStore::new();
        let artist = Uuid::new_v4();
        let fans: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        for fan in &fans {
            store.insert_edge(&FollowEdge::new(*fan, artist)).await.unwrap();
        }
        store.delete_edge(fans[0], artist).await.unwrap();
        store.toggle_edge(&FollowEdge::new(fans[1], artist)).await.unwrap();
        store.toggle_edge(&FollowEdge::new(artist, fans[2])).await.unwrap();

        let mut followers = store.all_follower_ids(artist).await.unwrap();
        followers.sort();
        let mut expected = vec![fans[2], fans[3]];
        expected.sort();
        assert_eq!(followers, expected);
        assert_eq!(store.all_following_ids(artist).await.unwrap(), vec![fans[2]]);
        assert!(store.all_following_ids(fans[0]).await.unwrap().is_empty());
        assert_eq!(store.followers_of(artist, 0, 10).await.unwrap().len(), 2);
        assert_eq!(store.following_of(fans[3], 0, 10).await.unwrap()[0].followee_id, artist);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_edge_indexes_agree_with_edges_under_contention() {
        let store = Arc::new(MemoryStore::new());
        let artist = Uuid::new_v4();
        let fans: Vec<Uuid> = (0..8).map(|_| Uuid::new_v4()).collect();

        let mut handles = Vec::new();
        for round in 0..5 {
            for fan in &fans {
                let store = store.clone();
                let edge = FollowEdge::new(*fan, artist);
                handles.push(tokio::spawn(async move {
                    if round % 2 == 0 {
                        store.toggle_edge(&edge).await.unwrap();
                    } else {
                        store.delete_edge(edge.follower_id, edge.followee_id).await.unwrap();
                    }
                    store.insert_edge(&edge).await.unwrap();
                }));
            }
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut indexed = store.all_follower_ids(artist).await.unwrap();
        indexed.sort();
        let mut present = Vec::new();
        for fan in &fans {
            if store.edge_exists(*fan, artist).await.unwrap() {
                present.push(*fan);
            }
            let following = store.all_following_ids(*fan).await.unwrap();
            assert_eq!(following.contains(&artist), present.contains(fan));
        }
        present.sort();
        assert_eq!(indexed, present);
    }

    #[tokio::test]
    async fn test_update_membership_counter_follows_set() {
        let store = MemoryStore::new();
        let account = Account::new(Uuid::new_v4(), "mira", AccountRole::Artist);
        let id = account.id;
        store.insert_account(account).await.unwrap();
        let fan = Uuid::new_v4();

        let add = store
            .update_membership(id, MembershipSide::Followers, fan, SetOp::Add)
            .await
            .unwrap();
        let again = store
            .update_membership(id, MembershipSide::Followers, fan, SetOp::Add)
            .await
            .unwrap();
        assert_eq!(add, Some(true));
        assert_eq!(again, Some(false));

        let stored = store.get_account(id).await.unwrap().unwrap();
        assert_eq!(stored.followers_count, 1);
        assert_eq!(stored.following_count, 0);

        let missing = store
            .update_membership(Uuid::new_v4(), MembershipSide::Following, fan, SetOp::Add)
            .await
            .unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_toggle_like_settles_by_parity() {
        let store = Arc::new(MemoryStore::new());
        let entity = ContentEntity::new(EntityKind::Song, Uuid::new_v4(), "drift", true);
        let (kind, id) = (entity.kind, entity.id);
        store.insert_content(entity).await.unwrap();
        let actor = Uuid::new_v4();

        let handles: Vec<_> = (0..41)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.toggle_like(kind, id, actor).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = store.get_content(kind, id).await.unwrap().unwrap();
        assert!(stored.liked_by.contains(&actor));
        assert_eq!(stored.likes_count, 1);
    }

    #[tokio::test]
    async fn test_comment_timestamps_never_go_backwards() {
        let store = MemoryStore::new();
        let entity = ContentEntity::new(EntityKind::Album, Uuid::new_v4(), "blue", true);
        let now = timestamp_now();

        let first = store.insert_comment(comment_at(&entity, now)).await.unwrap();
        let skewed = store
            .insert_comment(comment_at(&entity, now - Duration::seconds(30)))
            .await
            .unwrap();

        assert_eq!(first.created_at, now);
        assert!(skewed.created_at >= first.created_at);

        let listed = store
            .list_comments(entity.kind, entity.id, 0, 10)
            .await
            .unwrap();
        assert_eq!(listed.iter().map(|c| c.id).collect::<Vec<_>>(), vec![first.id, skewed.id]);
    }

    #[tokio::test]
    async fn test_delete_comment_updates_thread() {
        let store = MemoryStore::new();
        let entity = ContentEntity::new(EntityKind::Song, Uuid::new_v4(), "hum", true);
        let c = store
            .insert_comment(comment_at(&entity, timestamp_now()))
            .await
            .unwrap();

        assert_eq!(store.count_comments(entity.kind, entity.id).await.unwrap(), 1);
        assert!(store.delete_comment(c.id).await.unwrap().is_some());
        assert!(store.delete_comment(c.id).await.unwrap().is_none());
        assert_eq!(store.count_comments(entity.kind, entity.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_recent_content_filters_and_orders() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let base = timestamp_now();

        let mut ids = Vec::new();
        for (offset, public) in [(1, true), (2, false), (3, true)] {
            let mut song = ContentEntity::new(EntityKind::Song, owner, "s", public);
            song.created_at = base + Duration::seconds(offset);
            ids.push(song.id);
            store.insert_content(song).await.unwrap();
        }
        let mut foreign = ContentEntity::new(EntityKind::Song, stranger, "x", true);
        foreign.created_at = base + Duration::seconds(10);
        store.insert_content(foreign).await.unwrap();

        let query = ContentQuery {
            kind: EntityKind::Song,
            owners: vec![owner],
            viewer: None,
            before: None,
            limit: 10,
        };
        let rows = store.recent_content(&query).await.unwrap();
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![ids[2], ids[0]]);

        let as_owner = ContentQuery {
            viewer: Some(owner),
            before: Some((base + Duration::seconds(3), ids[2])),
            ..query
        };
        let rows = store.recent_content(&as_owner).await.unwrap();
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![ids[1], ids[0]]);
    }
}
