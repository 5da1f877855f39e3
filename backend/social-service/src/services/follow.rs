use super::{page_request, require_account};
use crate::domain::{
    AccountSummary, FollowEdge, FollowState, MembershipSide, Page, Relationship, SetOp,
};
use crate::metrics;
use crate::repository::SocialStore;
use error_types::{SocialError, SocialResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Follow graph operations.
///
/// The edge is written first and is authoritative; the two account updates
/// that follow are set-add/set-remove mutations whose counters move with the
/// set, so re-running any operation converges instead of double counting.
#[derive(Clone)]
pub struct FollowService {
    store: Arc<dyn SocialStore>,
}

impl FollowService {
    pub fn new(store: Arc<dyn SocialStore>) -> Self {
        Self { store }
    }

    /// Idempotent follow. A duplicate is a no-op that still re-applies the
    /// account caches, which heals an earlier partial write.
    #[instrument(skip(self))]
    pub async fn follow(&self, actor_id: Uuid, target_id: Uuid) -> SocialResult<FollowState> {
        self.check_pair(actor_id, target_id).await?;

        let edge = FollowEdge::new(actor_id, target_id);
        if self.store.insert_edge(&edge).await? {
            info!(follower = %actor_id, followee = %target_id, "Follow edge created");
        } else {
            debug!(follower = %actor_id, followee = %target_id, "Already following");
            metrics::record_conflict_ignored("follow");
        }

        self.apply_membership(actor_id, target_id, SetOp::Add).await?;
        Ok(FollowState { following: true })
    }

    /// Idempotent unfollow; a missing edge is a no-op.
    #[instrument(skip(self))]
    pub async fn unfollow(&self, actor_id: Uuid, target_id: Uuid) -> SocialResult<FollowState> {
        self.check_pair(actor_id, target_id).await?;

        if self.store.delete_edge(actor_id, target_id).await? {
            info!(follower = %actor_id, followee = %target_id, "Follow edge removed");
        } else {
            debug!(follower = %actor_id, followee = %target_id, "Not following");
            metrics::record_conflict_ignored("unfollow");
        }

        self.apply_membership(actor_id, target_id, SetOp::Remove).await?;
        Ok(FollowState { following: false })
    }

    /// Flip the follow state with one conditional mutation on the edge key.
    #[instrument(skip(self))]
    pub async fn toggle_follow(&self, actor_id: Uuid, target_id: Uuid) -> SocialResult<FollowState> {
        self.check_pair(actor_id, target_id).await?;

        let following = self
            .store
            .toggle_edge(&FollowEdge::new(actor_id, target_id))
            .await?;
        let op = if following { SetOp::Add } else { SetOp::Remove };
        self.apply_membership(actor_id, target_id, op).await?;

        info!(follower = %actor_id, followee = %target_id, following, "Follow toggled");
        Ok(FollowState { following })
    }

    /// Accounts following `account_id`, newest edge first
    #[instrument(skip(self))]
    pub async fn list_followers(
        &self,
        account_id: Uuid,
        page: u32,
        limit: u32,
    ) -> SocialResult<Page<AccountSummary>> {
        let request = page_request(page, limit)?;
        require_account(self.store.as_ref(), account_id).await?;

        let edges = self
            .store
            .followers_of(account_id, request.offset(), request.limit as usize + 1)
            .await?;
        let page = Page::from_overfetch(edges, request).map(|edge| edge.follower_id);
        self.resolve_summaries(page).await
    }

    /// Accounts `account_id` follows, newest edge first
    #[instrument(skip(self))]
    pub async fn list_following(
        &self,
        account_id: Uuid,
        page: u32,
        limit: u32,
    ) -> SocialResult<Page<AccountSummary>> {
        let request = page_request(page, limit)?;
        require_account(self.store.as_ref(), account_id).await?;

        let edges = self
            .store
            .following_of(account_id, request.offset(), request.limit as usize + 1)
            .await?;
        let page = Page::from_overfetch(edges, request).map(|edge| edge.followee_id);
        self.resolve_summaries(page).await
    }

    /// Every followed id, read from the edge table rather than the account cache
    #[instrument(skip(self))]
    pub async fn following_ids(&self, account_id: Uuid) -> SocialResult<Vec<Uuid>> {
        require_account(self.store.as_ref(), account_id).await?;
        self.store.all_following_ids(account_id).await
    }

    pub async fn relationship(&self, a: Uuid, b: Uuid) -> SocialResult<Relationship> {
        let (a_follows_b, b_follows_a) = tokio::try_join!(
            self.store.edge_exists(a, b),
            self.store.edge_exists(b, a)
        )?;
        Ok(Relationship {
            a_follows_b,
            b_follows_a,
        })
    }

    /// Validation and existence checks, all before the first write
    async fn check_pair(&self, actor_id: Uuid, target_id: Uuid) -> SocialResult<()> {
        if actor_id == target_id {
            return Err(SocialError::validation("target_id", "cannot follow yourself"));
        }
        require_account(self.store.as_ref(), target_id).await?;
        require_account(self.store.as_ref(), actor_id).await?;
        Ok(())
    }

    async fn apply_membership(&self, actor_id: Uuid, target_id: Uuid, op: SetOp) -> SocialResult<()> {
        let following = self
            .store
            .update_membership(actor_id, MembershipSide::Following, target_id, op)
            .await?;
        let followers = self
            .store
            .update_membership(target_id, MembershipSide::Followers, actor_id, op)
            .await?;

        // An account deleted between the check and the update leaves the edge
        // behind; reconciliation owns that case.
        if following.is_none() || followers.is_none() {
            warn!(
                follower = %actor_id,
                followee = %target_id,
                "Account disappeared during follow update"
            );
        }
        Ok(())
    }

    /// Batch-load accounts for a page of ids, keeping edge order and skipping
    /// accounts that no longer exist.
    async fn resolve_summaries(&self, page: Page<Uuid>) -> SocialResult<Page<AccountSummary>> {
        let accounts: HashMap<Uuid, AccountSummary> = self
            .store
            .get_accounts(&page.items)
            .await?
            .into_iter()
            .map(|account| (account.id, account.summary()))
            .collect();

        Ok(page.filter_map(|id| {
            let summary = accounts.get(&id).cloned();
            if summary.is_none() {
                debug!(account = %id, "Skipping missing account in listing");
            }
            summary
        }))
    }
}
