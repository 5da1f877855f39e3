use crate::domain::EntityKind;
use crate::metrics;
use crate::repository::{ContentCounters, GraphCounters, SocialStore};
use error_types::{SocialError, SocialResult};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Outcome of reconciling one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileReport {
    Account {
        id: Uuid,
        before: GraphCounters,
        after: GraphCounters,
        /// Embedded follower/following sets disagreed with the edges
        sets_repaired: bool,
    },
    Content {
        kind: EntityKind,
        id: Uuid,
        before: ContentCounters,
        after: ContentCounters,
    },
}

impl ReconcileReport {
    pub fn drifted(&self) -> bool {
        match self {
            ReconcileReport::Account {
                before,
                after,
                sets_repaired,
                ..
            } => before != after || *sets_repaired,
            ReconcileReport::Content { before, after, .. } => before != after,
        }
    }

    fn record(&self) -> &'static str {
        match self {
            ReconcileReport::Account { .. } => "account",
            ReconcileReport::Content { .. } => "content",
        }
    }
}

/// Totals for a full sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub accounts_checked: u64,
    pub content_checked: u64,
    pub drift_corrected: u64,
}

/// Recomputes cached sets and counters from their authoritative collections:
/// follow edges for accounts, `liked_by` and the comment index for content.
#[derive(Clone)]
pub struct CounterService {
    store: Arc<dyn SocialStore>,
}

impl CounterService {
    pub fn new(store: Arc<dyn SocialStore>) -> Self {
        Self { store }
    }

    /// Reconcile whichever record `id` names: an account, else a content entity.
    #[instrument(skip(self))]
    pub async fn reconcile_counters(&self, id: Uuid) -> SocialResult<ReconcileReport> {
        let report = if self.store.get_account(id).await?.is_some() {
            self.reconcile_account(id).await?
        } else if let Some(entity) = self.store.find_content(id).await? {
            self.reconcile_content(entity.kind, id).await?
        } else {
            return Err(SocialError::not_found("record", id));
        };

        if report.drifted() {
            metrics::record_drift_corrected(report.record());
            warn!(?report, "Drift corrected");
        } else {
            debug!(record = %id, "No drift");
        }
        Ok(report)
    }

    async fn reconcile_account(&self, id: Uuid) -> SocialResult<ReconcileReport> {
        let (follower_ids, following_ids) = tokio::try_join!(
            self.store.all_follower_ids(id),
            self.store.all_following_ids(id)
        )?;

        let cached = self
            .store
            .get_account(id)
            .await?
            .ok_or_else(|| SocialError::not_found("account", id))?;
        let sets_repaired = cached.follower_ids != follower_ids.iter().copied().collect::<BTreeSet<_>>()
            || cached.following_ids != following_ids.iter().copied().collect::<BTreeSet<_>>();

        let before = self
            .store
            .overwrite_graph_cache(id, &follower_ids, &following_ids)
            .await?
            .ok_or_else(|| SocialError::not_found("account", id))?;

        Ok(ReconcileReport::Account {
            id,
            before,
            after: GraphCounters {
                followers_count: follower_ids.len() as i64,
                following_count: following_ids.len() as i64,
            },
            sets_repaired,
        })
    }

    async fn reconcile_content(&self, kind: EntityKind, id: Uuid) -> SocialResult<ReconcileReport> {
        let comments_count = self.store.count_comments(kind, id).await?;
        let (before, after) = self
            .store
            .reconcile_content_counters(kind, id, comments_count)
            .await?
            .ok_or_else(|| SocialError::not_found(kind.as_str(), id))?;

        Ok(ReconcileReport::Content {
            kind,
            id,
            before,
            after,
        })
    }

    /// Sweep every account and content entity in batches of `batch_size`.
    /// Records deleted mid-sweep are skipped.
    #[instrument(skip(self))]
    pub async fn reconcile_all(&self, batch_size: usize) -> SocialResult<ReconcileSummary> {
        let batch_size = batch_size.max(1);
        let mut summary = ReconcileSummary::default();

        let mut after = None;
        loop {
            let ids = self.store.list_account_ids(after, batch_size).await?;
            for id in &ids {
                summary.accounts_checked += 1;
                self.sweep_one(*id, &mut summary).await?;
            }
            if ids.len() < batch_size {
                break;
            }
            after = ids.last().copied();
        }

        let mut after = None;
        loop {
            let ids = self.store.list_content_ids(after, batch_size).await?;
            for (_, id) in &ids {
                summary.content_checked += 1;
                self.sweep_one(*id, &mut summary).await?;
            }
            if ids.len() < batch_size {
                break;
            }
            after = ids.last().map(|(_, id)| *id);
        }

        info!(
            accounts = summary.accounts_checked,
            content = summary.content_checked,
            drift_corrected = summary.drift_corrected,
            "Reconciliation sweep finished"
        );
        Ok(summary)
    }

    async fn sweep_one(&self, id: Uuid, summary: &mut ReconcileSummary) -> SocialResult<()> {
        match self.reconcile_counters(id).await {
            Ok(report) => {
                if report.drifted() {
                    summary.drift_corrected += 1;
                }
                Ok(())
            }
            Err(SocialError::NotFound { .. }) => {
                debug!(record = %id, "Record removed during sweep");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
