pub mod content;
pub mod counters;
pub mod engagement;
pub mod follow;

pub use content::ContentService;
pub use counters::{CounterService, ReconcileReport, ReconcileSummary};
pub use engagement::EngagementService;
pub use follow::FollowService;

use crate::domain::{Account, PageRequest};
use crate::repository::SocialStore;
use error_types::{sanitize_limit, validate_page, SocialError, SocialResult};
use uuid::Uuid;

/// Page size used when the caller passes 0
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Upper bound for follower, following and comment listings
pub const MAX_PAGE_SIZE: u32 = 100;

/// Load an account or fail with `NotFound`
pub(crate) async fn require_account(
    store: &dyn SocialStore,
    id: Uuid,
) -> SocialResult<Account> {
    store
        .get_account(id)
        .await?
        .ok_or_else(|| SocialError::not_found("account", id))
}

/// Validate a 1-based page and clamp its limit
pub(crate) fn page_request(page: u32, limit: u32) -> SocialResult<PageRequest> {
    validate_page(page)?;
    Ok(PageRequest::new(
        page,
        sanitize_limit(limit, MAX_PAGE_SIZE, DEFAULT_PAGE_SIZE),
    ))
}
