//! Social graph for Cadence: follow edges, likes, comments, shares and the
//! counters cached on accounts and content entities.
//!
//! Storage only has to provide single-record conditional updates
//! ([`repository::SocialStore`]). Operations that touch several records are
//! idempotent so retries converge, and [`services::CounterService`] heals
//! whatever drift remains.

pub mod config;
pub mod domain;
pub mod metrics;
pub mod repository;
pub mod services;

pub use config::Config;
pub use repository::{MemoryStore, PgSocialStore, SocialStore};
pub use services::{ContentService, CounterService, EngagementService, FollowService};
