//! Activity feeds for Cadence
//!
//! Feeds are never materialized. Each request fans out to the activity
//! sources, merges their newest-first streams and paginates the result with
//! `(occurred_at, entity_id)` cursors.

pub mod config;
pub mod cursor;
pub mod models;
pub mod services;

pub use config::FeedConfig;
pub use cursor::{FeedCursor, FeedPosition};
pub use models::{ActivityEvent, ActivityKind, FeedItem};
pub use services::FeedAssembler;
