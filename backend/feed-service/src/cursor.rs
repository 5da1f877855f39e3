//! Feed pagination positions
//!
//! The primary contract is an opaque cursor naming the last item of the
//! previous page: base64 of `"<occurred_at micros>:<entity_id>"`. 1-based
//! offset pages remain available for older clients.

use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use error_types::{validate_page, SocialError, SocialResult};
use uuid::Uuid;

/// Position of the last item already delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedCursor {
    pub occurred_at: DateTime<Utc>,
    pub entity_id: Uuid,
}

impl FeedCursor {
    pub fn new(occurred_at: DateTime<Utc>, entity_id: Uuid) -> Self {
        Self {
            occurred_at,
            entity_id,
        }
    }

    pub fn encode(&self) -> String {
        let cursor_str = format!("{}:{}", self.occurred_at.timestamp_micros(), self.entity_id);
        general_purpose::STANDARD.encode(cursor_str)
    }

    pub fn decode(cursor: &str) -> SocialResult<Self> {
        let decoded = general_purpose::STANDARD
            .decode(cursor)
            .map_err(|_| invalid("Invalid cursor format"))?;
        let cursor_str =
            String::from_utf8(decoded).map_err(|_| invalid("Invalid cursor encoding"))?;

        let (ts_str, id_str) = cursor_str
            .split_once(':')
            .ok_or_else(|| invalid("Invalid cursor format"))?;
        let micros = ts_str
            .parse::<i64>()
            .map_err(|_| invalid("Invalid cursor timestamp"))?;
        let occurred_at = DateTime::<Utc>::from_timestamp_micros(micros)
            .ok_or_else(|| invalid("Invalid cursor timestamp"))?;
        let entity_id = id_str
            .parse::<Uuid>()
            .map_err(|_| invalid("Invalid cursor entity"))?;

        Ok(Self {
            occurred_at,
            entity_id,
        })
    }

    /// Sort key shared with activity events: newer first, ties by id desc
    pub fn key(&self) -> (DateTime<Utc>, Uuid) {
        (self.occurred_at, self.entity_id)
    }
}

fn invalid(message: &str) -> SocialError {
    SocialError::validation("cursor", message)
}

/// Where a feed page starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPosition {
    First,
    After(FeedCursor),
    /// Legacy 1-based offset page
    Page(u32),
}

impl FeedPosition {
    /// A non-empty cursor wins over a page number
    pub fn from_request(cursor: Option<&str>, page: Option<u32>) -> SocialResult<Self> {
        match (cursor, page) {
            (Some(cursor), _) if !cursor.is_empty() => {
                Ok(Self::After(FeedCursor::decode(cursor)?))
            }
            (_, Some(page)) => {
                validate_page(page)?;
                Ok(Self::Page(page))
            }
            _ => Ok(Self::First),
        }
    }

    /// Items to skip after the merge
    pub fn skip(&self, limit: usize) -> usize {
        match self {
            Self::Page(page) => (page.saturating_sub(1) as usize) * limit,
            Self::First | Self::After(_) => 0,
        }
    }

    /// Items each source must return so the merged stream can fill the page
    /// and tell whether more exist
    pub fn fetch_size(&self, limit: usize) -> usize {
        self.skip(limit) + limit + 1
    }

    pub fn before(&self) -> Option<FeedCursor> {
        match self {
            Self::After(cursor) => Some(*cursor),
            Self::First | Self::Page(_) => None,
        }
    }

    pub fn page_number(&self) -> Option<u32> {
        match self {
            Self::Page(page) => Some(*page),
            Self::First => Some(1),
            Self::After(_) => None,
        }
    }
}
