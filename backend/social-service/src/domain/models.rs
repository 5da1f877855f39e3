use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Current time truncated to microseconds, the precision PostgreSQL keeps.
///
/// Feed cursors compare timestamps exactly, so every stored timestamp goes
/// through here.
pub fn timestamp_now() -> DateTime<Utc> {
    truncate_micros(Utc::now())
}

pub fn truncate_micros(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.duration_trunc(TimeDelta::microseconds(1)).unwrap_or(ts)
}

/// Content entity kinds. All three share one record shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Song,
    Album,
    Playlist,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Song, EntityKind::Album, EntityKind::Playlist];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Song => "song",
            EntityKind::Album => "album",
            EntityKind::Playlist => "playlist",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "song" => Ok(EntityKind::Song),
            "album" => Ok(EntityKind::Album),
            "playlist" => Ok(EntityKind::Playlist),
            other => Err(format!("unknown entity kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Listener,
    Artist,
    Admin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Listener => "listener",
            AccountRole::Artist => "artist",
            AccountRole::Admin => "admin",
        }
    }
}

impl FromStr for AccountRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "listener" => Ok(AccountRole::Listener),
            "artist" => Ok(AccountRole::Artist),
            "admin" => Ok(AccountRole::Admin),
            other => Err(format!("unknown account role: {}", other)),
        }
    }
}

/// Account record. `follower_ids`/`following_ids` and both counters are a
/// cache of the follow edge table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub role: AccountRole,
    pub follower_ids: BTreeSet<Uuid>,
    pub following_ids: BTreeSet<Uuid>,
    pub followers_count: i64,
    pub following_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(id: Uuid, username: impl Into<String>, role: AccountRole) -> Self {
        Self {
            id,
            username: username.into(),
            role,
            follower_ids: BTreeSet::new(),
            following_ids: BTreeSet::new(),
            followers_count: 0,
            following_count: 0,
            created_at: timestamp_now(),
        }
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
            followers_count: self.followers_count,
            following_count: self.following_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: Uuid,
    pub username: String,
    pub role: AccountRole,
    pub followers_count: i64,
    pub following_count: i64,
}

/// Authoritative follow relationship, unique on (follower_id, followee_id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FollowEdge {
    pub follower_id: Uuid,
    pub followee_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl FollowEdge {
    pub fn new(follower_id: Uuid, followee_id: Uuid) -> Self {
        Self {
            follower_id,
            followee_id,
            created_at: timestamp_now(),
        }
    }
}

/// Which embedded set of an account a follow mutation touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipSide {
    /// `follower_ids` / `followers_count`
    Followers,
    /// `following_ids` / `following_count`
    Following,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    Add,
    Remove,
}

/// Song, album or playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEntity {
    pub id: Uuid,
    pub kind: EntityKind,
    pub owner_id: Uuid,
    pub title: String,
    pub liked_by: BTreeSet<Uuid>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub shares_count: i64,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl ContentEntity {
    pub fn new(kind: EntityKind, owner_id: Uuid, title: impl Into<String>, is_public: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            owner_id,
            title: title.into(),
            liked_by: BTreeSet::new(),
            likes_count: 0,
            comments_count: 0,
            shares_count: 0,
            is_public,
            created_at: timestamp_now(),
        }
    }

    /// Visibility rule shared by every read view
    pub fn visible_to(&self, viewer: Option<Uuid>) -> bool {
        self.is_public || viewer == Some(self.owner_id)
    }
}

/// Comment record, addressable by id and by owning entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub entity_kind: EntityKind,
    pub entity_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Comment as returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSummary {
    pub id: Uuid,
    pub entity_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentSummary {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            entity_id: comment.entity_id,
            author_id: comment.author_id,
            body: comment.body,
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowState {
    pub following: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeState {
    pub liked: bool,
    pub likes_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareState {
    pub shares_count: i64,
}

/// Follow state in both directions between two accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub a_follows_b: bool,
    pub b_follows_a: bool,
}

impl Relationship {
    pub fn is_mutual(&self) -> bool {
        self.a_follows_b && self.b_follows_a
    }
}
