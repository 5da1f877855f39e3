use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use social_service::domain::EntityKind;
use uuid::Uuid;

/// What a followed account did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    SongUploaded,
    PlaylistCreated,
    AlbumReleased,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 3] = [
        ActivityKind::SongUploaded,
        ActivityKind::PlaylistCreated,
        ActivityKind::AlbumReleased,
    ];

    /// Content kind each activity is derived from
    pub fn entity_kind(&self) -> EntityKind {
        match self {
            ActivityKind::SongUploaded => EntityKind::Song,
            ActivityKind::PlaylistCreated => EntityKind::Playlist,
            ActivityKind::AlbumReleased => EntityKind::Album,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::SongUploaded => "song_uploaded",
            ActivityKind::PlaylistCreated => "playlist_created",
            ActivityKind::AlbumReleased => "album_released",
        }
    }
}

/// Derived from content records on read; never stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub kind: ActivityKind,
    pub entity_id: Uuid,
    pub actor_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

impl ActivityEvent {
    /// Feed order is this key, descending
    pub fn key(&self) -> (DateTime<Utc>, Uuid) {
        (self.occurred_at, self.entity_id)
    }
}

/// Activity event resolved for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub event: ActivityEvent,
    pub title: String,
    pub actor_username: String,
}
