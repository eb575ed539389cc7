//! Watch history, watchlist, and like models
//!
//! One `WatchHistory` row per (profile, content[, episode]) viewing event.
//! Drives the continue-watching view (incomplete, progress in an open
//! interval) and the everyone's-watching popularity count.
//!
//! ## Database schema
//!
//! ```sql
//! CREATE TABLE watch_history (
//!     id UUID PRIMARY KEY,
//!     profile_id UUID NOT NULL,
//!     content_id UUID NOT NULL REFERENCES content(id),
//!     episode_id UUID REFERENCES episodes(id),
//!     watch_duration_seconds INT NOT NULL DEFAULT 0,
//!     total_duration_seconds INT NOT NULL,
//!     progress_percentage REAL NOT NULL DEFAULT 0,
//!     is_completed BOOLEAN NOT NULL DEFAULT FALSE,
//!     watched_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     -- NULLS NOT DISTINCT so movie rows (NULL episode_id) also collapse
//!     -- into a single row per profile and title; requires PostgreSQL 15+
//!     UNIQUE NULLS NOT DISTINCT (profile_id, content_id, episode_id)
//! );
//!
//! CREATE INDEX idx_watch_history_profile ON watch_history(profile_id, watched_at DESC);
//! CREATE INDEX idx_watch_history_content ON watch_history(content_id);
//!
//! CREATE TABLE watchlist (
//!     profile_id UUID NOT NULL,
//!     content_id UUID NOT NULL REFERENCES content(id),
//!     added_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     PRIMARY KEY (profile_id, content_id)
//! );
//!
//! CREATE TABLE content_likes (
//!     profile_id UUID NOT NULL,
//!     content_id UUID NOT NULL REFERENCES content(id),
//!     liked_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     PRIMARY KEY (profile_id, content_id)
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Progress at or above this percentage is treated as finished
pub const COMPLETION_THRESHOLD: f32 = 95.0;

/// One viewing event for a profile
///
/// `content_id` always refers to the top-level catalog record; for episodic
/// progress it is the series record and `episode_id` identifies the episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchHistory {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub content_id: Uuid,
    pub episode_id: Option<Uuid>,
    pub watch_duration_seconds: i32,
    pub total_duration_seconds: i32,
    pub progress_percentage: f32,
    pub is_completed: bool,
    pub watched_at: DateTime<Utc>,
}

impl WatchHistory {
    /// True if this row belongs in the continue-watching view:
    /// strictly between 0% and the completion threshold, and not completed
    pub fn is_resumable(&self) -> bool {
        !self.is_completed
            && self.progress_percentage > 0.0
            && self.progress_percentage < COMPLETION_THRESHOLD
    }
}

/// Watchlist membership: unique (profile, content) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub profile_id: Uuid,
    pub content_id: Uuid,
    pub added_at: DateTime<Utc>,
}

/// Like membership: unique (profile, content) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentLike {
    pub profile_id: Uuid,
    pub content_id: Uuid,
    pub liked_at: DateTime<Utc>,
}
