//! Storage interfaces for the catalog services
//!
//! Services depend on these traits; the Postgres implementations live in
//! the service crates next to their queries, and [`memory`] provides
//! in-process implementations backed by the same predicate evaluation,
//! used in tests and local development without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Content, ContentLike, Episode, Season, Shelf, ShelfEntry, WatchHistory, WatchlistEntry,
};
use crate::pagination::{Page, PageRequest};
use crate::predicate::{ContentOrder, ContentPredicate};

pub mod memory;

pub use memory::{MemoryCatalogRepository, MemoryEngagementRepository, MemoryShelfRepository,
    MemoryWatchHistoryRepository};

/// Read-only content lookup by id
///
/// The narrow interface the playback service needs; the full
/// [`CatalogRepository`] extends it.
#[async_trait]
pub trait ContentReader: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Content>>;

    /// Fetch records by id; missing ids are silently absent from the result
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Content>>;
}

/// Content records and their seasons/episodes
#[async_trait]
pub trait CatalogRepository: ContentReader {
    /// One page of records matching the predicate, in the given order
    async fn find_page(
        &self,
        predicate: &ContentPredicate,
        order: ContentOrder,
        page: PageRequest,
    ) -> Result<Page<Content>>;

    /// Up to `limit` matching records in the given order, for query paths
    /// that re-rank in memory
    async fn find_candidates(
        &self,
        predicate: &ContentPredicate,
        order: ContentOrder,
        limit: u64,
    ) -> Result<Vec<Content>>;

    async fn count(&self, predicate: &ContentPredicate) -> Result<u64>;

    async fn insert(&self, content: &Content) -> Result<()>;

    /// Full-row update; returns false when the id does not exist
    async fn update(&self, content: &Content) -> Result<bool>;

    /// Soft delete: clears `is_active`, keeping the row for history joins
    async fn soft_delete(&self, id: Uuid) -> Result<bool>;

    /// Seasons of a series, ordered by season number
    async fn find_seasons(&self, series_id: Uuid) -> Result<Vec<Season>>;

    /// Episodes of one season, ordered by episode number
    async fn find_episodes(&self, season_id: Uuid) -> Result<Vec<Episode>>;
}

/// Shelves and their ordered content entries
#[async_trait]
pub trait ShelfRepository: Send + Sync {
    /// Active shelves ordered by display order, then id
    async fn list_active(&self) -> Result<Vec<Shelf>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Shelf>>;

    /// Entries for the given shelves, ordered within each shelf by
    /// display order, then content id
    async fn entries_for(&self, shelf_ids: &[Uuid]) -> Result<Vec<ShelfEntry>>;

    async fn insert(&self, shelf: &Shelf) -> Result<()>;

    async fn update(&self, shelf: &Shelf) -> Result<bool>;

    /// Replace a shelf's entries in one transaction; readers never observe
    /// a partially reordered shelf
    async fn replace_entries(&self, shelf_id: Uuid, entries: &[ShelfEntry]) -> Result<()>;

    async fn remove_entry(&self, shelf_id: Uuid, content_id: Uuid) -> Result<bool>;
}

/// Per-profile viewing progress
#[async_trait]
pub trait WatchHistoryRepository: Send + Sync {
    /// Insert or update the row for (profile, content, episode)
    async fn upsert(&self, record: &WatchHistory) -> Result<WatchHistory>;

    /// Most recent rows for a profile, newest first
    async fn find_for_profile(&self, profile_id: Uuid, limit: u64) -> Result<Vec<WatchHistory>>;

    /// Most recent resumable rows for a profile, newest first
    async fn find_resumable(&self, profile_id: Uuid, limit: u64) -> Result<Vec<WatchHistory>>;

    async fn delete(&self, profile_id: Uuid, content_id: Uuid) -> Result<bool>;
}

/// Aggregated viewing stats consumed by the discovery listings
#[async_trait]
pub trait WatchStatsRepository: Send + Sync {
    /// Distinct-profile watch counts per content since the cutoff,
    /// most watched first (ties by content id)
    async fn watch_counts(&self, since: DateTime<Utc>, limit: u64) -> Result<Vec<(Uuid, i64)>>;
}

/// Watchlist and like membership
#[async_trait]
pub trait EngagementRepository: Send + Sync {
    /// Returns false when the pair was already present
    async fn add_to_watchlist(&self, entry: &WatchlistEntry) -> Result<bool>;

    async fn remove_from_watchlist(&self, profile_id: Uuid, content_id: Uuid) -> Result<bool>;

    /// Watchlist for a profile, most recently added first
    async fn watchlist_for_profile(&self, profile_id: Uuid) -> Result<Vec<WatchlistEntry>>;

    /// Returns false when the pair was already present
    async fn like(&self, entry: &ContentLike) -> Result<bool>;

    async fn unlike(&self, profile_id: Uuid, content_id: Uuid) -> Result<bool>;

    async fn like_count(&self, content_id: Uuid) -> Result<i64>;
}
