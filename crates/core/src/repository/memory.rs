//! In-memory repository implementations
//!
//! Back the same traits as the Postgres implementations, evaluating
//! predicates with [`ContentPredicate::matches`] so query semantics match
//! the rendered SQL. Used throughout the test suites and by local runs
//! without a database.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{CatalogError, Result};
use crate::models::{
    Content, ContentLike, Episode, Season, Shelf, ShelfEntry, WatchHistory, WatchlistEntry,
};
use crate::pagination::{Page, PageRequest};
use crate::predicate::{ContentOrder, ContentPredicate};
use crate::repository::{
    CatalogRepository, ContentReader, EngagementRepository, ShelfRepository,
    WatchHistoryRepository, WatchStatsRepository,
};

fn lock_poisoned() -> CatalogError {
    CatalogError::dependency("repository lock poisoned")
}

/// Content store backed by a `RwLock<HashMap>`
#[derive(Debug, Default)]
pub struct MemoryCatalogRepository {
    content: RwLock<HashMap<Uuid, Content>>,
    seasons: RwLock<Vec<Season>>,
    episodes: RwLock<Vec<Episode>>,
}

impl MemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store, replacing records with colliding ids
    pub fn seed(&self, records: impl IntoIterator<Item = Content>) {
        if let Ok(mut content) = self.content.write() {
            for record in records {
                content.insert(record.id, record);
            }
        }
    }

    pub fn seed_seasons(&self, records: impl IntoIterator<Item = Season>) {
        if let Ok(mut seasons) = self.seasons.write() {
            seasons.extend(records);
        }
    }

    pub fn seed_episodes(&self, records: impl IntoIterator<Item = Episode>) {
        if let Ok(mut episodes) = self.episodes.write() {
            episodes.extend(records);
        }
    }

    fn matching(&self, predicate: &ContentPredicate, order: ContentOrder) -> Result<Vec<Content>> {
        let content = self.content.read().map_err(|_| lock_poisoned())?;
        let mut matched: Vec<Content> = content
            .values()
            .filter(|c| predicate.matches(c))
            .cloned()
            .collect();
        order.sort(&mut matched);
        Ok(matched)
    }
}

#[async_trait]
impl ContentReader for MemoryCatalogRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Content>> {
        let content = self.content.read().map_err(|_| lock_poisoned())?;
        Ok(content.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Content>> {
        let content = self.content.read().map_err(|_| lock_poisoned())?;
        Ok(ids.iter().filter_map(|id| content.get(id).cloned()).collect())
    }
}

#[async_trait]
impl CatalogRepository for MemoryCatalogRepository {
    async fn find_page(
        &self,
        predicate: &ContentPredicate,
        order: ContentOrder,
        page: PageRequest,
    ) -> Result<Page<Content>> {
        let matched = self.matching(predicate, order)?;
        let total = matched.len() as u64;
        Ok(Page::new(page.slice(&matched), page, total))
    }

    async fn find_candidates(
        &self,
        predicate: &ContentPredicate,
        order: ContentOrder,
        limit: u64,
    ) -> Result<Vec<Content>> {
        let mut matched = self.matching(predicate, order)?;
        matched.truncate(limit as usize);
        Ok(matched)
    }

    async fn count(&self, predicate: &ContentPredicate) -> Result<u64> {
        let content = self.content.read().map_err(|_| lock_poisoned())?;
        Ok(content.values().filter(|c| predicate.matches(c)).count() as u64)
    }

    async fn insert(&self, record: &Content) -> Result<()> {
        let mut content = self.content.write().map_err(|_| lock_poisoned())?;
        content.insert(record.id, record.clone());
        Ok(())
    }

    async fn update(&self, record: &Content) -> Result<bool> {
        let mut content = self.content.write().map_err(|_| lock_poisoned())?;
        match content.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool> {
        let mut content = self.content.write().map_err(|_| lock_poisoned())?;
        match content.get_mut(&id) {
            Some(existing) => {
                existing.is_active = false;
                existing.touch();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_seasons(&self, series_id: Uuid) -> Result<Vec<Season>> {
        let seasons = self.seasons.read().map_err(|_| lock_poisoned())?;
        let mut found: Vec<Season> = seasons
            .iter()
            .filter(|s| s.series_id == series_id)
            .cloned()
            .collect();
        found.sort_by_key(|s| s.season_number);
        Ok(found)
    }

    async fn find_episodes(&self, season_id: Uuid) -> Result<Vec<Episode>> {
        let episodes = self.episodes.read().map_err(|_| lock_poisoned())?;
        let mut found: Vec<Episode> = episodes
            .iter()
            .filter(|e| e.season_id == season_id)
            .cloned()
            .collect();
        found.sort_by_key(|e| e.episode_number);
        Ok(found)
    }
}

/// Shelf store; `replace_entries` swaps the entry list atomically under
/// the write lock, mirroring the transactional Postgres reorder
#[derive(Debug, Default)]
pub struct MemoryShelfRepository {
    shelves: RwLock<HashMap<Uuid, Shelf>>,
    entries: RwLock<Vec<ShelfEntry>>,
}

impl MemoryShelfRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(
        &self,
        shelves: impl IntoIterator<Item = Shelf>,
        entries: impl IntoIterator<Item = ShelfEntry>,
    ) {
        if let Ok(mut stored) = self.shelves.write() {
            for shelf in shelves {
                stored.insert(shelf.id, shelf);
            }
        }
        if let Ok(mut stored) = self.entries.write() {
            stored.extend(entries);
        }
    }
}

#[async_trait]
impl ShelfRepository for MemoryShelfRepository {
    async fn list_active(&self) -> Result<Vec<Shelf>> {
        let shelves = self.shelves.read().map_err(|_| lock_poisoned())?;
        let mut active: Vec<Shelf> = shelves.values().filter(|s| s.is_active).cloned().collect();
        active.sort_by(|a, b| a.display_order.cmp(&b.display_order).then(a.id.cmp(&b.id)));
        Ok(active)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Shelf>> {
        let shelves = self.shelves.read().map_err(|_| lock_poisoned())?;
        Ok(shelves.get(&id).cloned())
    }

    async fn entries_for(&self, shelf_ids: &[Uuid]) -> Result<Vec<ShelfEntry>> {
        let entries = self.entries.read().map_err(|_| lock_poisoned())?;
        let mut found: Vec<ShelfEntry> = entries
            .iter()
            .filter(|e| shelf_ids.contains(&e.shelf_id))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then(a.content_id.cmp(&b.content_id))
        });
        Ok(found)
    }

    async fn insert(&self, shelf: &Shelf) -> Result<()> {
        let mut shelves = self.shelves.write().map_err(|_| lock_poisoned())?;
        shelves.insert(shelf.id, shelf.clone());
        Ok(())
    }

    async fn update(&self, shelf: &Shelf) -> Result<bool> {
        let mut shelves = self.shelves.write().map_err(|_| lock_poisoned())?;
        match shelves.get_mut(&shelf.id) {
            Some(existing) => {
                *existing = shelf.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn replace_entries(&self, shelf_id: Uuid, new_entries: &[ShelfEntry]) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| lock_poisoned())?;
        entries.retain(|e| e.shelf_id != shelf_id);
        entries.extend(new_entries.iter().cloned());
        Ok(())
    }

    async fn remove_entry(&self, shelf_id: Uuid, content_id: Uuid) -> Result<bool> {
        let mut entries = self.entries.write().map_err(|_| lock_poisoned())?;
        let before = entries.len();
        entries.retain(|e| !(e.shelf_id == shelf_id && e.content_id == content_id));
        Ok(entries.len() != before)
    }
}

/// Watch history store keyed by (profile, content, episode)
#[derive(Debug, Default)]
pub struct MemoryWatchHistoryRepository {
    rows: RwLock<Vec<WatchHistory>>,
}

impl MemoryWatchHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, records: impl IntoIterator<Item = WatchHistory>) {
        if let Ok(mut rows) = self.rows.write() {
            rows.extend(records);
        }
    }
}

#[async_trait]
impl WatchHistoryRepository for MemoryWatchHistoryRepository {
    async fn upsert(&self, record: &WatchHistory) -> Result<WatchHistory> {
        let mut rows = self.rows.write().map_err(|_| lock_poisoned())?;
        if let Some(existing) = rows.iter_mut().find(|r| {
            r.profile_id == record.profile_id
                && r.content_id == record.content_id
                && r.episode_id == record.episode_id
        }) {
            existing.watch_duration_seconds = record.watch_duration_seconds;
            existing.total_duration_seconds = record.total_duration_seconds;
            existing.progress_percentage = record.progress_percentage;
            existing.is_completed = record.is_completed;
            existing.watched_at = record.watched_at;
            return Ok(existing.clone());
        }
        rows.push(record.clone());
        Ok(record.clone())
    }

    async fn find_for_profile(&self, profile_id: Uuid, limit: u64) -> Result<Vec<WatchHistory>> {
        let rows = self.rows.read().map_err(|_| lock_poisoned())?;
        let mut found: Vec<WatchHistory> = rows
            .iter()
            .filter(|r| r.profile_id == profile_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.watched_at.cmp(&a.watched_at).then(a.id.cmp(&b.id)));
        found.truncate(limit as usize);
        Ok(found)
    }

    async fn find_resumable(&self, profile_id: Uuid, limit: u64) -> Result<Vec<WatchHistory>> {
        let rows = self.rows.read().map_err(|_| lock_poisoned())?;
        let mut found: Vec<WatchHistory> = rows
            .iter()
            .filter(|r| r.profile_id == profile_id && r.is_resumable())
            .cloned()
            .collect();
        found.sort_by(|a, b| b.watched_at.cmp(&a.watched_at).then(a.id.cmp(&b.id)));
        found.truncate(limit as usize);
        Ok(found)
    }

    async fn delete(&self, profile_id: Uuid, content_id: Uuid) -> Result<bool> {
        let mut rows = self.rows.write().map_err(|_| lock_poisoned())?;
        let before = rows.len();
        rows.retain(|r| !(r.profile_id == profile_id && r.content_id == content_id));
        Ok(rows.len() != before)
    }
}

#[async_trait]
impl WatchStatsRepository for MemoryWatchHistoryRepository {
    async fn watch_counts(
        &self,
        since: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<(Uuid, i64)>> {
        let rows = self.rows.read().map_err(|_| lock_poisoned())?;
        let mut profiles_per_content: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for row in rows.iter().filter(|r| r.watched_at >= since) {
            let profiles = profiles_per_content.entry(row.content_id).or_default();
            if !profiles.contains(&row.profile_id) {
                profiles.push(row.profile_id);
            }
        }
        let mut counts: Vec<(Uuid, i64)> = profiles_per_content
            .into_iter()
            .map(|(content_id, profiles)| (content_id, profiles.len() as i64))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        counts.truncate(limit as usize);
        Ok(counts)
    }
}

/// Watchlist and like store
#[derive(Debug, Default)]
pub struct MemoryEngagementRepository {
    watchlist: RwLock<Vec<WatchlistEntry>>,
    likes: RwLock<Vec<ContentLike>>,
}

impl MemoryEngagementRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EngagementRepository for MemoryEngagementRepository {
    async fn add_to_watchlist(&self, entry: &WatchlistEntry) -> Result<bool> {
        let mut watchlist = self.watchlist.write().map_err(|_| lock_poisoned())?;
        if watchlist
            .iter()
            .any(|e| e.profile_id == entry.profile_id && e.content_id == entry.content_id)
        {
            return Ok(false);
        }
        watchlist.push(entry.clone());
        Ok(true)
    }

    async fn remove_from_watchlist(&self, profile_id: Uuid, content_id: Uuid) -> Result<bool> {
        let mut watchlist = self.watchlist.write().map_err(|_| lock_poisoned())?;
        let before = watchlist.len();
        watchlist.retain(|e| !(e.profile_id == profile_id && e.content_id == content_id));
        Ok(watchlist.len() != before)
    }

    async fn watchlist_for_profile(&self, profile_id: Uuid) -> Result<Vec<WatchlistEntry>> {
        let watchlist = self.watchlist.read().map_err(|_| lock_poisoned())?;
        let mut found: Vec<WatchlistEntry> = watchlist
            .iter()
            .filter(|e| e.profile_id == profile_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.added_at.cmp(&a.added_at).then(a.content_id.cmp(&b.content_id)));
        Ok(found)
    }

    async fn like(&self, entry: &ContentLike) -> Result<bool> {
        let mut likes = self.likes.write().map_err(|_| lock_poisoned())?;
        if likes
            .iter()
            .any(|e| e.profile_id == entry.profile_id && e.content_id == entry.content_id)
        {
            return Ok(false);
        }
        likes.push(entry.clone());
        Ok(true)
    }

    async fn unlike(&self, profile_id: Uuid, content_id: Uuid) -> Result<bool> {
        let mut likes = self.likes.write().map_err(|_| lock_poisoned())?;
        let before = likes.len();
        likes.retain(|e| !(e.profile_id == profile_id && e.content_id == content_id));
        Ok(likes.len() != before)
    }

    async fn like_count(&self, content_id: Uuid) -> Result<i64> {
        let likes = self.likes.read().map_err(|_| lock_poisoned())?;
        Ok(likes.iter().filter(|e| e.content_id == content_id).count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AgeRating, ContentType};

    fn movie(title: &str, year: i32) -> Content {
        Content::new(ContentType::Movie, title, year, AgeRating::PG)
    }

    #[tokio::test]
    async fn test_find_page_filters_and_paginates() {
        let repo = MemoryCatalogRepository::new();
        repo.seed((0..25).map(|i| movie(&format!("Movie {:02}", i), 2000 + i)));

        let page = repo
            .find_page(
                &ContentPredicate::new(),
                ContentOrder::TitleAsc,
                PageRequest::from_params(Some(2), Some(10)),
            )
            .await
            .unwrap();

        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total_items, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items[0].title, "Movie 10");
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_queries() {
        let repo = MemoryCatalogRepository::new();
        let record = movie("Gone", 2020);
        let id = record.id;
        repo.seed([record]);

        assert!(repo.soft_delete(id).await.unwrap());
        assert_eq!(repo.count(&ContentPredicate::new()).await.unwrap(), 0);
        // still reachable by id for history joins
        assert!(repo.find_by_id(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_history_upsert_replaces_existing_row() {
        let repo = MemoryWatchHistoryRepository::new();
        let profile = Uuid::new_v4();
        let content = Uuid::new_v4();

        let mut row = WatchHistory {
            id: Uuid::new_v4(),
            profile_id: profile,
            content_id: content,
            episode_id: None,
            watch_duration_seconds: 60,
            total_duration_seconds: 6000,
            progress_percentage: 1.0,
            is_completed: false,
            watched_at: Utc::now(),
        };
        repo.upsert(&row).await.unwrap();

        row.progress_percentage = 50.0;
        repo.upsert(&row).await.unwrap();

        let rows = repo.find_for_profile(profile, 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].progress_percentage, 50.0);
    }

    #[tokio::test]
    async fn test_watch_counts_distinct_profiles() {
        let repo = MemoryWatchHistoryRepository::new();
        let content = Uuid::new_v4();
        let profile = Uuid::new_v4();
        let since = Utc::now() - chrono::Duration::days(7);

        for episode in [Some(Uuid::new_v4()), Some(Uuid::new_v4()), None] {
            repo.seed([WatchHistory {
                id: Uuid::new_v4(),
                profile_id: profile,
                content_id: content,
                episode_id: episode,
                watch_duration_seconds: 60,
                total_duration_seconds: 600,
                progress_percentage: 10.0,
                is_completed: false,
                watched_at: Utc::now(),
            }]);
        }

        let counts = repo.watch_counts(since, 10).await.unwrap();
        // three rows, one distinct profile
        assert_eq!(counts, vec![(content, 1)]);
    }

    #[tokio::test]
    async fn test_watchlist_add_is_idempotent() {
        let repo = MemoryEngagementRepository::new();
        let entry = WatchlistEntry {
            profile_id: Uuid::new_v4(),
            content_id: Uuid::new_v4(),
            added_at: Utc::now(),
        };
        assert!(repo.add_to_watchlist(&entry).await.unwrap());
        assert!(!repo.add_to_watchlist(&entry).await.unwrap());
    }

    #[tokio::test]
    async fn test_replace_entries_swaps_whole_shelf() {
        let repo = MemoryShelfRepository::new();
        let shelf = Shelf::new("Trending", 0);
        let shelf_id = shelf.id;
        let old_entry = ShelfEntry {
            shelf_id,
            content_id: Uuid::new_v4(),
            display_order: 0,
            is_featured: false,
        };
        repo.seed([shelf], [old_entry.clone()]);

        let new_entry = ShelfEntry {
            shelf_id,
            content_id: Uuid::new_v4(),
            display_order: 0,
            is_featured: true,
        };
        repo.replace_entries(shelf_id, &[new_entry.clone()])
            .await
            .unwrap();

        let entries = repo.entries_for(&[shelf_id]).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content_id, new_entry.content_id);
    }
}
