//! Watch-progress recording
//!
//! One row per (profile, content, episode); reporting progress again
//! replaces the row. Progress percentage is derived server-side from the
//! reported durations, and crossing [`COMPLETION_THRESHOLD`] marks the row
//! completed, which permanently removes it from continue-watching.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use vod_core::models::{WatchHistory, COMPLETION_THRESHOLD};
use vod_core::repository::{ContentReader, WatchHistoryRepository};
use vod_core::{CatalogError, Result};

/// A progress report from the player
///
/// `content_id` is always the top-level catalog record; for episodic
/// playback it is the series and `episode_id` names the episode.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressUpdate {
    pub content_id: Uuid,
    pub episode_id: Option<Uuid>,
    pub watch_duration_seconds: i32,
    pub total_duration_seconds: i32,
}

pub struct WatchProgressService {
    history: Arc<dyn WatchHistoryRepository>,
    content: Arc<dyn ContentReader>,
}

impl WatchProgressService {
    pub fn new(
        history: Arc<dyn WatchHistoryRepository>,
        content: Arc<dyn ContentReader>,
    ) -> Self {
        Self { history, content }
    }

    #[instrument(skip(self, update), fields(content_id = %update.content_id))]
    pub async fn record_progress(
        &self,
        profile_id: Uuid,
        update: ProgressUpdate,
    ) -> Result<WatchHistory> {
        if update.total_duration_seconds <= 0 {
            return Err(CatalogError::validation(
                "total_duration_seconds must be positive",
            ));
        }
        if update.watch_duration_seconds < 0 {
            return Err(CatalogError::validation(
                "watch_duration_seconds must not be negative",
            ));
        }

        self.content
            .find_by_id(update.content_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| {
                CatalogError::not_found(format!("content {} not found", update.content_id))
            })?;

        let progress = (update.watch_duration_seconds as f32
            / update.total_duration_seconds as f32
            * 100.0)
            .clamp(0.0, 100.0);

        let record = WatchHistory {
            id: Uuid::new_v4(),
            profile_id,
            content_id: update.content_id,
            episode_id: update.episode_id,
            watch_duration_seconds: update.watch_duration_seconds,
            total_duration_seconds: update.total_duration_seconds,
            progress_percentage: progress,
            is_completed: progress >= COMPLETION_THRESHOLD,
            watched_at: Utc::now(),
        };

        self.history.upsert(&record).await
    }

    /// Recent history for a profile, newest first
    pub async fn history(&self, profile_id: Uuid, limit: u64) -> Result<Vec<WatchHistory>> {
        self.history.find_for_profile(profile_id, limit).await
    }

    /// Remove every history row for one title
    pub async fn forget(&self, profile_id: Uuid, content_id: Uuid) -> Result<()> {
        if !self.history.delete(profile_id, content_id).await? {
            return Err(CatalogError::not_found(format!(
                "no history for content {}",
                content_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vod_core::repository::{MemoryCatalogRepository, MemoryWatchHistoryRepository};
    use vod_core::types::{AgeRating, ContentType};
    use vod_core::Content;

    fn service_with_movie() -> (WatchProgressService, Uuid) {
        let catalog = Arc::new(MemoryCatalogRepository::new());
        let movie = Content::new(ContentType::Movie, "Test", 2024, AgeRating::PG);
        let id = movie.id;
        catalog.seed([movie]);
        let service = WatchProgressService::new(
            Arc::new(MemoryWatchHistoryRepository::new()),
            catalog,
        );
        (service, id)
    }

    #[tokio::test]
    async fn test_progress_is_derived_from_durations() {
        let (service, content_id) = service_with_movie();
        let record = service
            .record_progress(
                Uuid::new_v4(),
                ProgressUpdate {
                    content_id,
                    episode_id: None,
                    watch_duration_seconds: 1500,
                    total_duration_seconds: 6000,
                },
            )
            .await
            .unwrap();
        assert!((record.progress_percentage - 25.0).abs() < f32::EPSILON);
        assert!(!record.is_completed);
    }

    #[tokio::test]
    async fn test_crossing_threshold_marks_completed() {
        let (service, content_id) = service_with_movie();
        let record = service
            .record_progress(
                Uuid::new_v4(),
                ProgressUpdate {
                    content_id,
                    episode_id: None,
                    watch_duration_seconds: 5800,
                    total_duration_seconds: 6000,
                },
            )
            .await
            .unwrap();
        assert!(record.is_completed);
    }

    #[tokio::test]
    async fn test_zero_total_duration_rejected() {
        let (service, content_id) = service_with_movie();
        let err = service
            .record_progress(
                Uuid::new_v4(),
                ProgressUpdate {
                    content_id,
                    episode_id: None,
                    watch_duration_seconds: 10,
                    total_duration_seconds: 0,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_content_rejected() {
        let (service, _) = service_with_movie();
        let err = service
            .record_progress(
                Uuid::new_v4(),
                ProgressUpdate {
                    content_id: Uuid::new_v4(),
                    episode_id: None,
                    watch_duration_seconds: 10,
                    total_duration_seconds: 100,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }
}
