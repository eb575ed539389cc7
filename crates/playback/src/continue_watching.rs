//! The continue-watching view
//!
//! Resumable rows are the profile's history entries with progress strictly
//! between 0% and the completion threshold, not marked completed, newest
//! first. Each row joins to its catalog record; records the viewer can no
//! longer see (child gate, geo gate, taken down, unpublished) are silently
//! excluded rather than surfaced as errors.

use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;

use vod_core::models::{ProfileContextEcho, ViewerContext, WatchHistory};
use vod_core::policy;
use vod_core::predicate::ContentPredicate;
use vod_core::repository::{ContentReader, WatchHistoryRepository};
use vod_core::types::ContentStatus;
use vod_core::{CatalogError, Content, Result};

/// Returned rows are capped at this many
pub const CONTINUE_WATCHING_LIMIT: u64 = 20;

/// Overfetch factor so gating cannot empty the view prematurely
const FETCH_MULTIPLIER: u64 = 3;

#[derive(Debug, Serialize)]
pub struct ResumeItem {
    #[serde(flatten)]
    pub content: Content,
    pub episode_id: Option<uuid::Uuid>,
    pub progress_percentage: f32,
    pub watched_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct ContinueWatching {
    pub items: Vec<ResumeItem>,
    pub profile_context: ProfileContextEcho,
}

pub struct ContinueWatchingService {
    history: Arc<dyn WatchHistoryRepository>,
    content: Arc<dyn ContentReader>,
}

impl ContinueWatchingService {
    pub fn new(
        history: Arc<dyn WatchHistoryRepository>,
        content: Arc<dyn ContentReader>,
    ) -> Self {
        Self { history, content }
    }

    #[instrument(skip(self, viewer))]
    pub async fn for_viewer(&self, viewer: &ViewerContext) -> Result<ContinueWatching> {
        let profile_id = viewer
            .profile_id
            .ok_or_else(|| CatalogError::validation("a profile is required"))?;

        let rows: Vec<WatchHistory> = self
            .history
            .find_resumable(profile_id, CONTINUE_WATCHING_LIMIT * FETCH_MULTIPLIER)
            .await?;

        let ids: Vec<uuid::Uuid> = rows.iter().map(|r| r.content_id).collect();
        let records = self.content.find_by_ids(&ids).await?;

        let predicate = policy::apply_viewer_gates(
            ContentPredicate::new().with_statuses(vec![ContentStatus::Published]),
            viewer,
        );

        let mut items = Vec::new();
        for row in rows {
            if items.len() as u64 == CONTINUE_WATCHING_LIMIT {
                break;
            }
            let Some(content) = records.iter().find(|c| c.id == row.content_id) else {
                continue;
            };
            if !predicate.matches(content) {
                continue;
            }
            items.push(ResumeItem {
                content: content.clone(),
                episode_id: row.episode_id,
                progress_percentage: row.progress_percentage,
                watched_at: row.watched_at,
            });
        }

        Ok(ContinueWatching {
            items,
            profile_context: ProfileContextEcho::from(viewer),
        })
    }
}
