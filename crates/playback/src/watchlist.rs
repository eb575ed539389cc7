//! Watchlist and likes
//!
//! Membership is a unique (profile, content) pair; adding twice is a
//! no-op. The watchlist listing goes through the same viewer gates as any
//! other listing, silently dropping titles the profile can no longer see.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use vod_core::models::{ContentLike, ProfileContextEcho, ViewerContext, WatchlistEntry};
use vod_core::policy;
use vod_core::predicate::ContentPredicate;
use vod_core::repository::{ContentReader, EngagementRepository};
use vod_core::types::ContentStatus;
use vod_core::{CatalogError, Content, Result};

#[derive(Debug, Serialize)]
pub struct WatchlistView {
    pub items: Vec<Content>,
    pub profile_context: ProfileContextEcho,
}

pub struct WatchlistService {
    engagement: Arc<dyn EngagementRepository>,
    content: Arc<dyn ContentReader>,
}

impl WatchlistService {
    pub fn new(
        engagement: Arc<dyn EngagementRepository>,
        content: Arc<dyn ContentReader>,
    ) -> Self {
        Self { engagement, content }
    }

    fn require_profile(viewer: &ViewerContext) -> Result<Uuid> {
        viewer
            .profile_id
            .ok_or_else(|| CatalogError::validation("a profile is required"))
    }

    async fn require_content(&self, content_id: Uuid) -> Result<()> {
        self.content
            .find_by_id(content_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| CatalogError::not_found(format!("content {} not found", content_id)))?;
        Ok(())
    }

    #[instrument(skip(self, viewer))]
    pub async fn add(&self, viewer: &ViewerContext, content_id: Uuid) -> Result<()> {
        let profile_id = Self::require_profile(viewer)?;
        self.require_content(content_id).await?;
        self.engagement
            .add_to_watchlist(&WatchlistEntry {
                profile_id,
                content_id,
                added_at: Utc::now(),
            })
            .await?;
        Ok(())
    }

    #[instrument(skip(self, viewer))]
    pub async fn remove(&self, viewer: &ViewerContext, content_id: Uuid) -> Result<()> {
        let profile_id = Self::require_profile(viewer)?;
        if !self
            .engagement
            .remove_from_watchlist(profile_id, content_id)
            .await?
        {
            return Err(CatalogError::not_found(format!(
                "content {} is not on the watchlist",
                content_id
            )));
        }
        Ok(())
    }

    /// The profile's watchlist, most recently added first, viewer-gated
    #[instrument(skip(self, viewer))]
    pub async fn list(&self, viewer: &ViewerContext) -> Result<WatchlistView> {
        let profile_id = Self::require_profile(viewer)?;
        let entries = self.engagement.watchlist_for_profile(profile_id).await?;

        let ids: Vec<Uuid> = entries.iter().map(|e| e.content_id).collect();
        let records = self.content.find_by_ids(&ids).await?;

        let predicate = policy::apply_viewer_gates(
            ContentPredicate::new().with_statuses(vec![ContentStatus::Published]),
            viewer,
        );

        let items: Vec<Content> = entries
            .iter()
            .filter_map(|e| records.iter().find(|c| c.id == e.content_id))
            .filter(|c| predicate.matches(c))
            .cloned()
            .collect();

        Ok(WatchlistView {
            items,
            profile_context: ProfileContextEcho::from(viewer),
        })
    }

    #[instrument(skip(self, viewer))]
    pub async fn like(&self, viewer: &ViewerContext, content_id: Uuid) -> Result<()> {
        let profile_id = Self::require_profile(viewer)?;
        self.require_content(content_id).await?;
        self.engagement
            .like(&ContentLike {
                profile_id,
                content_id,
                liked_at: Utc::now(),
            })
            .await?;
        Ok(())
    }

    #[instrument(skip(self, viewer))]
    pub async fn unlike(&self, viewer: &ViewerContext, content_id: Uuid) -> Result<()> {
        let profile_id = Self::require_profile(viewer)?;
        if !self.engagement.unlike(profile_id, content_id).await? {
            return Err(CatalogError::not_found(format!(
                "content {} is not liked",
                content_id
            )));
        }
        Ok(())
    }

    pub async fn like_count(&self, content_id: Uuid) -> Result<i64> {
        self.engagement.like_count(content_id).await
    }
}
