//! Catalog listing operations
//!
//! Every operation builds a [`ContentPredicate`] from the request, routes
//! it through the viewer gates, and hands it to the repository; nothing
//! here or below this layer re-implements gating.

use std::sync::Arc;

use chrono::{Datelike, Duration, Utc};
use tracing::instrument;
use uuid::Uuid;

use vod_core::models::{ProfileContextEcho, ViewerContext};
use vod_core::pagination::PageRequest;
use vod_core::policy;
use vod_core::predicate::{ContentOrder, ContentPredicate};
use vod_core::repository::{CatalogRepository, ContentReader, WatchStatsRepository};
use vod_core::types::{ContentStatus, ContentType};
use vod_core::{CatalogError, Result};

use super::types::{ContentDetail, ListRequest, Listing, SeasonDetail, WatchedItem};

/// Window for the everyone's-watching count
const WATCHING_WINDOW_DAYS: i64 = 7;

/// Everyone's-watching returns at most this many titles
const WATCHING_LIMIT: u64 = 20;

pub struct CatalogQueryService {
    catalog: Arc<dyn CatalogRepository>,
    stats: Arc<dyn WatchStatsRepository>,
}

impl CatalogQueryService {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        stats: Arc<dyn WatchStatsRepository>,
    ) -> Self {
        Self { catalog, stats }
    }

    /// The general catalog listing
    #[instrument(skip(self, viewer))]
    pub async fn list(
        &self,
        request: ListRequest,
        viewer: &ViewerContext,
    ) -> Result<Listing<vod_core::Content>> {
        policy::validate_child_filters(&request.genres, &request.age_ratings, viewer)?;

        let predicate = policy::apply_viewer_gates(
            request
                .to_predicate()
                .with_statuses(vec![ContentStatus::Published]),
            viewer,
        );

        let page = self
            .catalog
            .find_page(&predicate, request.order, request.page)
            .await?;
        Ok(Listing::new(page, predicate, viewer))
    }

    /// The kids listing: child gate forced regardless of profile
    #[instrument(skip(self, viewer))]
    pub async fn kids(
        &self,
        request: ListRequest,
        viewer: &ViewerContext,
    ) -> Result<Listing<vod_core::Content>> {
        let mut as_child = viewer.clone();
        as_child.is_child_profile = true;
        self.list(request, &as_child).await
    }

    /// Currently featured titles, most recently featured first
    #[instrument(skip(self, viewer))]
    pub async fn featured(
        &self,
        page: PageRequest,
        viewer: &ViewerContext,
    ) -> Result<Listing<vod_core::Content>> {
        let predicate = policy::apply_viewer_gates(
            ContentPredicate::new()
                .with_statuses(vec![ContentStatus::Published])
                .with_featured(true),
            viewer,
        );

        let page = self
            .catalog
            .find_page(&predicate, ContentOrder::FeaturedRecency, page)
            .await?;
        Ok(Listing::new(page, predicate, viewer))
    }

    /// Titles on their way to the catalog, soonest first
    #[instrument(skip(self, viewer))]
    pub async fn upcoming(
        &self,
        page: PageRequest,
        viewer: &ViewerContext,
    ) -> Result<Listing<vod_core::Content>> {
        let predicate = policy::apply_viewer_gates(
            ContentPredicate::new().upcoming_after(Utc::now().year()),
            viewer,
        );

        let page = self
            .catalog
            .find_page(&predicate, ContentOrder::ReleaseYearAsc, page)
            .await?;
        Ok(Listing::new(page, predicate, viewer))
    }

    /// Most-watched titles of the last week, by distinct profiles
    ///
    /// Counts come from raw watch-history rows in the window; no decay.
    /// Gated titles drop out after counting, so a child profile sees a
    /// shorter list rather than shifted counts.
    #[instrument(skip(self, viewer))]
    pub async fn everyones_watching(
        &self,
        viewer: &ViewerContext,
    ) -> Result<(Vec<WatchedItem>, ProfileContextEcho)> {
        let since = Utc::now() - Duration::days(WATCHING_WINDOW_DAYS);
        // overfetch so gating cannot empty the list prematurely
        let counts = self.stats.watch_counts(since, WATCHING_LIMIT * 5).await?;

        let ids: Vec<Uuid> = counts.iter().map(|(id, _)| *id).collect();
        let records = self.catalog.find_by_ids(&ids).await?;

        let predicate = policy::apply_viewer_gates(
            ContentPredicate::new().with_statuses(vec![ContentStatus::Published]),
            viewer,
        );

        let mut items: Vec<WatchedItem> = Vec::new();
        for (content_id, watch_count) in counts {
            if items.len() as u64 == WATCHING_LIMIT {
                break;
            }
            if let Some(content) = records.iter().find(|c| c.id == content_id) {
                if predicate.matches(content) {
                    items.push(WatchedItem {
                        content: content.clone(),
                        watch_count,
                    });
                }
            }
        }

        Ok((items, ProfileContextEcho::from(viewer)))
    }

    /// Full detail for one record
    ///
    /// Gating happens after the fetch: an existing record the viewer may
    /// not see is a 403, an unknown or inactive one a 404.
    #[instrument(skip(self, viewer))]
    pub async fn detail(&self, id: Uuid, viewer: &ViewerContext) -> Result<ContentDetail> {
        let content = self
            .catalog
            .find_by_id(id)
            .await?
            .filter(|c| c.is_active && c.status == ContentStatus::Published)
            .ok_or_else(|| CatalogError::not_found(format!("content {} not found", id)))?;

        if !policy::can_view(&content, viewer) {
            return Err(CatalogError::access_denied(format!(
                "content {} is not available for this profile",
                id
            )));
        }

        let mut seasons = Vec::new();
        if content.content_type == ContentType::Series {
            for season in self.catalog.find_seasons(content.id).await? {
                let episodes = self.catalog.find_episodes(season.id).await?;
                seasons.push(SeasonDetail { season, episodes });
            }
        }

        Ok(ContentDetail {
            content,
            seasons,
            profile_context: ProfileContextEcho::from(viewer),
        })
    }
}
