//! Shelf browsing: the grouped home-screen view
//!
//! Two-level ordering, both stable: shelves by display order (tie by id),
//! titles within a shelf by entry display order (tie by content id). A
//! shelf whose titles are all gated away for this viewer is suppressed
//! entirely rather than rendered empty.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use vod_core::models::{ProfileContextEcho, Shelf, ViewerContext};
use vod_core::policy;
use vod_core::predicate::ContentPredicate;
use vod_core::repository::{CatalogRepository, ContentReader, ShelfRepository};
use vod_core::types::ContentStatus;
use vod_core::{Content, Result};

/// One shelf with its visible titles, already ordered
#[derive(Debug, Serialize)]
pub struct ShelfView {
    pub id: Uuid,
    pub name: String,
    pub display_order: i32,
    pub items: Vec<Content>,
}

/// The grouped browse response
#[derive(Debug, Serialize)]
pub struct ShelfBrowse {
    pub shelves: Vec<ShelfView>,
    pub profile_context: ProfileContextEcho,
}

pub struct ShelfBrowseService {
    shelves: Arc<dyn ShelfRepository>,
    catalog: Arc<dyn CatalogRepository>,
}

impl ShelfBrowseService {
    pub fn new(shelves: Arc<dyn ShelfRepository>, catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { shelves, catalog }
    }

    #[instrument(skip(self, viewer))]
    pub async fn browse(&self, viewer: &ViewerContext) -> Result<ShelfBrowse> {
        let shelves: Vec<Shelf> = self
            .shelves
            .list_active()
            .await?
            .into_iter()
            .filter(|s| !viewer.is_child_profile || s.show_on_child_profile)
            .collect();

        let shelf_ids: Vec<Uuid> = shelves.iter().map(|s| s.id).collect();
        let entries = self.shelves.entries_for(&shelf_ids).await?;

        let content_ids: Vec<Uuid> = entries.iter().map(|e| e.content_id).collect();
        let records: HashMap<Uuid, Content> = self
            .catalog
            .find_by_ids(&content_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let predicate = policy::apply_viewer_gates(
            ContentPredicate::new().with_statuses(vec![ContentStatus::Published]),
            viewer,
        );

        let mut views = Vec::with_capacity(shelves.len());
        for shelf in shelves {
            // entries_for already ordered by display order, then content id
            let items: Vec<Content> = entries
                .iter()
                .filter(|e| e.shelf_id == shelf.id)
                .filter_map(|e| records.get(&e.content_id))
                .filter(|c| predicate.matches(c))
                .cloned()
                .collect();

            if items.is_empty() {
                continue;
            }

            views.push(ShelfView {
                id: shelf.id,
                name: shelf.name,
                display_order: shelf.display_order,
                items,
            });
        }

        Ok(ShelfBrowse {
            shelves: views,
            profile_context: ProfileContextEcho::from(viewer),
        })
    }
}
