//! Shared fixtures for the discovery test suites

use std::sync::Arc;

use vod_core::models::Content;
use vod_core::repository::{
    MemoryCatalogRepository, MemoryShelfRepository, MemoryWatchHistoryRepository,
};
use vod_core::types::{AgeRating, ContentStatus, ContentType};
use vod_discovery::admin::AdminService;
use vod_discovery::catalog::CatalogQueryService;
use vod_discovery::search::SearchService;
use vod_discovery::shelves::ShelfBrowseService;

/// A published, globally available movie
pub fn published(title: &str, year: i32, rating: AgeRating, genres: &[&str]) -> Content {
    let mut content = Content::new(ContentType::Movie, title, year, rating);
    content.status = ContentStatus::Published;
    content.globally_available = true;
    content.genres = genres.iter().map(|g| g.to_string()).collect();
    content
}

pub struct TestServices {
    pub catalog_repo: Arc<MemoryCatalogRepository>,
    pub shelf_repo: Arc<MemoryShelfRepository>,
    pub history_repo: Arc<MemoryWatchHistoryRepository>,
    pub catalog: CatalogQueryService,
    pub search: SearchService,
    pub shelves: ShelfBrowseService,
    pub admin: AdminService,
}

pub fn services() -> TestServices {
    let catalog_repo = Arc::new(MemoryCatalogRepository::new());
    let shelf_repo = Arc::new(MemoryShelfRepository::new());
    let history_repo = Arc::new(MemoryWatchHistoryRepository::new());

    TestServices {
        catalog: CatalogQueryService::new(catalog_repo.clone(), history_repo.clone()),
        search: SearchService::new(catalog_repo.clone()),
        shelves: ShelfBrowseService::new(shelf_repo.clone(), catalog_repo.clone()),
        admin: AdminService::new(catalog_repo.clone(), shelf_repo.clone()),
        catalog_repo,
        shelf_repo,
        history_repo,
    }
}
