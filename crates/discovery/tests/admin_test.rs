//! Administrative operations against the in-memory stores

mod common;

use common::{published, services};
use uuid::Uuid;
use vod_core::repository::ShelfRepository;
use vod_core::types::{AgeRating, ContentStatus, ContentType};
use vod_core::{CatalogError, ViewerContext};
use vod_discovery::admin::service::{
    CreateContentRequest, CreateShelfRequest, ReorderEntry, ReorderShelfRequest,
    UpdateContentRequest,
};
use vod_discovery::catalog::ListRequest;

fn create_request(title: &str) -> CreateContentRequest {
    CreateContentRequest {
        title: title.to_string(),
        subtitle: None,
        description: None,
        content_type: ContentType::Movie,
        genres: vec!["Action".to_string()],
        duration_minutes: Some(110),
        release_year: 2024,
        age_rating: AgeRating::PG13,
        language: Some("en".to_string()),
        cast_members: vec![],
        directors: vec![],
        characters: vec![],
        available_countries: vec![],
        restricted_countries: vec![],
        globally_available: true,
    }
}

#[tokio::test]
async fn created_content_starts_as_draft() {
    let s = services();
    let content = s.admin.create_content(create_request("New Movie")).await.unwrap();
    assert_eq!(content.status, ContentStatus::Draft);

    // invisible until published
    let listing = s
        .catalog
        .list(ListRequest::default(), &ViewerContext::anonymous())
        .await
        .unwrap();
    assert_eq!(listing.page.total_items, 0);

    s.admin
        .update_content(
            content.id,
            UpdateContentRequest {
                status: Some(ContentStatus::Published),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let listing = s
        .catalog
        .list(ListRequest::default(), &ViewerContext::anonymous())
        .await
        .unwrap();
    assert_eq!(listing.page.total_items, 1);
}

#[tokio::test]
async fn create_rejects_blank_title_and_bad_country() {
    let s = services();

    let mut request = create_request("  ");
    let err = s.admin.create_content(request).await.unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));

    request = create_request("Fine Title");
    request.available_countries = vec!["USA".to_string()];
    let err = s.admin.create_content(request).await.unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
}

#[tokio::test]
async fn update_unknown_content_is_not_found() {
    let s = services();
    let err = s
        .admin
        .update_content(Uuid::new_v4(), UpdateContentRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}

#[tokio::test]
async fn feature_toggle_sets_and_clears_timestamp() {
    let s = services();
    let movie = published("Spotlight", 2023, AgeRating::PG, &[]);
    let id = movie.id;
    s.catalog_repo.seed([movie]);

    let featured = s.admin.set_featured(id, true).await.unwrap();
    assert!(featured.is_featured());

    let unfeatured = s.admin.set_featured(id, false).await.unwrap();
    assert!(!unfeatured.is_featured());
}

#[tokio::test]
async fn soft_delete_removes_from_listings() {
    let s = services();
    let movie = published("Short Lived", 2023, AgeRating::PG, &[]);
    let id = movie.id;
    s.catalog_repo.seed([movie]);

    s.admin.delete_content(id).await.unwrap();

    let listing = s
        .catalog
        .list(ListRequest::default(), &ViewerContext::anonymous())
        .await
        .unwrap();
    assert_eq!(listing.page.total_items, 0);

    let err = s.admin.delete_content(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}

#[tokio::test]
async fn shelf_reorder_replaces_all_entries() {
    let s = services();
    let shelf = s
        .admin
        .create_shelf(CreateShelfRequest {
            name: "Trending".to_string(),
            display_order: 1,
            show_on_child_profile: false,
        })
        .await
        .unwrap();

    let (first, second) = (Uuid::new_v4(), Uuid::new_v4());
    s.admin
        .reorder_shelf(
            shelf.id,
            ReorderShelfRequest {
                entries: vec![
                    ReorderEntry {
                        content_id: first,
                        display_order: 2,
                        is_featured: false,
                    },
                    ReorderEntry {
                        content_id: second,
                        display_order: 1,
                        is_featured: true,
                    },
                ],
            },
        )
        .await
        .unwrap();

    let entries = s.shelf_repo.entries_for(&[shelf.id]).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].content_id, second);

    // a second reorder fully replaces the first
    s.admin
        .reorder_shelf(
            shelf.id,
            ReorderShelfRequest {
                entries: vec![ReorderEntry {
                    content_id: first,
                    display_order: 1,
                    is_featured: false,
                }],
            },
        )
        .await
        .unwrap();
    let entries = s.shelf_repo.entries_for(&[shelf.id]).await.unwrap();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn shelf_reorder_rejects_duplicate_content() {
    let s = services();
    let shelf = s
        .admin
        .create_shelf(CreateShelfRequest {
            name: "Top Ten".to_string(),
            display_order: 1,
            show_on_child_profile: false,
        })
        .await
        .unwrap();

    let dup = Uuid::new_v4();
    let err = s
        .admin
        .reorder_shelf(
            shelf.id,
            ReorderShelfRequest {
                entries: vec![
                    ReorderEntry {
                        content_id: dup,
                        display_order: 1,
                        is_featured: false,
                    },
                    ReorderEntry {
                        content_id: dup,
                        display_order: 2,
                        is_featured: false,
                    },
                ],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
}

#[tokio::test]
async fn reorder_unknown_shelf_is_not_found() {
    let s = services();
    let err = s
        .admin
        .reorder_shelf(Uuid::new_v4(), ReorderShelfRequest { entries: vec![] })
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}
