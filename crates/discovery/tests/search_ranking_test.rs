//! Search behavior: matching, ranking, highlighting, pagination

mod common;

use common::{published, services};
use vod_core::pagination::PageRequest;
use vod_core::types::AgeRating;
use vod_core::{CatalogError, ViewerContext};

#[tokio::test]
async fn search_returns_only_textual_matches() {
    let s = services();
    let mut with_character = published("Gotham Knights", 2022, AgeRating::PG13, &["Action"]);
    with_character.characters = vec!["Batman".to_string()];
    s.catalog_repo.seed([
        published("The Batman", 2022, AgeRating::PG13, &["Action"]),
        with_character,
        published("Ocean Life", 2022, AgeRating::G, &["Documentary"]),
    ]);

    let hits = s
        .search
        .search("batman", PageRequest::default(), &ViewerContext::anonymous())
        .await
        .unwrap();

    assert_eq!(hits.page.total_items, 2);
    assert!(hits
        .page
        .items
        .iter()
        .all(|h| h.content.title != "Ocean Life"));
}

#[tokio::test]
async fn title_match_outranks_weaker_fields_regardless_of_recency() {
    let s = services();
    let mut old_title_match = published("Robot Dreams", 1991, AgeRating::PG, &["Animation"]);
    old_title_match.description = Some("Quiet film".to_string());

    let mut new_description_match = published("Future City", 2024, AgeRating::PG, &["Sci-Fi"]);
    new_description_match.description = Some("A robot wanders the city".to_string());

    let title_id = old_title_match.id;
    s.catalog_repo.seed([old_title_match, new_description_match]);

    let hits = s
        .search
        .search("robot", PageRequest::default(), &ViewerContext::anonymous())
        .await
        .unwrap();

    assert_eq!(hits.page.items[0].content.id, title_id);
}

#[tokio::test]
async fn equal_priority_matches_order_by_recency() {
    let s = services();
    let older = published("Eclipse", 1999, AgeRating::PG, &["Drama"]);
    let newer = published("Eclipse", 2021, AgeRating::PG, &["Drama"]);
    let newer_id = newer.id;
    s.catalog_repo.seed([older, newer]);

    let hits = s
        .search
        .search("eclipse", PageRequest::default(), &ViewerContext::anonymous())
        .await
        .unwrap();
    assert_eq!(hits.page.items[0].content.id, newer_id);
}

#[tokio::test]
async fn short_term_is_validation_error() {
    let s = services();
    let err = s
        .search
        .search("a", PageRequest::default(), &ViewerContext::anonymous())
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));

    // whitespace does not count toward the minimum
    let err = s
        .search
        .search("  b  ", PageRequest::default(), &ViewerContext::anonymous())
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
}

#[tokio::test]
async fn hits_carry_em_highlights() {
    let s = services();
    s.catalog_repo.seed([published(
        "Deep Blue Sea",
        2020,
        AgeRating::PG13,
        &["Thriller"],
    )]);

    let hits = s
        .search
        .search("blue", PageRequest::default(), &ViewerContext::anonymous())
        .await
        .unwrap();
    assert_eq!(hits.page.items[0].highlighted_title, "Deep <em>Blue</em> Sea");
}

#[tokio::test]
async fn search_results_paginate() {
    let s = services();
    s.catalog_repo.seed(
        (0..30).map(|i| published(&format!("Star Journey {}", i), 2000 + i, AgeRating::PG, &[])),
    );

    let page_two = s
        .search
        .search(
            "star",
            PageRequest::from_params(Some(2), Some(10)),
            &ViewerContext::anonymous(),
        )
        .await
        .unwrap();

    assert_eq!(page_two.page.items.len(), 10);
    assert_eq!(page_two.page.total_items, 30);
    assert_eq!(page_two.page.total_pages, 3);
    assert!(page_two.page.has_previous);
    assert!(page_two.page.has_next);
}

#[tokio::test]
async fn unpublished_records_never_match() {
    let s = services();
    let mut draft = published("Hidden Gem", 2024, AgeRating::PG, &[]);
    draft.status = vod_core::types::ContentStatus::Draft;
    s.catalog_repo.seed([draft]);

    let hits = s
        .search
        .search("hidden", PageRequest::default(), &ViewerContext::anonymous())
        .await
        .unwrap();
    assert_eq!(hits.page.total_items, 0);
}
