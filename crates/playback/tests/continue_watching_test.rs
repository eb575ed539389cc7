//! Continue-watching behavior

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;
use vod_core::models::{Content, WatchHistory};
use vod_core::repository::{MemoryCatalogRepository, MemoryWatchHistoryRepository};
use vod_core::types::{AgeRating, ContentStatus, ContentType};
use vod_core::ViewerContext;
use vod_playback::continue_watching::ContinueWatchingService;
use vod_playback::history::{ProgressUpdate, WatchProgressService};

fn published(title: &str, rating: AgeRating, genres: &[&str]) -> Content {
    let mut content = Content::new(ContentType::Movie, title, 2023, rating);
    content.status = ContentStatus::Published;
    content.globally_available = true;
    content.genres = genres.iter().map(|g| g.to_string()).collect();
    content
}

fn row(profile_id: Uuid, content_id: Uuid, progress: f32, completed: bool) -> WatchHistory {
    WatchHistory {
        id: Uuid::new_v4(),
        profile_id,
        content_id,
        episode_id: None,
        watch_duration_seconds: 600,
        total_duration_seconds: 6000,
        progress_percentage: progress,
        is_completed: completed,
        watched_at: Utc::now(),
    }
}

fn setup() -> (
    Arc<MemoryCatalogRepository>,
    Arc<MemoryWatchHistoryRepository>,
    ContinueWatchingService,
) {
    let catalog = Arc::new(MemoryCatalogRepository::new());
    let history = Arc::new(MemoryWatchHistoryRepository::new());
    let service = ContinueWatchingService::new(history.clone(), catalog.clone());
    (catalog, history, service)
}

#[tokio::test]
async fn only_rows_in_open_interval_appear() {
    let (catalog, history, service) = setup();
    let profile = Uuid::new_v4();

    let titles: Vec<Content> = ["Started", "Untouched", "Nearly Done", "Finished"]
        .iter()
        .map(|t| published(t, AgeRating::PG, &[]))
        .collect();
    let ids: Vec<Uuid> = titles.iter().map(|c| c.id).collect();
    catalog.seed(titles);

    history.seed([
        row(profile, ids[0], 42.0, false),
        row(profile, ids[1], 0.0, false),
        // 97% progress: past the threshold even though not flagged complete
        row(profile, ids[2], 97.0, false),
        row(profile, ids[3], 50.0, true),
    ]);

    let viewer = ViewerContext::for_profile(profile, false);
    let view = service.for_viewer(&viewer).await.unwrap();

    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].content.title, "Started");
    assert!((view.items[0].progress_percentage - 42.0).abs() < f32::EPSILON);
}

#[tokio::test]
async fn repeated_progress_reports_collapse_to_one_row() {
    let (catalog, history, service) = setup();
    let profile = Uuid::new_v4();

    let movie = published("Long Movie", AgeRating::PG, &[]);
    let movie_id = movie.id;
    catalog.seed([movie]);

    let progress = WatchProgressService::new(history.clone(), catalog.clone());
    for watched in [600, 1800] {
        progress
            .record_progress(
                profile,
                ProgressUpdate {
                    content_id: movie_id,
                    episode_id: None,
                    watch_duration_seconds: watched,
                    total_duration_seconds: 6000,
                },
            )
            .await
            .unwrap();
    }

    let viewer = ViewerContext::for_profile(profile, false);
    let view = service.for_viewer(&viewer).await.unwrap();
    assert_eq!(view.items.len(), 1);
    assert!((view.items[0].progress_percentage - 30.0).abs() < f32::EPSILON);
}

#[tokio::test]
async fn rows_order_newest_first() {
    let (catalog, history, service) = setup();
    let profile = Uuid::new_v4();

    let first = published("Watched Yesterday", AgeRating::PG, &[]);
    let second = published("Watched Just Now", AgeRating::PG, &[]);
    let (first_id, second_id) = (first.id, second.id);
    catalog.seed([first, second]);

    let mut old_row = row(profile, first_id, 30.0, false);
    old_row.watched_at = Utc::now() - Duration::days(1);
    history.seed([old_row, row(profile, second_id, 30.0, false)]);

    let viewer = ViewerContext::for_profile(profile, false);
    let view = service.for_viewer(&viewer).await.unwrap();
    assert_eq!(view.items[0].content.title, "Watched Just Now");
    assert_eq!(view.items[1].content.title, "Watched Yesterday");
}

#[tokio::test]
async fn gated_records_are_silently_excluded() {
    let (catalog, history, service) = setup();
    let profile = Uuid::new_v4();

    let safe = published("Cartoon Hour", AgeRating::G, &["Animation"]);
    let unsafe_one = published("Slasher Night", AgeRating::R, &["Horror"]);
    let (safe_id, unsafe_id) = (safe.id, unsafe_one.id);
    catalog.seed([safe, unsafe_one]);

    history.seed([
        row(profile, safe_id, 20.0, false),
        row(profile, unsafe_id, 60.0, false),
    ]);

    let child = ViewerContext::for_profile(profile, true);
    let view = service.for_viewer(&child).await.unwrap();
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].content.title, "Cartoon Hour");

    // the same profile without the child flag sees both
    let adult = ViewerContext::for_profile(profile, false);
    assert_eq!(service.for_viewer(&adult).await.unwrap().items.len(), 2);
}

#[tokio::test]
async fn taken_down_titles_drop_out() {
    let (catalog, history, service) = setup();
    let profile = Uuid::new_v4();

    let mut gone = published("Removed", AgeRating::PG, &[]);
    gone.is_active = false;
    let gone_id = gone.id;
    catalog.seed([gone]);
    history.seed([row(profile, gone_id, 40.0, false)]);

    let viewer = ViewerContext::for_profile(profile, false);
    let view = service.for_viewer(&viewer).await.unwrap();
    assert!(view.items.is_empty());
}

#[tokio::test]
async fn missing_profile_is_validation_error() {
    let (_, _, service) = setup();
    let err = service
        .for_viewer(&ViewerContext::anonymous())
        .await
        .unwrap_err();
    assert!(matches!(err, vod_core::CatalogError::Validation(_)));
}

#[tokio::test]
async fn geo_gate_applies_to_resume_rows() {
    let (catalog, history, service) = setup();
    let profile = Uuid::new_v4();

    let mut regional = published("Local Only", AgeRating::PG, &[]);
    regional.globally_available = false;
    regional.available_countries = vec!["US".to_string()];
    let regional_id = regional.id;
    catalog.seed([regional]);
    history.seed([row(profile, regional_id, 10.0, false)]);

    let abroad = ViewerContext::for_profile(profile, false).with_country("DE");
    assert!(service.for_viewer(&abroad).await.unwrap().items.is_empty());

    // unknown country fails open
    let unknown = ViewerContext::for_profile(profile, false);
    assert_eq!(service.for_viewer(&unknown).await.unwrap().items.len(), 1);
}
