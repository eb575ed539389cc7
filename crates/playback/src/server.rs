//! HTTP surface of the playback service

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use vod_core::{CatalogError, ViewerContext};

use crate::continue_watching::ContinueWatchingService;
use crate::history::{ProgressUpdate, WatchProgressService};
use crate::watchlist::WatchlistService;

pub struct PlaybackState {
    pub progress: Arc<WatchProgressService>,
    pub continue_watching: Arc<ContinueWatchingService>,
    pub watchlist: Arc<WatchlistService>,
    pub pool: Option<PgPool>,
}

fn require_profile(viewer: &ViewerContext) -> Result<Uuid, CatalogError> {
    viewer
        .profile_id
        .ok_or_else(|| CatalogError::validation("a profile is required"))
}

async fn record_progress(
    state: web::Data<PlaybackState>,
    viewer: ViewerContext,
    payload: web::Json<ProgressUpdate>,
) -> Result<HttpResponse, CatalogError> {
    let profile_id = require_profile(&viewer)?;
    let record = state
        .progress
        .record_progress(profile_id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

#[derive(Debug, serde::Deserialize)]
struct HistoryQuery {
    limit: Option<u64>,
}

async fn history(
    state: web::Data<PlaybackState>,
    viewer: ViewerContext,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, CatalogError> {
    let profile_id = require_profile(&viewer)?;
    let limit = query.limit.unwrap_or(50).min(200);
    let rows = state.progress.history(profile_id, limit).await?;
    Ok(HttpResponse::Ok().json(rows))
}

async fn forget_history(
    state: web::Data<PlaybackState>,
    viewer: ViewerContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, CatalogError> {
    let profile_id = require_profile(&viewer)?;
    state.progress.forget(profile_id, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn continue_watching(
    state: web::Data<PlaybackState>,
    viewer: ViewerContext,
) -> Result<HttpResponse, CatalogError> {
    let view = state.continue_watching.for_viewer(&viewer).await?;
    Ok(HttpResponse::Ok().json(view))
}

async fn watchlist(
    state: web::Data<PlaybackState>,
    viewer: ViewerContext,
) -> Result<HttpResponse, CatalogError> {
    let view = state.watchlist.list(&viewer).await?;
    Ok(HttpResponse::Ok().json(view))
}

async fn watchlist_add(
    state: web::Data<PlaybackState>,
    viewer: ViewerContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, CatalogError> {
    let content_id = path.into_inner();
    state.watchlist.add(&viewer, content_id).await?;
    Ok(HttpResponse::Created().json(json!({ "added": content_id })))
}

async fn watchlist_remove(
    state: web::Data<PlaybackState>,
    viewer: ViewerContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, CatalogError> {
    state.watchlist.remove(&viewer, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn like(
    state: web::Data<PlaybackState>,
    viewer: ViewerContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, CatalogError> {
    let content_id = path.into_inner();
    state.watchlist.like(&viewer, content_id).await?;
    Ok(HttpResponse::Created().json(json!({ "liked": content_id })))
}

async fn unlike(
    state: web::Data<PlaybackState>,
    viewer: ViewerContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, CatalogError> {
    state.watchlist.unlike(&viewer, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn like_count(
    state: web::Data<PlaybackState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, CatalogError> {
    let content_id = path.into_inner();
    let count = state.watchlist.like_count(content_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "content_id": content_id, "likes": count })))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

async fn readiness(state: web::Data<PlaybackState>) -> HttpResponse {
    match &state.pool {
        Some(pool) => match vod_core::database::health_check(pool).await {
            Ok(()) => HttpResponse::Ok().json(json!({ "status": "ready" })),
            Err(e) => HttpResponse::ServiceUnavailable()
                .json(json!({ "status": "unavailable", "message": e.to_string() })),
        },
        None => HttpResponse::Ok().json(json!({ "status": "ready" })),
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/ready", web::get().to(readiness))
        .service(
            web::scope("/playback")
                .route("/progress", web::post().to(record_progress))
                .route("/history", web::get().to(history))
                .route("/history/{content_id}", web::delete().to(forget_history))
                .route("/continue-watching", web::get().to(continue_watching)),
        )
        .service(
            web::scope("/watchlist")
                .route("", web::get().to(watchlist))
                .route("/{content_id}", web::post().to(watchlist_add))
                .route("/{content_id}", web::delete().to(watchlist_remove)),
        )
        .service(
            web::scope("/likes")
                .route("/{content_id}", web::post().to(like))
                .route("/{content_id}", web::delete().to(unlike))
                .route("/{content_id}", web::get().to(like_count)),
        );
}
