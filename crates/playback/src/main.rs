//! Playback service entry point
//!
//! Default port: 8082

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::info;

use vod_core::config::{ConfigLoader, DatabaseConfig, ServiceConfig};
use vod_playback::continue_watching::ContinueWatchingService;
use vod_playback::history::WatchProgressService;
use vod_playback::repository::{
    PostgresContentReader, PostgresEngagementRepository, PostgresWatchHistoryRepository,
};
use vod_playback::server::{configure_routes, PlaybackState};
use vod_playback::watchlist::WatchlistService;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .init();

    let service_config = ServiceConfig::from_env_with_default_port(8082)?;
    let database_config = DatabaseConfig::from_env()?;

    let pool = vod_core::database::connect(&database_config).await?;

    let history_repo = Arc::new(PostgresWatchHistoryRepository::new(pool.clone()));
    let engagement_repo = Arc::new(PostgresEngagementRepository::new(pool.clone()));
    let content_reader = Arc::new(PostgresContentReader::new(pool.clone()));

    let state = web::Data::new(PlaybackState {
        progress: Arc::new(WatchProgressService::new(
            history_repo.clone(),
            content_reader.clone(),
        )),
        continue_watching: Arc::new(ContinueWatchingService::new(
            history_repo,
            content_reader.clone(),
        )),
        watchlist: Arc::new(WatchlistService::new(engagement_repo, content_reader)),
        pool: Some(pool),
    });

    let bind_addr = service_config.bind_address();
    info!(host = %bind_addr.0, port = bind_addr.1, "playback service starting");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(configure_routes)
            .wrap(actix_web::middleware::Logger::default())
    })
    .workers(service_config.workers)
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
