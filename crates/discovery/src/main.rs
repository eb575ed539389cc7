//! Discovery service entry point
//!
//! Default port: 8081

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::info;

use vod_core::config::{AuthConfig, ConfigLoader, DatabaseConfig, ServiceConfig};
use vod_discovery::admin::AdminService;
use vod_discovery::catalog::CatalogQueryService;
use vod_discovery::repository::{
    PostgresCatalogRepository, PostgresShelfRepository, PostgresWatchStatsRepository,
};
use vod_discovery::search::SearchService;
use vod_discovery::server::{configure_routes, DiscoveryState};
use vod_discovery::shelves::ShelfBrowseService;

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

    let service_config = ServiceConfig::from_env_with_default_port(8081)?;
    let database_config = DatabaseConfig::from_env()?;
    let auth_config = AuthConfig::from_env()?;

    let pool = vod_core::database::connect(&database_config).await?;

    let catalog_repo = Arc::new(PostgresCatalogRepository::new(pool.clone()));
    let shelf_repo = Arc::new(PostgresShelfRepository::new(pool.clone()));
    let stats_repo = Arc::new(PostgresWatchStatsRepository::new(pool.clone()));

    let state = web::Data::new(DiscoveryState {
        catalog: Arc::new(CatalogQueryService::new(
            catalog_repo.clone(),
            stats_repo.clone(),
        )),
        search: Arc::new(SearchService::new(catalog_repo.clone())),
        shelves: Arc::new(ShelfBrowseService::new(
            shelf_repo.clone(),
            catalog_repo.clone(),
        )),
        admin: Arc::new(AdminService::new(catalog_repo, shelf_repo)),
        jwt_secret: auth_config.jwt_secret,
        pool: Some(pool),
    });

    let bind_addr = service_config.bind_address();
    info!(host = %bind_addr.0, port = bind_addr.1, "discovery service starting");

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
