//! Application state and route registration

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;

use crate::admin::AdminService;
use crate::catalog::CatalogQueryService;
use crate::search::SearchService;
use crate::shelves::ShelfBrowseService;

pub struct DiscoveryState {
    pub catalog: Arc<CatalogQueryService>,
    pub search: Arc<SearchService>,
    pub shelves: Arc<ShelfBrowseService>,
    pub admin: Arc<AdminService>,
    pub jwt_secret: String,
    pub pool: Option<PgPool>,
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

async fn readiness(state: web::Data<DiscoveryState>) -> HttpResponse {
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
        .configure(crate::catalog::handlers::configure_routes)
        .configure(crate::search::handlers::configure_routes)
        .configure(crate::shelves::handlers::configure_routes)
        .configure(crate::admin::handlers::configure_routes);
}
