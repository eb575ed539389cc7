//! Grouped browse endpoint

use actix_web::{web, HttpResponse};

use vod_core::{CatalogError, ViewerContext};

use crate::server::DiscoveryState;

async fn browse(
    state: web::Data<DiscoveryState>,
    viewer: ViewerContext,
) -> Result<HttpResponse, CatalogError> {
    let browse = state.shelves.browse(&viewer).await?;
    Ok(HttpResponse::Ok().json(browse))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/shelves", web::get().to(browse));
}
