//! Search endpoint

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use vod_core::pagination::PageRequest;
use vod_core::{CatalogError, ViewerContext};

use crate::server::DiscoveryState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

async fn search(
    state: web::Data<DiscoveryState>,
    query: web::Query<SearchQuery>,
    viewer: ViewerContext,
) -> Result<HttpResponse, CatalogError> {
    let page = PageRequest::from_params(query.page, query.page_size);
    let listing = state.search.search(&query.q, page, &viewer).await?;
    Ok(HttpResponse::Ok().json(listing))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/search", web::get().to(search));
}
