//! Public catalog endpoints

use actix_web::{web, HttpResponse};

use vod_core::pagination::PageRequest;
use vod_core::{CatalogError, ViewerContext};

use super::service::CatalogQueryService;
use super::types::{ListQuery, ListRequest};
use crate::server::DiscoveryState;

#[derive(Debug, serde::Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

async fn list_content(
    state: web::Data<DiscoveryState>,
    query: web::Query<ListQuery>,
    viewer: ViewerContext,
) -> Result<HttpResponse, CatalogError> {
    let request = ListRequest::from_query(query.into_inner())?;
    let listing = state.catalog.list(request, &viewer).await?;
    Ok(HttpResponse::Ok().json(listing))
}

async fn kids_content(
    state: web::Data<DiscoveryState>,
    query: web::Query<ListQuery>,
    viewer: ViewerContext,
) -> Result<HttpResponse, CatalogError> {
    let request = ListRequest::from_query(query.into_inner())?;
    let listing = state.catalog.kids(request, &viewer).await?;
    Ok(HttpResponse::Ok().json(listing))
}

async fn featured_content(
    state: web::Data<DiscoveryState>,
    query: web::Query<PageQuery>,
    viewer: ViewerContext,
) -> Result<HttpResponse, CatalogError> {
    let page = PageRequest::from_params(query.page, query.page_size);
    let listing = state.catalog.featured(page, &viewer).await?;
    Ok(HttpResponse::Ok().json(listing))
}

async fn upcoming_content(
    state: web::Data<DiscoveryState>,
    query: web::Query<PageQuery>,
    viewer: ViewerContext,
) -> Result<HttpResponse, CatalogError> {
    let page = PageRequest::from_params(query.page, query.page_size);
    let listing = state.catalog.upcoming(page, &viewer).await?;
    Ok(HttpResponse::Ok().json(listing))
}

async fn everyones_watching(
    state: web::Data<DiscoveryState>,
    viewer: ViewerContext,
) -> Result<HttpResponse, CatalogError> {
    let (items, profile_context) = state.catalog.everyones_watching(&viewer).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "items": items,
        "profile_context": profile_context,
    })))
}

async fn content_detail(
    state: web::Data<DiscoveryState>,
    path: web::Path<uuid::Uuid>,
    viewer: ViewerContext,
) -> Result<HttpResponse, CatalogError> {
    let detail = state.catalog.detail(path.into_inner(), &viewer).await?;
    Ok(HttpResponse::Ok().json(detail))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/content")
            .route("", web::get().to(list_content))
            .route("/kids", web::get().to(kids_content))
            .route("/featured", web::get().to(featured_content))
            .route("/upcoming", web::get().to(upcoming_content))
            .route("/watching-now", web::get().to(everyones_watching))
            .route("/{id}", web::get().to(content_detail)),
    );
}
