//! Management endpoints, all admin-gated

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use super::auth::verify_admin;
use super::service::{
    CreateContentRequest, CreateShelfRequest, ReorderShelfRequest, UpdateContentRequest,
    UpdateShelfRequest,
};
use crate::server::DiscoveryState;

async fn create_content(
    req: HttpRequest,
    state: web::Data<DiscoveryState>,
    payload: web::Json<CreateContentRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    verify_admin(&req, &state.jwt_secret)?;
    let content = state.admin.create_content(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(content))
}

async fn update_content(
    req: HttpRequest,
    state: web::Data<DiscoveryState>,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateContentRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    verify_admin(&req, &state.jwt_secret)?;
    let content = state
        .admin
        .update_content(path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(content))
}

#[derive(Debug, serde::Deserialize)]
struct FeaturePayload {
    featured: bool,
}

async fn feature_content(
    req: HttpRequest,
    state: web::Data<DiscoveryState>,
    path: web::Path<Uuid>,
    payload: web::Json<FeaturePayload>,
) -> Result<HttpResponse, actix_web::Error> {
    verify_admin(&req, &state.jwt_secret)?;
    let content = state
        .admin
        .set_featured(path.into_inner(), payload.featured)
        .await?;
    Ok(HttpResponse::Ok().json(content))
}

async fn delete_content(
    req: HttpRequest,
    state: web::Data<DiscoveryState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, actix_web::Error> {
    verify_admin(&req, &state.jwt_secret)?;
    let id = path.into_inner();
    state.admin.delete_content(id).await?;
    Ok(HttpResponse::Ok().json(json!({ "deleted": id })))
}

async fn create_shelf(
    req: HttpRequest,
    state: web::Data<DiscoveryState>,
    payload: web::Json<CreateShelfRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    verify_admin(&req, &state.jwt_secret)?;
    let shelf = state.admin.create_shelf(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(shelf))
}

async fn update_shelf(
    req: HttpRequest,
    state: web::Data<DiscoveryState>,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateShelfRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    verify_admin(&req, &state.jwt_secret)?;
    let shelf = state
        .admin
        .update_shelf(path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(shelf))
}

async fn reorder_shelf(
    req: HttpRequest,
    state: web::Data<DiscoveryState>,
    path: web::Path<Uuid>,
    payload: web::Json<ReorderShelfRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    verify_admin(&req, &state.jwt_secret)?;
    let id = path.into_inner();
    state.admin.reorder_shelf(id, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "reordered": id })))
}

async fn remove_shelf_entry(
    req: HttpRequest,
    state: web::Data<DiscoveryState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, actix_web::Error> {
    verify_admin(&req, &state.jwt_secret)?;
    let (shelf_id, content_id) = path.into_inner();
    state.admin.remove_shelf_entry(shelf_id, content_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/content", web::post().to(create_content))
            .route("/content/{id}", web::put().to(update_content))
            .route("/content/{id}", web::delete().to(delete_content))
            .route("/content/{id}/feature", web::post().to(feature_content))
            .route("/shelves", web::post().to(create_shelf))
            .route("/shelves/{id}", web::put().to(update_shelf))
            .route("/shelves/{id}/reorder", web::post().to(reorder_shelf))
            .route(
                "/shelves/{shelf_id}/content/{content_id}",
                web::delete().to(remove_shelf_entry),
            ),
    );
}
