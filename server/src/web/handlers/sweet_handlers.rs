// sweetshop/server/src/web/handlers/sweet_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use sweetshop_core::{ItemFilter, ItemId};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::dto::{SearchQuery, SweetPayload};
use crate::web::extractors::AuthenticatedPrincipal;

#[instrument(name = "handler::list_sweets", skip_all)]
pub async fn list_sweets_handler(
  app_state: web::Data<AppState>,
  AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
) -> Result<HttpResponse, AppError> {
  let sweets = app_state.storefront.list_items(&principal).await?;
  info!(count = sweets.len(), "Listed sweets.");
  Ok(HttpResponse::Ok().json(sweets))
}

#[instrument(name = "handler::search_sweets", skip_all)]
pub async fn search_sweets_handler(
  app_state: web::Data<AppState>,
  AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
  query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
  let filter = ItemFilter::from(query.into_inner());
  let sweets = app_state.storefront.search_items(&principal, &filter).await?;
  info!(count = sweets.len(), "Searched sweets.");
  Ok(HttpResponse::Ok().json(sweets))
}

#[instrument(name = "handler::get_sweet", skip_all, fields(item_id = %path.as_ref()))]
pub async fn get_sweet_handler(
  app_state: web::Data<AppState>,
  AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
  path: web::Path<ItemId>,
) -> Result<HttpResponse, AppError> {
  let sweet = app_state.storefront.get_item(&principal, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(sweet))
}

#[instrument(name = "handler::create_sweet", skip_all)]
pub async fn create_sweet_handler(
  app_state: web::Data<AppState>,
  AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
  payload: web::Json<SweetPayload>,
) -> Result<HttpResponse, AppError> {
  let sweet = app_state
    .storefront
    .create_item(&principal, payload.into_inner().into_draft())
    .await?;
  Ok(HttpResponse::Created().json(json!({
      "message": "Sweet created successfully",
      "sweet": sweet,
  })))
}

#[instrument(name = "handler::update_sweet", skip_all, fields(item_id = %path.as_ref()))]
pub async fn update_sweet_handler(
  app_state: web::Data<AppState>,
  AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
  path: web::Path<ItemId>,
  payload: web::Json<SweetPayload>,
) -> Result<HttpResponse, AppError> {
  let sweet = app_state
    .storefront
    .update_item(&principal, path.into_inner(), payload.into_inner().into_draft())
    .await?;
  Ok(HttpResponse::Ok().json(json!({
      "message": "Sweet updated successfully",
      "sweet": sweet,
  })))
}

#[instrument(name = "handler::delete_sweet", skip_all, fields(item_id = %path.as_ref()))]
pub async fn delete_sweet_handler(
  app_state: web::Data<AppState>,
  AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
  path: web::Path<ItemId>,
) -> Result<HttpResponse, AppError> {
  app_state.storefront.delete_item(&principal, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Sweet deleted successfully" })))
}
