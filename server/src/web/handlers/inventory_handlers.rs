// sweetshop/server/src/web/handlers/inventory_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use sweetshop_core::{ItemId, RestockRequest};
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::dto::{PurchasePayload, RestockPayload, SetQuantityPayload};
use crate::web::extractors::AuthenticatedPrincipal;

#[instrument(name = "handler::purchase", skip_all, fields(item_id = %payload.item_id, quantity = payload.quantity))]
pub async fn purchase_handler(
  app_state: web::Data<AppState>,
  AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
  payload: web::Json<PurchasePayload>,
) -> Result<HttpResponse, AppError> {
  let change = app_state
    .storefront
    .purchase(&principal, payload.into_inner().into())
    .await?;
  Ok(HttpResponse::Ok().json(json!({
      "message": "Purchase successful",
      "remaining": change.remaining,
  })))
}

#[instrument(name = "handler::restock", skip_all, fields(item_id = %payload.item_id, additional = payload.additional_quantity))]
pub async fn restock_handler(
  app_state: web::Data<AppState>,
  AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
  payload: web::Json<RestockPayload>,
) -> Result<HttpResponse, AppError> {
  let RestockPayload {
    item_id,
    additional_quantity,
  } = payload.into_inner();
  let change = app_state
    .storefront
    .restock(&principal, RestockRequest::new(item_id, additional_quantity))
    .await?;
  Ok(HttpResponse::Ok().json(json!({
      "message": "Restock successful",
      "quantity": change.remaining,
  })))
}

#[instrument(name = "handler::set_quantity", skip_all, fields(item_id = %path.as_ref()))]
pub async fn set_quantity_handler(
  app_state: web::Data<AppState>,
  AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
  path: web::Path<ItemId>,
  payload: web::Json<SetQuantityPayload>,
) -> Result<HttpResponse, AppError> {
  let change = app_state
    .storefront
    .set_stock(&principal, path.into_inner(), payload.quantity)
    .await?;
  Ok(HttpResponse::Ok().json(json!({
      "message": "Stock level set",
      "quantity": change.remaining,
  })))
}
