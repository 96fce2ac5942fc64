// sweetshop/server/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::errors::AppError;
use crate::services::auth_service;
use crate::state::AppState;
use crate::web::dto::{LoginPayload, RegisterPayload};

#[instrument(name = "handler::register", skip_all, fields(req_email = %req_payload.email))]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<RegisterPayload>,
) -> Result<HttpResponse, AppError> {
  req_payload.validate()?;
  let RegisterPayload { email, password, name } = req_payload.into_inner();

  let session = auth_service::register(&app_state, &email, &name, password).await?;
  Ok(HttpResponse::Created().json(session))
}

#[instrument(name = "handler::login", skip_all, fields(req_email = %req_payload.email))]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<LoginPayload>,
) -> Result<HttpResponse, AppError> {
  req_payload.validate()?;
  let LoginPayload { email, password } = req_payload.into_inner();

  let session = auth_service::login(&app_state, &email, password).await?;
  Ok(HttpResponse::Ok().json(session))
}
