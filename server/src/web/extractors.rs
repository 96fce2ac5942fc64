// sweetshop/server/src/web/extractors.rs

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use sweetshop_core::{bearer_token, IdentityProvider, Principal};

use crate::errors::AppError;
use crate::state::AppState;

/// The caller identified by the request's `Authorization: Bearer` token.
///
/// Rejects the request with 401 when the token is missing, malformed or expired.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal(pub Principal);

impl FromRequest for AuthenticatedPrincipal {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(authenticate(req).map(AuthenticatedPrincipal))
  }
}

fn authenticate(req: &HttpRequest) -> Result<Principal, AppError> {
  let state = req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("Application state is not configured".to_string()))?;

  let value = req
    .headers()
    .get(header::AUTHORIZATION)
    .ok_or_else(|| AppError::Auth("Missing bearer token".to_string()))?
    .to_str()
    .map_err(|_| AppError::Auth("Malformed authorization header".to_string()))?;
  let token = bearer_token(value).ok_or_else(|| AppError::Auth("Malformed authorization header".to_string()))?;

  Ok(state.tokens.authenticate(token)?)
}
