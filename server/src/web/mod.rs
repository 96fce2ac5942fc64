// sweetshop/server/src/web/mod.rs

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod routes;

use actix_web::{error, web, HttpRequest};

use crate::errors::AppError;

pub use routes::configure_app_routes;

/// Malformed bodies, query strings and path ids become `ValidationFailed` responses.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(|err: error::JsonPayloadError, _req: &HttpRequest| {
      AppError::validation(format!("Invalid JSON body: {}", err)).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err: error::QueryPayloadError, _req: &HttpRequest| {
      AppError::validation(format!("Invalid query string: {}", err)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err: error::PathError, _req: &HttpRequest| {
      AppError::invalid_field("id", err.to_string()).into()
    }));
}

/// Everything an `App` needs besides its state.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
  configure_extractors(cfg);
  configure_app_routes(cfg);
}
