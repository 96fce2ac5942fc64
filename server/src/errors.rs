// sweetshop/server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::collections::BTreeMap;
use sweetshop_core::{AccessError, CatalogError, ErrorKind, LedgerError, ShopError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {message}")]
  Validation {
    message: String,
    /// Field name to problem description.
    errors: BTreeMap<String, String>,
  },

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("{message}")]
  InsufficientStock { message: String, available: i32 },

  #[error("Invalid Quantity: {0}")]
  InvalidQuantity(String),

  #[error("Storage Unavailable: {0}")]
  Unavailable(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  pub fn validation(message: impl Into<String>) -> Self {
    AppError::Validation {
      message: message.into(),
      errors: BTreeMap::new(),
    }
  }

  /// Validation failure pinned to a single field.
  pub fn invalid_field(field: &str, problem: impl Into<String>) -> Self {
    let problem = problem.into();
    let mut errors = BTreeMap::new();
    errors.insert(field.to_string(), problem.clone());
    AppError::Validation {
      message: format!("Invalid '{}': {}", field, problem),
      errors,
    }
  }

  /// Wire name of the failure kind; core kinds keep their names.
  pub fn kind(&self) -> &'static str {
    match self {
      AppError::Validation { .. } => "ValidationFailed",
      AppError::Auth(_) => "Unauthenticated",
      AppError::Forbidden(_) => "Forbidden",
      AppError::NotFound(_) => "NotFound",
      AppError::Conflict(_) => "Conflict",
      AppError::InsufficientStock { .. } => "InsufficientStock",
      AppError::InvalidQuantity(_) => "InvalidQuantity",
      AppError::Unavailable(_) => "StorageUnavailable",
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Internal(_) => "Internal",
    }
  }

  /// Message safe to show a client. Infrastructure details stay in the logs.
  fn public_message(&self) -> String {
    match self {
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Internal(_) => "An internal error occurred".to_string(),
      AppError::Unavailable(_) => "Storage is temporarily unavailable, please retry".to_string(),
      AppError::Validation { message, .. } => message.clone(),
      AppError::InsufficientStock { message, .. } => message.clone(),
      AppError::Auth(m)
      | AppError::Forbidden(m)
      | AppError::NotFound(m)
      | AppError::Conflict(m)
      | AppError::InvalidQuantity(m) => m.clone(),
    }
  }
}

impl From<AccessError> for AppError {
  fn from(err: AccessError) -> Self {
    match err {
      AccessError::Unauthenticated(m) => AppError::Auth(m),
      forbidden @ AccessError::Forbidden { .. } => AppError::Forbidden(forbidden.to_string()),
    }
  }
}

impl From<LedgerError> for AppError {
  fn from(err: LedgerError) -> Self {
    match &err {
      LedgerError::NotFound { .. } => AppError::NotFound(err.to_string()),
      LedgerError::InsufficientStock { available, .. } => AppError::InsufficientStock {
        available: *available,
        message: err.to_string(),
      },
      LedgerError::InvalidQuantity { .. } => AppError::InvalidQuantity(err.to_string()),
      LedgerError::StorageUnavailable { .. } => AppError::Unavailable(err.to_string()),
    }
  }
}

impl From<CatalogError> for AppError {
  fn from(err: CatalogError) -> Self {
    match err {
      CatalogError::NotFound { .. } => AppError::NotFound(err.to_string()),
      CatalogError::Invalid { field, message } => AppError::invalid_field(field, message),
      CatalogError::StorageUnavailable { .. } => AppError::Unavailable(err.to_string()),
    }
  }
}

impl From<ShopError> for AppError {
  fn from(err: ShopError) -> Self {
    match err {
      ShopError::Access(e) => e.into(),
      ShopError::Ledger(e) => e.into(),
      ShopError::Catalog(e) => e.into(),
    }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(other) => AppError::Internal(format!("{:#}", other)),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation { .. } | AppError::InsufficientStock { .. } | AppError::InvalidQuantity(_) => {
        StatusCode::BAD_REQUEST
      }
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Conflict(_) => StatusCode::CONFLICT,
      AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, "Responding with error");
    }

    let mut body = json!({ "kind": self.kind(), "message": self.public_message() });
    match self {
      AppError::InsufficientStock { available, .. } => body["available"] = json!(available),
      AppError::Validation { errors, .. } if !errors.is_empty() => body["errors"] = json!(errors),
      _ => {}
    }

    let mut response = HttpResponse::build(status);
    if let AppError::Unavailable(_) = self {
      response.insert_header(("Retry-After", "1"));
    }
    response.json(body)
  }
}

/// Maps a core failure kind to the status the API reports for it.
pub fn status_for(kind: ErrorKind) -> StatusCode {
  match kind {
    ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
    ErrorKind::Forbidden => StatusCode::FORBIDDEN,
    ErrorKind::ValidationFailed | ErrorKind::InsufficientStock | ErrorKind::InvalidQuantity => StatusCode::BAD_REQUEST,
    ErrorKind::NotFound => StatusCode::NOT_FOUND,
    ErrorKind::Conflict => StatusCode::CONFLICT,
    ErrorKind::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
