// sweetshop/core/src/error.rs
use anyhow::Error as AnyhowError;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::model::{ItemId, Role};
use crate::policy::Operation;

/// Discriminant shared by every failure the core reports.
/// Transport layers map on this, never on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
  Unauthenticated,
  Forbidden,
  ValidationFailed,
  NotFound,
  InsufficientStock,
  InvalidQuantity,
  Conflict,
  StorageUnavailable,
}

impl ErrorKind {
  /// Whether resubmitting the same request later may succeed without changes.
  pub const fn is_transient(&self) -> bool {
    matches!(self, ErrorKind::StorageUnavailable)
  }
}

/// Failures reported by a `StockStore` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Storage backend unavailable. Source: {source}")]
  Unavailable {
    #[source]
    source: AnyhowError,
  },

  #[error("Storage call did not complete within {after:?}")]
  Timeout { after: Duration },

  #[error("Record stayed locked for {attempts} attempt(s)")]
  Contention { attempts: u32 },

  #[error("Item already exists: {item_id}")]
  Duplicate { item_id: ItemId },
}

impl StoreError {
  pub fn unavailable(source: impl Into<AnyhowError>) -> Self {
    StoreError::Unavailable { source: source.into() }
  }
}

/// Failures of the inventory ledger's stock transitions.
#[derive(Debug, Error)]
pub enum LedgerError {
  #[error("Item not found: {item_id}")]
  NotFound { item_id: ItemId },

  #[error("Insufficient stock for item {item_id}: requested {requested}, available {available}")]
  InsufficientStock {
    item_id: ItemId,
    requested: i32,
    available: i32,
  },

  #[error("Invalid quantity {quantity}: {reason}")]
  InvalidQuantity { quantity: i64, reason: &'static str },

  #[error("Storage unavailable after {attempts} attempt(s). Source: {source}")]
  StorageUnavailable {
    attempts: u32,
    #[source]
    source: StoreError,
  },
}

impl LedgerError {
  pub const fn kind(&self) -> ErrorKind {
    match self {
      LedgerError::NotFound { .. } => ErrorKind::NotFound,
      LedgerError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
      LedgerError::InvalidQuantity { .. } => ErrorKind::InvalidQuantity,
      LedgerError::StorageUnavailable { .. } => ErrorKind::StorageUnavailable,
    }
  }
}

/// Outcome of the access policy gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
  #[error("Unauthenticated: {0}")]
  Unauthenticated(String),

  #[error("Role {role} is not allowed to {operation}")]
  Forbidden { role: Role, operation: Operation },
}

impl AccessError {
  pub const fn kind(&self) -> ErrorKind {
    match self {
      AccessError::Unauthenticated(_) => ErrorKind::Unauthenticated,
      AccessError::Forbidden { .. } => ErrorKind::Forbidden,
    }
  }
}

/// Failures of catalog reads and admin catalog edits.
#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("Item not found: {item_id}")]
  NotFound { item_id: ItemId },

  #[error("Invalid item field '{field}': {message}")]
  Invalid { field: &'static str, message: String },

  #[error("Catalog storage unavailable. Source: {source}")]
  StorageUnavailable {
    #[source]
    source: StoreError,
  },
}

impl CatalogError {
  pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
    CatalogError::Invalid {
      field,
      message: message.into(),
    }
  }

  pub const fn kind(&self) -> ErrorKind {
    match self {
      CatalogError::NotFound { .. } => ErrorKind::NotFound,
      CatalogError::Invalid { .. } => ErrorKind::ValidationFailed,
      CatalogError::StorageUnavailable { .. } => ErrorKind::StorageUnavailable,
    }
  }
}

impl From<StoreError> for CatalogError {
  fn from(source: StoreError) -> Self {
    CatalogError::StorageUnavailable { source }
  }
}

/// Everything a `Storefront` operation can fail with.
#[derive(Debug, Error)]
pub enum ShopError {
  #[error(transparent)]
  Access(#[from] AccessError),

  #[error(transparent)]
  Ledger(#[from] LedgerError),

  #[error(transparent)]
  Catalog(#[from] CatalogError),
}

impl ShopError {
  pub const fn kind(&self) -> ErrorKind {
    match self {
      ShopError::Access(e) => e.kind(),
      ShopError::Ledger(e) => e.kind(),
      ShopError::Catalog(e) => e.kind(),
    }
  }
}

pub type ShopResult<T, E = ShopError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kinds_follow_the_variant_not_the_message() {
    let id = ItemId::new();
    let err: ShopError = LedgerError::InsufficientStock {
      item_id: id,
      requested: 10,
      available: 3,
    }
    .into();
    assert_eq!(err.kind(), ErrorKind::InsufficientStock);

    let err: ShopError = AccessError::Forbidden {
      role: Role::User,
      operation: Operation::Restock,
    }
    .into();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err: ShopError = CatalogError::from(StoreError::Timeout {
      after: Duration::from_millis(5),
    })
    .into();
    assert_eq!(err.kind(), ErrorKind::StorageUnavailable);
    assert!(err.kind().is_transient());
  }

  #[test]
  fn storage_unavailable_keeps_its_source() {
    use std::error::Error as _;
    let err = LedgerError::StorageUnavailable {
      attempts: 3,
      source: StoreError::Contention { attempts: 3 },
    };
    assert!(err.source().is_some());
    assert!(err.to_string().contains("3 attempt(s)"));
  }
}
