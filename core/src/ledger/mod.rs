// sweetshop/core/src/ledger/mod.rs

//! The inventory ledger: atomic, invariant-preserving stock transitions.
//!
//! Every mutation hands a validating transition to `StockStore::update_quantity`,
//! which runs it against the stored quantity and writes the result as one atomic
//! step per item. Concurrent buyers queue on the record instead of racing it, so
//! two purchases can never both spend the same units and ordinary contention
//! never fails a request. Only a store that gives up waiting for the record
//! (`StoreError::Contention`) is retried, under a bounded, jittered
//! `RetryPolicy`; running out of attempts surfaces `LedgerError::StorageUnavailable`.

use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{LedgerError, StoreError};
use crate::model::ItemId;
use crate::store::{QuantityUpdate, StockStore, StoreResult};

mod retry;

pub use retry::RetryPolicy;

#[derive(Debug, Clone)]
pub struct LedgerConfig {
  pub retry: RetryPolicy,
  /// Upper bound for each individual store call.
  pub storage_timeout: Duration,
}

impl Default for LedgerConfig {
  fn default() -> Self {
    Self {
      retry: RetryPolicy::default(),
      storage_timeout: Duration::from_secs(2),
    }
  }
}

/// Committed result of a stock transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockChange {
  pub item_id: ItemId,
  pub previous: i32,
  pub remaining: i32,
}

pub struct InventoryLedger {
  store: Arc<dyn StockStore>,
  config: LedgerConfig,
}

impl std::fmt::Debug for InventoryLedger {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("InventoryLedger").field("config", &self.config).finish()
  }
}

impl InventoryLedger {
  pub fn new(store: Arc<dyn StockStore>, config: LedgerConfig) -> Self {
    Self { store, config }
  }

  pub fn config(&self) -> &LedgerConfig {
    &self.config
  }

  /// Removes `quantity` units from stock.
  ///
  /// Fails with `InvalidQuantity` for a non-positive quantity, `NotFound` for an
  /// unknown item and `InsufficientStock` (carrying what is available) when the
  /// stock cannot cover the request. Nothing is written on failure.
  #[instrument(name = "ledger::purchase", skip_all, fields(item_id = %item_id, quantity = quantity))]
  pub async fn purchase(&self, item_id: ItemId, quantity: i32) -> Result<StockChange, LedgerError> {
    if quantity <= 0 {
      warn!(quantity, "Purchase rejected: quantity must be positive.");
      return Err(LedgerError::InvalidQuantity {
        quantity: quantity.into(),
        reason: "purchase quantity must be positive",
      });
    }

    let change = self
      .apply(item_id, |current| {
        if current < quantity {
          return Err(LedgerError::InsufficientStock {
            item_id,
            requested: quantity,
            available: current,
          });
        }
        Ok(current - quantity)
      })
      .await
      .inspect_err(|e| log_failure("purchase", e))?;

    info!(previous = change.previous, remaining = change.remaining, "Purchase committed.");
    Ok(change)
  }

  /// Adds `additional` units to stock.
  #[instrument(name = "ledger::restock", skip_all, fields(item_id = %item_id, additional = additional))]
  pub async fn restock(&self, item_id: ItemId, additional: i32) -> Result<StockChange, LedgerError> {
    if additional < 0 {
      warn!(additional, "Restock rejected: quantity must not be negative.");
      return Err(LedgerError::InvalidQuantity {
        quantity: additional.into(),
        reason: "restock quantity must not be negative",
      });
    }

    let change = self
      .apply(item_id, |current| {
        current.checked_add(additional).ok_or(LedgerError::InvalidQuantity {
          quantity: i64::from(current) + i64::from(additional),
          reason: "resulting stock exceeds the supported maximum",
        })
      })
      .await
      .inspect_err(|e| log_failure("restock", e))?;

    info!(previous = change.previous, remaining = change.remaining, "Restock committed.");
    Ok(change)
  }

  /// Sets stock to an absolute value. Repeating the call with the same value is a no-op.
  ///
  /// Last writer wins against concurrent purchases; the stored value is still never negative.
  #[instrument(name = "ledger::set_quantity", skip_all, fields(item_id = %item_id, quantity = quantity))]
  pub async fn set_quantity(&self, item_id: ItemId, quantity: i32) -> Result<StockChange, LedgerError> {
    if quantity < 0 {
      warn!(quantity, "Stock overwrite rejected: quantity must not be negative.");
      return Err(LedgerError::InvalidQuantity {
        quantity: quantity.into(),
        reason: "stock level must not be negative",
      });
    }

    let change = self
      .apply(item_id, |_| Ok(quantity))
      .await
      .inspect_err(|e| log_failure("set_quantity", e))?;

    info!(previous = change.previous, remaining = change.remaining, "Stock level set.");
    Ok(change)
  }

  /// Current committed quantity of an item.
  pub async fn quantity(&self, item_id: ItemId) -> Result<i32, LedgerError> {
    match self.bounded(self.store.get(item_id)).await {
      Ok(Some(item)) => Ok(item.quantity),
      Ok(None) => Err(LedgerError::NotFound { item_id }),
      Err(source) => Err(LedgerError::StorageUnavailable { attempts: 1, source }),
    }
  }

  /// Applies `transition` to the stored quantity of `item_id` as one atomic step.
  ///
  /// `transition` maps the current quantity to the new one or rejects it. It must
  /// be pure: it runs inside the store's per-record critical section and is
  /// re-run here to recover the rejection reason.
  async fn apply<F>(&self, item_id: ItemId, transition: F) -> Result<StockChange, LedgerError>
  where
    F: Fn(i32) -> Result<i32, LedgerError> + Send + Sync,
  {
    let retry = &self.config.retry;
    let accept = |current: i32| transition(current).ok();
    let mut attempts: u32 = 0;

    loop {
      attempts += 1;

      match self.bounded(self.store.update_quantity(item_id, &accept)).await {
        Ok(QuantityUpdate::Applied { previous, current }) => {
          debug_assert!(current >= 0, "ledger transitions must never produce negative stock");
          return Ok(StockChange {
            item_id,
            previous,
            remaining: current,
          });
        }
        Ok(QuantityUpdate::Missing) => return Err(LedgerError::NotFound { item_id }),
        Ok(QuantityUpdate::Rejected { current }) => {
          transition(current)?;
          // The store refused a value the transition accepts; treat it as a lost race.
          warn!(attempts, current, "Store refused an acceptable stock transition.");
          if !retry.allows_another(attempts) {
            return Err(LedgerError::StorageUnavailable {
              attempts,
              source: StoreError::Contention { attempts },
            });
          }
        }
        Err(StoreError::Contention { .. }) => {
          if !retry.allows_another(attempts) {
            return Err(LedgerError::StorageUnavailable {
              attempts,
              source: StoreError::Contention { attempts },
            });
          }
          debug!(attempts, "Stock record busy, retrying.");
          self.back_off(attempts).await;
        }
        // The write may or may not have landed; replaying it could apply it twice.
        Err(source) => {
          error!(attempts, error = %source, "Stock update failed with unknown outcome.");
          return Err(LedgerError::StorageUnavailable { attempts, source });
        }
      }
    }
  }

  async fn bounded<T>(&self, call: impl Future<Output = StoreResult<T>>) -> StoreResult<T> {
    let after = self.config.storage_timeout;
    match tokio::time::timeout(after, call).await {
      Ok(result) => result,
      Err(_) => Err(StoreError::Timeout { after }),
    }
  }

  async fn back_off(&self, attempts: u32) {
    let delay = self.config.retry.delay_after(attempts);
    if !delay.is_zero() {
      tokio::time::sleep(delay).await;
    }
  }
}

fn log_failure(operation: &'static str, err: &LedgerError) {
  match err {
    LedgerError::StorageUnavailable { .. } => error!(operation, error = %err, "Stock transition failed."),
    _ => warn!(operation, error = %err, "Stock transition rejected."),
  }
}
