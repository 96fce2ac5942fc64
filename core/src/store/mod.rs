// sweetshop/core/src/store/mod.rs

//! The stock record store contract the ledger and catalog are written against.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{Item, ItemFilter, ItemId};

pub mod memory;

pub use memory::InMemoryStockStore;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Maps a stored quantity to its replacement, or `None` to refuse the change.
pub type QuantityTransition<'a> = &'a (dyn Fn(i32) -> Option<i32> + Send + Sync);

/// Result of an atomic quantity transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
  /// The transition accepted `previous` and `current` was written.
  Applied { previous: i32, current: i32 },
  /// The transition refused the stored quantity; nothing was written.
  Rejected { current: i32 },
  /// No record with that id.
  Missing,
}

/// Durable keyed storage of items.
///
/// `update_quantity` must be atomic per record: reading the quantity, running the
/// transition and writing its result happen as one step with respect to every
/// other mutation of the same item. Calls on different items must not serialize
/// on one another.
///
/// A store that gives up waiting for the record (lock timeout, serialization
/// failure) reports `StoreError::Contention` and must not have written anything.
#[async_trait]
pub trait StockStore: Send + Sync {
  async fn get(&self, id: ItemId) -> StoreResult<Option<Item>>;

  /// Items matching `filter`, ordered by name then id.
  async fn list(&self, filter: &ItemFilter) -> StoreResult<Vec<Item>>;

  /// Fails with `StoreError::Duplicate` if the id is taken.
  async fn insert(&self, item: Item) -> StoreResult<()>;

  /// Unconditional whole-record overwrite. Returns `false` if the item does not exist.
  async fn replace(&self, item: Item) -> StoreResult<bool>;

  /// Returns `false` if the item did not exist.
  async fn delete(&self, id: ItemId) -> StoreResult<bool>;

  async fn update_quantity(&self, id: ItemId, transition: QuantityTransition<'_>) -> StoreResult<QuantityUpdate>;
}
