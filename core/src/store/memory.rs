// sweetshop/core/src/store/memory.rs

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{event, Level};

use super::{QuantityTransition, QuantityUpdate, StockStore, StoreResult};
use crate::error::StoreError;
use crate::model::{Item, ItemFilter, ItemId};

/// Process-local `StockStore`.
///
/// Each record sits behind its own mutex and quantity transitions run while it is
/// held, so updates to one item are serialized and never conflict. Updates on
/// different items never wait on each other. The outer map lock is only taken
/// exclusively to add or remove records, which also makes deletion wait for
/// in-flight updates.
///
/// Lock guards are blocking and are never held across an `.await`.
#[derive(Debug, Default)]
pub struct InMemoryStockStore {
  records: RwLock<HashMap<ItemId, Arc<Mutex<Item>>>>,
}

impl InMemoryStockStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builds a store pre-populated with `items`. Later duplicates overwrite earlier ones.
  pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
    let records = items
      .into_iter()
      .map(|item| (item.id, Arc::new(Mutex::new(item))))
      .collect();
    InMemoryStockStore {
      records: RwLock::new(records),
    }
  }

  pub fn len(&self) -> usize {
    self.records.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.read().is_empty()
  }
}

#[async_trait]
impl StockStore for InMemoryStockStore {
  async fn get(&self, id: ItemId) -> StoreResult<Option<Item>> {
    let records = self.records.read();
    Ok(records.get(&id).map(|record| record.lock().clone()))
  }

  async fn list(&self, filter: &ItemFilter) -> StoreResult<Vec<Item>> {
    let mut items: Vec<Item> = {
      let records = self.records.read();
      records
        .values()
        .map(|record| record.lock().clone())
        .filter(|item| filter.matches(item))
        .collect()
    };
    items.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    Ok(items)
  }

  async fn insert(&self, item: Item) -> StoreResult<()> {
    let mut records = self.records.write();
    if records.contains_key(&item.id) {
      return Err(StoreError::Duplicate { item_id: item.id });
    }
    event!(Level::TRACE, item_id = %item.id, "Inserting item record.");
    records.insert(item.id, Arc::new(Mutex::new(item)));
    Ok(())
  }

  async fn replace(&self, item: Item) -> StoreResult<bool> {
    let records = self.records.read();
    match records.get(&item.id) {
      Some(record) => {
        *record.lock() = item;
        Ok(true)
      }
      None => Ok(false),
    }
  }

  async fn delete(&self, id: ItemId) -> StoreResult<bool> {
    Ok(self.records.write().remove(&id).is_some())
  }

  async fn update_quantity(&self, id: ItemId, transition: QuantityTransition<'_>) -> StoreResult<QuantityUpdate> {
    // Shared map lock: other items proceed, deletion of this one waits.
    let records = self.records.read();
    let Some(record) = records.get(&id) else {
      return Ok(QuantityUpdate::Missing);
    };
    let mut item = record.lock();
    let previous = item.quantity;
    match transition(previous) {
      Some(next) => {
        item.quantity = next;
        item.updated_at = Utc::now();
        Ok(QuantityUpdate::Applied { previous, current: next })
      }
      None => {
        event!(Level::TRACE, item_id = %id, current = previous, "Quantity transition refused.");
        Ok(QuantityUpdate::Rejected { current: previous })
      }
    }
  }
}
