// sweetshop/core/src/catalog.rs

//! Catalog reads and admin catalog editing.
//!
//! Reads carry no consistency obligation relative to concurrent stock changes.
//! Updates overwrite the whole record, quantity included, last writer wins.

use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::error::{CatalogError, StoreError};
use crate::model::{Item, ItemDraft, ItemFilter, ItemId};
use crate::store::{StockStore, StoreResult};

pub struct CatalogService {
  store: Arc<dyn StockStore>,
  storage_timeout: Duration,
}

impl std::fmt::Debug for CatalogService {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CatalogService")
      .field("storage_timeout", &self.storage_timeout)
      .finish()
  }
}

impl CatalogService {
  pub fn new(store: Arc<dyn StockStore>, storage_timeout: Duration) -> Self {
    Self { store, storage_timeout }
  }

  pub async fn list(&self) -> Result<Vec<Item>, CatalogError> {
    self.search(&ItemFilter::default()).await
  }

  #[instrument(name = "catalog::search", skip(self))]
  pub async fn search(&self, filter: &ItemFilter) -> Result<Vec<Item>, CatalogError> {
    let items = self.bounded(self.store.list(filter)).await?;
    info!(count = items.len(), "Catalog query served.");
    Ok(items)
  }

  pub async fn get(&self, item_id: ItemId) -> Result<Item, CatalogError> {
    self
      .bounded(self.store.get(item_id))
      .await?
      .ok_or(CatalogError::NotFound { item_id })
  }

  #[instrument(name = "catalog::create", skip(self, draft), fields(name = %draft.name))]
  pub async fn create(&self, draft: ItemDraft) -> Result<Item, CatalogError> {
    draft.validate()?;
    let item = Item::from_draft(ItemId::new(), draft, Utc::now());
    self.bounded(self.store.insert(item.clone())).await?;
    info!(item_id = %item.id, quantity = item.quantity, "Item created.");
    Ok(item)
  }

  /// Overwrites every editable field of an existing item.
  #[instrument(name = "catalog::update", skip(self, draft), fields(item_id = %item_id))]
  pub async fn update(&self, item_id: ItemId, draft: ItemDraft) -> Result<Item, CatalogError> {
    draft.validate()?;
    let mut item = self.get(item_id).await?;
    item.apply_draft(draft, Utc::now());
    if !self.bounded(self.store.replace(item.clone())).await? {
      warn!("Item disappeared before it could be updated.");
      return Err(CatalogError::NotFound { item_id });
    }
    info!(quantity = item.quantity, "Item updated.");
    Ok(item)
  }

  #[instrument(name = "catalog::delete", skip(self), fields(item_id = %item_id))]
  pub async fn delete(&self, item_id: ItemId) -> Result<(), CatalogError> {
    if self.bounded(self.store.delete(item_id)).await? {
      info!("Item deleted.");
      Ok(())
    } else {
      warn!("Delete requested for unknown item.");
      Err(CatalogError::NotFound { item_id })
    }
  }

  async fn bounded<T>(&self, call: impl Future<Output = StoreResult<T>>) -> StoreResult<T> {
    let after = self.storage_timeout;
    tokio::time::timeout(after, call)
      .await
      .unwrap_or(Err(StoreError::Timeout { after }))
  }
}
