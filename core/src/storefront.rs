// sweetshop/core/src/storefront.rs

//! Single entry point for inbound operations. Every call is authorized by the
//! `AccessPolicy` before the ledger or catalog is touched.

use std::sync::Arc;
use tracing::instrument;

use crate::catalog::CatalogService;
use crate::error::ShopResult;
use crate::ledger::{InventoryLedger, LedgerConfig, StockChange};
use crate::model::{Item, ItemDraft, ItemFilter, ItemId, Principal, PurchaseRequest, RestockRequest};
use crate::policy::{AccessPolicy, Operation};
use crate::store::StockStore;

#[derive(Debug)]
pub struct Storefront {
  policy: AccessPolicy,
  ledger: InventoryLedger,
  catalog: CatalogService,
}

impl Storefront {
  /// Wires the ledger and catalog to the same store handle.
  pub fn new(store: Arc<dyn StockStore>, config: LedgerConfig) -> Self {
    let catalog = CatalogService::new(store.clone(), config.storage_timeout);
    Self {
      policy: AccessPolicy::new(),
      ledger: InventoryLedger::new(store, config),
      catalog,
    }
  }

  pub fn ledger(&self) -> &InventoryLedger {
    &self.ledger
  }

  pub fn catalog(&self) -> &CatalogService {
    &self.catalog
  }

  pub async fn list_items(&self, principal: &Principal) -> ShopResult<Vec<Item>> {
    self.policy.check(principal, Operation::ReadCatalog)?;
    Ok(self.catalog.list().await?)
  }

  pub async fn search_items(&self, principal: &Principal, filter: &ItemFilter) -> ShopResult<Vec<Item>> {
    self.policy.check(principal, Operation::ReadCatalog)?;
    Ok(self.catalog.search(filter).await?)
  }

  pub async fn get_item(&self, principal: &Principal, item_id: ItemId) -> ShopResult<Item> {
    self.policy.check(principal, Operation::ReadCatalog)?;
    Ok(self.catalog.get(item_id).await?)
  }

  #[instrument(name = "storefront::create_item", skip_all, fields(principal_id = %principal.id))]
  pub async fn create_item(&self, principal: &Principal, draft: ItemDraft) -> ShopResult<Item> {
    self.policy.check(principal, Operation::CreateItem)?;
    Ok(self.catalog.create(draft).await?)
  }

  #[instrument(name = "storefront::update_item", skip_all, fields(principal_id = %principal.id, item_id = %item_id))]
  pub async fn update_item(&self, principal: &Principal, item_id: ItemId, draft: ItemDraft) -> ShopResult<Item> {
    self.policy.check(principal, Operation::UpdateItem)?;
    Ok(self.catalog.update(item_id, draft).await?)
  }

  #[instrument(name = "storefront::delete_item", skip_all, fields(principal_id = %principal.id, item_id = %item_id))]
  pub async fn delete_item(&self, principal: &Principal, item_id: ItemId) -> ShopResult<()> {
    self.policy.check(principal, Operation::DeleteItem)?;
    Ok(self.catalog.delete(item_id).await?)
  }

  #[instrument(name = "storefront::purchase", skip_all, fields(principal_id = %principal.id))]
  pub async fn purchase(&self, principal: &Principal, request: PurchaseRequest) -> ShopResult<StockChange> {
    self.policy.check(principal, Operation::Purchase)?;
    Ok(self.ledger.purchase(request.item_id, request.quantity).await?)
  }

  #[instrument(name = "storefront::restock", skip_all, fields(principal_id = %principal.id))]
  pub async fn restock(&self, principal: &Principal, request: RestockRequest) -> ShopResult<StockChange> {
    self.policy.check(principal, Operation::Restock)?;
    Ok(self.ledger.restock(request.item_id, request.additional_quantity).await?)
  }

  /// Absolute restock: sets the stock level regardless of its previous value.
  #[instrument(name = "storefront::set_stock", skip_all, fields(principal_id = %principal.id))]
  pub async fn set_stock(&self, principal: &Principal, item_id: ItemId, quantity: i32) -> ShopResult<StockChange> {
    self.policy.check(principal, Operation::Restock)?;
    Ok(self.ledger.set_quantity(item_id, quantity).await?)
  }
}
