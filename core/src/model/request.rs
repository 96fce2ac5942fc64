// sweetshop/core/src/model/request.rs

//! Typed, already-validated operation payloads.

use super::ItemId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseRequest {
  pub item_id: ItemId,
  pub quantity: i32,
}

impl PurchaseRequest {
  pub const fn new(item_id: ItemId, quantity: i32) -> Self {
    PurchaseRequest { item_id, quantity }
  }
}

/// Additive restock. The absolute form goes through `Storefront::set_stock`
/// or a whole-record catalog update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestockRequest {
  pub item_id: ItemId,
  pub additional_quantity: i32,
}

impl RestockRequest {
  pub const fn new(item_id: ItemId, additional_quantity: i32) -> Self {
    RestockRequest {
      item_id,
      additional_quantity,
    }
  }
}
