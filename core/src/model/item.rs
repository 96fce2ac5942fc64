// sweetshop/core/src/model/item.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CatalogError;

/// Opaque identifier of a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
  /// Generates a fresh random identifier.
  pub fn new() -> Self {
    ItemId(Uuid::new_v4())
  }

  pub const fn from_uuid(id: Uuid) -> Self {
    ItemId(id)
  }

  pub const fn as_uuid(&self) -> Uuid {
    self.0
  }
}

impl Default for ItemId {
  fn default() -> Self {
    Self::new()
  }
}

impl From<Uuid> for ItemId {
  fn from(id: Uuid) -> Self {
    ItemId(id)
  }
}

impl fmt::Display for ItemId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

impl FromStr for ItemId {
  type Err = uuid::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Uuid::parse_str(s).map(ItemId)
  }
}

/// A single catalog and stock entry.
///
/// `quantity` is never negative in any committed state; only the ledger and
/// whole-record catalog edits write it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
  pub id: ItemId,
  pub name: String,
  pub price: Decimal,
  pub quantity: i32,
  pub category: String,
  pub image_url: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Item {
  /// Builds a new item from an already validated draft.
  pub fn from_draft(id: ItemId, draft: ItemDraft, now: DateTime<Utc>) -> Self {
    Item {
      id,
      name: draft.name,
      price: draft.price,
      quantity: draft.quantity,
      category: draft.category,
      image_url: draft.image_url,
      created_at: now,
      updated_at: now,
    }
  }

  /// Overwrites every editable field with the draft's values, keeping id and creation time.
  pub fn apply_draft(&mut self, draft: ItemDraft, now: DateTime<Utc>) {
    self.name = draft.name;
    self.price = draft.price;
    self.quantity = draft.quantity;
    self.category = draft.category;
    self.image_url = draft.image_url;
    self.updated_at = now;
  }
}

/// Prices are stored as `NUMERIC(12, 2)`: whole cents, ten integer digits.
const PRICE_SCALE: u32 = 2;

fn price_ceiling() -> Decimal {
  Decimal::new(10_000_000_000, 0)
}

/// Payload of the admin create/update catalog operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
  pub name: String,
  pub price: Decimal,
  pub quantity: i32,
  pub category: String,
  #[serde(default)]
  pub image_url: String,
}

impl ItemDraft {
  pub fn new(name: impl Into<String>, price: Decimal, quantity: i32, category: impl Into<String>) -> Self {
    ItemDraft {
      name: name.into(),
      price,
      quantity,
      category: category.into(),
      image_url: String::new(),
    }
  }

  pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
    self.image_url = image_url.into();
    self
  }

  /// Checks the record-level invariants. Reports the first offending field.
  pub fn validate(&self) -> Result<(), CatalogError> {
    if self.name.trim().is_empty() {
      return Err(CatalogError::invalid("name", "must not be blank"));
    }
    if self.category.trim().is_empty() {
      return Err(CatalogError::invalid("category", "must not be blank"));
    }
    if self.price < Decimal::ZERO {
      return Err(CatalogError::invalid("price", "must not be negative"));
    }
    if self.price.normalize().scale() > PRICE_SCALE {
      return Err(CatalogError::invalid("price", "must have at most two decimal places"));
    }
    if self.price >= price_ceiling() {
      return Err(CatalogError::invalid("price", "must be below 10000000000"));
    }
    if self.quantity < 0 {
      return Err(CatalogError::invalid("quantity", "must not be negative"));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn draft() -> ItemDraft {
    ItemDraft::new("Kaju Katli", Decimal::new(4500, 2), 12, "Barfi")
  }

  #[test]
  fn item_id_round_trips_through_display() {
    let id = ItemId::new();
    let parsed: ItemId = id.to_string().parse().unwrap();
    assert_eq!(parsed, id);
    assert!("not-a-uuid".parse::<ItemId>().is_err());
  }

  #[test]
  fn draft_validation_rejects_each_bad_field() {
    assert!(draft().validate().is_ok());

    let mut d = draft();
    d.name = "   ".into();
    assert!(matches!(d.validate(), Err(CatalogError::Invalid { field: "name", .. })));

    let mut d = draft();
    d.category = String::new();
    assert!(matches!(d.validate(), Err(CatalogError::Invalid { field: "category", .. })));

    let mut d = draft();
    d.price = Decimal::new(-1, 2);
    assert!(matches!(d.validate(), Err(CatalogError::Invalid { field: "price", .. })));

    let mut d = draft();
    d.quantity = -1;
    assert!(matches!(d.validate(), Err(CatalogError::Invalid { field: "quantity", .. })));
  }

  #[test]
  fn price_must_fit_whole_cents_and_ten_integer_digits() {
    let mut d = draft();
    d.price = Decimal::new(1999, 3);
    assert!(matches!(d.validate(), Err(CatalogError::Invalid { field: "price", .. })));

    d.price = Decimal::new(10_000_000_000, 0);
    assert!(matches!(d.validate(), Err(CatalogError::Invalid { field: "price", .. })));

    // Trailing zeros carry no extra precision.
    d.price = Decimal::new(2500, 3);
    assert!(d.validate().is_ok());

    d.price = Decimal::new(999_999_999_999, 2);
    assert!(d.validate().is_ok());
  }

  #[test]
  fn zero_price_and_zero_quantity_are_allowed() {
    let d = ItemDraft::new("Sample", Decimal::ZERO, 0, "Free");
    assert!(d.validate().is_ok());
  }

  #[test]
  fn apply_draft_keeps_identity_and_creation_time() {
    let created = Utc::now();
    let mut item = Item::from_draft(ItemId::new(), draft(), created);
    let id = item.id;
    let later = created + chrono::Duration::seconds(5);

    item.apply_draft(ItemDraft::new("Rasgulla", Decimal::new(300, 2), 40, "Syrup").with_image_url("r.png"), later);

    assert_eq!(item.id, id);
    assert_eq!(item.created_at, created);
    assert_eq!(item.updated_at, later);
    assert_eq!(item.quantity, 40);
    assert_eq!(item.image_url, "r.png");
  }

  #[test]
  fn item_serializes_with_camel_case_fields() {
    let item = Item::from_draft(ItemId::new(), draft().with_image_url("k.png"), Utc::now());
    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["imageUrl"], "k.png");
    assert!(json.get("createdAt").is_some());
    assert_eq!(json["id"], item.id.to_string());
  }
}
