// sweetshop/server/src/models/sweet.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use sweetshop_core::{Item, ItemId};
use uuid::Uuid;

/// Row shape of the `sweets` table.
#[derive(Debug, Clone, FromRow)]
pub struct SweetRow {
  pub id: Uuid,
  pub name: String,
  pub price: Decimal,
  pub quantity: i32,
  pub category: String,
  pub image_url: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<SweetRow> for Item {
  fn from(row: SweetRow) -> Self {
    Item {
      id: ItemId::from_uuid(row.id),
      name: row.name,
      price: row.price,
      quantity: row.quantity,
      category: row.category,
      image_url: row.image_url,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}
