// sweetshop/server/src/services/seed.rs

use rust_decimal::Decimal;
use sweetshop_core::{ItemDraft, Storefront};
use tracing::{info, instrument};

use crate::errors::AppError;

fn sample_catalog() -> Vec<ItemDraft> {
  vec![
    ItemDraft::new("Kaju Katli", Decimal::new(4500, 2), 40, "Barfi"),
    ItemDraft::new("Besan Ladoo", Decimal::new(2000, 2), 60, "Ladoo"),
    ItemDraft::new("Motichoor Ladoo", Decimal::new(2800, 2), 50, "Ladoo"),
    ItemDraft::new("Gulab Jamun", Decimal::new(3000, 2), 80, "Syrup"),
    ItemDraft::new("Rasgulla", Decimal::new(2500, 2), 70, "Syrup"),
    ItemDraft::new("Soan Papdi", Decimal::new(1500, 2), 100, "Flaky"),
  ]
}

/// Fills an empty catalog with a few sample sweets. Returns how many were added.
#[instrument(name = "seed::seed_catalog", skip_all)]
pub async fn seed_catalog(storefront: &Storefront) -> Result<usize, AppError> {
  let catalog = storefront.catalog();
  if !catalog.list().await?.is_empty() {
    info!("Catalog already populated, skipping seed.");
    return Ok(0);
  }

  let drafts = sample_catalog();
  let count = drafts.len();
  for draft in drafts {
    catalog.create(draft).await?;
  }
  info!(count, "Seeded sample catalog.");
  Ok(count)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;
  use sweetshop_core::{InMemoryStockStore, LedgerConfig};

  #[tokio::test]
  async fn seeding_only_touches_an_empty_catalog() {
    let storefront = Storefront::new(Arc::new(InMemoryStockStore::new()), LedgerConfig::default());
    let added = seed_catalog(&storefront).await.unwrap();
    assert_eq!(added, sample_catalog().len());
    assert_eq!(seed_catalog(&storefront).await.unwrap(), 0);
    assert_eq!(storefront.catalog().list().await.unwrap().len(), added);
  }
}
