// tests/common/mod.rs
#![allow(dead_code)] // Each test binary uses a different subset of these helpers.

use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use sweetshop_core::{
  AccessError, Decimal, IdentityProvider, InMemoryStockStore, InventoryLedger, Item, ItemDraft, ItemFilter, ItemId,
  LedgerConfig, Principal, QuantityTransition, QuantityUpdate, RetryPolicy, StockStore, StoreError, StoreResult,
};
use tracing::Level;

// --- Tracing Setup (once per test binary) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Fixtures ---

pub fn sweet(name: &str, cents: i64, quantity: i32, category: &str) -> Item {
  Item::from_draft(
    ItemId::new(),
    ItemDraft::new(name, Decimal::new(cents, 2), quantity, category),
    Utc::now(),
  )
}

pub fn stocked(quantity: i32) -> Item {
  sweet("Kaju Katli", 4500, quantity, "Barfi")
}

/// Ledger config with no backoff and the given attempt budget.
pub fn fast_config(max_attempts: u32) -> LedgerConfig {
  LedgerConfig {
    retry: RetryPolicy::immediate(max_attempts),
    storage_timeout: Duration::from_secs(2),
  }
}

pub fn ledger_over(store: Arc<dyn StockStore>, max_attempts: u32) -> InventoryLedger {
  InventoryLedger::new(store, fast_config(max_attempts))
}

/// Ledger exactly as a deployment without overrides would build it.
pub fn default_ledger(store: Arc<dyn StockStore>) -> InventoryLedger {
  InventoryLedger::new(store, LedgerConfig::default())
}

// --- Fault-injecting store ---

/// Wraps an `InMemoryStockStore` and injects latency, failures and busy records on demand.
pub struct FlakyStore {
  inner: InMemoryStockStore,
  failing_writes: AtomicU32,
  busy_updates: AtomicU32,
  latency: Duration,
  pub updates: AtomicU32,
}

impl FlakyStore {
  pub fn new(inner: InMemoryStockStore) -> Self {
    FlakyStore {
      inner,
      failing_writes: AtomicU32::new(0),
      busy_updates: AtomicU32::new(0),
      latency: Duration::ZERO,
      updates: AtomicU32::new(0),
    }
  }

  pub fn holding(items: impl IntoIterator<Item = Item>) -> Self {
    Self::new(InMemoryStockStore::with_items(items))
  }

  /// Sleeps before every read and update reaches the inner store, like a network round trip.
  pub fn with_latency(mut self, delay: Duration) -> Self {
    self.latency = delay;
    self
  }

  /// The next `n` updates fail with an unknown outcome.
  pub fn fail_next_writes(&self, n: u32) {
    self.failing_writes.store(n, Ordering::SeqCst);
  }

  /// The next `n` updates give up on a busy record without writing.
  pub fn contend_next_updates(&self, n: u32) {
    self.busy_updates.store(n, Ordering::SeqCst);
  }

  pub async fn quantity_of(&self, id: ItemId) -> i32 {
    self.inner.get(id).await.unwrap().unwrap().quantity
  }

  async fn round_trip(&self) {
    if !self.latency.is_zero() {
      tokio::time::sleep(self.latency).await;
    }
  }
}

fn take_one(counter: &AtomicU32) -> bool {
  counter
    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
    .is_ok()
}

#[async_trait]
impl StockStore for FlakyStore {
  async fn get(&self, id: ItemId) -> StoreResult<Option<Item>> {
    self.round_trip().await;
    self.inner.get(id).await
  }

  async fn list(&self, filter: &ItemFilter) -> StoreResult<Vec<Item>> {
    self.inner.list(filter).await
  }

  async fn insert(&self, item: Item) -> StoreResult<()> {
    self.inner.insert(item).await
  }

  async fn replace(&self, item: Item) -> StoreResult<bool> {
    self.inner.replace(item).await
  }

  async fn delete(&self, id: ItemId) -> StoreResult<bool> {
    self.inner.delete(id).await
  }

  async fn update_quantity(&self, id: ItemId, transition: QuantityTransition<'_>) -> StoreResult<QuantityUpdate> {
    self.updates.fetch_add(1, Ordering::SeqCst);
    self.round_trip().await;
    if take_one(&self.failing_writes) {
      return Err(StoreError::unavailable(anyhow::anyhow!("injected write failure")));
    }
    if take_one(&self.busy_updates) {
      return Err(StoreError::Contention { attempts: 1 });
    }
    self.inner.update_quantity(id, transition).await
  }
}

// --- Identity provider backed by a fixed token table ---

#[derive(Default)]
pub struct StaticIdentity {
  tokens: HashMap<String, Principal>,
}

impl StaticIdentity {
  pub fn with(mut self, token: &str, principal: Principal) -> Self {
    self.tokens.insert(token.to_string(), principal);
    self
  }
}

impl IdentityProvider for StaticIdentity {
  fn authenticate(&self, credential: &str) -> Result<Principal, AccessError> {
    self
      .tokens
      .get(credential)
      .cloned()
      .ok_or_else(|| AccessError::Unauthenticated("Unknown token".to_string()))
  }
}
