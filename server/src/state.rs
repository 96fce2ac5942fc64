// sweetshop/server/src/state.rs
use chrono::Duration;
use std::sync::Arc;
use sweetshop_core::{InMemoryStockStore, StockStore, Storefront};

use crate::config::AppConfig;
use crate::services::token_service::TokenService;
use crate::store::{InMemoryUserStore, UserStore};

#[derive(Clone)]
pub struct AppState {
  pub storefront: Arc<Storefront>,
  pub users: Arc<dyn UserStore>,
  pub tokens: Arc<TokenService>,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  pub fn new(stock: Arc<dyn StockStore>, users: Arc<dyn UserStore>, config: AppConfig) -> Self {
    let tokens = TokenService::new(&config.jwt_secret, Duration::hours(config.token_ttl_hours));
    Self {
      storefront: Arc::new(Storefront::new(stock, config.ledger_config())),
      users,
      tokens: Arc::new(tokens),
      config: Arc::new(config),
    }
  }

  /// State backed entirely by process memory.
  pub fn in_memory(config: AppConfig) -> Self {
    Self::new(Arc::new(InMemoryStockStore::new()), Arc::new(InMemoryUserStore::new()), config)
  }
}
