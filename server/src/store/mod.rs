// sweetshop/server/src/store/mod.rs

//! Persistence backends: PostgreSQL for deployments, in-memory when no database is configured.

pub mod postgres;
pub mod users;

pub use postgres::PgStockStore;
pub use users::{InMemoryUserStore, PgUserStore, UserStore};
