// sweetshop/core/src/lib.rs

//! Sweetshop core: the inventory consistency engine behind the shop backend.
//!
//! The crate provides:
//!  - An `InventoryLedger` that applies purchases and restocks to a single item
//!    atomically, never letting stock go negative, under arbitrary concurrency.
//!  - A `StockStore` contract (plus an in-memory implementation) exposing a
//!    per-record atomic quantity transition the ledger builds on.
//!  - An `AccessPolicy` gate mapping a principal's role and an operation to
//!    allow/deny.
//!  - A `CatalogService` for filtered reads and admin catalog editing.
//!  - A `Storefront` facade that sends every operation through the gate first.

pub mod catalog;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod model;
pub mod policy;
pub mod store;
pub mod storefront;

// --- Re-exports for the Public API ---

pub use crate::catalog::CatalogService;
pub use crate::error::{AccessError, CatalogError, ErrorKind, LedgerError, ShopError, ShopResult, StoreError};
pub use crate::identity::{bearer_token, IdentityProvider};
pub use crate::ledger::{InventoryLedger, LedgerConfig, RetryPolicy, StockChange};
pub use crate::model::{Item, ItemDraft, ItemFilter, ItemId, Principal, PurchaseRequest, RestockRequest, Role};
pub use crate::policy::{AccessPolicy, Decision, Operation};
pub use crate::store::{InMemoryStockStore, QuantityTransition, QuantityUpdate, StockStore, StoreResult};
pub use crate::storefront::Storefront;

// Prices are exact decimals; callers should not need a direct rust_decimal dependency.
pub use rust_decimal::Decimal;

/*
    Request flow:
    1. The transport layer turns credentials into a `Principal` via an `IdentityProvider`.
    2. It validates the raw payload into a typed request (`PurchaseRequest`, `ItemDraft`, ...).
    3. `Storefront` asks the `AccessPolicy` whether the principal's role may run the operation.
    4. Stock mutations go to the `InventoryLedger`; catalog reads and edits go to the `CatalogService`.
    5. Both talk to the same injected `StockStore`.
*/
