// sweetshop/core/src/model/mod.rs

//! Plain data types shared by the ledger, the catalog and the transport layer.

pub mod filter;
pub mod item;
pub mod principal;
pub mod request;

pub use filter::ItemFilter;
pub use item::{Item, ItemDraft, ItemId};
pub use principal::{Principal, Role};
pub use request::{PurchaseRequest, RestockRequest};
