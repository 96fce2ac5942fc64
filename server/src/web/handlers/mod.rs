// sweetshop/server/src/web/handlers/mod.rs
pub mod auth_handlers;
pub mod inventory_handlers;
pub mod sweet_handlers;
