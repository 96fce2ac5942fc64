// sweetshop/server/src/lib.rs

//! HTTP service for the sweet shop: catalog browsing, purchases and admin stock management.

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
pub mod web;

pub use config::AppConfig;
pub use errors::AppError;
pub use state::AppState;
