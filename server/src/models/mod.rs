// sweetshop/server/src/models/mod.rs
pub mod sweet;
pub mod user;
