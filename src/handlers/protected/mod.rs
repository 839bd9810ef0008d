// handlers/protected/mod.rs - bearer token required, every query scoped to the caller
pub mod auth;
pub mod categories;
pub mod todos;
