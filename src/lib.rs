#![doc = "The `workpilot` library crate."]
#![doc = ""]
#![doc = "Authentication (registration, login, bearer tokens, profile self-service) and"]
#![doc = "per-user task management with server-side ownership enforcement. The binary"]
#![doc = "(`main.rs`) loads configuration, picks a store backend and serves `routes::config`."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod tasks;

pub use crate::error::AppError;
pub use crate::state::AppState;
