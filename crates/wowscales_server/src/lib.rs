//! HTTP adapter for the WOW Scales verification records API.

pub mod api;
pub mod config;
pub mod server;
pub mod store;

pub use config::{Cli, ServerConfig, StoreKind};
pub use server::{build_router, HttpServer};
pub use store::{AppState, StoreBackend};
