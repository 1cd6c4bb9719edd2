//! Steamlens Insight Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod catalog;
pub mod categories;
pub mod config;
pub mod dashboard;
pub mod game_store;
pub mod recommend;
pub mod sentiment;
pub mod server;
pub mod views;

// Re-export commonly used types for convenience
pub use categories::CategoryRegistry;
pub use dashboard::{DashboardService, ViewStatus};
pub use game_store::{DatabaseSettings, GameStore, MySqlGameStore, NullGameStore, StoreError};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
