//! Data-access boundary for the game analytics database.
//!
//! Everything that touches MySQL lives behind the [`GameStore`] trait: the
//! dashboard service sees domain rows and a typed [`StoreError`], never a
//! sqlx error. One connection is opened per logical unit of work and
//! explicitly closed on every path.

mod models;
mod mysql_store;
mod null_store;
mod trait_def;

pub use models::{RecommendationRow, TagRow};
pub use mysql_store::{DatabaseSettings, MySqlGameStore};
pub use null_store::NullGameStore;
pub use trait_def::{GameStore, StoreError};
