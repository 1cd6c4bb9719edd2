//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.

#![allow(dead_code)] // Not every test file uses every helper.

mod client;
mod fixtures;
mod server;

// Public API - this is what tests import
pub use client::TestClient;
pub use fixtures::{
    FixtureStore, DIRECT_REC_ID, INDIE_ONLY_TITLE_ID, INDIE_TAG_ID, MOBA_TAG_ID, NEIGHBOR_ONLY_ID,
    QUIET_TITLE_ID, ROGUELIKE_TAG_ID, SCORED_TITLE_ID,
};
pub use server::TestServer;
