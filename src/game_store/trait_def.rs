//! GameStore trait definition.
//!
//! Abstracts the backing store so the dashboard service can run against
//! MySQL in production and in-memory fixtures in tests.

use super::models::{RecommendationRow, TagRow};
use crate::catalog::SelectionBatch;
use crate::categories::CategoryRegistry;
use crate::recommend::SimilarityNeighbor;
use crate::sentiment::ReviewDetailRecord;
use async_trait::async_trait;
use thiserror::Error;

/// Failure at the store boundary. Connectivity and query failures get the
/// same non-fatal treatment upstream, but they are counted separately and
/// worded differently in warnings.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not connect to the game database: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("game database query failed: {0}")]
    Query(#[source] sqlx::Error),
}

/// Trait for the analytics backing store.
#[async_trait]
pub trait GameStore: Send + Sync {
    // =========================================================================
    // Tag Catalog
    // =========================================================================

    /// All (tag id, tag name) rows, for the pickers and tag decoding.
    async fn tag_catalog(&self) -> Result<Vec<TagRow>, StoreError>;

    // =========================================================================
    // Selection Pipeline
    // =========================================================================

    /// One unit of work for a tag selection: the tag vocabulary, the
    /// resolved tag ids, the conjunctively filtered title rows, and the
    /// full review batch for those titles in one query.
    async fn load_selection(
        &self,
        selection: &[String],
        registry: &CategoryRegistry,
    ) -> Result<SelectionBatch, StoreError>;

    /// All reviews of one title, with text, for the detail view.
    async fn title_reviews(
        &self,
        title_id: i64,
        registry: &CategoryRegistry,
    ) -> Result<Vec<ReviewDetailRecord>, StoreError>;

    // =========================================================================
    // Recommendation Sources
    // =========================================================================

    /// Direct recommendation edges for a base title, tags still JSON.
    async fn direct_recommendations(
        &self,
        title_id: i64,
    ) -> Result<Vec<RecommendationRow>, StoreError>;

    /// The similarity matrix's row for a base title, flattened to one entry
    /// per candidate; candidates without an id are dropped.
    async fn similarity_neighbors(
        &self,
        title_id: i64,
    ) -> Result<Vec<SimilarityNeighbor>, StoreError>;

    // =========================================================================
    // Schema Probe
    // =========================================================================

    /// Column names of the review table, for category validation.
    async fn review_table_columns(&self) -> Result<Vec<String>, StoreError>;
}
