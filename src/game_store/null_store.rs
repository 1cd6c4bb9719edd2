//! Null game store implementation.
//!
//! Stands in for the real store when no database is configured, such as in
//! tooling or degraded local runs: every query succeeds with nothing.

use super::models::{RecommendationRow, TagRow};
use super::trait_def::{GameStore, StoreError};
use crate::catalog::SelectionBatch;
use crate::categories::CategoryRegistry;
use crate::recommend::SimilarityNeighbor;
use crate::sentiment::ReviewDetailRecord;
use async_trait::async_trait;

pub struct NullGameStore;

#[async_trait]
impl GameStore for NullGameStore {
    async fn tag_catalog(&self) -> Result<Vec<TagRow>, StoreError> {
        Ok(Vec::new())
    }

    async fn load_selection(
        &self,
        _selection: &[String],
        _registry: &CategoryRegistry,
    ) -> Result<SelectionBatch, StoreError> {
        Ok(SelectionBatch::default())
    }

    async fn title_reviews(
        &self,
        _title_id: i64,
        _registry: &CategoryRegistry,
    ) -> Result<Vec<ReviewDetailRecord>, StoreError> {
        Ok(Vec::new())
    }

    async fn direct_recommendations(
        &self,
        _title_id: i64,
    ) -> Result<Vec<RecommendationRow>, StoreError> {
        Ok(Vec::new())
    }

    async fn similarity_neighbors(
        &self,
        _title_id: i64,
    ) -> Result<Vec<SimilarityNeighbor>, StoreError> {
        Ok(Vec::new())
    }

    async fn review_table_columns(&self) -> Result<Vec<String>, StoreError> {
        Ok(Vec::new())
    }
}
