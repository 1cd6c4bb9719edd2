//! Related-title lookup over the two precomputed recommendation sources.
//!
//! The store keeps direct recommendation edges (id, name, tags) and a
//! pairwise similarity matrix flattened to (candidate, similarity) rows.
//! The recommendation table is authoritative for which candidates exist and
//! what they are called; the matrix only contributes the similarity number.

use crate::catalog::store_link;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// One edge from the direct recommendation table, tags already decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectRecommendation {
    pub id: i64,
    pub name: String,
    pub tags: Vec<String>,
}

/// One flattened similarity-matrix entry, similarity in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityNeighbor {
    pub id: i64,
    pub name: String,
    pub similarity: f64,
}

/// A merged related-title row, similarity as a percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedTitle {
    pub id: i64,
    pub name: String,
    pub tags: Vec<String>,
    pub link: String,
    pub similarity_pct: f64,
}

/// Orders neighbors by similarity descending and deduplicates candidates,
/// keeping the first (highest) entry per id.
pub fn normalize_neighbors(mut neighbors: Vec<SimilarityNeighbor>) -> Vec<SimilarityNeighbor> {
    neighbors.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut seen = HashSet::new();
    neighbors.retain(|neighbor| seen.insert(neighbor.id));
    neighbors
}

/// Left-merges the direct recommendations with the similarity neighbors on
/// candidate id. Recommendation rows decide presence, name, and tags;
/// similarity defaults to 0 when the matrix has no entry. The result is
/// deduplicated by candidate id keeping the highest similarity and sorted
/// by similarity descending. Empty input or output is a valid outcome.
pub fn merge_related(
    direct: &[DirectRecommendation],
    neighbors: &[SimilarityNeighbor],
) -> Vec<RelatedTitle> {
    let mut similarity_by_id: HashMap<i64, f64> = HashMap::new();
    for neighbor in neighbors {
        similarity_by_id
            .entry(neighbor.id)
            .and_modify(|current| {
                if neighbor.similarity > *current {
                    *current = neighbor.similarity;
                }
            })
            .or_insert(neighbor.similarity);
    }

    let mut seen = HashSet::new();
    let mut merged: Vec<RelatedTitle> = direct
        .iter()
        .filter(|recommendation| seen.insert(recommendation.id))
        .map(|recommendation| {
            let similarity = similarity_by_id
                .get(&recommendation.id)
                .copied()
                .unwrap_or(0.0);
            RelatedTitle {
                id: recommendation.id,
                name: recommendation.name.clone(),
                tags: recommendation.tags.clone(),
                link: store_link(recommendation.id),
                similarity_pct: to_percent(similarity),
            }
        })
        .collect();

    merged.sort_by(|a, b| {
        b.similarity_pct
            .partial_cmp(&a.similarity_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    merged
}

/// Converts a [0, 1] similarity to a percentage rounded to two decimals.
fn to_percent(similarity: f64) -> f64 {
    (similarity * 10_000.0).round() / 100.0
}
