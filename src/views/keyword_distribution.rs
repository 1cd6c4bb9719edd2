//! Keyword distribution rows for the selected tag scope.

use super::Sentiment;
use crate::categories::CategoryRegistry;
use crate::sentiment::CorpusAggregate;
use serde::Serialize;

/// One row per category: both raw frequencies plus the dominant side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordRow {
    pub keyword: String,
    pub positive: u32,
    pub negative: u32,
    pub sentiment: Sentiment,
    /// Frequency of the dominant side, 0 for a tie.
    pub magnitude: u32,
}

/// Classifies a frequency pair by strict majority. Ties are neutral and
/// carry no magnitude.
fn classify(positive: u32, negative: u32) -> (Sentiment, u32) {
    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => (Sentiment::Positive, positive),
        std::cmp::Ordering::Less => (Sentiment::Negative, negative),
        std::cmp::Ordering::Equal => (Sentiment::Neutral, 0),
    }
}

/// Projects the corpus maps onto rows in registry order, keeping only rows
/// whose dominant sentiment is in `retain`. Excluded rows are dropped from
/// the output entirely, not hidden.
pub fn keyword_rows(
    registry: &CategoryRegistry,
    corpus: &CorpusAggregate,
    retain: &[Sentiment],
) -> Vec<KeywordRow> {
    registry
        .names()
        .iter()
        .enumerate()
        .filter_map(|(index, name)| {
            let positive = corpus.positive.get(index).copied().unwrap_or(0);
            let negative = corpus.negative.get(index).copied().unwrap_or(0);
            let (sentiment, magnitude) = classify(positive, negative);
            retain.contains(&sentiment).then(|| KeywordRow {
                keyword: name.clone(),
                positive,
                negative,
                sentiment,
                magnitude,
            })
        })
        .collect()
}
