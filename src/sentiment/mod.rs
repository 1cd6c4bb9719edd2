//! Review keyword sentiment aggregation.
//!
//! Reviews arrive as per-category values in {-1, 0, 1}. Everything the
//! dashboard shows derives from two reductions over one batch: per-title
//! totals built in a single grouped pass, and corpus-wide frequency maps.
//! The corpus maps exist in two deliberately distinct flavors: the global
//! distribution counts reviews directly, the per-tag drill-down sums the
//! per-title maps of the titles declaring that tag.
//!
//! All count vectors are aligned with the category registry's order.

use crate::categories::CategoryRegistry;
use std::collections::HashMap;

/// One review of one title, reduced to its per-category sentiment values.
///
/// `values` is aligned with the registry's category order; missing or
/// non-numeric store values have already been coerced to 0.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRecord {
    pub title_id: i64,
    pub review_id: i64,
    pub values: Vec<i64>,
}

/// A review loaded for the detail view, including its text.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDetailRecord {
    pub row_id: i64,
    pub title_id: i64,
    pub review_id: i64,
    pub text: String,
    pub values: Vec<i64>,
}

/// Per-title keyword sentiment totals over one tag selection.
///
/// The keyword sets are derived from the counts, so the "a category is a
/// positive keyword iff its positive count is non-zero" invariant holds by
/// construction. A category can be both positive and negative at once when
/// reviews disagree; that mixed signal is expected and preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleAggregate {
    pub title_id: i64,
    /// Reviews at +1 per category.
    pub positive_counts: Vec<u32>,
    /// Reviews at -1 per category.
    pub negative_counts: Vec<u32>,
    /// Sum of raw signed values across all the title's reviews.
    pub keyword_score: i64,
}

impl TitleAggregate {
    pub fn empty(title_id: i64, width: usize) -> Self {
        Self {
            title_id,
            positive_counts: vec![0; width],
            negative_counts: vec![0; width],
            keyword_score: 0,
        }
    }

    fn absorb(&mut self, values: &[i64]) {
        let width = self.positive_counts.len();
        for (index, &value) in values.iter().enumerate().take(width) {
            if value == 1 {
                self.positive_counts[index] += 1;
            } else if value == -1 {
                self.negative_counts[index] += 1;
            }
            self.keyword_score += value;
        }
    }

    pub fn has_positive(&self, index: usize) -> bool {
        self.positive_counts.get(index).is_some_and(|&c| c > 0)
    }

    pub fn has_negative(&self, index: usize) -> bool {
        self.negative_counts.get(index).is_some_and(|&c| c > 0)
    }

    pub fn positive_indices(&self) -> impl Iterator<Item = usize> + '_ {
        indices_with_counts(&self.positive_counts)
    }

    pub fn negative_indices(&self) -> impl Iterator<Item = usize> + '_ {
        indices_with_counts(&self.negative_counts)
    }

    /// Positive keyword names in registry order.
    pub fn positive_names(&self, registry: &CategoryRegistry) -> Vec<String> {
        names_at(registry, self.positive_indices())
    }

    /// Negative keyword names in registry order.
    pub fn negative_names(&self, registry: &CategoryRegistry) -> Vec<String> {
        names_at(registry, self.negative_indices())
    }
}

fn indices_with_counts(counts: &[u32]) -> impl Iterator<Item = usize> + '_ {
    counts
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .map(|(index, _)| index)
}

fn names_at(registry: &CategoryRegistry, indices: impl Iterator<Item = usize>) -> Vec<String> {
    let names = registry.names();
    indices
        .filter_map(|index| names.get(index).cloned())
        .collect()
}

/// Builds one aggregate per selected title in a single grouped pass over the
/// review batch. Titles without reviews get empty aggregates; reviews whose
/// title is not part of the selection are skipped.
pub fn aggregate_by_title(
    width: usize,
    title_ids: impl IntoIterator<Item = i64>,
    reviews: &[ReviewRecord],
) -> HashMap<i64, TitleAggregate> {
    let mut aggregates: HashMap<i64, TitleAggregate> = title_ids
        .into_iter()
        .map(|id| (id, TitleAggregate::empty(id, width)))
        .collect();

    for review in reviews {
        if let Some(aggregate) = aggregates.get_mut(&review.title_id) {
            aggregate.absorb(&review.values);
        }
    }

    aggregates
}

/// Corpus-wide keyword frequency maps, registry order.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusAggregate {
    pub positive: Vec<u32>,
    pub negative: Vec<u32>,
}

impl CorpusAggregate {
    pub fn empty(width: usize) -> Self {
        Self {
            positive: vec![0; width],
            negative: vec![0; width],
        }
    }

    /// Counts +1/-1 occurrences directly across a review batch. The global
    /// distribution is always computed this way, never by summing per-title
    /// maps.
    pub fn count_reviews<'a>(
        width: usize,
        reviews: impl IntoIterator<Item = &'a ReviewRecord>,
    ) -> Self {
        let mut corpus = Self::empty(width);
        for review in reviews {
            for (index, &value) in review.values.iter().enumerate().take(width) {
                if value == 1 {
                    corpus.positive[index] += 1;
                } else if value == -1 {
                    corpus.negative[index] += 1;
                }
            }
        }
        corpus
    }

    /// Sums already-computed per-title maps. The per-tag drill-down runs
    /// this over the titles declaring the tag.
    pub fn sum_titles<'a>(
        width: usize,
        aggregates: impl IntoIterator<Item = &'a TitleAggregate>,
    ) -> Self {
        let mut corpus = Self::empty(width);
        for aggregate in aggregates {
            for (index, &count) in aggregate.positive_counts.iter().enumerate().take(width) {
                corpus.positive[index] += count;
            }
            for (index, &count) in aggregate.negative_counts.iter().enumerate().take(width) {
                corpus.negative[index] += count;
            }
        }
        corpus
    }
}

/// Net polarity of a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

/// Strength and direction of one review's overall signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewSignal {
    pub polarity: Polarity,
    pub magnitude: u64,
}

/// Classifies a review by the sum of its category values. Balanced reviews
/// (sum 0) carry no signal and belong in neither bucket.
pub fn review_signal(values: &[i64]) -> Option<ReviewSignal> {
    let sum: i64 = values.iter().sum();
    if sum == 0 {
        return None;
    }
    let polarity = if sum > 0 {
        Polarity::Positive
    } else {
        Polarity::Negative
    };
    Some(ReviewSignal {
        polarity,
        magnitude: sum.unsigned_abs(),
    })
}
