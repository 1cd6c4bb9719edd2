//! Single-title drill-down projection.

use crate::catalog::Title;
use crate::categories::CategoryRegistry;
use crate::sentiment::{review_signal, Polarity, ReviewDetailRecord, TitleAggregate};
use serde::Serialize;

/// One category value of one review, for the per-review score table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryValue {
    pub keyword: String,
    pub value: i64,
}

/// One review in a polarity bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewEntry {
    pub review_id: i64,
    pub text: String,
    /// Absolute value of the review's value sum.
    pub magnitude: u64,
    pub scores: Vec<CategoryValue>,
}

/// The assembled drill-down view of one title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleDetail {
    pub title: Title,
    pub keyword_score: i64,
    pub positive_keywords: Vec<String>,
    pub negative_keywords: Vec<String>,
    /// Keywords whose frequency reaches the top third of the title's
    /// per-category count range.
    pub highlighted_positive: Vec<String>,
    pub highlighted_negative: Vec<String>,
    pub positive_reviews: Vec<ReviewEntry>,
    pub negative_reviews: Vec<ReviewEntry>,
}

/// Projects a title's aggregate and reviews into the detail view.
///
/// Reviews land in the bucket matching the sign of their value sum; balanced
/// reviews are excluded from both. Each bucket sorts by magnitude descending.
/// Keyword filters narrow a bucket to reviews that scored every filter
/// keyword at exactly the expected polarity (+1 for positive filters, -1 for
/// negative ones).
pub fn title_detail(
    registry: &CategoryRegistry,
    title: &Title,
    aggregate: &TitleAggregate,
    reviews: &[ReviewDetailRecord],
    positive_filter: &[String],
    negative_filter: &[String],
) -> TitleDetail {
    let positive_indices = filter_indices(registry, positive_filter);
    let negative_indices = filter_indices(registry, negative_filter);

    let mut positive_reviews = Vec::new();
    let mut negative_reviews = Vec::new();
    for review in reviews {
        let Some(signal) = review_signal(&review.values) else {
            continue;
        };
        match signal.polarity {
            Polarity::Positive => {
                if scores_all_at(&review.values, &positive_indices, 1) {
                    positive_reviews.push(review_entry(registry, review, signal.magnitude));
                }
            }
            Polarity::Negative => {
                if scores_all_at(&review.values, &negative_indices, -1) {
                    negative_reviews.push(review_entry(registry, review, signal.magnitude));
                }
            }
        }
    }
    positive_reviews.sort_by(|a, b| b.magnitude.cmp(&a.magnitude));
    negative_reviews.sort_by(|a, b| b.magnitude.cmp(&a.magnitude));

    TitleDetail {
        title: title.clone(),
        keyword_score: aggregate.keyword_score,
        positive_keywords: aggregate.positive_names(registry),
        negative_keywords: aggregate.negative_names(registry),
        highlighted_positive: highlighted_keywords(registry, &aggregate.positive_counts),
        highlighted_negative: highlighted_keywords(registry, &aggregate.negative_counts),
        positive_reviews,
        negative_reviews,
    }
}

/// Keywords standing out within one side of a title's counts: frequency in
/// the top third of the count range, and more than 2 mentions.
pub fn highlighted_keywords(registry: &CategoryRegistry, counts: &[u32]) -> Vec<String> {
    let (Some(&max), Some(&min)) = (counts.iter().max(), counts.iter().min()) else {
        return Vec::new();
    };
    let threshold = max as f64 - (max as f64 - min as f64) / 3.0;
    registry
        .names()
        .iter()
        .zip(counts)
        .filter(|(_, &count)| count as f64 >= threshold && count > 2)
        .map(|(name, _)| name.clone())
        .collect()
}

fn filter_indices(registry: &CategoryRegistry, keywords: &[String]) -> Vec<usize> {
    keywords
        .iter()
        .filter_map(|keyword| registry.index_of(keyword))
        .collect()
}

fn scores_all_at(values: &[i64], indices: &[usize], expected: i64) -> bool {
    indices
        .iter()
        .all(|&index| values.get(index).copied().unwrap_or(0) == expected)
}

fn review_entry(
    registry: &CategoryRegistry,
    review: &ReviewDetailRecord,
    magnitude: u64,
) -> ReviewEntry {
    let scores = registry
        .names()
        .iter()
        .enumerate()
        .map(|(index, name)| CategoryValue {
            keyword: name.clone(),
            value: review.values.get(index).copied().unwrap_or(0),
        })
        .collect();
    ReviewEntry {
        review_id: review.review_id,
        text: review.text.clone(),
        magnitude,
        scores,
    }
}
