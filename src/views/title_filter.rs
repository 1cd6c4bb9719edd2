//! Keyword-selection to title-list projection.

use crate::catalog::Title;
use crate::categories::CategoryRegistry;
use crate::sentiment::TitleAggregate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Which keyword set of a title the selection is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeCategory {
    /// Union of positive and negative keywords.
    #[default]
    All,
    Positive,
    Negative,
    /// Positive and negative selected together; same union as `All`.
    Both,
}

/// One row of the filtered title list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleMatchRow {
    pub id: i64,
    pub name: String,
    pub link: String,
    pub rating: Option<f64>,
    pub tags: Vec<String>,
    pub positive_keywords: Vec<String>,
    pub negative_keywords: Vec<String>,
    /// The title's net keyword score, the ranking key.
    pub score: i64,
}

/// Filters the selection's titles by keyword membership and ranks them by
/// keyword score descending.
///
/// With a non-empty keyword selection a title is included iff its relevant
/// keyword set is non-empty and contains every selected keyword. With an
/// empty selection, titles with a non-empty relevant set are included, plus
/// any title whose keyword score is exactly 0 so that unreviewed titles
/// stay visible. Rows are deduplicated by title id, first occurrence wins.
pub fn filter_titles(
    registry: &CategoryRegistry,
    titles: &[Title],
    aggregates: &HashMap<i64, TitleAggregate>,
    type_category: TypeCategory,
    selected_keywords: &[String],
) -> Vec<TitleMatchRow> {
    let selected_indices: Vec<usize> = selected_keywords
        .iter()
        .filter_map(|keyword| registry.index_of(keyword))
        .collect();

    let blank = TitleAggregate::empty(0, registry.len());
    let mut seen = HashSet::new();
    let mut rows: Vec<TitleMatchRow> = titles
        .iter()
        .filter(|title| seen.insert(title.id))
        .filter_map(|title| {
            let aggregate = aggregates.get(&title.id).unwrap_or(&blank);
            let relevant = relevant_indices(aggregate, type_category);

            let included = if selected_indices.is_empty() {
                !relevant.is_empty() || aggregate.keyword_score == 0
            } else {
                !relevant.is_empty()
                    && selected_indices.iter().all(|index| relevant.contains(index))
            };

            included.then(|| TitleMatchRow {
                id: title.id,
                name: title.name.clone(),
                link: title.link.clone(),
                rating: title.rating,
                tags: title.tags.clone(),
                positive_keywords: aggregate.positive_names(registry),
                negative_keywords: aggregate.negative_names(registry),
                score: aggregate.keyword_score,
            })
        })
        .collect();

    rows.sort_by(|a, b| b.score.cmp(&a.score));
    rows
}

fn relevant_indices(aggregate: &TitleAggregate, type_category: TypeCategory) -> HashSet<usize> {
    match type_category {
        TypeCategory::Positive => aggregate.positive_indices().collect(),
        TypeCategory::Negative => aggregate.negative_indices().collect(),
        TypeCategory::All | TypeCategory::Both => aggregate
            .positive_indices()
            .chain(aggregate.negative_indices())
            .collect(),
    }
}
