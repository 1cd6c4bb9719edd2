//! Home dashboard projections: co-occurring tags and the user-score spread.

use crate::catalog::Title;
use serde::Serialize;
use std::collections::HashMap;

/// How many co-tag rows the home dashboard's bar chart shows.
pub const TOP_CO_TAGS: usize = 15;

/// One co-occurring tag and how many selected titles declare it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: u32,
}

/// Counts the tags declared across the selection's titles, excluding the
/// selected tags themselves. Sorted by count descending, name ascending on
/// ties.
pub fn co_tag_counts(titles: &[Title], selected_tags: &[String]) -> Vec<TagCount> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for title in titles {
        for tag in &title.tags {
            if !selected_tags.contains(tag) {
                *counts.entry(tag.as_str()).or_insert(0) += 1;
            }
        }
    }

    let mut rows: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    rows
}

/// A title's rating relative to the selection's mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingPosition {
    Above,
    Below,
    Average,
}

/// One point of the rating chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreEntry {
    pub id: i64,
    pub name: String,
    pub rating: f64,
    pub position: RatingPosition,
}

/// The selection's user-score spread.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreDistribution {
    pub title_count: usize,
    /// Mean over the rated titles; absent when nothing is rated.
    pub mean_rating: Option<f64>,
    pub entries: Vec<ScoreEntry>,
}

/// Positions every rated title against the selection's mean rating.
/// Unrated titles count toward `title_count` but get no chart entry.
pub fn score_distribution(titles: &[Title]) -> ScoreDistribution {
    let rated: Vec<(&Title, f64)> = titles
        .iter()
        .filter_map(|title| title.rating.map(|rating| (title, rating)))
        .collect();

    let mean_rating = if rated.is_empty() {
        None
    } else {
        Some(rated.iter().map(|(_, rating)| rating).sum::<f64>() / rated.len() as f64)
    };

    let entries = match mean_rating {
        None => Vec::new(),
        Some(mean) => rated
            .into_iter()
            .map(|(title, rating)| ScoreEntry {
                id: title.id,
                name: title.name.clone(),
                rating,
                position: if rating > mean {
                    RatingPosition::Above
                } else if rating < mean {
                    RatingPosition::Below
                } else {
                    RatingPosition::Average
                },
            })
            .collect(),
    };

    ScoreDistribution {
        title_count: titles.len(),
        mean_rating,
        entries,
    }
}
