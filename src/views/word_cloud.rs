//! Word-cloud entries: frequencies plus sentiment and an emphasis tier.
//!
//! The frontend draws the cloud; the server only says how heavy each word
//! is, which side it leans to, and how hard to emphasize it. Sentiment is
//! passed in through the rows rather than read from shared state, so two
//! clouds rendered from different scopes can never bleed into each other.

use super::{KeywordRow, Sentiment};
use serde::Serialize;

/// Visual weight tier for one word, derived from where its count falls in
/// the cloud's count range split into thirds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    Strong,
    Medium,
    Plain,
}

impl Emphasis {
    /// Tier for a count within a cloud whose counts span `[min, max]`.
    /// When every word has the same count the whole cloud is strong,
    /// unless that shared count is zero.
    pub fn tier(count: u32, max: u32, min: u32) -> Self {
        if max == min {
            return if max > 0 { Self::Strong } else { Self::Plain };
        }
        let range_third = (max as f64 - min as f64) / 3.0;
        let high = max as f64 - range_third;
        let mid = max as f64 - 2.0 * range_third;
        if count as f64 >= high {
            Self::Strong
        } else if count as f64 >= mid {
            Self::Medium
        } else {
            Self::Plain
        }
    }
}

/// One word of a rendered cloud.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordCloudEntry {
    pub word: String,
    pub weight: u32,
    pub sentiment: Sentiment,
    pub emphasis: Emphasis,
}

/// Builds cloud entries from keyword rows, weighting each word by its
/// dominant frequency. Rows the caller already dropped stay dropped.
pub fn word_cloud(rows: &[KeywordRow]) -> Vec<WordCloudEntry> {
    let weights: Vec<u32> = rows.iter().map(|row| row.magnitude).collect();
    let max = weights.iter().copied().max().unwrap_or(0);
    let min = weights.iter().copied().min().unwrap_or(0);

    rows.iter()
        .map(|row| WordCloudEntry {
            word: row.keyword.clone(),
            weight: row.magnitude,
            sentiment: row.sentiment,
            emphasis: Emphasis::tier(row.magnitude, max, min),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(keyword: &str, positive: u32, negative: u32) -> KeywordRow {
        let (sentiment, magnitude) = match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => (Sentiment::Positive, positive),
            std::cmp::Ordering::Less => (Sentiment::Negative, negative),
            std::cmp::Ordering::Equal => (Sentiment::Neutral, 0),
        };
        KeywordRow {
            keyword: keyword.to_string(),
            positive,
            negative,
            sentiment,
            magnitude,
        }
    }

    // ===== emphasis tiers =====

    #[test]
    fn tiers_split_the_range_into_thirds() {
        // Range 0..9: high threshold 6, mid threshold 3.
        assert_eq!(Emphasis::tier(9, 9, 0), Emphasis::Strong);
        assert_eq!(Emphasis::tier(6, 9, 0), Emphasis::Strong);
        assert_eq!(Emphasis::tier(5, 9, 0), Emphasis::Medium);
        assert_eq!(Emphasis::tier(3, 9, 0), Emphasis::Medium);
        assert_eq!(Emphasis::tier(2, 9, 0), Emphasis::Plain);
    }

    #[test]
    fn equal_positive_counts_are_all_strong() {
        assert_eq!(Emphasis::tier(4, 4, 4), Emphasis::Strong);
    }

    #[test]
    fn equal_zero_counts_are_plain() {
        assert_eq!(Emphasis::tier(0, 0, 0), Emphasis::Plain);
    }

    // ===== cloud building =====

    #[test]
    fn entries_carry_weight_sentiment_and_emphasis() {
        let rows = vec![row("Story", 9, 1), row("Graphics", 1, 5), row("Sound", 1, 0)];
        let cloud = word_cloud(&rows);

        assert_eq!(cloud[0].word, "Story");
        assert_eq!(cloud[0].weight, 9);
        assert_eq!(cloud[0].sentiment, Sentiment::Positive);
        assert_eq!(cloud[0].emphasis, Emphasis::Strong);

        assert_eq!(cloud[1].sentiment, Sentiment::Negative);
        assert_eq!(cloud[1].weight, 5);
        assert_eq!(cloud[1].emphasis, Emphasis::Medium);

        assert_eq!(cloud[2].weight, 1);
        assert_eq!(cloud[2].emphasis, Emphasis::Plain);
    }

    #[test]
    fn empty_rows_build_an_empty_cloud() {
        assert!(word_cloud(&[]).is_empty());
    }
}
