//! Pure view-model projection.
//!
//! Everything in here is a function from aggregates to plain serializable
//! rows: no I/O, no chart-library formatting, no hidden state. The word
//! cloud, the tables, and the drill-down views are all data the frontend
//! renders however it likes.

pub mod home;
pub mod keyword_distribution;
pub mod title_detail;
pub mod title_filter;
pub mod view_state;
pub mod word_cloud;

pub use home::{co_tag_counts, score_distribution, RatingPosition, ScoreDistribution, TagCount};
pub use keyword_distribution::{keyword_rows, KeywordRow};
pub use title_detail::{title_detail, ReviewEntry, TitleDetail};
pub use title_filter::{filter_titles, TitleMatchRow, TypeCategory};
pub use view_state::{DashboardPage, ViewState};
pub use word_cloud::{word_cloud, Emphasis, WordCloudEntry};

use serde::{Deserialize, Serialize};

/// Dominant sentiment of a keyword row or word-cloud entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}
