//! Dashboard orchestration: one synchronous pipeline run per interaction.
//!
//! Every view goes through the same steps: normalize the tag selection,
//! fetch or reuse the selection snapshot (catalog load + batched review
//! load + grouped aggregation), then project a pure view model. Store
//! failures become warnings and empty views, never errors that reach the
//! frontend.

use crate::catalog::{Title, TagVocabulary};
use crate::categories::CategoryRegistry;
use crate::game_store::{GameStore, StoreError};
use crate::recommend::{self, DirectRecommendation, RelatedTitle};
use crate::sentiment::{aggregate_by_title, CorpusAggregate, TitleAggregate};
use crate::server::metrics::{record_snapshot_cache_hit, record_snapshot_cache_miss};
use crate::views::{
    self, home, KeywordRow, ScoreDistribution, Sentiment, TagCount, TitleDetail, TitleMatchRow,
    TypeCategory, WordCloudEntry,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

/// Distinct, non-error outcome of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    Ok,
    /// Fewer than two distinct tags selected.
    NeedMoreTags,
    /// None of the selected tag names exist in the tag catalog.
    UnknownTags,
    NoMatchingTitles,
    NoMatchingKeywords,
    StoreUnavailable,
}

impl ViewStatus {
    /// Guidance text the frontend shows for empty states.
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::Ok => "",
            Self::NeedMoreTags => "Select at least two tags to build the dashboard.",
            Self::UnknownTags => "None of the selected tags exist; pick tags from the catalog.",
            Self::NoMatchingTitles => "No title carries every selected tag; loosen the selection.",
            Self::NoMatchingKeywords => {
                "No title matches every selected keyword; deselect some keywords."
            }
            Self::StoreUnavailable => {
                "The game database is unreachable; showing no data until it recovers."
            }
        }
    }
}

/// One fully aggregated tag selection, shared across the views that read it.
#[derive(Debug)]
pub struct Snapshot {
    /// Normalized (sorted, deduplicated) tag selection this was built for.
    pub tags: Vec<String>,
    pub resolved_tag_ids: Vec<i64>,
    pub vocabulary: TagVocabulary,
    pub titles: Vec<Title>,
    pub aggregates: HashMap<i64, TitleAggregate>,
    /// Corpus-wide frequency maps counted directly across the review batch.
    pub corpus: CorpusAggregate,
    pub built_at: DateTime<Utc>,
}

impl Snapshot {
    fn status(&self) -> ViewStatus {
        if self.resolved_tag_ids.is_empty() {
            ViewStatus::UnknownTags
        } else if self.titles.is_empty() {
            ViewStatus::NoMatchingTitles
        } else {
            ViewStatus::Ok
        }
    }
}

/// Result of asking for a selection snapshot.
pub struct SnapshotOutcome {
    pub snapshot: Option<Arc<Snapshot>>,
    pub status: ViewStatus,
}

impl SnapshotOutcome {
    fn empty(status: ViewStatus) -> Self {
        Self {
            snapshot: None,
            status,
        }
    }
}

/// Sorts and deduplicates a tag selection; the cache key and the ≥2-tags
/// policy both use this normal form.
pub fn normalize_selection(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = tags.to_vec();
    normalized.sort();
    normalized.dedup();
    normalized
}

pub struct DashboardService {
    store: Arc<dyn GameStore>,
    registry: CategoryRegistry,
    /// Passive single-slot snapshot cache, invalidated by key mismatch only.
    cache: Mutex<Option<Arc<Snapshot>>>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn GameStore>, registry: CategoryRegistry) -> Self {
        Self {
            store,
            registry,
            cache: Mutex::new(None),
        }
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// Tag names for the selection pickers, sorted. Empty with a warning
    /// status when the store is down.
    pub async fn tag_catalog(&self) -> TagCatalogView {
        match self.store.tag_catalog().await {
            Ok(rows) => {
                let mut tags: Vec<String> = rows.into_iter().map(|row| row.name).collect();
                tags.sort();
                tags.dedup();
                TagCatalogView {
                    status: ViewStatus::Ok,
                    guidance: String::new(),
                    tags,
                }
            }
            Err(err) => {
                warn!("Tag catalog unavailable: {}", err);
                TagCatalogView {
                    status: ViewStatus::StoreUnavailable,
                    guidance: ViewStatus::StoreUnavailable.guidance().to_string(),
                    tags: Vec::new(),
                }
            }
        }
    }

    /// Fetches or builds the snapshot for a tag selection. Successful
    /// builds replace the cache slot; store failures leave it untouched so
    /// the next interaction retries.
    pub async fn snapshot(&self, tags: &[String]) -> SnapshotOutcome {
        let normalized = normalize_selection(tags);
        if normalized.len() < 2 {
            return SnapshotOutcome::empty(ViewStatus::NeedMoreTags);
        }

        {
            let slot = self.cache.lock().await;
            if let Some(snapshot) = slot.as_ref() {
                if snapshot.tags == normalized {
                    record_snapshot_cache_hit();
                    return SnapshotOutcome {
                        status: snapshot.status(),
                        snapshot: Some(snapshot.clone()),
                    };
                }
            }
        }
        record_snapshot_cache_miss();

        let batch = match self.store.load_selection(&normalized, &self.registry).await {
            Ok(batch) => batch,
            Err(err) => {
                warn!("Selection load failed for {:?}: {}", normalized, err);
                return SnapshotOutcome::empty(ViewStatus::StoreUnavailable);
            }
        };

        let titles = batch.decoded_titles();
        let aggregates = aggregate_by_title(
            self.registry.len(),
            titles.iter().map(|title| title.id),
            &batch.reviews,
        );
        let corpus = CorpusAggregate::count_reviews(self.registry.len(), batch.reviews.iter());

        let snapshot = Arc::new(Snapshot {
            tags: normalized,
            resolved_tag_ids: batch.resolved_tag_ids,
            vocabulary: batch.vocabulary,
            titles,
            aggregates,
            corpus,
            built_at: Utc::now(),
        });

        let status = snapshot.status();
        *self.cache.lock().await = Some(snapshot.clone());
        SnapshotOutcome {
            snapshot: Some(snapshot),
            status,
        }
    }

    /// The home dashboard: co-tag distribution, title list, score spread.
    pub async fn home_view(&self, tags: &[String]) -> HomeView {
        let outcome = self.snapshot(tags).await;
        let Some(snapshot) = outcome.snapshot else {
            return HomeView::empty(outcome.status);
        };

        let co_tags = home::co_tag_counts(&snapshot.titles, &snapshot.tags);
        let tag_cloud = tag_word_cloud(&co_tags);
        let top_co_tags: Vec<TagCount> =
            co_tags.into_iter().take(home::TOP_CO_TAGS).collect();

        HomeView {
            status: outcome.status,
            guidance: outcome.status.guidance().to_string(),
            selected_tags: snapshot.tags.clone(),
            co_tags: top_co_tags,
            tag_cloud,
            titles: snapshot.titles.clone(),
            scores: home::score_distribution(&snapshot.titles),
            built_at: Some(snapshot.built_at),
        }
    }

    /// Keyword distribution over the whole selection or one drilled-down
    /// tag. The global mode reads the directly counted corpus maps; the
    /// drill-down sums the per-title maps of titles declaring the tag.
    pub async fn keyword_distribution(
        &self,
        tags: &[String],
        drill_down_tag: Option<&str>,
        retain: &[Sentiment],
    ) -> KeywordDistributionView {
        let outcome = self.snapshot(tags).await;
        let Some(snapshot) = outcome.snapshot else {
            return KeywordDistributionView::empty(outcome.status, drill_down_tag);
        };

        let (corpus, status) = match drill_down_tag {
            None => (snapshot.corpus.clone(), outcome.status),
            Some(tag) => {
                let declaring: Vec<&TitleAggregate> = snapshot
                    .titles
                    .iter()
                    .filter(|title| title.declares_tag(tag))
                    .filter_map(|title| snapshot.aggregates.get(&title.id))
                    .collect();
                let status = if declaring.is_empty() && outcome.status == ViewStatus::Ok {
                    ViewStatus::NoMatchingTitles
                } else {
                    outcome.status
                };
                (
                    CorpusAggregate::sum_titles(self.registry.len(), declaring),
                    status,
                )
            }
        };

        let rows = views::keyword_rows(&self.registry, &corpus, retain);
        let word_cloud = views::word_cloud(&rows);
        KeywordDistributionView {
            status,
            guidance: status.guidance().to_string(),
            drill_down_tag: drill_down_tag.map(|tag| tag.to_string()),
            rows,
            word_cloud,
        }
    }

    /// Keyword-selection title list: AND keyword filter, zero-score rule,
    /// keyword-score ranking.
    pub async fn title_distribution(
        &self,
        tags: &[String],
        type_category: TypeCategory,
        selected_keywords: &[String],
    ) -> TitleListView {
        let outcome = self.snapshot(tags).await;
        let Some(snapshot) = outcome.snapshot else {
            return TitleListView::empty(outcome.status);
        };

        // A keyword outside the registry can never be in any title's
        // relevant set, so a conjunctive filter containing one matches
        // nothing. Dropping it instead would silently widen the filter.
        if selected_keywords
            .iter()
            .any(|keyword| !self.registry.contains(keyword))
        {
            return TitleListView::empty(ViewStatus::NoMatchingKeywords);
        }
        let canonical = self.registry.canonicalize_selection(selected_keywords);

        let rows = views::filter_titles(
            &self.registry,
            &snapshot.titles,
            &snapshot.aggregates,
            type_category,
            &canonical,
        );
        let status = if rows.is_empty() && !canonical.is_empty() {
            ViewStatus::NoMatchingKeywords
        } else {
            outcome.status
        };
        TitleListView {
            status,
            guidance: status.guidance().to_string(),
            selected_keywords: canonical,
            rows,
        }
    }

    /// Single-title drill-down. The title's reviews load fresh, as their
    /// own unit of work.
    pub async fn title_detail(
        &self,
        tags: &[String],
        title_id: i64,
        positive_filter: &[String],
        negative_filter: &[String],
    ) -> TitleDetailView {
        let outcome = self.snapshot(tags).await;
        let Some(snapshot) = outcome.snapshot else {
            return TitleDetailView::empty(outcome.status);
        };

        let Some(title) = snapshot.titles.iter().find(|title| title.id == title_id) else {
            return TitleDetailView::empty(ViewStatus::NoMatchingTitles);
        };
        let blank = TitleAggregate::empty(title_id, self.registry.len());
        let aggregate = snapshot.aggregates.get(&title_id).unwrap_or(&blank);

        let reviews = match self.store.title_reviews(title_id, &self.registry).await {
            Ok(reviews) => reviews,
            Err(err) => {
                warn!("Review load failed for title {}: {}", title_id, err);
                return TitleDetailView::empty(ViewStatus::StoreUnavailable);
            }
        };

        let detail = views::title_detail(
            &self.registry,
            title,
            aggregate,
            &reviews,
            &self.registry.canonicalize_selection(positive_filter),
            &self.registry.canonicalize_selection(negative_filter),
        );
        TitleDetailView {
            status: ViewStatus::Ok,
            guidance: String::new(),
            detail: Some(detail),
        }
    }

    /// Related titles for one base title: an independent side-query, not
    /// part of the selection pipeline.
    pub async fn related_titles(&self, title_id: i64) -> RelatedTitlesView {
        let catalog = match self.store.tag_catalog().await {
            Ok(rows) => rows,
            Err(err) => {
                warn!("Tag catalog unavailable for related titles: {}", err);
                return RelatedTitlesView::empty(ViewStatus::StoreUnavailable);
            }
        };
        let vocabulary = TagVocabulary::new(catalog.into_iter().map(|row| (row.id, row.name)));

        let direct = match self.store.direct_recommendations(title_id).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!("Recommendation load failed for title {}: {}", title_id, err);
                return RelatedTitlesView::empty(ViewStatus::StoreUnavailable);
            }
        };
        let neighbors = match self.store.similarity_neighbors(title_id).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!("Similarity load failed for title {}: {}", title_id, err);
                return RelatedTitlesView::empty(ViewStatus::StoreUnavailable);
            }
        };

        let direct: Vec<DirectRecommendation> = direct
            .into_iter()
            .map(|row| DirectRecommendation {
                id: row.id,
                name: row.name,
                tags: vocabulary.decode_tags_json(row.tags_json.as_deref()),
            })
            .collect();
        let rows = recommend::merge_related(&direct, &recommend::normalize_neighbors(neighbors));

        RelatedTitlesView {
            status: ViewStatus::Ok,
            guidance: String::new(),
            rows,
        }
    }
}

/// Word cloud over the co-tag distribution; tags carry no sentiment.
fn tag_word_cloud(co_tags: &[TagCount]) -> Vec<WordCloudEntry> {
    let max = co_tags.iter().map(|row| row.count).max().unwrap_or(0);
    let min = co_tags.iter().map(|row| row.count).min().unwrap_or(0);
    co_tags
        .iter()
        .map(|row| WordCloudEntry {
            word: row.tag.clone(),
            weight: row.count,
            sentiment: Sentiment::Neutral,
            emphasis: views::Emphasis::tier(row.count, max, min),
        })
        .collect()
}

// =============================================================================
// View models
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagCatalogView {
    pub status: ViewStatus,
    pub guidance: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeView {
    pub status: ViewStatus,
    pub guidance: String,
    pub selected_tags: Vec<String>,
    pub co_tags: Vec<TagCount>,
    pub tag_cloud: Vec<WordCloudEntry>,
    pub titles: Vec<Title>,
    pub scores: ScoreDistribution,
    pub built_at: Option<DateTime<Utc>>,
}

impl HomeView {
    fn empty(status: ViewStatus) -> Self {
        Self {
            status,
            guidance: status.guidance().to_string(),
            selected_tags: Vec::new(),
            co_tags: Vec::new(),
            tag_cloud: Vec::new(),
            titles: Vec::new(),
            scores: home::score_distribution(&[]),
            built_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordDistributionView {
    pub status: ViewStatus,
    pub guidance: String,
    pub drill_down_tag: Option<String>,
    pub rows: Vec<KeywordRow>,
    pub word_cloud: Vec<WordCloudEntry>,
}

impl KeywordDistributionView {
    fn empty(status: ViewStatus, drill_down_tag: Option<&str>) -> Self {
        Self {
            status,
            guidance: status.guidance().to_string(),
            drill_down_tag: drill_down_tag.map(|tag| tag.to_string()),
            rows: Vec::new(),
            word_cloud: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleListView {
    pub status: ViewStatus,
    pub guidance: String,
    pub selected_keywords: Vec<String>,
    pub rows: Vec<TitleMatchRow>,
}

impl TitleListView {
    fn empty(status: ViewStatus) -> Self {
        Self {
            status,
            guidance: status.guidance().to_string(),
            selected_keywords: Vec::new(),
            rows: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleDetailView {
    pub status: ViewStatus,
    pub guidance: String,
    pub detail: Option<TitleDetail>,
}

impl TitleDetailView {
    fn empty(status: ViewStatus) -> Self {
        Self {
            status,
            guidance: status.guidance().to_string(),
            detail: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedTitlesView {
    pub status: ViewStatus,
    pub guidance: String,
    pub rows: Vec<RelatedTitle>,
}

impl RelatedTitlesView {
    fn empty(status: ViewStatus) -> Self {
        Self {
            status,
            guidance: status.guidance().to_string(),
            rows: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_sorts_and_deduplicates() {
        let tags = vec![
            "MOBA".to_string(),
            "Indie".to_string(),
            "MOBA".to_string(),
        ];
        assert_eq!(normalize_selection(&tags), vec!["Indie", "MOBA"]);
    }

    #[test]
    fn statuses_carry_guidance_for_empty_states() {
        assert!(ViewStatus::Ok.guidance().is_empty());
        for status in [
            ViewStatus::NeedMoreTags,
            ViewStatus::UnknownTags,
            ViewStatus::NoMatchingTitles,
            ViewStatus::NoMatchingKeywords,
            ViewStatus::StoreUnavailable,
        ] {
            assert!(!status.guidance().is_empty(), "{status:?} needs guidance");
        }
    }
}
