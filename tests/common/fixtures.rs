//! In-memory game store fixture
//!
//! A small hand-built corpus: three tags, three titles, and reviews shaped
//! so one title ends up with known keyword sets and a known score while
//! another has no reviews at all.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use steamlens_insight_server::catalog::{SelectionBatch, TagVocabulary, TitleRow};
use steamlens_insight_server::categories::CategoryRegistry;
use steamlens_insight_server::game_store::{GameStore, RecommendationRow, StoreError, TagRow};
use steamlens_insight_server::recommend::SimilarityNeighbor;
use steamlens_insight_server::sentiment::{ReviewDetailRecord, ReviewRecord};

pub const INDIE_TAG_ID: i64 = 1;
pub const MOBA_TAG_ID: i64 = 2;
pub const ROGUELIKE_TAG_ID: i64 = 3;

/// Carries both selected tags; reviews yield positive={Graphics},
/// negative={Story}, keyword_score=-2.
pub const SCORED_TITLE_ID: i64 = 101;
/// Carries both selected tags but has no reviews at all.
pub const QUIET_TITLE_ID: i64 = 102;
/// Carries only the Indie tag, so a conjunctive {Indie, MOBA} selection
/// must never return it.
pub const INDIE_ONLY_TITLE_ID: i64 = 103;

pub const DIRECT_REC_ID: i64 = 201;
pub const NEIGHBOR_ONLY_ID: i64 = 202;

fn tag_rows() -> Vec<TagRow> {
    vec![
        TagRow {
            id: INDIE_TAG_ID,
            name: "Indie".to_string(),
        },
        TagRow {
            id: MOBA_TAG_ID,
            name: "MOBA".to_string(),
        },
        TagRow {
            id: ROGUELIKE_TAG_ID,
            name: "Roguelike".to_string(),
        },
    ]
}

fn title_rows() -> Vec<(TitleRow, Vec<i64>)> {
    vec![
        (
            TitleRow {
                id: SCORED_TITLE_ID,
                name: "Tidewater Arena".to_string(),
                tags_json: Some("[1, 2, 3]".to_string()),
                rating: Some(4.5),
            },
            vec![INDIE_TAG_ID, MOBA_TAG_ID, ROGUELIKE_TAG_ID],
        ),
        (
            TitleRow {
                id: QUIET_TITLE_ID,
                name: "Driftglass Keep".to_string(),
                tags_json: Some("[1, 2]".to_string()),
                rating: Some(3.0),
            },
            vec![INDIE_TAG_ID, MOBA_TAG_ID],
        ),
        (
            TitleRow {
                id: INDIE_ONLY_TITLE_ID,
                name: "Emberfall".to_string(),
                tags_json: Some("[1]".to_string()),
                rating: None,
            },
            vec![INDIE_TAG_ID],
        ),
    ]
}

/// Review values aligned with the default category order:
/// Game, Story, Graphics, Sound, Content, Originality, Stability, Convenience.
fn values(story: i64, graphics: i64) -> Vec<i64> {
    vec![0, story, graphics, 0, 0, 0, 0, 0]
}

fn reviews_for(title_id: i64) -> Vec<ReviewDetailRecord> {
    if title_id != SCORED_TITLE_ID {
        return Vec::new();
    }
    vec![
        ReviewDetailRecord {
            row_id: 1,
            title_id,
            review_id: 9001,
            text: "Gorgeous art, but the plot goes nowhere.".to_string(),
            values: values(-1, 1),
        },
        ReviewDetailRecord {
            row_id: 2,
            title_id,
            review_id: 9002,
            text: "The writing is a mess.".to_string(),
            values: values(-1, 0),
        },
        ReviewDetailRecord {
            row_id: 3,
            title_id,
            review_id: 9003,
            text: "Story felt phoned in.".to_string(),
            values: values(-1, 0),
        },
    ]
}

/// In-memory [`GameStore`] serving the fixture corpus.
///
/// Counts selection loads so cache behavior is observable, and can be
/// switched into a failing mode where every call reports a connection
/// error.
#[derive(Default)]
pub struct FixtureStore {
    pub selection_loads: AtomicUsize,
    failing: AtomicBool,
}

impl FixtureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn selection_load_count(&self) -> usize {
        self.selection_loads.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Connection(sqlx::Error::WorkerCrashed))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl GameStore for FixtureStore {
    async fn tag_catalog(&self) -> Result<Vec<TagRow>, StoreError> {
        self.check_available()?;
        Ok(tag_rows())
    }

    async fn load_selection(
        &self,
        selection: &[String],
        _registry: &CategoryRegistry,
    ) -> Result<SelectionBatch, StoreError> {
        self.check_available()?;
        self.selection_loads.fetch_add(1, Ordering::SeqCst);

        let vocabulary =
            TagVocabulary::new(tag_rows().into_iter().map(|row| (row.id, row.name)));
        let resolved_tag_ids = vocabulary.resolve_selection(selection);
        if resolved_tag_ids.is_empty() {
            return Ok(SelectionBatch {
                vocabulary,
                resolved_tag_ids,
                titles: Vec::new(),
                reviews: Vec::new(),
            });
        }

        // Conjunctive tag match, mirroring the AND-joined store query.
        let titles: Vec<TitleRow> = title_rows()
            .into_iter()
            .filter(|(_, tag_ids)| resolved_tag_ids.iter().all(|id| tag_ids.contains(id)))
            .map(|(row, _)| row)
            .collect();

        let reviews: Vec<ReviewRecord> = titles
            .iter()
            .flat_map(|row| reviews_for(row.id))
            .map(|detail| ReviewRecord {
                title_id: detail.title_id,
                review_id: detail.review_id,
                values: detail.values,
            })
            .collect();

        Ok(SelectionBatch {
            vocabulary,
            resolved_tag_ids,
            titles,
            reviews,
        })
    }

    async fn title_reviews(
        &self,
        title_id: i64,
        _registry: &CategoryRegistry,
    ) -> Result<Vec<ReviewDetailRecord>, StoreError> {
        self.check_available()?;
        Ok(reviews_for(title_id))
    }

    async fn direct_recommendations(
        &self,
        title_id: i64,
    ) -> Result<Vec<RecommendationRow>, StoreError> {
        self.check_available()?;
        if title_id != SCORED_TITLE_ID {
            return Ok(Vec::new());
        }
        Ok(vec![RecommendationRow {
            id: DIRECT_REC_ID,
            name: "Starcade Drift".to_string(),
            tags_json: Some("[1, 3]".to_string()),
        }])
    }

    async fn similarity_neighbors(
        &self,
        title_id: i64,
    ) -> Result<Vec<SimilarityNeighbor>, StoreError> {
        self.check_available()?;
        if title_id != SCORED_TITLE_ID {
            return Ok(Vec::new());
        }
        Ok(vec![
            SimilarityNeighbor {
                id: NEIGHBOR_ONLY_ID,
                name: "Glasshollow".to_string(),
                similarity: 0.5,
            },
            SimilarityNeighbor {
                id: DIRECT_REC_ID,
                name: "Starcade Drift".to_string(),
                similarity: 0.8,
            },
        ])
    }

    async fn review_table_columns(&self) -> Result<Vec<String>, StoreError> {
        self.check_available()?;
        let mut columns = vec![
            "id".to_string(),
            "app_id".to_string(),
            "review_id".to_string(),
            "review_text".to_string(),
        ];
        columns.extend(
            CategoryRegistry::default_set()
                .names()
                .iter()
                .cloned(),
        );
        Ok(columns)
    }
}
