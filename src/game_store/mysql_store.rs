//! MySQL implementation of the game store.
//!
//! Opens one connection per logical unit of work and closes it explicitly
//! before returning, on success and on failure alike. Stored values are
//! read leniently: category cells that are missing or non-numeric coerce
//! to 0, candidate ids stored as text still parse, and nothing at this
//! layer turns bad data into an error.

use super::models::{RecommendationRow, TagRow};
use super::trait_def::{GameStore, StoreError};
use crate::catalog::{SelectionBatch, TagVocabulary, TitleRow};
use crate::categories::CategoryRegistry;
use crate::recommend::SimilarityNeighbor;
use crate::sentiment::{ReviewDetailRecord, ReviewRecord};
use crate::server::metrics::{record_store_connection_error, record_store_query};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlRow};
use sqlx::{Connection, MySqlConnection, Row};
use std::time::Instant;
use tracing::debug;

/// How many candidate slots one similarity-matrix row carries.
const MATRIX_SLOTS: usize = 9;

const CHARSET: &str = "utf8mb4";
const COLLATION: &str = "utf8mb4_general_ci";

/// Connection settings for the analytics database.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

pub struct MySqlGameStore {
    options: MySqlConnectOptions,
}

impl MySqlGameStore {
    pub fn new(settings: &DatabaseSettings) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.user)
            .password(&settings.password)
            .database(&settings.database)
            .charset(CHARSET)
            .collation(COLLATION);
        Self { options }
    }

    async fn connect(&self) -> Result<MySqlConnection, StoreError> {
        MySqlConnection::connect_with(&self.options)
            .await
            .map_err(|err| {
                record_store_connection_error();
                StoreError::Connection(err)
            })
    }
}

/// Closes a unit-of-work connection and records its duration. Close errors
/// are logged, not propagated; the query result already stands.
async fn finish_unit_of_work(conn: MySqlConnection, operation: &str, start: Instant) {
    if let Err(err) = conn.close().await {
        debug!("Error closing connection after {}: {}", operation, err);
    }
    record_store_query(operation, start.elapsed());
}

fn opt_i64(row: &MySqlRow, column: &str) -> Option<i64> {
    if let Ok(value) = row.try_get::<Option<i64>, _>(column) {
        return value;
    }
    row.try_get::<Option<String>, _>(column)
        .ok()
        .flatten()
        .and_then(|text| text.trim().parse().ok())
}

fn opt_f64(row: &MySqlRow, column: &str) -> Option<f64> {
    if let Ok(value) = row.try_get::<Option<f64>, _>(column) {
        return value;
    }
    row.try_get::<Option<String>, _>(column)
        .ok()
        .flatten()
        .and_then(|text| text.trim().parse().ok())
}

fn opt_string(row: &MySqlRow, column: &str) -> Option<String> {
    row.try_get::<Option<String>, _>(column).ok().flatten()
}

/// Category value with the permissive coercion policy: anything missing or
/// unreadable is 0.
fn category_value(row: &MySqlRow, column: &str) -> i64 {
    opt_i64(row, column).unwrap_or(0)
}

/// Backtick-quotes a dynamic column name. Category names were validated
/// against the live schema at startup; stripping backticks keeps the quoting
/// sound regardless.
fn quoted(column: &str) -> String {
    format!("`{}`", column.replace('`', ""))
}

fn category_select_list(registry: &CategoryRegistry) -> String {
    registry
        .names()
        .iter()
        .map(|name| quoted(name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn placeholders(count: usize) -> String {
    std::iter::repeat("?").take(count).collect::<Vec<_>>().join(", ")
}

fn review_values(row: &MySqlRow, registry: &CategoryRegistry) -> Vec<i64> {
    registry
        .names()
        .iter()
        .map(|name| category_value(row, name))
        .collect()
}

async fn fetch_tag_rows(conn: &mut MySqlConnection) -> Result<Vec<TagRow>, sqlx::Error> {
    let rows = sqlx::query("SELECT tag_id, tag_name FROM TAGS")
        .fetch_all(conn)
        .await?;
    Ok(rows
        .iter()
        .filter_map(|row| {
            let id = opt_i64(row, "tag_id")?;
            let name = opt_string(row, "tag_name")?;
            Some(TagRow { id, name })
        })
        .collect())
}

async fn fetch_selection(
    conn: &mut MySqlConnection,
    selection: &[String],
    registry: &CategoryRegistry,
) -> Result<SelectionBatch, sqlx::Error> {
    let vocabulary = TagVocabulary::new(
        fetch_tag_rows(conn)
            .await?
            .into_iter()
            .map(|row| (row.id, row.name)),
    );

    let resolved_tag_ids = vocabulary.resolve_selection(selection);
    if resolved_tag_ids.is_empty() {
        return Ok(SelectionBatch {
            vocabulary,
            resolved_tag_ids,
            titles: Vec::new(),
            reviews: Vec::new(),
        });
    }

    // Conjunctive containment: one JSON_CONTAINS per resolved id, AND-joined.
    let conditions = resolved_tag_ids
        .iter()
        .map(|_| "JSON_CONTAINS(user_tags, ?)")
        .collect::<Vec<_>>()
        .join(" AND ");
    let sql = format!(
        "SELECT app_id, name, user_tags, userScore FROM TITLELIST WHERE {}",
        conditions
    );
    let mut query = sqlx::query(&sql);
    for tag_id in &resolved_tag_ids {
        query = query.bind(tag_id.to_string());
    }
    let title_rows = query.fetch_all(&mut *conn).await?;

    let titles: Vec<TitleRow> = title_rows
        .iter()
        .filter_map(|row| {
            let id = opt_i64(row, "app_id")?;
            Some(TitleRow {
                id,
                name: opt_string(row, "name").unwrap_or_default(),
                tags_json: opt_string(row, "user_tags"),
                rating: opt_f64(row, "userScore"),
            })
        })
        .collect();

    // One batched review query for the whole selection, never a per-title
    // loop.
    let mut title_ids: Vec<i64> = titles.iter().map(|row| row.id).collect();
    title_ids.sort_unstable();
    title_ids.dedup();

    let reviews = if title_ids.is_empty() {
        Vec::new()
    } else {
        let sql = format!(
            "SELECT app_id, review_id, {} FROM REVIEW_TAG WHERE app_id IN ({})",
            category_select_list(registry),
            placeholders(title_ids.len())
        );
        let mut query = sqlx::query(&sql);
        for title_id in &title_ids {
            query = query.bind(title_id);
        }
        query
            .fetch_all(&mut *conn)
            .await?
            .iter()
            .filter_map(|row| {
                let title_id = opt_i64(row, "app_id")?;
                Some(ReviewRecord {
                    title_id,
                    review_id: opt_i64(row, "review_id").unwrap_or(0),
                    values: review_values(row, registry),
                })
            })
            .collect()
    };

    Ok(SelectionBatch {
        vocabulary,
        resolved_tag_ids,
        titles,
        reviews,
    })
}

async fn fetch_title_reviews(
    conn: &mut MySqlConnection,
    title_id: i64,
    registry: &CategoryRegistry,
) -> Result<Vec<ReviewDetailRecord>, sqlx::Error> {
    let sql = format!(
        "SELECT id, app_id, review_id, review_text, {} FROM REVIEW_TAG WHERE app_id = ?",
        category_select_list(registry)
    );
    let rows = sqlx::query(&sql).bind(title_id).fetch_all(conn).await?;
    Ok(rows
        .iter()
        .map(|row| ReviewDetailRecord {
            row_id: opt_i64(row, "id").unwrap_or(0),
            title_id,
            review_id: opt_i64(row, "review_id").unwrap_or(0),
            text: opt_string(row, "review_text").unwrap_or_default(),
            values: review_values(row, registry),
        })
        .collect())
}

async fn fetch_direct_recommendations(
    conn: &mut MySqlConnection,
    title_id: i64,
) -> Result<Vec<RecommendationRow>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT recommended_app_id, recommended_title, user_tags \
         FROM SIMILAR_GAMES WHERE game_app_id = ?",
    )
    .bind(title_id)
    .fetch_all(conn)
    .await?;
    Ok(rows
        .iter()
        .filter_map(|row| {
            let id = opt_i64(row, "recommended_app_id")?;
            Some(RecommendationRow {
                id,
                name: opt_string(row, "recommended_title").unwrap_or_default(),
                tags_json: opt_string(row, "user_tags"),
            })
        })
        .collect())
}

async fn fetch_similarity_neighbors(
    conn: &mut MySqlConnection,
    title_id: i64,
) -> Result<Vec<SimilarityNeighbor>, sqlx::Error> {
    let select_list = (1..=MATRIX_SLOTS)
        .map(|slot| {
            format!(
                "recommended_app_id_{slot}, recommended_title_{slot}, similarity_{slot}"
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!("SELECT {} FROM MATRIX WHERE game_app_id = ?", select_list);
    let rows = sqlx::query(&sql).bind(title_id).fetch_all(conn).await?;

    // Flatten the numbered columns into one entry per candidate, skipping
    // empty slots.
    let mut neighbors = Vec::new();
    for row in &rows {
        for slot in 1..=MATRIX_SLOTS {
            let Some(id) = opt_i64(row, &format!("recommended_app_id_{slot}")) else {
                continue;
            };
            neighbors.push(SimilarityNeighbor {
                id,
                name: opt_string(row, &format!("recommended_title_{slot}")).unwrap_or_default(),
                similarity: opt_f64(row, &format!("similarity_{slot}")).unwrap_or(0.0),
            });
        }
    }
    Ok(neighbors)
}

async fn fetch_review_columns(conn: &mut MySqlConnection) -> Result<Vec<String>, sqlx::Error> {
    let rows = sqlx::query("SHOW COLUMNS FROM REVIEW_TAG")
        .fetch_all(conn)
        .await?;
    Ok(rows
        .iter()
        .filter_map(|row| opt_string(row, "Field"))
        .collect())
}

#[async_trait]
impl GameStore for MySqlGameStore {
    async fn tag_catalog(&self) -> Result<Vec<TagRow>, StoreError> {
        let start = Instant::now();
        let mut conn = self.connect().await?;
        let result = fetch_tag_rows(&mut conn).await;
        finish_unit_of_work(conn, "tag_catalog", start).await;
        result.map_err(StoreError::Query)
    }

    async fn load_selection(
        &self,
        selection: &[String],
        registry: &CategoryRegistry,
    ) -> Result<SelectionBatch, StoreError> {
        let start = Instant::now();
        let mut conn = self.connect().await?;
        let result = fetch_selection(&mut conn, selection, registry).await;
        finish_unit_of_work(conn, "load_selection", start).await;
        result.map_err(StoreError::Query)
    }

    async fn title_reviews(
        &self,
        title_id: i64,
        registry: &CategoryRegistry,
    ) -> Result<Vec<ReviewDetailRecord>, StoreError> {
        let start = Instant::now();
        let mut conn = self.connect().await?;
        let result = fetch_title_reviews(&mut conn, title_id, registry).await;
        finish_unit_of_work(conn, "title_reviews", start).await;
        result.map_err(StoreError::Query)
    }

    async fn direct_recommendations(
        &self,
        title_id: i64,
    ) -> Result<Vec<RecommendationRow>, StoreError> {
        let start = Instant::now();
        let mut conn = self.connect().await?;
        let result = fetch_direct_recommendations(&mut conn, title_id).await;
        finish_unit_of_work(conn, "direct_recommendations", start).await;
        result.map_err(StoreError::Query)
    }

    async fn similarity_neighbors(
        &self,
        title_id: i64,
    ) -> Result<Vec<SimilarityNeighbor>, StoreError> {
        let start = Instant::now();
        let mut conn = self.connect().await?;
        let result = fetch_similarity_neighbors(&mut conn, title_id).await;
        finish_unit_of_work(conn, "similarity_neighbors", start).await;
        result.map_err(StoreError::Query)
    }

    async fn review_table_columns(&self) -> Result<Vec<String>, StoreError> {
        let start = Instant::now();
        let mut conn = self.connect().await?;
        let result = fetch_review_columns(&mut conn).await;
        finish_unit_of_work(conn, "review_table_columns", start).await;
        result.map_err(StoreError::Query)
    }
}
