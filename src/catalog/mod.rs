//! Game title catalog: titles, tags, and selection decoding.
//!
//! Titles are stored with a JSON list of tag ids; the dashboard works with
//! tag names. The vocabulary decodes one into the other, leniently: unknown
//! ids render as their decimal string, unparseable JSON decodes to an empty
//! list, and unknown tag names are silently dropped when resolving a
//! selection. The store page link is derived from the title id and never
//! persisted.

use crate::sentiment::ReviewRecord;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

pub const STORE_PAGE_BASE_URL: &str = "https://store.steampowered.com/app";

/// Public store page for a title.
pub fn store_link(title_id: i64) -> String {
    format!("{}/{}", STORE_PAGE_BASE_URL, title_id)
}

/// One game title as the dashboard sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub id: i64,
    pub name: String,
    pub tags: Vec<String>,
    pub rating: Option<f64>,
    pub link: String,
}

impl Title {
    pub fn declares_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Tag id/name vocabulary backing selection resolution and decoding.
#[derive(Debug, Clone, Default)]
pub struct TagVocabulary {
    names_by_id: HashMap<i64, String>,
    ids_by_name: HashMap<String, i64>,
}

impl TagVocabulary {
    pub fn new(rows: impl IntoIterator<Item = (i64, String)>) -> Self {
        let mut names_by_id = HashMap::new();
        let mut ids_by_name = HashMap::new();
        for (id, name) in rows {
            ids_by_name.insert(name.clone(), id);
            names_by_id.insert(id, name);
        }
        Self {
            names_by_id,
            ids_by_name,
        }
    }

    pub fn len(&self) -> usize {
        self.names_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names_by_id.is_empty()
    }

    /// All tag names, sorted, for the selection pickers.
    pub fn sorted_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.ids_by_name.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn resolve(&self, name: &str) -> Option<i64> {
        self.ids_by_name.get(name).copied()
    }

    /// Resolves a tag selection to ids, silently dropping unknown names.
    pub fn resolve_selection(&self, names: &[String]) -> Vec<i64> {
        names
            .iter()
            .filter_map(|name| self.resolve(name))
            .collect()
    }

    /// Decodes a tag id, falling back to its decimal string when the
    /// vocabulary does not know it.
    pub fn name_of(&self, id: i64) -> String {
        self.names_by_id
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    /// Decodes a stored JSON tag-id list to names.
    pub fn decode_tags_json(&self, raw: Option<&str>) -> Vec<String> {
        parse_tag_ids(raw)
            .into_iter()
            .map(|id| self.name_of(id))
            .collect()
    }
}

/// Parses a stored JSON tag-id list. Anything that is not a JSON array
/// parses as empty; numeric strings inside the array count as ids, other
/// elements are dropped.
pub fn parse_tag_ids(raw: Option<&str>) -> Vec<i64> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) else {
        return Vec::new();
    };
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .collect()
}

/// Raw title row before tag decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleRow {
    pub id: i64,
    pub name: String,
    pub tags_json: Option<String>,
    pub rating: Option<f64>,
}

/// Everything one selection load yields from the store in a single unit of
/// work: the tag vocabulary, the resolved selection, the conjunctively
/// filtered title rows, and the full review batch for those titles.
#[derive(Debug, Clone, Default)]
pub struct SelectionBatch {
    pub vocabulary: TagVocabulary,
    pub resolved_tag_ids: Vec<i64>,
    pub titles: Vec<TitleRow>,
    pub reviews: Vec<ReviewRecord>,
}

impl SelectionBatch {
    /// Decodes the title rows, deduplicating by id. First occurrence wins;
    /// store order is preserved.
    pub fn decoded_titles(&self) -> Vec<Title> {
        let mut seen = HashSet::new();
        self.titles
            .iter()
            .filter(|row| seen.insert(row.id))
            .map(|row| Title {
                id: row.id,
                name: row.name.clone(),
                tags: self.vocabulary.decode_tags_json(row.tags_json.as_deref()),
                rating: row.rating,
                link: store_link(row.id),
            })
            .collect()
    }
}
