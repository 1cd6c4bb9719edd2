//! Sentiment keyword category registry.
//!
//! The review table carries one column per sentiment category (Story,
//! Graphics, ...) holding values in {-1, 0, 1}. The registry is the single
//! authority on which categories exist and how their names are spelled:
//! every keyword entering the pipeline is resolved here, case-insensitively,
//! to its canonical configured casing.

use anyhow::{bail, Result};
use std::collections::HashMap;

/// Review-table columns that are never sentiment categories.
pub const NON_CATEGORY_COLUMNS: [&str; 4] = ["id", "app_id", "review_id", "review_text"];

/// The category set shipped with the Steam review corpus.
pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Game",
    "Story",
    "Graphics",
    "Sound",
    "Content",
    "Originality",
    "Stability",
    "Convenience",
];

/// Fixed, ordered set of sentiment categories for one corpus.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    names: Vec<String>,
    index_by_lowercase: HashMap<String, usize>,
}

impl CategoryRegistry {
    /// Builds a registry from the configured category names, keeping their
    /// order. Fails on an empty list, blank names, or names that collide
    /// case-insensitively.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            bail!("Category list must not be empty");
        }

        let mut index_by_lowercase = HashMap::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                bail!("Category names must not be blank");
            }
            if index_by_lowercase
                .insert(name.to_lowercase(), index)
                .is_some()
            {
                bail!("Duplicate category name: {}", name);
            }
        }

        Ok(Self {
            names,
            index_by_lowercase,
        })
    }

    /// Registry over [`DEFAULT_CATEGORIES`].
    pub fn default_set() -> Self {
        Self::new(DEFAULT_CATEGORIES).expect("default category set is valid")
    }

    /// Category names in configured order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of a category, matched case-insensitively.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index_by_lowercase.get(&name.to_lowercase()).copied()
    }

    /// Resolves any casing of a category name to its configured spelling.
    pub fn canonical(&self, name: &str) -> Option<&str> {
        self.index_of(name).map(|index| self.names[index].as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Maps a keyword selection onto canonical names, dropping unknown
    /// keywords and duplicates while preserving selection order.
    pub fn canonicalize_selection(&self, keywords: &[String]) -> Vec<String> {
        let mut seen = vec![false; self.names.len()];
        let mut canonical = Vec::new();
        for keyword in keywords {
            if let Some(index) = self.index_of(keyword) {
                if !seen[index] {
                    seen[index] = true;
                    canonical.push(self.names[index].clone());
                }
            }
        }
        canonical
    }

    /// Checks that every configured category exists among the live review
    /// table's columns. Connectivity problems are the caller's concern; a
    /// reachable schema that lacks a configured category is a setup error
    /// worth failing on.
    pub fn validate_against_columns(&self, columns: &[String]) -> Result<()> {
        let lowered: Vec<String> = columns.iter().map(|c| c.to_lowercase()).collect();
        let missing: Vec<&str> = self
            .names
            .iter()
            .filter(|name| !lowered.contains(&name.to_lowercase()))
            .map(|name| name.as_str())
            .collect();
        if !missing.is_empty() {
            bail!(
                "Configured categories missing from the review table: {}",
                missing.join(", ")
            );
        }
        Ok(())
    }

    /// Derives a category list from the review table's columns by dropping
    /// the fixed identifier/text columns. Used when configuration omits an
    /// explicit list.
    pub fn discover_from_columns(columns: &[String]) -> Vec<String> {
        columns
            .iter()
            .filter(|column| {
                !NON_CATEGORY_COLUMNS
                    .iter()
                    .any(|excluded| excluded.eq_ignore_ascii_case(column))
            })
            .cloned()
            .collect()
    }
}
