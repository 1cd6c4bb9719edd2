//! Row models owned by the store boundary.

/// One row of the tag catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRow {
    pub id: i64,
    pub name: String,
}

/// One direct recommendation edge as stored: the candidate's tag list is
/// still the raw JSON id list, decoded by the caller with the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationRow {
    pub id: i64,
    pub name: String,
    pub tags_json: Option<String>,
}
