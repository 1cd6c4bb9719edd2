//! Explicit, serializable UI session state.
//!
//! The frontend keeps its navigation bookkeeping in one of these, posts it
//! to the state endpoint with an action, and gets it back updated. Nothing
//! in the core reads it ambiently and the server stores none of it.

use super::TypeCategory;
use serde::{Deserialize, Serialize};

/// Pages the dashboard can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardPage {
    #[default]
    Home,
    KeywordDistribution,
    TitleList,
    TitleDetail,
    RelatedTitles,
}

/// The full view state round-tripped with the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub page: DashboardPage,
    /// Visited pages, current page last.
    pub history: Vec<DashboardPage>,
    pub selected_tags: Vec<String>,
    pub drill_down_tag: Option<String>,
    pub type_category: TypeCategory,
    pub selected_keywords: Vec<String>,
    pub selected_title_id: Option<i64>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            page: DashboardPage::Home,
            history: vec![DashboardPage::Home],
            selected_tags: Vec::new(),
            drill_down_tag: None,
            type_category: TypeCategory::default(),
            selected_keywords: Vec::new(),
            selected_title_id: None,
        }
    }
}

impl ViewState {
    /// Navigates to a page, pushing it onto the history.
    pub fn navigate_to(&mut self, page: DashboardPage) {
        self.page = page;
        self.history.push(page);
    }

    /// Pops the current page and lands on the previous one. Backing out of
    /// the last remaining page resets to the home dashboard.
    pub fn go_back(&mut self) {
        if self.history.len() > 1 {
            self.history.pop();
            self.page = *self.history.last().unwrap_or(&DashboardPage::Home);
        } else {
            self.page = DashboardPage::Home;
            self.history = vec![DashboardPage::Home];
        }
    }
}
