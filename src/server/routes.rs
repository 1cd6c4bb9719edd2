//! Dashboard view API routes

use crate::views::{DashboardPage, Sentiment, TypeCategory, ViewState};

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::state::{ServerState, SharedDashboard};

fn default_retain() -> Vec<Sentiment> {
    vec![Sentiment::Positive, Sentiment::Negative]
}

#[derive(Deserialize, Debug)]
struct HomeViewBody {
    pub tags: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct KeywordViewBody {
    pub tags: Vec<String>,

    /// Narrow the distribution to titles declaring this one tag; absent
    /// means the whole selection.
    pub drill_down_tag: Option<String>,

    /// Which dominant sentiments to keep in the rows.
    #[serde(default = "default_retain")]
    pub retain: Vec<Sentiment>,
}

#[derive(Deserialize, Debug)]
struct TitlesViewBody {
    pub tags: Vec<String>,

    #[serde(default)]
    pub type_category: TypeCategory,

    #[serde(default)]
    pub selected_keywords: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TitleDetailBody {
    pub tags: Vec<String>,
    pub title_id: i64,

    #[serde(default)]
    pub positive_keywords: Vec<String>,

    #[serde(default)]
    pub negative_keywords: Vec<String>,
}

/// Navigation actions the frontend can apply to its view state.
#[derive(Deserialize, Debug)]
#[serde(tag = "action", rename_all = "snake_case")]
enum StateAction {
    NavigateTo { page: DashboardPage },
    GoBack,
}

#[derive(Deserialize, Debug)]
struct ViewStateBody {
    /// The frontend's current state; a fresh session omits it.
    #[serde(default)]
    pub state: ViewState,

    #[serde(flatten)]
    pub action: StateAction,
}

async fn get_tags(State(dashboard): State<SharedDashboard>) -> impl axum::response::IntoResponse {
    Json(dashboard.tag_catalog().await)
}

async fn get_categories(
    State(dashboard): State<SharedDashboard>,
) -> impl axum::response::IntoResponse {
    Json(dashboard.registry().names().to_vec())
}

async fn post_home_view(
    State(dashboard): State<SharedDashboard>,
    Json(body): Json<HomeViewBody>,
) -> impl axum::response::IntoResponse {
    Json(dashboard.home_view(&body.tags).await)
}

async fn post_keyword_view(
    State(dashboard): State<SharedDashboard>,
    Json(body): Json<KeywordViewBody>,
) -> impl axum::response::IntoResponse {
    let view = dashboard
        .keyword_distribution(&body.tags, body.drill_down_tag.as_deref(), &body.retain)
        .await;
    Json(view)
}

async fn post_titles_view(
    State(dashboard): State<SharedDashboard>,
    Json(body): Json<TitlesViewBody>,
) -> impl axum::response::IntoResponse {
    let view = dashboard
        .title_distribution(&body.tags, body.type_category, &body.selected_keywords)
        .await;
    Json(view)
}

async fn post_title_detail_view(
    State(dashboard): State<SharedDashboard>,
    Json(body): Json<TitleDetailBody>,
) -> impl axum::response::IntoResponse {
    let view = dashboard
        .title_detail(
            &body.tags,
            body.title_id,
            &body.positive_keywords,
            &body.negative_keywords,
        )
        .await;
    Json(view)
}

/// The view state is round-tripped, never stored: the frontend posts its
/// current state plus one action and gets the updated state back.
async fn post_view_state(Json(body): Json<ViewStateBody>) -> impl axum::response::IntoResponse {
    let mut state = body.state;
    match body.action {
        StateAction::NavigateTo { page } => state.navigate_to(page),
        StateAction::GoBack => state.go_back(),
    }
    Json(state)
}

async fn get_related_titles(
    State(dashboard): State<SharedDashboard>,
    Path(title_id): Path<i64>,
) -> impl axum::response::IntoResponse {
    Json(dashboard.related_titles(title_id).await)
}

pub fn make_view_routes(state: ServerState) -> Router {
    Router::new()
        .route("/tags", get(get_tags))
        .route("/categories", get(get_categories))
        .route("/views/home", post(post_home_view))
        .route("/views/keywords", post(post_keyword_view))
        .route("/views/titles", post(post_titles_view))
        .route("/views/title-detail", post(post_title_detail_view))
        .route("/views/state", post(post_view_state))
        .route("/titles/{id}/related", get(get_related_titles))
        .with_state(state)
}
