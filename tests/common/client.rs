//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per dashboard endpoint. When API routes
//! or request formats change, update only this file.

use reqwest::Response;
use serde_json::json;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 5;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// GET /
    pub async fn get_stats(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Stats request failed")
    }

    /// GET /v1/tags
    pub async fn get_tags(&self) -> Response {
        self.client
            .get(format!("{}/v1/tags", self.base_url))
            .send()
            .await
            .expect("Tags request failed")
    }

    /// GET /v1/categories
    pub async fn get_categories(&self) -> Response {
        self.client
            .get(format!("{}/v1/categories", self.base_url))
            .send()
            .await
            .expect("Categories request failed")
    }

    /// POST /v1/views/home
    pub async fn post_home_view(&self, tags: &[&str]) -> Response {
        self.client
            .post(format!("{}/v1/views/home", self.base_url))
            .json(&json!({ "tags": tags }))
            .send()
            .await
            .expect("Home view request failed")
    }

    /// POST /v1/views/keywords
    pub async fn post_keyword_view(&self, tags: &[&str], drill_down_tag: Option<&str>) -> Response {
        self.client
            .post(format!("{}/v1/views/keywords", self.base_url))
            .json(&json!({ "tags": tags, "drill_down_tag": drill_down_tag }))
            .send()
            .await
            .expect("Keyword view request failed")
    }

    /// POST /v1/views/titles
    pub async fn post_titles_view(
        &self,
        tags: &[&str],
        type_category: &str,
        selected_keywords: &[&str],
    ) -> Response {
        self.client
            .post(format!("{}/v1/views/titles", self.base_url))
            .json(&json!({
                "tags": tags,
                "type_category": type_category,
                "selected_keywords": selected_keywords
            }))
            .send()
            .await
            .expect("Titles view request failed")
    }

    /// POST /v1/views/title-detail
    pub async fn post_title_detail_view(
        &self,
        tags: &[&str],
        title_id: i64,
        positive_keywords: &[&str],
        negative_keywords: &[&str],
    ) -> Response {
        self.client
            .post(format!("{}/v1/views/title-detail", self.base_url))
            .json(&json!({
                "tags": tags,
                "title_id": title_id,
                "positive_keywords": positive_keywords,
                "negative_keywords": negative_keywords
            }))
            .send()
            .await
            .expect("Title detail request failed")
    }

    /// POST /v1/views/state
    pub async fn post_view_state(&self, body: serde_json::Value) -> Response {
        self.client
            .post(format!("{}/v1/views/state", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("View state request failed")
    }

    /// GET /v1/titles/{id}/related
    pub async fn get_related_titles(&self, title_id: i64) -> Response {
        self.client
            .get(format!("{}/v1/titles/{}/related", self.base_url, title_id))
            .send()
            .await
            .expect("Related titles request failed")
    }
}
