//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per server endpoint.
//! When routes or form fields change, update only this file.

use super::constants::*;
use reqwest::Response;
use std::time::Duration;

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

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // HTML Pages
    // ========================================================================

    pub async fn get_home(&self) -> Response {
        self.get("/").await
    }

    pub async fn get_recommend_form(&self) -> Response {
        self.get("/recommend").await
    }

    /// Submits the recommendation form with `user_input`
    pub async fn post_recommend(&self, user_input: &str) -> Response {
        self.client
            .post(format!("{}/recommend_books", self.base_url))
            .form(&[("user_input", user_input)])
            .send()
            .await
            .expect("Request failed")
    }

    /// Submits the recommendation form without the `user_input` field
    pub async fn post_recommend_without_input(&self) -> Response {
        self.client
            .post(format!("{}/recommend_books", self.base_url))
            .form(&[("other_field", "x")])
            .send()
            .await
            .expect("Request failed")
    }

    pub async fn get_book_page(&self, title: &str) -> Response {
        self.get(&format!("/book/{}", urlencoding::encode(title)))
            .await
    }

    pub async fn get_static(&self, file_name: &str) -> Response {
        self.get(&format!("/static/{}", file_name)).await
    }

    pub async fn get_raw(&self, path: &str) -> Response {
        self.get(path).await
    }

    // ========================================================================
    // JSON API
    // ========================================================================

    pub async fn get_stats(&self) -> Response {
        self.get("/v1/stats").await
    }

    pub async fn get_popular(&self) -> Response {
        self.get("/v1/popular").await
    }

    pub async fn get_titles(&self) -> Response {
        self.get("/v1/titles").await
    }

    pub async fn get_book(&self, title: &str) -> Response {
        self.get(&format!("/v1/book/{}", urlencoding::encode(title)))
            .await
    }

    pub async fn get_recommendations(&self, title: &str, count: Option<usize>) -> Response {
        let path = match count {
            Some(count) => format!("/v1/recommend/{}?count={}", urlencoding::encode(title), count),
            None => format!("/v1/recommend/{}", urlencoding::encode(title)),
        };
        self.get(&path).await
    }
}
