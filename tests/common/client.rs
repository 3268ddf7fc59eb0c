//! HTTP client for end-to-end tests
//!
//! This module wraps reqwest and provides methods for all server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use std::time::Duration;

/// HTTP test client with cookie-based session management
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
    /// Sent as `Authorization: Bearer ...` when set
    session_token: Option<String>,
}

impl TestClient {
    /// Creates a new client without a session
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self {
            client,
            base_url,
            session_token: None,
        }
    }

    /// Creates a client that sends `token` on every request
    pub fn with_session(base_url: String, token: &str) -> Self {
        Self {
            session_token: Some(token.to_string()),
            ..Self::new(base_url)
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.session_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(builder: reqwest::RequestBuilder, what: &str) -> Response {
        builder
            .send()
            .await
            .unwrap_or_else(|e| panic!("{} request failed: {}", what, e))
    }

    // ========================================================================
    // Stats & Docs
    // ========================================================================

    /// GET /
    pub async fn get_stats(&self) -> Response {
        Self::send(self.request(reqwest::Method::GET, "/"), "Get stats").await
    }

    /// GET /api/docs
    pub async fn get_api_docs(&self) -> Response {
        Self::send(self.request(reqwest::Method::GET, "/api/docs"), "Get docs").await
    }

    // ========================================================================
    // Spots Endpoints
    // ========================================================================

    /// GET /api/v1/spots
    pub async fn list_spots(&self) -> Response {
        Self::send(self.request(reqwest::Method::GET, "/api/v1/spots"), "List spots").await
    }

    /// GET /api/v1/spots/{id}
    pub async fn get_spot(&self, id: &str) -> Response {
        Self::send(
            self.request(reqwest::Method::GET, &format!("/api/v1/spots/{}", id)),
            "Get spot",
        )
        .await
    }

    /// POST /api/v1/spots
    pub async fn create_spot(&self, body: &serde_json::Value) -> Response {
        Self::send(
            self.request(reqwest::Method::POST, "/api/v1/spots").json(body),
            "Create spot",
        )
        .await
    }

    /// POST /api/v1/spots with a raw body
    pub async fn create_spot_raw(&self, body: &str) -> Response {
        Self::send(
            self.request(reqwest::Method::POST, "/api/v1/spots")
                .header("Content-Type", "application/json")
                .body(body.to_string()),
            "Create spot",
        )
        .await
    }

    /// PUT /api/v1/spots/{id}
    pub async fn update_spot(&self, id: &str, body: &serde_json::Value) -> Response {
        Self::send(
            self.request(reqwest::Method::PUT, &format!("/api/v1/spots/{}", id))
                .json(body),
            "Update spot",
        )
        .await
    }

    /// DELETE /api/v1/spots/{id}
    pub async fn delete_spot(&self, id: &str) -> Response {
        Self::send(
            self.request(reqwest::Method::DELETE, &format!("/api/v1/spots/{}", id)),
            "Delete spot",
        )
        .await
    }

    /// GET /api/v1/spots/by-genre/{genre}
    pub async fn spots_by_genre(&self, genre: &str) -> Response {
        Self::send(
            self.request(
                reqwest::Method::GET,
                &format!("/api/v1/spots/by-genre/{}", genre),
            ),
            "Spots by genre",
        )
        .await
    }

    /// GET /api/v1/spots/by-label/{label}
    pub async fn spots_by_label(&self, label: &str) -> Response {
        Self::send(
            self.request(
                reqwest::Method::GET,
                &format!("/api/v1/spots/by-label/{}", label),
            ),
            "Spots by label",
        )
        .await
    }

    /// GET /api/v1/spots/most-viewed
    pub async fn most_viewed(&self, limit: Option<&str>) -> Response {
        let mut builder = self.request(reqwest::Method::GET, "/api/v1/spots/most-viewed");
        if let Some(limit) = limit {
            builder = builder.query(&[("limit", limit)]);
        }
        Self::send(builder, "Most viewed").await
    }

    // ========================================================================
    // Listing & Downloads
    // ========================================================================

    /// GET /api/data
    pub async fn get_data(&self, query: &str, attribute: &str) -> Response {
        Self::send(
            self.request(reqwest::Method::GET, "/api/data")
                .query(&[("query", query), ("attribute", attribute)]),
            "Get data",
        )
        .await
    }

    /// GET /api/download/json
    pub async fn download_json(&self, query: &str, attribute: &str) -> Response {
        Self::send(
            self.request(reqwest::Method::GET, "/api/download/json")
                .query(&[("query", query), ("attribute", attribute)]),
            "Download JSON",
        )
        .await
    }

    /// GET /api/download/csv
    pub async fn download_csv(&self, query: &str, attribute: &str) -> Response {
        Self::send(
            self.request(reqwest::Method::GET, "/api/download/csv")
                .query(&[("query", query), ("attribute", attribute)]),
            "Download CSV",
        )
        .await
    }

    // ========================================================================
    // Authentication Endpoints
    // ========================================================================

    /// GET /auth/login
    pub async fn login(&self) -> Response {
        Self::send(self.request(reqwest::Method::GET, "/auth/login"), "Login").await
    }

    /// GET /auth/callback
    pub async fn callback(&self, code: Option<&str>, state: Option<&str>) -> Response {
        let mut params = Vec::new();
        if let Some(code) = code {
            params.push(("code", code));
        }
        if let Some(state) = state {
            params.push(("state", state));
        }
        Self::send(
            self.request(reqwest::Method::GET, "/auth/callback")
                .query(&params),
            "Callback",
        )
        .await
    }

    /// GET /auth/logout
    pub async fn logout(&self) -> Response {
        Self::send(self.request(reqwest::Method::GET, "/auth/logout"), "Logout").await
    }
}
