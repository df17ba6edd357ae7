//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all insights-server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::{redirect::Policy, Response};
use std::time::Duration;

/// HTTP test client. Redirects are not followed so the OAuth hops can be
/// inspected.
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await
            .unwrap_or_else(|e| panic!("GET {} failed: {}", path, e))
    }

    async fn get_with_token(&self, path: &str, token: Option<&str>) -> Response {
        match token {
            Some(token) => self.get(path, &[("access_token", token)]).await,
            None => self.get(path, &[]).await,
        }
    }

    /// GET with the token in an `Authorization: Bearer` header
    pub async fn get_with_bearer(&self, path: &str, token: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .send()
            .await
            .unwrap_or_else(|e| panic!("GET {} failed: {}", path, e))
    }

    // ========================================================================
    // Service Endpoints
    // ========================================================================

    /// GET /
    pub async fn home(&self) -> Response {
        self.get("/", &[]).await
    }

    // ========================================================================
    // Authentication Endpoints
    // ========================================================================

    /// GET /api/login
    pub async fn login(&self) -> Response {
        self.get("/api/login", &[]).await
    }

    /// GET /api/callback
    pub async fn callback(&self, code: Option<&str>) -> Response {
        match code {
            Some(code) => self.get("/api/callback", &[("code", code)]).await,
            None => self.get("/api/callback", &[]).await,
        }
    }

    // ========================================================================
    // Insight Endpoints
    // ========================================================================

    /// GET /api/doppelganger
    pub async fn doppelganger(&self, token: Option<&str>) -> Response {
        self.get_with_token("/api/doppelganger", token).await
    }

    /// GET /api/listening-timeline
    pub async fn listening_timeline(&self, token: Option<&str>) -> Response {
        self.get_with_token("/api/listening-timeline", token).await
    }

    /// GET /api/time-travel-playlist
    pub async fn time_travel_playlist(&self, token: Option<&str>, era: Option<&str>) -> Response {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(token) = token {
            query.push(("access_token", token));
        }
        if let Some(era) = era {
            query.push(("era", era));
        }
        self.get("/api/time-travel-playlist", &query).await
    }

    /// GET /api/top-artists
    pub async fn top_artists(&self, token: &str, time_range: Option<&str>) -> Response {
        let mut query = vec![("access_token", token)];
        if let Some(time_range) = time_range {
            query.push(("time_range", time_range));
        }
        self.get("/api/top-artists", &query).await
    }

    /// GET /api/user-profile
    pub async fn user_profile(&self, token: Option<&str>) -> Response {
        self.get_with_token("/api/user-profile", token).await
    }

    /// GET /api/user-music-stats
    pub async fn user_music_stats(&self, token: Option<&str>) -> Response {
        self.get_with_token("/api/user-music-stats", token).await
    }

    /// GET /api/time-spent
    pub async fn time_spent(&self, token: &str, time_range: Option<&str>) -> Response {
        let mut query = vec![("access_token", token)];
        if let Some(time_range) = time_range {
            query.push(("time_range", time_range));
        }
        self.get("/api/time-spent", &query).await
    }
}
