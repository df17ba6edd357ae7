//! reqwest-backed [`MusicApi`] implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::api::{MusicApi, SpotifyError};
use super::auth::{ClientCredentials, SPOTIFY_ACCOUNTS_BASE};
use super::models::TokenResponse;
use crate::server::metrics::record_upstream_call;

pub const SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";

/// HTTP client for the Spotify Web API and accounts service.
pub struct SpotifyClient {
    client: Client,
    api_base_url: String,
    accounts_base_url: String,
}

impl SpotifyClient {
    /// Create a client talking to the public Spotify endpoints.
    pub fn new(timeout_sec: u64) -> Result<Self> {
        Self::with_base_urls(SPOTIFY_API_BASE, SPOTIFY_ACCOUNTS_BASE, timeout_sec)
    }

    /// Create a client against custom base URLs (e.g. a local fake in tests).
    pub fn with_base_urls(
        api_base_url: impl Into<String>,
        accounts_base_url: impl Into<String>,
        timeout_sec: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            accounts_base_url: accounts_base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn accounts_base_url(&self) -> &str {
        &self.accounts_base_url
    }
}

fn connection_error(err: reqwest::Error) -> SpotifyError {
    SpotifyError::Connection(err.to_string())
}

/// Reads an error body, keeping it as JSON when possible.
async fn error_details(response: Response) -> Value {
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

async fn into_json(response: Response, endpoint: &str) -> Result<Value, SpotifyError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        record_upstream_call("spotify", endpoint, "unauthorized");
        return Err(SpotifyError::Unauthorized(error_details(response).await));
    }
    if !status.is_success() {
        record_upstream_call("spotify", endpoint, "error");
        let details = error_details(response).await;
        warn!(endpoint, status = status.as_u16(), "Spotify request failed");
        return Err(SpotifyError::Api {
            status: status.as_u16(),
            details,
        });
    }
    record_upstream_call("spotify", endpoint, "ok");
    response
        .json()
        .await
        .map_err(|e| SpotifyError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl MusicApi for SpotifyClient {
    async fn get_json(
        &self,
        access_token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, SpotifyError> {
        let url = format!("{}{}", self.api_base_url, path);
        debug!(path, "GET Spotify API");

        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                record_upstream_call("spotify", path, "connection_error");
                connection_error(e)
            })?;

        into_json(response, path).await
    }

    async fn exchange_code(
        &self,
        code: &str,
        credentials: &ClientCredentials,
    ) -> Result<TokenResponse, SpotifyError> {
        let url = format!("{}/api/token", self.accounts_base_url);
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", credentials.redirect_uri.as_str()),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
        ];

        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                record_upstream_call("spotify", "/api/token", "connection_error");
                connection_error(e)
            })?;

        // A rejected code is reported as Api, never as Unauthorized.
        let status = response.status();
        if !status.is_success() {
            record_upstream_call("spotify", "/api/token", "error");
            return Err(SpotifyError::Api {
                status: status.as_u16(),
                details: error_details(response).await,
            });
        }
        record_upstream_call("spotify", "/api/token", "ok");

        response
            .json()
            .await
            .map_err(|e| SpotifyError::InvalidResponse(e.to_string()))
    }
}
