//! Upstream music API abstraction.
//!
//! Handlers talk to Spotify through [`MusicApi`] so that tests can plug in a
//! scripted implementation. Implementors only provide the raw JSON transport
//! (`get_json`) and the token exchange; the typed accessors are derived from
//! those.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::auth::ClientCredentials;
use super::models::{
    Artist, AudioFeaturesResponse, Page, PlayHistory, SearchResponse, TimeRange, TokenResponse,
    Track, TrackAudioFeatures, UserProfile,
};

/// Errors returned by the upstream music API.
#[derive(Debug, Error)]
pub enum SpotifyError {
    /// The access token was rejected (HTTP 401).
    #[error("Upstream rejected the access token: {0}")]
    Unauthorized(Value),

    #[error("Upstream API error (status {status}): {details}")]
    Api { status: u16, details: Value },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl SpotifyError {
    /// Error detail suitable for being echoed back to the browser.
    pub fn details(&self) -> Value {
        match self {
            SpotifyError::Unauthorized(details) => details.clone(),
            SpotifyError::Api { details, .. } => details.clone(),
            SpotifyError::Connection(msg) => Value::String(msg.clone()),
            SpotifyError::InvalidResponse(msg) => Value::String(msg.clone()),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SpotifyError::Unauthorized(_))
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, SpotifyError> {
    serde_json::from_value(value).map_err(|e| SpotifyError::InvalidResponse(e.to_string()))
}

#[async_trait]
pub trait MusicApi: Send + Sync {
    /// Authenticated `GET` against the API base, returning the JSON body.
    async fn get_json(
        &self,
        access_token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, SpotifyError>;

    /// Exchanges an authorization code for an access/refresh token pair.
    async fn exchange_code(
        &self,
        code: &str,
        credentials: &ClientCredentials,
    ) -> Result<TokenResponse, SpotifyError>;

    async fn current_user(&self, access_token: &str) -> Result<UserProfile, SpotifyError> {
        decode(self.get_json(access_token, "/me", &[]).await?)
    }

    /// Raw top artists payload, forwarded as-is by the top-artists endpoint.
    async fn top_artists_raw(
        &self,
        access_token: &str,
        time_range: Option<TimeRange>,
    ) -> Result<Value, SpotifyError> {
        let query: Vec<(&str, String)> = time_range
            .map(|range| vec![("time_range", range.to_string())])
            .unwrap_or_default();
        self.get_json(access_token, "/me/top/artists", &query).await
    }

    async fn top_artists(
        &self,
        access_token: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> Result<Vec<Artist>, SpotifyError> {
        let query = [
            ("limit", limit.to_string()),
            ("time_range", time_range.to_string()),
        ];
        let page: Page<Artist> = decode(self.get_json(access_token, "/me/top/artists", &query).await?)?;
        Ok(page.items)
    }

    async fn top_tracks(
        &self,
        access_token: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> Result<Vec<Track>, SpotifyError> {
        let query = [
            ("limit", limit.to_string()),
            ("time_range", time_range.to_string()),
        ];
        let page: Page<Track> = decode(self.get_json(access_token, "/me/top/tracks", &query).await?)?;
        Ok(page.items)
    }

    /// Audio features for the given track ids. Ids the upstream knows
    /// nothing about come back as `null` and are dropped here.
    async fn audio_features(
        &self,
        access_token: &str,
        track_ids: &[String],
    ) -> Result<Vec<TrackAudioFeatures>, SpotifyError> {
        let query = [("ids", track_ids.join(","))];
        let response: AudioFeaturesResponse =
            decode(self.get_json(access_token, "/audio-features", &query).await?)?;
        Ok(response.audio_features.into_iter().flatten().collect())
    }

    async fn recently_played(
        &self,
        access_token: &str,
        limit: u32,
    ) -> Result<Vec<PlayHistory>, SpotifyError> {
        let query = [("limit", limit.to_string())];
        let page: Page<PlayHistory> = decode(
            self.get_json(access_token, "/me/player/recently-played", &query)
                .await?,
        )?;
        Ok(page.items)
    }

    async fn search_tracks(
        &self,
        access_token: &str,
        q: &str,
        limit: u32,
    ) -> Result<Vec<Track>, SpotifyError> {
        let query = [
            ("q", q.to_string()),
            ("type", "track".to_string()),
            ("limit", limit.to_string()),
            ("market", "from_token".to_string()),
        ];
        let response: SearchResponse = decode(self.get_json(access_token, "/search", &query).await?)?;
        Ok(response.tracks.map(|page| page.items).unwrap_or_default())
    }
}
