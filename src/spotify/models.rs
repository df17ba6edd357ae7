//! Wire types for the subset of the Spotify Web API this server consumes.
//!
//! Only the fields actually read by the aggregators are modelled; everything
//! else in the upstream payloads is ignored by serde.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time window used by the `/me/top/*` endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::MediumTerm
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short_term" => Ok(TimeRange::ShortTerm),
            "medium_term" => Ok(TimeRange::MediumTerm),
            "long_term" => Ok(TimeRange::LongTerm),
            other => Err(format!("Unknown time range: {}", other)),
        }
    }
}

/// Generic paging wrapper, only `items` is of interest.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Followers {
    pub total: u64,
}

/// Response of `GET /me`, also the body of the user-profile endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub followers: Option<Followers>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Full artist object as returned by `GET /me/top/artists`.
#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub popularity: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimplifiedArtist {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Album {
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub release_date: Option<String>,
}

impl Album {
    pub fn first_image_url(&self) -> Option<&str> {
        self.images.first().map(|image| image.url.as_str())
    }

    /// Release year parsed from the leading four characters of `release_date`.
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?;
        date.get(0..4)?.parse().ok()
    }
}

/// Track object. `energy` is read by the listening timeline, which defaults
/// it when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
    pub album: Album,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub popularity: Option<u32>,
    #[serde(default)]
    pub energy: Option<f64>,
}

impl Track {
    pub fn primary_artist_name(&self) -> &str {
        self.artists
            .first()
            .map(|artist| artist.name.as_str())
            .unwrap_or("Unknown artist")
    }
}

/// Entry of `GET /audio-features`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackAudioFeatures {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub danceability: Option<f64>,
    #[serde(default)]
    pub energy: Option<f64>,
}

/// Unknown ids come back as `null` entries.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioFeaturesResponse {
    #[serde(default)]
    pub audio_features: Vec<Option<TrackAudioFeatures>>,
}

/// Item of `GET /me/player/recently-played`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayHistory {
    pub track: Track,
    /// RFC 3339 timestamp, kept as a string and parsed by the consumers.
    pub played_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub tracks: Option<Page<Track>>,
}

/// Response of the accounts service token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}
