//! User taste profile: top genres plus averaged audio features.

use serde::Serialize;
use tracing::{debug, warn};

use super::audio_features::{AudioFeatureProfile, MAX_FEATURE_SAMPLE};
use crate::spotify::{Artist, MusicApi, TimeRange};

pub const MAX_TOP_GENRES: usize = 5;
pub const TASTE_SAMPLE_LIMIT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTasteProfile {
    /// Deduplicated, first-seen order, at most [`MAX_TOP_GENRES`].
    pub top_genres: Vec<String>,
    pub audio_features: AudioFeatureProfile,
}

/// Union of all genre tags in artist order, without duplicates.
pub fn collect_genres(artists: &[Artist]) -> Vec<String> {
    let mut genres: Vec<String> = Vec::new();
    for genre in artists.iter().flat_map(|artist| artist.genres.iter()) {
        if !genres.contains(genre) {
            genres.push(genre.clone());
        }
    }
    genres
}

pub fn collect_top_genres(artists: &[Artist]) -> Vec<String> {
    let mut genres = collect_genres(artists);
    genres.truncate(MAX_TOP_GENRES);
    genres
}

/// Top genres from the medium-term top artists. A failed upstream call
/// degrades to an empty list.
pub async fn fetch_top_genres(api: &dyn MusicApi, access_token: &str) -> Vec<String> {
    match api
        .top_artists(access_token, TimeRange::MediumTerm, TASTE_SAMPLE_LIMIT)
        .await
    {
        Ok(artists) => {
            let genres = collect_top_genres(&artists);
            debug!("Top genres: {:?}", genres);
            genres
        }
        Err(err) => {
            warn!("Error fetching top artists, continuing without genres: {}", err);
            Vec::new()
        }
    }
}

/// Audio features of the medium-term top tracks. Native features are used
/// when the upstream returns any; otherwise the popularity proxy over the
/// same tracks. A failed top tracks call degrades to the neutral profile.
pub async fn fetch_audio_features(api: &dyn MusicApi, access_token: &str) -> AudioFeatureProfile {
    let tracks = match api
        .top_tracks(access_token, TimeRange::MediumTerm, TASTE_SAMPLE_LIMIT)
        .await
    {
        Ok(tracks) => tracks,
        Err(err) => {
            warn!("Error fetching top tracks, using neutral audio features: {}", err);
            return AudioFeatureProfile::NEUTRAL;
        }
    };
    if tracks.is_empty() {
        return AudioFeatureProfile::NEUTRAL;
    }

    let ids: Vec<String> = tracks
        .iter()
        .take(MAX_FEATURE_SAMPLE)
        .filter_map(|track| track.id.clone())
        .collect();
    let native = if ids.is_empty() {
        None
    } else {
        match api.audio_features(access_token, &ids).await {
            Ok(features) => AudioFeatureProfile::from_native(&features),
            Err(err) => {
                warn!("Error fetching audio features, using popularity proxy: {}", err);
                None
            }
        }
    };

    let features = native.unwrap_or_else(|| AudioFeatureProfile::from_popularity(&tracks));
    debug!("User audio features: {:?}", features);
    features
}
