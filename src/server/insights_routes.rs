//! Per-user insight endpoints. Every handler needs an [`AccessToken`] and
//! talks to Spotify on the user's behalf; none keeps anything between
//! requests.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use tracing::{debug, info, warn};

use super::access_token::AccessToken;
use super::error::ApiError;
use super::metrics::record_doppelganger_result;
use super::state::{SharedMusicApi, ServerState};
use crate::config::{DoppelgangerMode, ENV_GEMINI_API_KEY};
use crate::insights::doppelganger::{
    generate_doppelganger, static_match, unknown_taste_fallback,
};
use crate::insights::era_playlist::{build_era_playlist, Era};
use crate::insights::taste::{fetch_audio_features, fetch_top_genres};
use crate::insights::time_spent::{estimate_time_spent, TIME_SPENT_SAMPLE_LIMIT};
use crate::insights::timeline::{build_timeline, TIMELINE_SAMPLE_LIMIT};
use crate::insights::tracks::{MusicStats, MUSIC_STATS_LIMIT};
use crate::insights::UserTasteProfile;
use crate::spotify::TimeRange;

#[derive(Deserialize, Debug, Default)]
pub struct TimeRangeParams {
    pub time_range: Option<String>,
}

impl TimeRangeParams {
    fn parse(&self) -> Result<Option<TimeRange>, ApiError> {
        self.time_range
            .as_deref()
            .map(TimeRange::from_str)
            .transpose()
            .map_err(ApiError::InvalidInput)
    }
}

#[derive(Deserialize, Debug)]
pub struct EraParams {
    pub era: Option<String>,
}

pub async fn top_artists(
    token: AccessToken,
    State(music_api): State<SharedMusicApi>,
    Query(params): Query<TimeRangeParams>,
) -> Result<Response, ApiError> {
    let time_range = params.parse()?;
    let body = music_api
        .top_artists_raw(token.as_str(), time_range)
        .await
        .map_err(|err| ApiError::from_spotify(err, "Failed to fetch top artists"))?;
    Ok(Json(body).into_response())
}

pub async fn user_profile(
    token: AccessToken,
    State(music_api): State<SharedMusicApi>,
) -> Result<Response, ApiError> {
    let profile = music_api
        .current_user(token.as_str())
        .await
        .map_err(|err| ApiError::from_spotify(err, "Failed to fetch user profile"))?;
    Ok(Json(profile).into_response())
}

pub async fn user_music_stats(
    token: AccessToken,
    State(music_api): State<SharedMusicApi>,
) -> Result<Response, ApiError> {
    let top = music_api
        .top_tracks(token.as_str(), TimeRange::ShortTerm, MUSIC_STATS_LIMIT)
        .await
        .map_err(|err| ApiError::from_spotify(err, "Failed to fetch music stats"))?;
    let recent = music_api
        .recently_played(token.as_str(), MUSIC_STATS_LIMIT)
        .await
        .map_err(|err| ApiError::from_spotify(err, "Failed to fetch music stats"))?;
    Ok(Json(MusicStats::new(&top, &recent)).into_response())
}

pub async fn time_spent(
    token: AccessToken,
    State(music_api): State<SharedMusicApi>,
    Query(params): Query<TimeRangeParams>,
) -> Result<Response, ApiError> {
    let time_range = params.parse()?.unwrap_or_default();
    let tracks = music_api
        .top_tracks(token.as_str(), time_range, TIME_SPENT_SAMPLE_LIMIT)
        .await
        .map_err(|err| ApiError::from_spotify(err, "Failed to fetch time spent data"))?;
    Ok(Json(estimate_time_spent(&tracks)).into_response())
}

pub async fn listening_timeline(
    token: AccessToken,
    State(music_api): State<SharedMusicApi>,
) -> Result<Response, ApiError> {
    let plays = music_api
        .recently_played(token.as_str(), TIMELINE_SAMPLE_LIMIT)
        .await
        .map_err(|err| ApiError::from_spotify(err, "Failed to fetch listening timeline"))?;
    Ok(Json(build_timeline(&plays, &chrono::Local)).into_response())
}

pub async fn time_travel_playlist(
    token: Option<AccessToken>,
    State(music_api): State<SharedMusicApi>,
    Query(params): Query<EraParams>,
) -> Result<Response, ApiError> {
    let (token, era) = match (token, params.era.filter(|era| !era.is_empty())) {
        (Some(token), Some(era)) => (token, era),
        _ => {
            return Err(ApiError::MissingInput(
                "Missing access_token or era".to_string(),
            ))
        }
    };
    let era = Era::parse(&era)
        .ok_or_else(|| ApiError::InvalidInput(format!("Invalid era: {}", era)))?;

    let tracks = match build_era_playlist(music_api.as_ref(), token.as_str(), &era).await {
        Ok(tracks) => tracks,
        Err(err) => {
            warn!("Era playlist for {}s failed, returning no tracks: {}", era.label(), err);
            Vec::new()
        }
    };
    Ok(Json(json!({ "tracks": tracks })).into_response())
}

pub async fn doppelganger(
    token: AccessToken,
    State(state): State<ServerState>,
) -> Result<Response, ApiError> {
    let mode = state.config.doppelganger_mode;
    let generator = match (mode, &state.text_generator) {
        (DoppelgangerMode::Generated, None) => {
            return Err(ApiError::missing_config(ENV_GEMINI_API_KEY))
        }
        (DoppelgangerMode::Generated, Some(generator)) => Some(generator.clone()),
        (DoppelgangerMode::Static, _) => None,
    };

    let api = state.music_api.as_ref();
    let user = api.current_user(token.as_str()).await.map_err(|err| {
        if err.is_unauthorized() {
            ApiError::Unauthorized {
                message: "Invalid or expired token".to_string(),
                details: Some(err.details()),
            }
        } else {
            ApiError::Upstream {
                message: "Failed to find your doppelgänger".to_string(),
                details: Some(err.details()),
            }
        }
    })?;
    debug!("Finding doppelganger for user {}", user.id);

    let mut rng = StdRng::from_os_rng();

    let top_genres = fetch_top_genres(api, token.as_str()).await;
    if top_genres.is_empty() {
        info!("No genres for user {}, picking a random doppelganger", user.id);
        record_doppelganger_result("unknown_taste");
        return Ok(Json(unknown_taste_fallback(&mut rng)).into_response());
    }

    let profile = UserTasteProfile {
        top_genres,
        audio_features: fetch_audio_features(api, token.as_str()).await,
    };

    match generator {
        None => {
            record_doppelganger_result("static");
            Ok(Json(static_match(&profile)).into_response())
        }
        Some(generator) => {
            let outcome = generate_doppelganger(
                generator.as_ref(),
                &profile,
                &state.config.generation,
                &mut rng,
            )
            .await;
            record_doppelganger_result(if outcome.used_fallback {
                "fallback"
            } else {
                "generated"
            });
            Ok(Json(outcome.result).into_response())
        }
    }
}
