//! Flattened track projections returned to the browser.

use serde::Serialize;

use crate::spotify::{PlayHistory, Track};

/// Entries per list in the music stats body.
pub const MUSIC_STATS_LIMIT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSummary {
    pub id: Option<String>,
    pub name: String,
    pub artist: String,
    pub album: String,
    pub image: Option<String>,
}

impl From<&Track> for TrackSummary {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id.clone(),
            name: track.name.clone(),
            artist: track.primary_artist_name().to_string(),
            album: track.album.name.clone(),
            image: track.album.first_image_url().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentTrackSummary {
    #[serde(flatten)]
    pub track: TrackSummary,
    pub played_at: String,
}

impl From<&PlayHistory> for RecentTrackSummary {
    fn from(play: &PlayHistory) -> Self {
        Self {
            track: TrackSummary::from(&play.track),
            played_at: play.played_at.clone(),
        }
    }
}

/// Body of `/api/user-music-stats`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicStats {
    pub top_tracks: Vec<TrackSummary>,
    pub recent_tracks: Vec<RecentTrackSummary>,
}

impl MusicStats {
    pub fn new(top: &[Track], recent: &[PlayHistory]) -> Self {
        Self {
            top_tracks: top.iter().map(TrackSummary::from).collect(),
            recent_tracks: recent.iter().map(RecentTrackSummary::from).collect(),
        }
    }
}
