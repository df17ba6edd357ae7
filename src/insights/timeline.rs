//! Hour-of-day listening timeline.
//!
//! Each play lands in the bucket of its own local hour, whatever calendar day
//! it happened on.

use chrono::{DateTime, TimeZone, Timelike};
use serde::Serialize;
use tracing::debug;

use crate::spotify::PlayHistory;

pub const HOURS_PER_DAY: usize = 24;
pub const TIMELINE_SAMPLE_LIMIT: u32 = 50;
pub const DEFAULT_ENERGY: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineTrack {
    pub played_at: String,
    pub track_name: String,
    pub artist: String,
    pub energy: f64,
    pub duration_ms: u64,
    pub album_art: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopTrack {
    pub name: String,
    pub artist: String,
    pub album_art: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourBucket {
    pub hour: u32,
    pub track_count: usize,
    pub avg_energy: f64,
    pub tracks: Vec<TimelineTrack>,
    pub top_track: Option<TopTrack>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Timeline {
    pub timeline: Vec<HourBucket>,
}

fn timeline_track(play: &PlayHistory) -> TimelineTrack {
    let track = &play.track;
    TimelineTrack {
        played_at: play.played_at.clone(),
        track_name: track.name.clone(),
        artist: track.primary_artist_name().to_string(),
        energy: track
            .energy
            .filter(|e| e.is_finite() && *e > 0.0)
            .unwrap_or(DEFAULT_ENERGY),
        duration_ms: track.duration_ms,
        album_art: track.album.first_image_url().unwrap_or_default().to_string(),
    }
}

/// Buckets `plays` into 24 hours of `tz`. Plays with an unparseable
/// `played_at` are skipped.
pub fn build_timeline<Tz: TimeZone>(plays: &[PlayHistory], tz: &Tz) -> Timeline {
    let mut hours: Vec<Vec<(DateTime<Tz>, TimelineTrack)>> =
        (0..HOURS_PER_DAY).map(|_| Vec::new()).collect();

    for play in plays {
        match DateTime::parse_from_rfc3339(&play.played_at) {
            Ok(played_at) => {
                let local = played_at.with_timezone(tz);
                hours[local.hour() as usize].push((local, timeline_track(play)));
            }
            Err(err) => debug!("Skipping play with bad timestamp {}: {}", play.played_at, err),
        }
    }

    let timeline = hours
        .into_iter()
        .enumerate()
        .map(|(hour, mut entries)| {
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            let tracks: Vec<TimelineTrack> = entries.into_iter().map(|(_, t)| t).collect();
            let avg_energy = if tracks.is_empty() {
                0.0
            } else {
                tracks.iter().map(|t| t.energy).sum::<f64>() / tracks.len() as f64
            };
            let top_track = tracks.first().map(|t| TopTrack {
                name: t.track_name.clone(),
                artist: t.artist.clone(),
                album_art: t.album_art.clone(),
            });
            HourBucket {
                hour: hour as u32,
                track_count: tracks.len(),
                avg_energy,
                tracks,
                top_track,
            }
        })
        .collect();

    Timeline { timeline }
}
