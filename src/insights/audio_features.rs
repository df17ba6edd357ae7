//! Danceability/energy profile derived from a user's top tracks.

use serde::{Deserialize, Serialize};

use crate::spotify::{Track, TrackAudioFeatures};

/// Number of tracks considered when averaging.
pub const MAX_FEATURE_SAMPLE: usize = 10;

/// Both components always lie in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatureProfile {
    pub danceability: f64,
    pub energy: f64,
}

impl AudioFeatureProfile {
    /// Used whenever nothing better is known.
    pub const NEUTRAL: AudioFeatureProfile = AudioFeatureProfile {
        danceability: 0.5,
        energy: 0.5,
    };

    /// Builds a profile, clamping both components into [0, 1]. Non-finite
    /// inputs fall back to the neutral value.
    pub fn new(danceability: f64, energy: f64) -> Self {
        Self {
            danceability: clamp_unit(danceability),
            energy: clamp_unit(energy),
        }
    }

    /// Average of the upstream audio features. Entries missing either
    /// component are skipped; `None` when nothing is left.
    pub fn from_native(features: &[TrackAudioFeatures]) -> Option<Self> {
        let usable: Vec<AudioFeatureProfile> = features
            .iter()
            .take(MAX_FEATURE_SAMPLE)
            .filter_map(|entry| match (entry.danceability, entry.energy) {
                (Some(danceability), Some(energy)) => {
                    Some(AudioFeatureProfile::new(danceability, energy))
                }
                _ => None,
            })
            .collect();
        average(&usable)
    }

    /// Popularity proxy averaged over at most [`MAX_FEATURE_SAMPLE`] tracks.
    /// Tracks without a popularity score are skipped; with no usable track
    /// the neutral profile is returned.
    pub fn from_popularity(tracks: &[Track]) -> Self {
        let usable: Vec<AudioFeatureProfile> = tracks
            .iter()
            .take(MAX_FEATURE_SAMPLE)
            .filter_map(|track| track.popularity.map(popularity_proxy))
            .collect();
        average(&usable).unwrap_or(Self::NEUTRAL)
    }
}

impl Default for AudioFeatureProfile {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

fn average(profiles: &[AudioFeatureProfile]) -> Option<AudioFeatureProfile> {
    if profiles.is_empty() {
        return None;
    }
    let count = profiles.len() as f64;
    let (danceability, energy) = profiles.iter().fold((0.0, 0.0), |(d, e), features| {
        (d + features.danceability, e + features.energy)
    });
    Some(AudioFeatureProfile::new(danceability / count, energy / count))
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// Maps a 0-100 popularity score onto both axes. Popular tracks skew towards
/// danceable, high energy material; the offsets keep obscure tracks off zero.
pub fn popularity_proxy(popularity: u32) -> AudioFeatureProfile {
    let p = popularity.min(100) as f64 / 100.0;
    AudioFeatureProfile::new(0.4 + 0.5 * p, 0.3 + 0.6 * p)
}
