//! Estimated listening minutes per artist.
//!
//! There is no play-count data, so each top track contributes its duration
//! weighted by obscurity: less popular tracks in a user's top list are
//! assumed to be played more often.

use serde::Serialize;

use crate::spotify::Track;

pub const TIME_SPENT_SAMPLE_LIMIT: u32 = 50;
pub const MAX_TIME_SPENT_ARTISTS: usize = 10;
pub const DEFAULT_ARTIST_IMAGE: &str = "/default-artist.png";

/// Popularity assumed when the payload omits it; yields weight 1.0.
const NEUTRAL_POPULARITY: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistTime {
    pub artist: String,
    /// Rounded minutes.
    pub time: u64,
    pub image: String,
}

pub fn popularity_weight(popularity: Option<u32>) -> f64 {
    let popularity = popularity.unwrap_or(NEUTRAL_POPULARITY) as f64;
    1.0 + (50.0 - popularity) / 50.0
}

/// Accumulates weighted minutes for every credited artist, then ranks.
pub fn estimate_time_spent(tracks: &[Track]) -> Vec<ArtistTime> {
    let mut totals: Vec<(String, f64, String)> = Vec::new();

    for track in tracks {
        let minutes = track.duration_ms as f64 / 60_000.0 * popularity_weight(track.popularity);
        for artist in &track.artists {
            match totals.iter_mut().find(|(name, _, _)| *name == artist.name) {
                Some((_, time, _)) => *time += minutes,
                None => totals.push((
                    artist.name.clone(),
                    minutes,
                    track
                        .album
                        .first_image_url()
                        .unwrap_or(DEFAULT_ARTIST_IMAGE)
                        .to_string(),
                )),
            }
        }
    }

    let mut ranked: Vec<ArtistTime> = totals
        .into_iter()
        .map(|(artist, time, image)| ArtistTime {
            artist,
            time: time.round().max(0.0) as u64,
            image,
        })
        .collect();
    ranked.sort_by(|a, b| b.time.cmp(&a.time));
    ranked.truncate(MAX_TIME_SPENT_ARTISTS);
    ranked
}
