//! Nearest-neighbour match against the static candidate table.

use super::candidates::{DoppelgangerCandidate, CANDIDATES};
use crate::insights::audio_features::AudioFeatureProfile;

/// `1 - (|Δdanceability| + |Δenergy|) / 2`. Lies in [0, 1] for in-range
/// profiles and never leaves [-1, 1].
pub fn similarity(user: &AudioFeatureProfile, candidate: &AudioFeatureProfile) -> f64 {
    let dance_diff = (user.danceability - candidate.danceability).abs();
    let energy_diff = (user.energy - candidate.energy).abs();
    1.0 - (dance_diff + energy_diff) / 2.0
}

/// True when any candidate genre and any user genre contain one another.
pub fn genres_overlap(candidate_genres: &[&str], user_genres: &[String]) -> bool {
    candidate_genres.iter().any(|genre| {
        user_genres
            .iter()
            .any(|user_genre| user_genre.contains(genre) || genre.contains(user_genre.as_str()))
    })
}

/// Highest similarity among `candidates` accepted by `filter`. Ties keep the
/// first candidate encountered.
fn best_by<'a, F>(
    candidates: &'a [DoppelgangerCandidate],
    user_features: &AudioFeatureProfile,
    filter: F,
) -> Option<&'a DoppelgangerCandidate>
where
    F: Fn(&DoppelgangerCandidate) -> bool,
{
    let mut best: Option<&DoppelgangerCandidate> = None;
    let mut highest = -1.0;
    for candidate in candidates.iter().filter(|c| filter(c)) {
        let score = similarity(user_features, &candidate.audio_features);
        if score > highest {
            highest = score;
            best = Some(candidate);
        }
    }
    best
}

/// Genre-matching candidates are preferred; without any, all candidates are
/// ranked by audio features alone.
pub fn best_match_in<'a>(
    candidates: &'a [DoppelgangerCandidate],
    user_genres: &[String],
    user_features: &AudioFeatureProfile,
) -> Option<&'a DoppelgangerCandidate> {
    best_by(candidates, user_features, |c| {
        genres_overlap(c.genres, user_genres)
    })
    .or_else(|| best_by(candidates, user_features, |_| true))
    .or_else(|| candidates.first())
}

pub fn best_match(
    user_genres: &[String],
    user_features: &AudioFeatureProfile,
) -> &'static DoppelgangerCandidate {
    best_match_in(&CANDIDATES, user_genres, user_features).unwrap_or(&CANDIDATES[0])
}
