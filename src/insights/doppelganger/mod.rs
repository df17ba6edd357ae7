//! Musical doppelgänger lookup.
//!
//! Two modes: a generated persona built by a [`crate::llm::TextGenerator`],
//! and a nearest-neighbour match against a fixed table of artists. Both share
//! the zero-genre fallback, which picks a random table entry.

pub mod candidates;
pub mod generation;
pub mod matching;

use rand::Rng;
use serde::Serialize;

use super::audio_features::AudioFeatureProfile;
use super::taste::{UserTasteProfile, MAX_TOP_GENRES};

pub use candidates::{random_candidate, DoppelgangerCandidate, CANDIDATES};
pub use generation::{
    generate_doppelganger, DoppelgangerResult, GenerationOutcome, MAX_GENERATION_ATTEMPTS,
};
pub use matching::{best_match, similarity};

pub const UNKNOWN_TASTE_NOTE: &str =
    "We couldn't analyze your music preferences, so we picked a random musical twin.";

/// Body returned by the static mode and by the zero-genre fallback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticDoppelganger {
    pub name: String,
    pub description: String,
    pub genres: Vec<String>,
    pub audio_features: AudioFeatureProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Random table entry for a user without any genre signal.
pub fn unknown_taste_fallback<R: Rng + ?Sized>(rng: &mut R) -> StaticDoppelganger {
    let candidate = random_candidate(rng);
    StaticDoppelganger {
        name: candidate.name.to_string(),
        description: candidate.description.to_string(),
        genres: Vec::new(),
        audio_features: AudioFeatureProfile::NEUTRAL,
        note: Some(UNKNOWN_TASTE_NOTE.to_string()),
    }
}

pub fn static_match(profile: &UserTasteProfile) -> StaticDoppelganger {
    let candidate = best_match(&profile.top_genres, &profile.audio_features);
    StaticDoppelganger {
        name: candidate.name.to_string(),
        description: candidate.description.to_string(),
        genres: profile
            .top_genres
            .iter()
            .take(MAX_TOP_GENRES)
            .cloned()
            .collect(),
        audio_features: profile.audio_features,
        note: None,
    }
}
