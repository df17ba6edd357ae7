//! Static doppelgänger reference table.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Serialize;

use crate::insights::audio_features::AudioFeatureProfile;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoppelgangerCandidate {
    pub name: &'static str,
    pub genres: &'static [&'static str],
    pub audio_features: AudioFeatureProfile,
    pub description: &'static str,
}

const fn features(danceability: f64, energy: f64) -> AudioFeatureProfile {
    AudioFeatureProfile {
        danceability,
        energy,
    }
}

pub static CANDIDATES: [DoppelgangerCandidate; 10] = [
    DoppelgangerCandidate {
        name: "Dr. Dre",
        genres: &["rap", "hip hop", "west coast hip hop"],
        audio_features: features(0.7, 0.8),
        description: "You are Dr. Dre, laying down beats that shake the West Coast.",
    },
    DoppelgangerCandidate {
        name: "A.R. Rahman",
        genres: &["bollywood", "hindi pop", "sufi"],
        audio_features: features(0.6, 0.5),
        description: "You are A.R. Rahman, weaving soulful melodies with a Bollywood twist.",
    },
    DoppelgangerCandidate {
        name: "Badshah",
        genres: &["desi hip hop", "hindi hip hop", "punjabi hip hop"],
        audio_features: features(0.8, 0.7),
        description: "You are Badshah, dropping desi beats that make the party bounce.",
    },
    DoppelgangerCandidate {
        name: "Clairo",
        genres: &["bedroom pop"],
        audio_features: features(0.6, 0.4),
        description: "You are Clairo, chilling in a bedroom pop haze with lo-fi dreams.",
    },
    DoppelgangerCandidate {
        name: "Yo Yo Honey Singh",
        genres: &["desi pop", "punjabi hip hop", "hindi hip hop"],
        audio_features: features(0.8, 0.9),
        description: "You are Yo Yo Honey Singh, the king of desi swagger and party anthems.",
    },
    DoppelgangerCandidate {
        name: "Nusrat Fateh Ali Khan",
        genres: &["sufi", "desi"],
        audio_features: features(0.5, 0.6),
        description: "You are Nusrat Fateh Ali Khan, channeling mystical vibes through timeless qawwalis.",
    },
    DoppelgangerCandidate {
        name: "Rani Mukherjee (as Tina from KKHH)",
        genres: &["bollywood", "hindi pop"],
        audio_features: features(0.7, 0.6),
        description: "You are Tina from Kuch Kuch Hota Hai, dancing through Bollywood romance.",
    },
    DoppelgangerCandidate {
        name: "Raftaar",
        genres: &["desi hip hop", "hindi hip hop", "rap"],
        audio_features: features(0.75, 0.85),
        description: "You are Raftaar, spitting rapid-fire rhymes with desi flair.",
    },
    DoppelgangerCandidate {
        name: "AP Dhillon",
        genres: &["punjabi hip hop", "desi pop"],
        audio_features: features(0.7, 0.65),
        description: "You are AP Dhillon, blending Punjabi vibes with smooth modern beats.",
    },
    DoppelgangerCandidate {
        name: "Shakti (from Shakti Comics)",
        genres: &["desi", "hindi pop"],
        audio_features: features(0.6, 0.7),
        description: "You are Shakti, a desi superhero grooving to epic Hindi anthems.",
    },
];

/// Uniformly random entry, used when nothing about the user is known.
pub fn random_candidate<R: Rng + ?Sized>(rng: &mut R) -> &'static DoppelgangerCandidate {
    CANDIDATES.choose(rng).unwrap_or(&CANDIDATES[0])
}
