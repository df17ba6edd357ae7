//! Generated doppelgänger: prompt construction, response repair and the
//! bounded retry loop.
//!
//! Each attempt asks the generator for a JSON object, strips Markdown fences,
//! decodes strictly and falls back to regex extraction when the text is not
//! valid JSON. Missing fields are filled from fixed pools or from the user's
//! own profile, and the result is validated. After [`MAX_GENERATION_ATTEMPTS`]
//! failed attempts a synthesized result is returned instead of an error.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::insights::audio_features::AudioFeatureProfile;
use crate::insights::taste::UserTasteProfile;
use crate::llm::{GenerationOptions, LlmError, TextGenerator};
use crate::server::metrics::record_generation_attempt;

pub const MAX_GENERATION_ATTEMPTS: u32 = 3;
pub const MIN_DESCRIPTION_CHARS: usize = 100;
pub const MIN_MATCHING_GENRES: usize = 3;

const FALLBACK_NAMES: &[&str] = &[
    "The Midnight Cartographer",
    "Velvet Static",
    "The Neon Drifter",
    "Echo Lantern",
    "The Bassline Botanist",
];

const FALLBACK_DESCRIPTIONS: &[&str] = &[
    "You move through music like a late-night radio host, stitching together moods that nobody else would dare to pair, and somehow every transition lands exactly where it should.",
    "Your playlists read like a travel diary: a little nostalgic, a little restless, always chasing the next sound that feels like home while never quite settling down in one place.",
    "You are the friend who hands over one earbud and says 'just listen', trusting that the right song at the right moment can say more than a whole evening of conversation.",
    "Somewhere between the dance floor and the headphones on a long walk home, your taste lives in the space where big choruses meet quiet, personal moments of reflection.",
];

const FALLBACK_CULTURAL_REFERENCES: &[&str] = &[
    "The soundtrack to a coming-of-age film that everyone quotes but nobody remembers the name of",
    "A crate-digging DJ set at a rooftop party that ran well past sunrise",
    "The mixtape passed around a school bus that quietly shaped a generation",
    "A road-trip montage where the windows are down and the chorus hits right on the bridge",
];

const FALLBACK_GENRES: &[&str] = &[
    "indie pop",
    "alternative",
    "electronic",
    "soul",
    "hip hop",
    "singer-songwriter",
];

/// Generated doppelgänger, serialized as the endpoint body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoppelgangerResult {
    pub name: String,
    pub description: String,
    pub genres: Vec<String>,
    pub audio_features: AudioFeatureProfile,
    pub cultural_reference: String,
    pub matching_genres: Vec<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Name is empty")]
    EmptyName,
    #[error("Description is too short ({0} characters)")]
    ShortDescription(usize),
    #[error("Genres are empty")]
    EmptyGenres,
    #[error("Cultural reference is empty")]
    EmptyCulturalReference,
    #[error("Only {0} matching genres")]
    TooFewMatchingGenres(usize),
    #[error("Audio features are not numeric")]
    InvalidAudioFeatures,
}

#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("Generation failed: {0}")]
    Generation(#[from] LlmError),
    #[error("No recognizable fields in generated text")]
    Unparseable,
    #[error("Generated result is invalid: {0}")]
    Invalid(#[from] ValidationError),
}

impl DoppelgangerResult {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let description_len = self.description.chars().count();
        if description_len < MIN_DESCRIPTION_CHARS {
            return Err(ValidationError::ShortDescription(description_len));
        }
        if self.genres.is_empty() {
            return Err(ValidationError::EmptyGenres);
        }
        if self.cultural_reference.trim().is_empty() {
            return Err(ValidationError::EmptyCulturalReference);
        }
        if self.matching_genres.len() < MIN_MATCHING_GENRES {
            return Err(ValidationError::TooFewMatchingGenres(
                self.matching_genres.len(),
            ));
        }
        if !self.audio_features.danceability.is_finite() || !self.audio_features.energy.is_finite()
        {
            return Err(ValidationError::InvalidAudioFeatures);
        }
        Ok(())
    }
}

/// Fields as the generator returned them, any of which may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFields {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub audio_features: Option<GeneratedAudioFeatures>,
    #[serde(default)]
    pub cultural_reference: Option<String>,
    #[serde(default)]
    pub matching_genres: Option<Vec<String>>,
}

impl GeneratedFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.genres.is_none()
            && self.audio_features.is_none()
            && self.cultural_reference.is_none()
            && self.matching_genres.is_none()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GeneratedAudioFeatures {
    #[serde(default)]
    pub danceability: Option<f64>,
    #[serde(default)]
    pub energy: Option<f64>,
}

pub fn build_prompt(profile: &UserTasteProfile) -> String {
    format!(
        r#"You are a music personality expert. Based on a listener's taste, invent a "musical doppelgänger": an artist persona who embodies it.

Listener profile:
- Top genres: {genres}
- Danceability: {danceability:.2}
- Energy: {energy:.2}

Respond with a single JSON object and nothing else, using exactly these fields:
{{
  "name": "persona name",
  "description": "at least 100 words describing the persona and why it matches the listener",
  "genres": ["genres the persona plays"],
  "audioFeatures": {{ "danceability": {danceability:.2}, "energy": {energy:.2} }},
  "culturalReference": "a film, book, scene or moment that captures the persona",
  "matchingGenres": ["at least three of the listener's genres that the persona shares"]
}}"#,
        genres = profile.top_genres.join(", "),
        danceability = profile.audio_features.danceability,
        energy = profile.audio_features.energy,
    )
}

/// Removes Markdown code fence markers (```json and ```).
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "")
        .trim()
        .to_string()
}

pub fn decode_strict(cleaned: &str) -> Result<GeneratedFields, serde_json::Error> {
    serde_json::from_str(cleaned)
}

fn unescape(value: &str) -> String {
    value
        .replace("\\\"", "\"")
        .replace("\\'", "'")
        .replace("\\n", "\n")
}

/// Value of `"key": "..."` or `'key': '...'`.
fn extract_string(text: &str, key: &str) -> Option<String> {
    let key = regex::escape(key);
    let patterns = [
        format!(r#""{key}"\s*:\s*"((?:[^"\\]|\\.)*)""#),
        format!(r#"'{key}'\s*:\s*'((?:[^'\\]|\\.)*)'"#),
    ];
    patterns.iter().find_map(|pattern| {
        let re = Regex::new(pattern).ok()?;
        let captures = re.captures(text)?;
        Some(unescape(captures.get(1)?.as_str()))
    })
}

/// Items of `"key": [ ... ]`, quoted with either quote style.
fn extract_list(text: &str, key: &str) -> Option<Vec<String>> {
    let re = Regex::new(&format!(
        r#"["']{}["']\s*:\s*\[([^\]]*)\]"#,
        regex::escape(key)
    ))
    .ok()?;
    let body = re.captures(text)?.get(1)?.as_str().to_string();
    let item_re = Regex::new(r#""((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)'"#).ok()?;
    let items: Vec<String> = item_re
        .captures_iter(&body)
        .filter_map(|captures| captures.get(1).or_else(|| captures.get(2)))
        .map(|m| unescape(m.as_str().trim()))
        .filter(|item| !item.is_empty())
        .collect();
    Some(items)
}

/// Secondary strategy for text that is not valid JSON.
pub fn extract_fields(text: &str) -> GeneratedFields {
    GeneratedFields {
        name: extract_string(text, "name"),
        description: extract_string(text, "description"),
        genres: extract_list(text, "genres"),
        audio_features: None,
        cultural_reference: extract_string(text, "culturalReference"),
        matching_genres: extract_list(text, "matchingGenres"),
    }
}

/// Strict decode first, regex extraction second. `None` when neither
/// strategy recovers a single field.
pub fn parse_response(raw: &str) -> Option<GeneratedFields> {
    let cleaned = strip_code_fences(raw);
    match decode_strict(&cleaned) {
        Ok(fields) => Some(fields),
        Err(err) => {
            debug!("Strict decode failed ({}), falling back to field extraction", err);
            let fields = extract_fields(&cleaned);
            (!fields.is_empty()).then_some(fields)
        }
    }
}

fn pick<R: Rng + ?Sized>(pool: &[&str], rng: &mut R) -> String {
    pool.choose(rng).copied().unwrap_or_default().to_string()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn non_empty_list(value: Option<Vec<String>>) -> Option<Vec<String>> {
    value.filter(|v| !v.is_empty())
}

fn default_genres<R: Rng + ?Sized>(profile: &UserTasteProfile, rng: &mut R) -> Vec<String> {
    if profile.top_genres.is_empty() {
        vec![pick(FALLBACK_GENRES, rng)]
    } else {
        profile.top_genres.clone()
    }
}

/// The user's genres, topped up from the fallback pool to
/// [`MIN_MATCHING_GENRES`] entries.
fn default_matching_genres<R: Rng + ?Sized>(
    profile: &UserTasteProfile,
    rng: &mut R,
) -> Vec<String> {
    let mut genres = profile.top_genres.clone();
    let mut pool: Vec<&str> = FALLBACK_GENRES.to_vec();
    pool.shuffle(rng);
    for genre in pool {
        if genres.len() >= MIN_MATCHING_GENRES {
            break;
        }
        if !genres.iter().any(|g| g == genre) {
            genres.push(genre.to_string());
        }
    }
    genres
}

/// Replaces missing or falsy fields with pool picks or profile values.
pub fn fill_defaults<R: Rng + ?Sized>(
    fields: GeneratedFields,
    profile: &UserTasteProfile,
    rng: &mut R,
) -> DoppelgangerResult {
    let audio_features = match fields.audio_features {
        Some(GeneratedAudioFeatures {
            danceability: Some(danceability),
            energy: Some(energy),
        }) => AudioFeatureProfile::new(danceability, energy),
        _ => profile.audio_features,
    };

    DoppelgangerResult {
        name: non_blank(fields.name).unwrap_or_else(|| pick(FALLBACK_NAMES, rng)),
        description: non_blank(fields.description)
            .unwrap_or_else(|| pick(FALLBACK_DESCRIPTIONS, rng)),
        genres: non_empty_list(fields.genres).unwrap_or_else(|| default_genres(profile, rng)),
        audio_features,
        cultural_reference: non_blank(fields.cultural_reference)
            .unwrap_or_else(|| pick(FALLBACK_CULTURAL_REFERENCES, rng)),
        matching_genres: non_empty_list(fields.matching_genres)
            .unwrap_or_else(|| default_matching_genres(profile, rng)),
    }
}

/// Result used once every attempt has failed. Valid by construction.
pub fn fallback_result<R: Rng + ?Sized>(
    profile: &UserTasteProfile,
    rng: &mut R,
) -> DoppelgangerResult {
    fill_defaults(GeneratedFields::default(), profile, rng)
}

#[derive(Debug)]
pub enum GenerationState {
    Attempting(u32),
    Succeeded {
        result: DoppelgangerResult,
        attempts: u32,
    },
    ExhaustedFallback,
}

#[derive(Debug)]
pub struct GenerationOutcome {
    pub result: DoppelgangerResult,
    /// Attempts consumed, including the failed ones.
    pub attempts: u32,
    pub used_fallback: bool,
}

async fn run_attempt<R: Rng + Send>(
    generator: &dyn TextGenerator,
    prompt: &str,
    profile: &UserTasteProfile,
    options: &GenerationOptions,
    rng: &mut R,
) -> Result<DoppelgangerResult, AttemptError> {
    let raw = generator.generate(prompt, options).await?;
    let fields = parse_response(&raw).ok_or(AttemptError::Unparseable)?;
    let result = fill_defaults(fields, profile, rng);
    result.validate()?;
    Ok(result)
}

/// Runs the bounded retry loop. Never fails: exhausting the attempts yields
/// [`fallback_result`].
pub async fn generate_doppelganger<R: Rng + Send>(
    generator: &dyn TextGenerator,
    profile: &UserTasteProfile,
    options: &GenerationOptions,
    rng: &mut R,
) -> GenerationOutcome {
    let prompt = build_prompt(profile);
    let mut state = GenerationState::Attempting(1);

    loop {
        state = match state {
            GenerationState::Attempting(attempt) => {
                debug!(
                    attempt,
                    provider = generator.name(),
                    model = generator.model(),
                    "Requesting doppelganger generation"
                );
                match run_attempt(generator, &prompt, profile, options, &mut *rng).await {
                    Ok(result) => {
                        record_generation_attempt("valid");
                        GenerationState::Succeeded {
                            result,
                            attempts: attempt,
                        }
                    }
                    Err(err) => {
                        record_generation_attempt(match &err {
                            AttemptError::Generation(_) => "error",
                            AttemptError::Unparseable | AttemptError::Invalid(_) => "invalid",
                        });
                        warn!(attempt, "Doppelganger generation attempt failed: {}", err);
                        if attempt >= MAX_GENERATION_ATTEMPTS {
                            GenerationState::ExhaustedFallback
                        } else {
                            GenerationState::Attempting(attempt + 1)
                        }
                    }
                }
            }
            GenerationState::Succeeded { result, attempts } => {
                info!(attempts, "Generated doppelganger \"{}\"", result.name);
                return GenerationOutcome {
                    result,
                    attempts,
                    used_fallback: false,
                };
            }
            GenerationState::ExhaustedFallback => {
                info!(
                    "All {} generation attempts failed, using fallback doppelganger",
                    MAX_GENERATION_ATTEMPTS
                );
                return GenerationOutcome {
                    result: fallback_result(profile, &mut *rng),
                    attempts: MAX_GENERATION_ATTEMPTS,
                    used_fallback: true,
                };
            }
        };
    }
}
