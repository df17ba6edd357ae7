//! In-process stand-ins for Spotify and Gemini
//!
//! Both record what they were asked so tests can assert on upstream traffic.

use super::constants::*;
use super::fixtures::*;
use async_trait::async_trait;
use serde_json::{json, Value};
use spotify_insights_server::llm::{GenerationOptions, LlmError, TextGenerator};
use spotify_insights_server::spotify::{ClientCredentials, MusicApi, SpotifyError, TokenResponse};
use std::sync::Mutex;

/// Scripted Spotify. Behaviour is keyed on the access token, see
/// [`VALID_TOKEN`], [`EXPIRED_TOKEN`], [`NO_GENRES_TOKEN`] and [`FLAKY_TOKEN`].
pub struct FakeMusicApi {
    recently_played: Value,
    audio_features: Option<Value>,
    audio_feature_ids: Mutex<Vec<String>>,
    calls: Mutex<Vec<String>>,
    search_queries: Mutex<Vec<String>>,
    exchanged_codes: Mutex<Vec<String>>,
}

impl Default for FakeMusicApi {
    fn default() -> Self {
        Self::with_recently_played(default_recently_played_json())
    }
}

impl FakeMusicApi {
    pub fn with_recently_played(recently_played: Value) -> Self {
        Self {
            recently_played,
            audio_features: Some(audio_features_json()),
            audio_feature_ids: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            search_queries: Mutex::new(Vec::new()),
            exchanged_codes: Mutex::new(Vec::new()),
        }
    }

    /// `/audio-features` answers 403, as it does for apps without access.
    pub fn without_audio_features() -> Self {
        Self {
            audio_features: None,
            ..Self::default()
        }
    }

    /// Paths requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn search_queries(&self) -> Vec<String> {
        self.search_queries.lock().unwrap().clone()
    }

    /// `ids` parameters of the audio features requests.
    pub fn audio_feature_ids(&self) -> Vec<String> {
        self.audio_feature_ids.lock().unwrap().clone()
    }

    pub fn exchanged_codes(&self) -> Vec<String> {
        self.exchanged_codes.lock().unwrap().clone()
    }
}

#[async_trait]
impl MusicApi for FakeMusicApi {
    async fn get_json(
        &self,
        access_token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, SpotifyError> {
        self.calls.lock().unwrap().push(path.to_string());

        if access_token == EXPIRED_TOKEN {
            return Err(SpotifyError::Unauthorized(unauthorized_json()));
        }

        match path {
            "/me" => Ok(user_profile_json()),
            "/me/top/artists" => match access_token {
                FLAKY_TOKEN => Err(SpotifyError::Api {
                    status: 503,
                    details: json!({"error": {"status": 503, "message": "Service unavailable"}}),
                }),
                NO_GENRES_TOKEN => Ok(top_artists_without_genres_json()),
                _ => Ok(top_artists_json()),
            },
            "/me/top/tracks" => Ok(top_tracks_json()),
            "/me/player/recently-played" => Ok(self.recently_played.clone()),
            "/audio-features" => {
                let ids = query
                    .iter()
                    .find(|(key, _)| *key == "ids")
                    .map(|(_, value)| value.clone())
                    .unwrap_or_default();
                self.audio_feature_ids.lock().unwrap().push(ids);
                self.audio_features.clone().ok_or_else(|| SpotifyError::Api {
                    status: 403,
                    details: json!({"error": {"status": 403, "message": "Forbidden"}}),
                })
            }
            "/search" => {
                let q = query
                    .iter()
                    .find(|(key, _)| *key == "q")
                    .map(|(_, value)| value.clone())
                    .unwrap_or_default();
                self.search_queries.lock().unwrap().push(q.clone());
                Ok(search_results_json(&q))
            }
            other => Err(SpotifyError::Api {
                status: 404,
                details: json!({"error": {"status": 404, "message": format!("No route {}", other)}}),
            }),
        }
    }

    async fn exchange_code(
        &self,
        code: &str,
        credentials: &ClientCredentials,
    ) -> Result<TokenResponse, SpotifyError> {
        self.exchanged_codes.lock().unwrap().push(code.to_string());

        if code == GOOD_CODE
            && credentials.client_id == CLIENT_ID
            && credentials.client_secret == CLIENT_SECRET
        {
            Ok(TokenResponse {
                access_token: ISSUED_ACCESS_TOKEN.to_string(),
                token_type: Some("Bearer".to_string()),
                scope: None,
                expires_in: ISSUED_EXPIRES_IN,
                refresh_token: Some(ISSUED_REFRESH_TOKEN.to_string()),
            })
        } else {
            Err(SpotifyError::Api {
                status: 400,
                details: json!({"error": "invalid_grant", "error_description": "Invalid authorization code"}),
            })
        }
    }
}

enum Reply {
    Text(String),
    Failure,
}

/// Generator replaying a script. The last entry repeats once the script runs out.
pub struct FakeTextGenerator {
    script: Vec<Reply>,
    prompts: Mutex<Vec<String>>,
}

impl FakeTextGenerator {
    pub fn replying(texts: Vec<String>) -> Self {
        Self {
            script: texts.into_iter().map(Reply::Text).collect(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn well_formed() -> Self {
        Self::replying(vec![well_formed_generation()])
    }

    pub fn malformed() -> Self {
        Self::replying(vec![malformed_generation()])
    }

    pub fn failing() -> Self {
        Self {
            script: vec![Reply::Failure],
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeTextGenerator {
    fn name(&self) -> &str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-model"
    }

    async fn generate(
        &self,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, LlmError> {
        let index = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            prompts.len() - 1
        };
        match self.script.get(index).or_else(|| self.script.last()) {
            Some(Reply::Text(text)) => Ok(text.clone()),
            Some(Reply::Failure) => Err(LlmError::Api {
                status: 500,
                message: "internal".to_string(),
            }),
            None => Err(LlmError::Empty),
        }
    }
}
