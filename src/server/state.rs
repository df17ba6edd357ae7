use axum::extract::FromRef;

use crate::config::OAuthSettings;
use crate::llm::TextGenerator;
use crate::spotify::MusicApi;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type SharedMusicApi = Arc<dyn MusicApi>;
pub type OptionalTextGenerator = Option<Arc<dyn TextGenerator>>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub music_api: SharedMusicApi,
    pub text_generator: OptionalTextGenerator,
    pub oauth: OAuthSettings,
    pub version: String,
}

impl FromRef<ServerState> for SharedMusicApi {
    fn from_ref(input: &ServerState) -> Self {
        input.music_api.clone()
    }
}
