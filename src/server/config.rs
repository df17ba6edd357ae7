use super::RequestsLoggingLevel;
use crate::config::DoppelgangerMode;
use crate::llm::GenerationOptions;
use crate::spotify::auth::SPOTIFY_ACCOUNTS_BASE;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub metrics_port: u16,
    pub frontend_dir_path: Option<String>,
    pub doppelganger_mode: DoppelgangerMode,
    pub generation: GenerationOptions,
    /// Base of the consent page the login route redirects to.
    pub accounts_base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 3001,
            metrics_port: 9091,
            frontend_dir_path: None,
            doppelganger_mode: DoppelgangerMode::Generated,
            generation: GenerationOptions::default(),
            accounts_base_url: SPOTIFY_ACCOUNTS_BASE.to_string(),
        }
    }
}
