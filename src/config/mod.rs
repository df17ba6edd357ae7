mod file_config;

pub use file_config::{DoppelgangerConfig, FileConfig};

use crate::llm::DEFAULT_GEMINI_MODEL;
use crate::server::RequestsLoggingLevel;
use crate::spotify::ClientCredentials;
use anyhow::{anyhow, Result};
use clap::ValueEnum;
use serde::Deserialize;

pub const ENV_SPOTIFY_CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
pub const ENV_SPOTIFY_CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";
pub const ENV_SPOTIFY_REDIRECT_URI: &str = "SPOTIFY_REDIRECT_URI";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// How `/api/doppelganger` picks a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoppelgangerMode {
    /// Persona written by the generative text service.
    #[default]
    Generated,
    /// Nearest match in the built-in artist table.
    Static,
}

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub doppelganger_mode: DoppelgangerMode,
    pub gemini_model: String,
    pub upstream_timeout_sec: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            metrics_port: 9091,
            logging_level: RequestsLoggingLevel::Path,
            frontend_dir_path: None,
            doppelganger_mode: DoppelgangerMode::Generated,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            upstream_timeout_sec: 30,
        }
    }
}

/// Secrets, only ever read from the environment.
#[derive(Debug, Clone, Default)]
pub struct EnvSecrets {
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub spotify_redirect_uri: Option<String>,
    pub gemini_api_key: Option<String>,
}

impl EnvSecrets {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            spotify_client_id: get(ENV_SPOTIFY_CLIENT_ID),
            spotify_client_secret: get(ENV_SPOTIFY_CLIENT_SECRET),
            spotify_redirect_uri: get(ENV_SPOTIFY_REDIRECT_URI),
            gemini_api_key: get(ENV_GEMINI_API_KEY),
        }
    }

    /// Names of the variables that are not set.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (ENV_SPOTIFY_CLIENT_ID, self.spotify_client_id.is_none()),
            (ENV_SPOTIFY_CLIENT_SECRET, self.spotify_client_secret.is_none()),
            (ENV_SPOTIFY_REDIRECT_URI, self.spotify_redirect_uri.is_none()),
            (ENV_GEMINI_API_KEY, self.gemini_api_key.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect()
    }
}

/// Spotify application settings. Each handler checks for the values it needs.
#[derive(Debug, Clone, Default)]
pub struct OAuthSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
}

impl OAuthSettings {
    /// All three values, or the name of the first missing one.
    pub fn credentials(&self) -> Result<ClientCredentials, &'static str> {
        Ok(ClientCredentials {
            client_id: self.client_id.clone().ok_or(ENV_SPOTIFY_CLIENT_ID)?,
            client_secret: self.client_secret.clone().ok_or(ENV_SPOTIFY_CLIENT_SECRET)?,
            redirect_uri: self.redirect_uri.clone().ok_or(ENV_SPOTIFY_REDIRECT_URI)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub upstream_timeout_sec: u64,
    pub doppelganger_mode: DoppelgangerMode,
    pub gemini_model: String,

    // Secrets
    pub oauth: OAuthSettings,
    pub gemini_api_key: Option<String>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments, optional TOML file config and
    /// environment secrets. TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>, env: EnvSecrets) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = match file.logging_level {
            Some(s) => parse_logging_level(&s)
                .ok_or_else(|| anyhow!("Invalid logging_level in config file: {}", s))?,
            None => cli.logging_level.clone(),
        };

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());
        let upstream_timeout_sec = file
            .upstream_timeout_sec
            .unwrap_or(cli.upstream_timeout_sec);

        let doppelganger_file = file.doppelganger.unwrap_or_default();
        let doppelganger_mode = match doppelganger_file.mode {
            Some(s) => parse_doppelganger_mode(&s)
                .ok_or_else(|| anyhow!("Invalid doppelganger mode in config file: {}", s))?,
            None => cli.doppelganger_mode,
        };
        let gemini_model = doppelganger_file
            .gemini_model
            .unwrap_or_else(|| cli.gemini_model.clone());

        Ok(Self {
            port,
            metrics_port,
            logging_level,
            frontend_dir_path,
            upstream_timeout_sec,
            doppelganger_mode,
            gemini_model,
            oauth: OAuthSettings {
                client_id: env.spotify_client_id,
                client_secret: env.spotify_client_secret,
                redirect_uri: env.spotify_redirect_uri,
            },
            gemini_api_key: env.gemini_api_key,
        })
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}

fn parse_doppelganger_mode(s: &str) -> Option<DoppelgangerMode> {
    DoppelgangerMode::from_str(s, true).ok()
}
