use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use spotify_insights_server::config::{AppConfig, CliConfig, DoppelgangerMode, EnvSecrets, FileConfig};
use spotify_insights_server::llm::{
    GeminiProvider, GenerationOptions, TextGenerator, DEFAULT_GEMINI_MODEL,
};
use spotify_insights_server::server::metrics::init_metrics;
use spotify_insights_server::{run_server, MusicApi, RequestsLoggingLevel, ServerConfig, SpotifyClient};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Values in the file override the flags below.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// How the doppelganger endpoint picks a match.
    #[clap(long, value_enum, default_value = "generated")]
    pub doppelganger_mode: DoppelgangerMode,

    /// Gemini model used in generated mode.
    #[clap(long, default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String,

    /// Timeout in seconds for Spotify requests.
    #[clap(long, default_value_t = 30)]
    pub upstream_timeout_sec: u64,
}

impl From<&CliArgs> for CliConfig {
    fn from(args: &CliArgs) -> Self {
        CliConfig {
            port: args.port,
            metrics_port: args.metrics_port,
            logging_level: args.logging_level.clone(),
            frontend_dir_path: args.frontend_dir_path.clone(),
            doppelganger_mode: args.doppelganger_mode,
            gemini_model: args.gemini_model.clone(),
            upstream_timeout_sec: args.upstream_timeout_sec,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}...", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };

    let env = EnvSecrets::from_env();
    for name in env.missing() {
        warn!("{} is not set, endpoints that need it will fail", name);
    }

    let config = AppConfig::resolve(&CliConfig::from(&cli_args), file_config, env)?;

    info!("Initializing metrics...");
    init_metrics();

    let spotify = SpotifyClient::new(config.upstream_timeout_sec)?;
    let accounts_base_url = spotify.accounts_base_url().to_string();
    let music_api: Arc<dyn MusicApi> = Arc::new(spotify);

    let text_generator: Option<Arc<dyn TextGenerator>> = match &config.gemini_api_key {
        Some(key) => {
            info!("Doppelganger generation via Gemini model {}", config.gemini_model);
            Some(Arc::new(GeminiProvider::new(config.gemini_model.clone(), key.clone())))
        }
        None => None,
    };
    if config.doppelganger_mode == DoppelgangerMode::Generated && text_generator.is_none() {
        warn!("Doppelganger mode is generated but no Gemini API key is configured");
    }

    let server_config = ServerConfig {
        requests_logging_level: config.logging_level.clone(),
        port: config.port,
        metrics_port: config.metrics_port,
        frontend_dir_path: config.frontend_dir_path.clone(),
        doppelganger_mode: config.doppelganger_mode,
        generation: GenerationOptions::default(),
        accounts_base_url,
    };

    run_server(server_config, music_api, text_generator, config.oauth).await
}
