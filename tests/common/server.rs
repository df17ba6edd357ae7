//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server wired to its own fake upstreams.

use super::constants::*;
use super::fakes::{FakeMusicApi, FakeTextGenerator};
use spotify_insights_server::config::{DoppelgangerMode, OAuthSettings};
use spotify_insights_server::llm::TextGenerator;
use spotify_insights_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use spotify_insights_server::spotify::MusicApi;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Knobs for [`TestServer::spawn_with`]
pub struct TestServerOptions {
    pub doppelganger_mode: DoppelgangerMode,
    /// `None` simulates a missing Gemini API key
    pub text_generator: Option<Arc<FakeTextGenerator>>,
    pub oauth: OAuthSettings,
    pub music_api: FakeMusicApi,
}

impl Default for TestServerOptions {
    fn default() -> Self {
        Self {
            doppelganger_mode: DoppelgangerMode::Generated,
            text_generator: Some(Arc::new(FakeTextGenerator::well_formed())),
            oauth: full_oauth(),
            music_api: FakeMusicApi::default(),
        }
    }
}

pub fn full_oauth() -> OAuthSettings {
    OAuthSettings {
        client_id: Some(CLIENT_ID.to_string()),
        client_secret: Some(CLIENT_SECRET.to_string()),
        redirect_uri: Some(REDIRECT_URI.to_string()),
    }
}

/// Test server instance with fake upstream services
///
/// When dropped, the server gracefully shuts down.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// The fake Spotify, for asserting on upstream traffic
    pub music_api: Arc<FakeMusicApi>,

    /// The fake generator, if one was configured
    pub text_generator: Option<Arc<FakeTextGenerator>>,

    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a server in generated mode with a well-behaved generator
    pub async fn spawn() -> Self {
        Self::spawn_with(TestServerOptions::default()).await
    }

    /// Spawns a new test server on a random port
    ///
    /// # Panics
    ///
    /// Panics if port binding fails or the server doesn't become ready
    /// within timeout.
    pub async fn spawn_with(options: TestServerOptions) -> Self {
        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            doppelganger_mode: options.doppelganger_mode,
            ..ServerConfig::default()
        };

        let music_api = Arc::new(options.music_api);
        let text_generator = options.text_generator;

        let app = make_app(
            config,
            music_api.clone() as Arc<dyn MusicApi>,
            text_generator
                .clone()
                .map(|generator| generator as Arc<dyn TextGenerator>),
            options.oauth,
        );

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            music_api,
            text_generator,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the / endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }

    /// Number of generation requests the fake generator has served
    pub fn generation_calls(&self) -> usize {
        self.text_generator
            .as_ref()
            .map(|generator| generator.call_count())
            .unwrap_or(0)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
