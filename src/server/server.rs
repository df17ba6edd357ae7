use anyhow::{Context, Result};
use std::time::{Duration, Instant};

use tower_http::services::ServeDir;
use tracing::info;

use axum::{extract::State, middleware, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use super::auth_routes::{callback, login};
use super::insights_routes::{
    doppelganger, listening_timeline, time_spent, time_travel_playlist, top_artists,
    user_music_stats, user_profile,
};
use super::metrics::metrics_handler;
use super::{log_requests, no_store, state::*, ServerConfig};
use crate::config::OAuthSettings;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: state.version.clone(),
    };
    Json(stats)
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        music_api: SharedMusicApi,
        text_generator: OptionalTextGenerator,
        oauth: OAuthSettings,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            music_api,
            text_generator,
            oauth,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

pub fn make_app(
    config: ServerConfig,
    music_api: SharedMusicApi,
    text_generator: OptionalTextGenerator,
    oauth: OAuthSettings,
) -> Router {
    let state = ServerState::new(config.clone(), music_api, text_generator, oauth);

    let api_routes: Router = Router::new()
        .route("/login", get(login))
        .route("/callback", get(callback))
        .route("/doppelganger", get(doppelganger))
        .route("/listening-timeline", get(listening_timeline))
        .route("/time-travel-playlist", get(time_travel_playlist))
        .route("/top-artists", get(top_artists))
        .route("/user-profile", get(user_profile))
        .route("/user-music-stats", get(user_music_stats))
        .route("/time-spent", get(time_spent))
        .layer(middleware::from_fn(no_store))
        .with_state(state.clone());

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    home_router
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(
            config.requests_logging_level,
            log_requests,
        ))
}

pub fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

pub async fn run_server(
    config: ServerConfig,
    music_api: SharedMusicApi,
    text_generator: OptionalTextGenerator,
    oauth: OAuthSettings,
) -> Result<()> {
    let port = config.port;
    let metrics_port = config.metrics_port;
    let app = make_app(config, music_api, text_generator, oauth);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    let metrics_listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;

    info!("Ready to serve at port {}!", port);
    info!("Metrics available at port {}!", metrics_port);

    tokio::try_join!(
        async { axum::serve(listener, app).await.context("Server failed") },
        async {
            axum::serve(metrics_listener, make_metrics_app())
                .await
                .context("Metrics server failed")
        },
    )?;
    Ok(())
}
