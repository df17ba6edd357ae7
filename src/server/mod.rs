pub mod access_token;
mod auth_routes;
pub mod config;
pub mod error;
mod http_layers;
mod insights_routes;
pub mod metrics;
pub mod server;
pub mod state;

pub use access_token::AccessToken;
pub use config::ServerConfig;
pub use error::ApiError;
pub use http_layers::*;
pub use server::{make_app, make_metrics_app, run_server};
