//! Spotify Insights Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod config;
pub mod insights;
pub mod llm;
pub mod server;
pub mod spotify;

// Re-export commonly used types for convenience
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
pub use spotify::{MusicApi, SpotifyClient};
