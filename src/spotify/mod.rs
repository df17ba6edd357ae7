//! Spotify Web API access: wire models, the [`MusicApi`] seam and its reqwest
//! implementation, plus the authorization-code flow helpers.

pub mod api;
pub mod auth;
pub mod client;
pub mod models;

pub use api::{MusicApi, SpotifyError};
pub use auth::ClientCredentials;
pub use client::SpotifyClient;
pub use models::{
    Artist, PlayHistory, TimeRange, TokenResponse, Track, TrackAudioFeatures, UserProfile,
};
