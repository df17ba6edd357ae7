//! Aggregations derived from a user's listening data.

pub mod audio_features;
pub mod doppelganger;
pub mod era_playlist;
pub mod taste;
pub mod time_spent;
pub mod timeline;
pub mod tracks;

pub use audio_features::AudioFeatureProfile;
pub use taste::UserTasteProfile;
