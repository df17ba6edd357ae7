//! Upstream payloads served by the fakes
//!
//! Shapes follow the Spotify Web API and the Gemini `generateContent`
//! responses closely enough for the server's decoders.

use super::constants::*;
use chrono::{Local, NaiveTime, TimeZone};
use serde_json::{json, Value};

// ============================================================================
// Spotify payloads
// ============================================================================

pub fn user_profile_json() -> Value {
    json!({
        "id": USER_ID,
        "display_name": USER_DISPLAY_NAME,
        "images": [{"url": "https://i.scdn.co/image/user", "height": 300, "width": 300}],
        "followers": {"href": null, "total": 42},
        "country": "IT",
        "product": "premium"
    })
}

fn artist_json(id: &str, name: &str, genres: &[&str], popularity: u32) -> Value {
    json!({
        "id": id,
        "name": name,
        "genres": genres,
        "popularity": popularity,
        "type": "artist"
    })
}

/// Top artists whose genre union, in order, is [`USER_GENRES`].
pub fn top_artists_json() -> Value {
    json!({
        "items": [
            artist_json("artist-1", "Clairo", &["indie pop", "bedroom pop"], 78),
            artist_json("artist-2", "The Strokes", &["rock", "pop"], 75),
            artist_json("artist-3", "Phoebe Bridgers", &["art pop", "indie pop"], 72),
            artist_json("artist-4", "Beach House", &["dream pop"], 70),
        ],
        "total": 4,
        "limit": 10,
        "offset": 0
    })
}

pub fn top_artists_without_genres_json() -> Value {
    json!({
        "items": [
            artist_json("artist-9", "Unknown Local Band", &[], 3),
        ],
        "total": 1
    })
}

pub fn track_json(
    id: &str,
    name: &str,
    artist: &str,
    album: &str,
    release_date: &str,
    duration_ms: u64,
    popularity: u32,
) -> Value {
    json!({
        "id": id,
        "name": name,
        "artists": [{"id": format!("{}-artist", id), "name": artist}],
        "album": {
            "name": album,
            "images": [{"url": format!("https://i.scdn.co/image/{}", id), "height": 640, "width": 640}],
            "release_date": release_date
        },
        "duration_ms": duration_ms,
        "popularity": popularity
    })
}

/// Top tracks: Clairo totals about 6.01 weighted minutes, Phoebe Bridgers 4.6.
pub fn top_tracks_json() -> Value {
    json!({
        "items": [
            track_json("track-1", "Pretty Girl", "Clairo", "Diary 001", "2018-06-01", 180_000, 60),
            track_json("track-2", "Sofia", "Clairo", "Immunity", "2019-08-02", 188_000, 70),
            track_json("track-3", "Motion Sickness", "Phoebe Bridgers", "Stranger in the Alps", "2017-09-22", 230_000, 40),
            track_json("track-4", "Bags", "Clairo", "Immunity", "2019-08-02", 260_000, 80),
        ]
    })
}

/// Features for the first and third top track; the other two ids are
/// unknown upstream and come back as `null`.
pub fn audio_features_json() -> Value {
    json!({
        "audio_features": [
            {"id": "track-1", "danceability": 0.8, "energy": 0.6, "tempo": 118.0},
            null,
            {"id": "track-3", "danceability": 0.4, "energy": 0.2, "tempo": 92.0},
            null
        ]
    })
}

pub fn play_json(track: Value, played_at: &str) -> Value {
    json!({
        "track": track,
        "played_at": played_at,
        "context": null
    })
}

pub fn recently_played_json(plays: Vec<Value>) -> Value {
    json!({ "items": plays, "limit": 50 })
}

pub fn default_recently_played_json() -> Value {
    recently_played_json(vec![
        play_json(
            track_json("track-2", "Sofia", "Clairo", "Immunity", "2019-08-02", 188_000, 70),
            "2024-03-01T09:15:00.000Z",
        ),
        play_json(
            track_json("track-3", "Motion Sickness", "Phoebe Bridgers", "Stranger in the Alps", "2017-09-22", 230_000, 40),
            "2024-03-01T08:40:00.000Z",
        ),
    ])
}

/// RFC 3339 timestamp for today at `hour:minute` in the local timezone.
pub fn local_timestamp_today(hour: u32, minute: u32) -> String {
    let time = NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time");
    let naive = Local::now().date_naive().and_time(time);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .expect("local time exists")
        .to_rfc3339()
}

/// Search results: one track per era edge plus one squarely inside the 1980s.
pub fn search_results_json(query: &str) -> Value {
    let items = if query.contains("1980") {
        vec![
            track_json("era-1", "Just Like Heaven", "The Cure", "Kiss Me", "1987-05-25", 212_000, 80),
            track_json("era-2", "Heart of Glass", "Blondie", "Parallel Lines", "1972-09-23", 275_000, 75),
            track_json("era-3", "Linger", "The Cranberries", "Everybody Else", "1993-03-01", 274_000, 78),
            track_json("era-4", "Wonderwall", "Oasis", "Morning Glory", "1995-10-02", 258_000, 85),
        ]
    } else {
        Vec::new()
    };
    json!({ "tracks": { "items": items, "total": 4 } })
}

pub fn unauthorized_json() -> Value {
    json!({"error": {"status": 401, "message": "The access token expired"}})
}

// ============================================================================
// Generated doppelganger text
// ============================================================================

/// A well-formed generated persona, fenced the way the model tends to reply.
pub fn well_formed_generation() -> String {
    let body = json!({
        "name": "Luna Velvetine",
        "description": "A dreamy bedroom producer who layers hazy synths over diary-like lyrics, recording late at night in a tiny apartment and releasing songs that feel like secrets whispered to a friend.",
        "genres": ["indie pop", "bedroom pop", "dream pop"],
        "audioFeatures": {"danceability": 0.62, "energy": 0.55},
        "culturalReference": "The soundtrack to a coming-of-age film set in a rainy college town",
        "matchingGenres": ["indie pop", "bedroom pop", "art pop"]
    });
    format!("```json\n{}\n```", body)
}

pub fn malformed_generation() -> String {
    "I'm sorry, I can't help with creating a musical persona right now.".to_string()
}
