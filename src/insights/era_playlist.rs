//! Decade playlist built from layered search strategies.

use tracing::{debug, info, warn};

use super::taste::{collect_genres, TASTE_SAMPLE_LIMIT};
use super::tracks::TrackSummary;
use crate::spotify::{MusicApi, SpotifyError, TimeRange, Track};

/// Genres accepted as search seeds, matched by substring.
pub const VALID_SEED_GENRES: &[&str] = &[
    "rap",
    "hip-hop",
    "pop",
    "rock",
    "soul",
    "jazz",
    "disco",
    "punk",
    "metal",
    "classical",
    "country",
    "indie",
    "electronic",
    "dance",
];

pub const MAX_USER_SEED_GENRES: usize = 3;
pub const PLAYLIST_SIZE: usize = 20;
pub const RELEASE_YEAR_SLACK: i32 = 5;

const GENRE_SEARCH_LIMIT: u32 = 20;
const BROAD_SEARCH_LIMIT: u32 = 50;
const GENRE_SEARCH_THRESHOLD: usize = 30;
const YEAR_SEARCH_THRESHOLD: usize = 20;
const POPULAR_SEARCH_THRESHOLD: usize = 10;

const DEFAULT_ERA_GENRES: &[&str] = &["pop", "rock"];

/// Genres that defined each decade.
pub fn era_genres(era: &str) -> &'static [&'static str] {
    match era {
        "1960" => &["rock", "pop", "soul", "folk", "jazz"],
        "1970" => &["rock", "disco", "pop", "funk", "soul", "jazz"],
        "1980" => &["pop", "rock", "new-wave", "metal", "hip-hop"],
        "1990" => &["rock", "pop", "grunge", "hip-hop", "r-n-b", "electronic"],
        "2000" => &["pop", "hip-hop", "r-n-b", "rock", "electronic", "indie"],
        "2010" => &["pop", "hip-hop", "edm", "r-n-b", "indie", "trap"],
        _ => DEFAULT_ERA_GENRES,
    }
}

/// A decade such as "1980", covering 1980 through 1989.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Era {
    label: String,
    start: i32,
}

impl Era {
    /// Accepts exactly four ASCII digits.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.len() != 4 || !value.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(Self {
            label: value.to_string(),
            start: value.parse().ok()?,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.start + 9
    }

    fn year_range(&self) -> String {
        format!("{}-{}", self.start(), self.end())
    }

    pub fn accepts_release_year(&self, year: i32) -> bool {
        year >= self.start() - RELEASE_YEAR_SLACK && year <= self.end() + RELEASE_YEAR_SLACK
    }
}

/// User genres that hit the allow-list (at most three), then the era's own
/// genres, without duplicates.
pub fn seed_genres(user_genres: &[String], era: &Era) -> Vec<String> {
    let mut seeds: Vec<String> = user_genres
        .iter()
        .filter(|genre| VALID_SEED_GENRES.iter().any(|valid| genre.contains(valid)))
        .take(MAX_USER_SEED_GENRES)
        .cloned()
        .collect();
    for genre in era_genres(era.label()) {
        if !seeds.iter().any(|seed| seed == genre) {
            seeds.push(genre.to_string());
        }
    }
    seeds
}

/// Deduplicates by id (first position, last value), keeps tracks released
/// around the era and truncates to [`PLAYLIST_SIZE`].
pub fn select_tracks(tracks: Vec<Track>, era: &Era) -> Vec<Track> {
    let mut unique: Vec<Track> = Vec::new();
    for track in tracks {
        let Some(id) = track.id.as_deref() else {
            continue;
        };
        match unique
            .iter()
            .position(|existing| existing.id.as_deref() == Some(id))
        {
            Some(index) => unique[index] = track,
            None => unique.push(track),
        }
    }

    unique
        .into_iter()
        .filter(|track| {
            track
                .album
                .release_year()
                .is_some_and(|year| era.accepts_release_year(year))
        })
        .take(PLAYLIST_SIZE)
        .collect()
}

async fn search_into(
    api: &dyn MusicApi,
    access_token: &str,
    query: &str,
    limit: u32,
    tracks: &mut Vec<Track>,
) {
    debug!("Searching tracks for \"{}\"", query);
    match api.search_tracks(access_token, query, limit).await {
        Ok(found) => tracks.extend(found),
        Err(err) => warn!("Search \"{}\" failed, skipping: {}", query, err),
    }
}

/// Runs the three search strategies. Only the top-artists lookup can fail the
/// whole call; individual searches are skipped on error.
pub async fn build_era_playlist(
    api: &dyn MusicApi,
    access_token: &str,
    era: &Era,
) -> Result<Vec<TrackSummary>, SpotifyError> {
    let artists = api
        .top_artists(access_token, TimeRange::MediumTerm, TASTE_SAMPLE_LIMIT)
        .await?;
    let seeds = seed_genres(&collect_genres(&artists), era);
    debug!("Search genres for {}s: {:?}", era.label(), seeds);

    let mut tracks: Vec<Track> = Vec::new();
    let years = era.year_range();

    for genre in &seeds {
        if tracks.len() >= GENRE_SEARCH_THRESHOLD {
            break;
        }
        let query = format!("genre:{} year:{}", genre, years);
        search_into(api, access_token, &query, GENRE_SEARCH_LIMIT, &mut tracks).await;
    }

    if tracks.len() < YEAR_SEARCH_THRESHOLD {
        let query = format!("year:{}", years);
        search_into(api, access_token, &query, BROAD_SEARCH_LIMIT, &mut tracks).await;
    }

    if tracks.len() < POPULAR_SEARCH_THRESHOLD {
        let query = format!("{}s popular music", era.label());
        search_into(api, access_token, &query, BROAD_SEARCH_LIMIT, &mut tracks).await;
    }

    let selected = select_tracks(tracks, era);
    info!("Selected {} tracks for the {}s", selected.len(), era.label());
    Ok(selected.iter().map(TrackSummary::from).collect())
}
