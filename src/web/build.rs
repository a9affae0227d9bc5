use chrono::{Datelike, Local};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::info;

use super::types::{
    AlbumIndex, AlbumIndexEntry, ArtistIndex, ArtistIndexEntry, LibraryStats, Metadata, WebTrack,
};
use crate::normalize::{
    format_duration, is_valid_name, safe_int, safe_str, sanitize_album_name,
    sanitize_artist_name, sanitize_genre, sanitize_year_in, slugify,
};

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Value of `column` in a compiled row, "" when absent.
pub(crate) fn field<'a>(row: &'a HashMap<String, String>, column: &str) -> &'a str {
    row.get(column).map(String::as_str).unwrap_or("")
}

fn positive(v: i64) -> Option<i64> {
    (v > 0).then_some(v)
}

fn round_to(v: f64, places: i32) -> f64 {
    let m = 10f64.powi(places);
    (v * m).round() / m
}

/// Per-slug accumulator for the artist and album indexes.
#[derive(Debug, Default)]
struct Group {
    /// Display name as first seen.
    name: String,
    related: BTreeSet<String>,
    track_ids: Vec<String>,
}

impl Group {
    fn add(&mut self, name: &str, related: &str, track_id: &str) {
        if self.track_ids.is_empty() {
            self.name = name.to_string();
        }
        self.related.insert(related.to_string());
        self.track_ids.push(track_id.to_string());
    }
}

fn sorted_by_name<T, F: Fn(&T) -> &str>(mut entries: Vec<T>, name: F) -> Vec<T> {
    entries.sort_by_cached_key(|e| name(e).to_lowercase());
    entries
}

/// Everything the static site consumes, derived from compiled rows.
#[derive(Debug, Clone)]
pub struct WebLibrary {
    pub tracks: Vec<WebTrack>,
    pub artists: ArtistIndex,
    pub albums: AlbumIndex,
    pub metadata: Metadata,
}

impl WebLibrary {
    pub fn build(rows: &[HashMap<String, String>]) -> Self {
        Self::build_in(rows, i64::from(Local::now().year()))
    }

    /// Build with an explicit upper bound for accepted years.
    pub fn build_in(rows: &[HashMap<String, String>], current_year: i64) -> Self {
        let mut tracks: Vec<WebTrack> = Vec::new();
        let mut artists: BTreeMap<String, Group> = BTreeMap::new();
        let mut albums: BTreeMap<String, Group> = BTreeMap::new();
        let mut genres = BTreeSet::new();
        let mut years = BTreeSet::new();

        let mut total_size: i64 = 0;
        let mut total_duration: i64 = 0;
        let mut bit_rate_sum: i64 = 0;
        let mut bit_rate_count: i64 = 0;

        for row in rows {
            let name = field(row, "Name").trim();
            if name.is_empty() {
                continue;
            }

            let artist = match sanitize_artist_name(field(row, "Artist")) {
                a if a.is_empty() => UNKNOWN_ARTIST.to_string(),
                a => a,
            };
            let album = match sanitize_album_name(field(row, "Album")) {
                a if a.is_empty() => UNKNOWN_ALBUM.to_string(),
                a => a,
            };
            if !is_valid_name(&artist) || !is_valid_name(&album) {
                continue;
            }

            let genre = sanitize_genre(field(row, "Genre"));
            let year = sanitize_year_in(field(row, "Year"), current_year);
            let size = safe_int(field(row, "Size"));
            let duration = safe_int(field(row, "Time"));
            let bit_rate = safe_int(field(row, "Bit Rate"));
            let volume_adjustment = safe_int(field(row, "Volume Adjustment"));

            let id = format!("track-{:05}", tracks.len());
            let artist_slug = slugify(&artist);
            let album_slug = slugify(&album);

            artists
                .entry(artist_slug.clone())
                .or_default()
                .add(&artist, &album, &id);
            albums
                .entry(album_slug.clone())
                .or_default()
                .add(&album, &artist, &id);

            if let Some(g) = &genre {
                genres.insert(g.clone());
            }
            if let Some(y) = year {
                years.insert(y);
            }
            // numeric fields saturate at i64::MAX, so the totals must too
            total_size = total_size.saturating_add(size);
            total_duration = total_duration.saturating_add(duration);
            if bit_rate > 0 {
                bit_rate_sum = bit_rate_sum.saturating_add(bit_rate);
                bit_rate_count += 1;
            }

            tracks.push(WebTrack {
                id,
                name: name.to_string(),
                artist,
                artist_slug,
                composer: safe_str(field(row, "Composer")),
                album,
                album_slug,
                grouping: safe_str(field(row, "Grouping")),
                genre,
                year,
                size,
                duration,
                duration_formatted: format_duration(duration),
                bit_rate: positive(bit_rate),
                sample_rate: positive(safe_int(field(row, "Sample Rate"))),
                track_number: positive(safe_int(field(row, "Track Number"))),
                track_count: positive(safe_int(field(row, "Track Count"))),
                disc_number: positive(safe_int(field(row, "Disc Number"))),
                disc_count: positive(safe_int(field(row, "Disc Count"))),
                play_count: safe_int(field(row, "Play Count")),
                last_played: safe_str(field(row, "Last Played")),
                rating: safe_int(field(row, "My Rating")),
                date_added: safe_str(field(row, "Date Added")),
                date_modified: safe_str(field(row, "Date Modified")),
                location: safe_str(field(row, "Location")),
                kind: safe_str(field(row, "Kind")),
                volume_adjustment: (volume_adjustment != 0).then_some(volume_adjustment),
                equalizer: safe_str(field(row, "Equalizer")),
                comments: safe_str(field(row, "Comments")),
            });
        }

        let artist_entries = sorted_by_name(
            artists
                .into_iter()
                .map(|(slug, g)| ArtistIndexEntry {
                    slug,
                    name: g.name,
                    album_count: g.related.len(),
                    track_count: g.track_ids.len(),
                    albums: g.related.into_iter().collect(),
                })
                .collect(),
            |e| e.name.as_str(),
        );
        let album_entries = sorted_by_name(
            albums
                .into_iter()
                .map(|(slug, g)| AlbumIndexEntry {
                    slug,
                    name: g.name,
                    artist_count: g.related.len(),
                    track_count: g.track_ids.len(),
                    artists: g.related.into_iter().collect(),
                })
                .collect(),
            |e| e.name.as_str(),
        );

        let avg_bit_rate = if bit_rate_count > 0 {
            bit_rate_sum as f64 / bit_rate_count as f64
        } else {
            0.0
        };
        let total_hours = total_duration as f64 / 3600.0;
        let stats = LibraryStats {
            total_size_bytes: total_size,
            total_size_gb: round_to(total_size as f64 / (1024.0 * 1024.0 * 1024.0), 2),
            total_duration_seconds: total_duration,
            total_duration_hours: round_to(total_hours, 1),
            total_duration_formatted: format!(
                "{}h {}m",
                total_hours.trunc() as i64,
                (total_hours.fract() * 60.0) as i64
            ),
            avg_bit_rate: round_to(avg_bit_rate, 1),
            tracks_with_play_count: tracks.iter().filter(|t| t.play_count > 0).count(),
            tracks_with_rating: tracks.iter().filter(|t| t.rating > 0).count(),
        };

        let metadata = Metadata {
            total_tracks: tracks.len(),
            total_artists: artist_entries.len(),
            total_albums: album_entries.len(),
            genres: genres.into_iter().collect(),
            years: years.into_iter().collect(),
            stats,
        };

        info!(
            tracks = metadata.total_tracks,
            artists = metadata.total_artists,
            albums = metadata.total_albums,
            genres = metadata.genres.len(),
            years = metadata.years.len(),
            "built web library"
        );

        WebLibrary {
            tracks,
            artists: ArtistIndex {
                total: artist_entries.len(),
                artists: artist_entries,
            },
            albums: AlbumIndex {
                total: album_entries.len(),
                albums: album_entries,
            },
            metadata,
        }
    }
}
