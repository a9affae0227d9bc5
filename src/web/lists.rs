//! Flat name lists: every track with its artist and album, every artist
//! with its albums, every album with its artists.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::build::field;
use crate::normalize::{is_valid_name, sanitize_album_name, sanitize_artist_name};

pub const TRACKS_FILE: &str = "tracks.json";
pub const ARTISTS_FILE: &str = "artists.json";
pub const ALBUMS_FILE: &str = "albums.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackEntry {
    pub track: String,
    pub artist: String,
    pub album: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackList {
    pub total_tracks: usize,
    pub tracks: Vec<TrackEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistEntry {
    pub artist: String,
    pub albums: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistList {
    pub total_artists: usize,
    pub artists: Vec<ArtistEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumEntry {
    pub album: String,
    pub artists: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumList {
    pub total_albums: usize,
    pub albums: Vec<AlbumEntry>,
}

/// Named tracks whose artist and album are both valid.
pub fn track_list(rows: &[HashMap<String, String>]) -> TrackList {
    let tracks: Vec<TrackEntry> = rows
        .iter()
        .filter_map(|row| {
            let track = field(row, "Name").trim();
            let artist = sanitize_artist_name(field(row, "Artist"));
            let album = field(row, "Album").trim();
            (!track.is_empty() && is_valid_name(&artist) && is_valid_name(album)).then(|| {
                TrackEntry {
                    track: track.to_string(),
                    artist,
                    album: album.to_string(),
                }
            })
        })
        .collect();
    TrackList {
        total_tracks: tracks.len(),
        tracks,
    }
}

/// Distinct artists, each with its sorted non-empty albums.
pub fn artist_list(rows: &[HashMap<String, String>]) -> ArtistList {
    let mut by_artist: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for row in rows {
        let artist = sanitize_artist_name(field(row, "Artist"));
        if !is_valid_name(&artist) {
            continue;
        }
        let albums = by_artist.entry(artist).or_default();
        let album = field(row, "Album").trim();
        if !album.is_empty() {
            albums.insert(album.to_string());
        }
    }

    let artists: Vec<ArtistEntry> = by_artist
        .into_iter()
        .map(|(artist, albums)| ArtistEntry {
            artist,
            albums: albums.into_iter().collect(),
        })
        .collect();
    ArtistList {
        total_artists: artists.len(),
        artists,
    }
}

/// Distinct albums, each with its sorted non-empty artists.
pub fn album_list(rows: &[HashMap<String, String>]) -> AlbumList {
    let mut by_album: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for row in rows {
        let album = sanitize_album_name(field(row, "Album"));
        if !is_valid_name(&album) {
            continue;
        }
        let artists = by_album.entry(album).or_default();
        let artist = sanitize_artist_name(field(row, "Artist"));
        if !artist.is_empty() {
            artists.insert(artist);
        }
    }

    let albums: Vec<AlbumEntry> = by_album
        .into_iter()
        .map(|(album, artists)| AlbumEntry {
            album,
            artists: artists.into_iter().collect(),
        })
        .collect();
    AlbumList {
        total_albums: albums.len(),
        albums,
    }
}
