// src/web/types.rs

use serde::Serialize;

/// One browsable track, as served to the static site.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebTrack {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub artist_slug: String,
    pub composer: Option<String>,
    pub album: String,
    pub album_slug: String,
    pub grouping: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i64>,
    pub size: i64,
    pub duration: i64,
    pub duration_formatted: String,
    pub bit_rate: Option<i64>,
    pub sample_rate: Option<i64>,
    pub track_number: Option<i64>,
    pub track_count: Option<i64>,
    pub disc_number: Option<i64>,
    pub disc_count: Option<i64>,
    pub play_count: i64,
    pub last_played: Option<String>,
    pub rating: i64,
    pub date_added: Option<String>,
    pub date_modified: Option<String>,
    pub location: Option<String>,
    pub kind: Option<String>,
    pub volume_adjustment: Option<i64>,
    pub equalizer: Option<String>,
    pub comments: Option<String>,
}

/// A fixed-size page of tracks; `chunk` is 1-based.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackChunk<'a> {
    pub chunk: usize,
    pub total_chunks: usize,
    pub count: usize,
    pub tracks: &'a [WebTrack],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistIndexEntry {
    pub slug: String,
    pub name: String,
    pub album_count: usize,
    pub track_count: usize,
    pub albums: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistIndex {
    pub total: usize,
    pub artists: Vec<ArtistIndexEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumIndexEntry {
    pub slug: String,
    pub name: String,
    pub artist_count: usize,
    pub track_count: usize,
    pub artists: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumIndex {
    pub total: usize,
    pub albums: Vec<AlbumIndexEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStats {
    pub total_size_bytes: i64,
    #[serde(rename = "totalSizeGB")]
    pub total_size_gb: f64,
    pub total_duration_seconds: i64,
    pub total_duration_hours: f64,
    pub total_duration_formatted: String,
    pub avg_bit_rate: f64,
    pub tracks_with_play_count: usize,
    pub tracks_with_rating: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub total_tracks: usize,
    pub total_artists: usize,
    pub total_albums: usize,
    pub genres: Vec<String>,
    pub years: Vec<i64>,
    pub stats: LibraryStats,
}
