pub mod build;
pub mod lists;
pub mod types;
pub mod write;

pub use build::{WebLibrary, UNKNOWN_ALBUM, UNKNOWN_ARTIST};
pub use lists::{
    album_list, artist_list, track_list, ALBUMS_FILE, ARTISTS_FILE, TRACKS_FILE,
};
pub use types::{AlbumIndex, ArtistIndex, LibraryStats, Metadata, TrackChunk, WebTrack};
pub use write::{write_json, write_web_data};
