use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::{
    fs,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::info;

use super::build::WebLibrary;
use crate::compile::output::temp_path;
use super::types::TrackChunk;

pub const CHUNKS_DIR: &str = "chunks";
pub const ARTISTS_INDEX_FILE: &str = "artists-index.json";
pub const ALBUMS_INDEX_FILE: &str = "albums-index.json";
pub const METADATA_FILE: &str = "metadata.json";

/// Serialize `value` to `path` via a temp file and rename, creating the
/// parent directory if needed.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let tmp_path = temp_path(path);

    let file = fs::File::create(&tmp_path)
        .with_context(|| format!("creating {}", tmp_path.display()))?;
    let mut writer = BufWriter::new(file);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)
    } else {
        serde_json::to_writer(&mut writer, value)
    }
    .with_context(|| format!("serializing {}", path.display()))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    drop(writer);

    fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {} -> {}", tmp_path.display(), path.display()))?;
    Ok(())
}

/// Number of pages needed for `len` tracks.
pub fn chunk_count(len: usize, chunk_size: usize) -> usize {
    len.div_ceil(chunk_size)
}

/// Emit track pages, both indexes and the metadata summary under `out_dir`.
/// Returns the number of track chunks written.
#[tracing::instrument(level = "info", skip(out_dir, library), fields(dir = %out_dir.display()))]
pub fn write_web_data(out_dir: &Path, library: &WebLibrary, chunk_size: usize) -> Result<usize> {
    if chunk_size == 0 {
        bail!("chunk size must be positive");
    }
    let chunks_dir = out_dir.join(CHUNKS_DIR);
    fs::create_dir_all(&chunks_dir)
        .with_context(|| format!("creating {}", chunks_dir.display()))?;

    let total_chunks = chunk_count(library.tracks.len(), chunk_size);
    info!("writing {} track chunks", total_chunks);
    for (i, tracks) in library.tracks.chunks(chunk_size).enumerate() {
        let chunk = TrackChunk {
            chunk: i + 1,
            total_chunks,
            count: tracks.len(),
            tracks,
        };
        let path = chunks_dir.join(format!("tracks-{:03}.json", i + 1));
        write_json(&path, &chunk, false)?;
        if (i + 1) % 10 == 0 || i + 1 == total_chunks {
            info!("wrote chunk {}/{}", i + 1, total_chunks);
        }
    }

    write_json(&out_dir.join(ARTISTS_INDEX_FILE), &library.artists, true)?;
    info!("wrote {} artists to {}", library.artists.total, ARTISTS_INDEX_FILE);
    write_json(&out_dir.join(ALBUMS_INDEX_FILE), &library.albums, true)?;
    info!("wrote {} albums to {}", library.albums.total, ALBUMS_INDEX_FILE);
    write_json(&out_dir.join(METADATA_FILE), &library.metadata, true)?;
    info!("wrote {}", METADATA_FILE);

    Ok(total_chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn rows(n: usize) -> Vec<HashMap<String, String>> {
        (0..n)
            .map(|i| {
                HashMap::from([
                    ("Name".to_string(), format!("Song {i}")),
                    ("Artist".to_string(), format!("Artist {}", i % 3)),
                    ("Album".to_string(), "Album".to_string()),
                    ("Time".to_string(), "60".to_string()),
                ])
            })
            .collect()
    }

    #[test]
    fn chunks_are_self_describing() -> Result<()> {
        let dir = tempdir()?;
        let library = WebLibrary::build_in(&rows(5), 2024);
        let written = write_web_data(dir.path(), &library, 2)?;
        assert_eq!(written, 3);

        let last: Value = serde_json::from_str(&fs::read_to_string(
            dir.path().join("chunks/tracks-003.json"),
        )?)?;
        assert_eq!(last["chunk"], 3);
        assert_eq!(last["totalChunks"], 3);
        assert_eq!(last["count"], 1);
        assert_eq!(last["tracks"][0]["id"], "track-00004");
        assert_eq!(last["tracks"][0]["durationFormatted"], "1:00");
        assert!(last["tracks"][0]["year"].is_null());

        let artists: Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(ARTISTS_INDEX_FILE))?)?;
        assert_eq!(artists["total"], 3);
        assert_eq!(artists["artists"][0]["albumCount"], 1);

        let meta: Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(METADATA_FILE))?)?;
        assert_eq!(meta["totalTracks"], 5);
        assert_eq!(meta["stats"]["totalDurationSeconds"], 300);
        assert!(meta["stats"].get("totalSizeGB").is_some());
        Ok(())
    }

    #[test]
    fn page_math() {
        assert_eq!(chunk_count(0, 1000), 0);
        assert_eq!(chunk_count(1000, 1000), 1);
        assert_eq!(chunk_count(1001, 1000), 2);
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let library = WebLibrary::build_in(&rows(1), 2024);
        assert!(write_web_data(Path::new("/nonexistent"), &library, 0).is_err());
    }
}
