// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::schema::DetectorConfig;

/// Outputs of the tool itself, never treated as exports.
pub const DEFAULT_EXCLUDED_FILES: [&str; 3] = [
    "validation_report.txt",
    "compiled_itunes_library.csv",
    "compile_itunes_exports.py",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory searched recursively for exports.
    pub input_dir: PathBuf,
    pub output_csv: PathBuf,
    pub report_path: PathBuf,
    /// Destination of chunks, indexes and metadata.
    pub web_dir: PathBuf,
    /// Destination of the flat track, artist and album lists.
    pub data_dir: PathBuf,
    pub chunk_size: usize,
    pub excluded_files: Vec<String>,
    pub detector: DetectorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_csv: PathBuf::from("compiled_itunes_library.csv"),
            report_path: PathBuf::from("validation_report.txt"),
            web_dir: PathBuf::from("web-data"),
            data_dir: PathBuf::from("data"),
            chunk_size: 1000,
            excluded_files: DEFAULT_EXCLUDED_FILES.iter().map(|s| s.to_string()).collect(),
            detector: DetectorConfig::default(),
        }
    }
}

impl Config {
    /// Read a YAML config, or fall back to defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        debug!(?config, "loaded config");
        Ok(config)
    }

    /// Relative paths are taken to live under `input_dir`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.input_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_path_gives_defaults() -> Result<()> {
        let config = Config::load(None)?;
        assert_eq!(config, Config::default());
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.detector.min_matches, 5);
        assert_eq!(config.excluded_files.len(), 3);
        Ok(())
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "input_dir: /music\nchunk_size: 250\ndetector:\n  min_matches: 3\n",
        )?;

        let config = Config::load(Some(&path))?;
        assert_eq!(config.input_dir, PathBuf::from("/music"));
        assert_eq!(config.chunk_size, 250);
        assert_eq!(config.detector.min_matches, 3);
        assert_eq!(config.detector.scan_width, 15);
        assert_eq!(config.web_dir, PathBuf::from("web-data"));
        Ok(())
    }

    #[test]
    fn bad_yaml_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.yaml");
        fs::write(&path, "chunk_size: [not, a, number]\n")?;
        assert!(Config::load(Some(&path)).is_err());
        Ok(())
    }

    #[test]
    fn resolve_relative_to_input() {
        let config = Config {
            input_dir: PathBuf::from("/music"),
            ..Config::default()
        };
        assert_eq!(
            config.resolve(Path::new("out.csv")),
            PathBuf::from("/music/out.csv")
        );
        assert_eq!(config.resolve(Path::new("/tmp/x")), PathBuf::from("/tmp/x"));
    }
}
