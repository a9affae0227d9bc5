use anyhow::{Context, Result};
use glob::glob;
use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

/// Find every export file below `base_dir`: `*.txt` files whose name is not
/// in `excluded`, plus anything named `Library.export*`. The result is
/// sorted by path and free of duplicates.
pub fn discover_export_files<S: AsRef<str>>(base_dir: &Path, excluded: &[S]) -> Result<Vec<PathBuf>> {
    let is_excluded = |p: &Path| {
        p.file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| excluded.iter().any(|e| e.as_ref() == n))
    };

    let escaped = glob::Pattern::escape(&base_dir.display().to_string());
    let mut found = BTreeSet::new();
    for pattern in [
        format!("{}/**/*.txt", escaped),
        format!("{}/**/Library.export*", escaped),
    ] {
        for entry in glob(&pattern).with_context(|| format!("bad glob pattern {}", pattern))? {
            match entry {
                Ok(path) if path.is_file() && !is_excluded(&path) => {
                    found.insert(path);
                }
                Ok(path) => debug!(path = %path.display(), "skipping"),
                Err(e) => warn!("unreadable entry while scanning: {}", e),
            }
        }
    }

    Ok(found.into_iter().collect())
}
