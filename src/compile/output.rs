use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use super::Compilation;

/// Sibling temp path used for write-then-rename.
pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

/// Write the deduplicated corpus as CSV: one header row with the full
/// schema, then one row per record, provenance last.
#[tracing::instrument(level = "info", skip(path, compilation), fields(path = %path.as_ref().display()))]
pub fn write_compiled_csv<P: AsRef<Path>>(path: P, compilation: &Compilation) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    // write to a tmp file, then rename over the target
    let tmp_path = temp_path(path);
    {
        let mut wtr = WriterBuilder::new()
            .from_path(&tmp_path)
            .with_context(|| format!("creating {}", tmp_path.display()))?;
        wtr.write_record(compilation.schema.all_columns())?;
        for row in &compilation.rows {
            wtr.write_record(compilation.schema.render_row(row))
                .with_context(|| format!("writing {}:{}", row.source_file, row.line_number))?;
        }
        wtr.flush().context("flushing CSV")?;
    }
    fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {} -> {}", tmp_path.display(), path.display()))?;

    info!(rows = compilation.rows.len(), "wrote compiled CSV");
    Ok(())
}

/// Load a compiled CSV back as column → value maps, in file order.
pub fn read_compiled_csv<P: AsRef<Path>>(path: P) -> Result<Vec<HashMap<String, String>>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers = rdr.headers()?.clone();

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("CSV parse error in {} at record {}", path.display(), idx))?;
        let row = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}
