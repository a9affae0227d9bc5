use anyhow::{Context, Result};
use std::{fmt, fs, path::Path};

use super::output::temp_path;
use super::Compilation;

const TITLE: &str = "iTunes Export Compilation - Validation Report";

fn rule(ch: char) -> String {
    std::iter::repeat(ch).take(60).collect()
}

/// Plain-text validation report for a finished run.
pub struct ValidationReport<'a>(pub &'a Compilation);

impl fmt::Display for ValidationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let compilation = self.0;
        let stats = &compilation.stats;

        writeln!(f, "{}", TITLE)?;
        writeln!(f, "{}\n", rule('='))?;

        writeln!(f, "STATISTICS\n{}", rule('-'))?;
        writeln!(f, "Files found: {}", stats.files_found)?;
        writeln!(f, "Files processed: {}", stats.files_processed)?;
        writeln!(f, "Files with errors: {}", stats.files_with_errors)?;
        writeln!(f, "Empty files: {}", stats.empty_files)?;
        writeln!(f, "Total rows parsed: {}", stats.total_rows)?;
        writeln!(f, "Duplicate rows removed: {}", stats.duplicates_removed)?;
        writeln!(f, "Unique songs in CSV: {}", stats.unique_rows)?;
        writeln!(f, "Unique fields found: {}", stats.unified_fields)?;
        writeln!(f, "Non-standard fields: {}\n", stats.unknown_fields)?;

        writeln!(f, "FILE FORMAT DETECTION\n{}", rule('-'))?;
        writeln!(f, "Files with header+data on first line: {}", stats.header_plus_data)?;
        writeln!(f, "Files with separate header row: {}", stats.separate_header)?;
        writeln!(f, "Files with no header (data only): {}", stats.no_header)?;
        if stats.unknown_format > 0 {
            writeln!(f, "Files with unreadable first line: {}", stats.unknown_format)?;
        }
        writeln!(f)?;

        writeln!(f, "FIELD NAMES\n{}", rule('-'))?;
        for field in compilation.schema.all_columns() {
            writeln!(f, "  - {}", field)?;
        }
        writeln!(f)?;

        writeln!(f, "FILE FORMAT DETAILS\n{}", rule('-'))?;
        for ff in &compilation.file_formats {
            writeln!(
                f,
                "  {:30} | {:15} | {:3} fields",
                ff.file_name, ff.kind, ff.field_count
            )?;
        }
        writeln!(f)?;

        if compilation.errors.is_empty() {
            writeln!(f, "No errors encountered!")
        } else {
            writeln!(f, "ERRORS\n{}", rule('-'))?;
            for e in &compilation.errors {
                writeln!(f, "  {}", e)?;
            }
            Ok(())
        }
    }
}

pub fn render_report(compilation: &Compilation) -> String {
    ValidationReport(compilation).to_string()
}

/// Write the validation report next to the other outputs.
pub fn write_report<P: AsRef<Path>>(path: P, compilation: &Compilation) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let tmp = temp_path(path);
    fs::write(&tmp, render_report(compilation))
        .with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("renaming {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
