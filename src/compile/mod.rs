// src/compile/mod.rs
pub mod dedup;
pub mod discover;
pub mod output;
pub mod report;

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::extract::extract_file;
use crate::schema::{
    unify_columns, CanonicalRow, ColumnSchema, ExportHeaderDetector, FormatKind, HeaderDetector,
    CANONICAL_COLUMNS,
};

pub use dedup::{dedupe, Deduplicated};
pub use discover::discover_export_files;
pub use output::{read_compiled_csv, write_compiled_csv};
pub use report::{render_report, write_report, ValidationReport};

/// Run counters surfaced in the validation report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileStats {
    pub files_found: usize,
    pub files_processed: usize,
    pub files_with_errors: usize,
    pub empty_files: usize,
    pub total_rows: usize,
    pub duplicates_removed: usize,
    pub unique_rows: usize,
    pub unified_fields: usize,
    /// Content columns outside the canonical set.
    pub unknown_fields: usize,
    pub header_plus_data: usize,
    pub separate_header: usize,
    pub no_header: usize,
    pub unknown_format: usize,
}

impl CompileStats {
    fn tally(&mut self, kind: FormatKind) {
        match kind {
            FormatKind::HeaderPlusData => self.header_plus_data += 1,
            FormatKind::SeparateHeader => self.separate_header += 1,
            FormatKind::NoHeader => self.no_header += 1,
            FormatKind::Unknown => self.unknown_format += 1,
        }
    }
}

/// Detected layout of one input file, for the report's per-file table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFormat {
    pub file_name: String,
    pub kind: FormatKind,
    pub field_count: usize,
}

/// The reconciled corpus: one schema, deduplicated rows in corpus order,
/// and everything the report needs.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub schema: ColumnSchema,
    pub rows: Vec<CanonicalRow>,
    pub stats: CompileStats,
    pub file_formats: Vec<FileFormat>,
    pub errors: Vec<String>,
}

impl Compilation {
    /// A run counts as successful only if at least one row survived.
    pub fn succeeded(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Process exit status for the run: 0 on success, 1 when nothing survived.
    pub fn exit_status(&self) -> u8 {
        if self.succeeded() {
            0
        } else {
            1
        }
    }

    /// Rows as column → value maps, provenance included.
    pub fn records(&self) -> Vec<HashMap<String, String>> {
        let columns = self.schema.all_columns();
        self.rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .cloned()
                    .zip(self.schema.render_row(row))
                    .collect()
            })
            .collect()
    }
}

/// Extract, unify and deduplicate `paths` in the given order.
///
/// Files are processed one at a time; unreadable files are recorded in
/// [`Compilation::errors`] and skipped.
#[tracing::instrument(level = "info", skip_all, fields(files = paths.len()))]
pub fn compile_files(paths: &[PathBuf], detector: &dyn HeaderDetector) -> Compilation {
    let mut stats = CompileStats {
        files_found: paths.len(),
        ..CompileStats::default()
    };
    let mut file_formats = Vec::with_capacity(paths.len());
    let mut errors = Vec::new();
    let mut header_sets: Vec<Vec<String>> = Vec::new();
    let mut raw_records = Vec::new();

    for (i, path) in paths.iter().enumerate() {
        if (i + 1) % 50 == 0 {
            info!("processed {}/{} files", i + 1, paths.len());
        }

        let extract = extract_file(path, detector);
        stats.files_processed += 1;
        stats.tally(extract.format);
        file_formats.push(FileFormat {
            file_name: extract.file_name.clone(),
            kind: extract.format,
            field_count: extract.field_count,
        });

        if !extract.errors.is_empty() {
            stats.files_with_errors += 1;
            errors.extend(extract.errors);
        }

        if extract.records.is_empty() {
            stats.empty_files += 1;
        } else {
            stats.total_rows += extract.records.len();
            header_sets.push(extract.headers);
            raw_records.extend(extract.records);
        }
    }
    info!("processed {}/{} files", paths.len(), paths.len());

    let schema = unify_columns(header_sets);
    let canonical: Vec<CanonicalRow> = raw_records.iter().map(|r| schema.reindex(r)).collect();
    drop(raw_records);

    let Deduplicated { rows, duplicates } = dedupe(canonical);
    stats.duplicates_removed = duplicates;
    stats.unique_rows = rows.len();
    stats.unified_fields = schema.len();

    stats.unknown_fields = schema.content_columns().len()
        - CANONICAL_COLUMNS
            .iter()
            .filter(|c| schema.position(c).is_some())
            .count();
    info!(
        rows = stats.total_rows,
        duplicates,
        unique = stats.unique_rows,
        fields = stats.unified_fields,
        unknown_fields = stats.unknown_fields,
        "compiled corpus"
    );
    if !errors.is_empty() {
        warn!("{} file errors", errors.len());
    }

    Compilation {
        schema,
        rows,
        stats,
        file_formats,
        errors,
    }
}

/// Discover every export below `base_dir` and compile them.
pub fn compile_library<S: AsRef<str>>(
    base_dir: &Path,
    excluded: &[S],
    detector: &dyn HeaderDetector,
) -> anyhow::Result<Compilation> {
    info!("searching for export files in {}", base_dir.display());
    let paths = discover_export_files(base_dir, excluded)?;
    info!("found {} export files", paths.len());
    Ok(compile_files(&paths, detector))
}

/// Compile the exports under `config.input_dir` and write both the CSV and
/// the validation report. Both files are written even when no row survived,
/// so a failed run never leaves an older CSV behind.
pub fn run(config: &Config) -> anyhow::Result<Compilation> {
    let detector = ExportHeaderDetector::new(config.detector.clone());
    let output_csv = config.resolve(&config.output_csv);
    let report_path = config.resolve(&config.report_path);

    // a renamed report would otherwise be picked up as an export next run
    let mut excluded = config.excluded_files.clone();
    if let Some(name) = report_path.file_name() {
        excluded.push(name.to_string_lossy().into_owned());
    }

    let compilation = compile_library(&config.input_dir, &excluded, &detector)?;
    if !compilation.succeeded() {
        error!("no data was extracted from any export");
    }

    write_compiled_csv(&output_csv, &compilation)?;
    info!(
        "wrote {} unique rows x {} columns to {}",
        compilation.stats.unique_rows,
        compilation.schema.len(),
        output_csv.display()
    );
    write_report(&report_path, &compilation)?;
    info!("validation report written to {}", report_path.display());
    if !compilation.errors.is_empty() {
        warn!("{} files could not be read; see the report", compilation.errors.len());
    }
    Ok(compilation)
}
