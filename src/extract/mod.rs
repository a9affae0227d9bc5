// src/extract/mod.rs
pub mod read;

use std::{collections::HashMap, path::Path};
use tracing::{debug, warn};

use crate::schema::{FormatKind, FormatVerdict, HeaderDetector, CANONICAL_COLUMNS};
pub use read::{read_export_text, split_lines};

/// One data line of an export file, keyed by the column names that file
/// declares (or the fallback columns when it declares none).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub fields: HashMap<String, String>,
    /// File name (not the full path) the record was read from.
    pub source_file: String,
    /// 1-based physical line number within that file.
    pub line_number: usize,
}

/// The parse of one file's text.
#[derive(Debug, Clone)]
pub struct ParsedExport {
    pub verdict: FormatVerdict,
    /// Tab-separated field count of the first non-blank line, trimmed.
    pub field_count: usize,
    /// Column names applied to every data row of the file.
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

/// Everything the pipeline learns from a single input file.
#[derive(Debug, Clone)]
pub struct FileExtract {
    pub file_name: String,
    pub format: FormatKind,
    pub field_count: usize,
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
    /// Human-readable faults; a non-empty list means the file contributed
    /// no records.
    pub errors: Vec<String>,
}

/// Build a record by zipping `values` positionally against `headers`.
/// Short rows are padded with "", extra trailing values are dropped.
fn build_record<'a, I>(headers: &[String], values: I, source_file: &str, line_number: usize) -> RawRecord
where
    I: IntoIterator<Item = &'a str>,
{
    let mut values = values.into_iter();
    let fields = headers
        .iter()
        .map(|h| (h.clone(), values.next().unwrap_or("").to_string()))
        .collect();
    RawRecord {
        fields,
        source_file: source_file.to_string(),
        line_number,
    }
}

/// Parse the text of one export file according to the layout `detector`
/// reports for its first non-blank line. Blank lines never produce records;
/// line numbers stay physical.
pub fn parse_export(file_name: &str, text: &str, detector: &dyn HeaderDetector) -> ParsedExport {
    let lines: Vec<&str> = split_lines(text).collect();
    let first = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let first_line = lines.get(first).copied().unwrap_or("");
    let first_fields: Vec<&str> = first_line.split('\t').collect();
    let verdict = detector.detect(first_line);

    let mut records = Vec::new();
    let (headers, data_start): (Vec<String>, usize) = match verdict {
        FormatVerdict::NoHeader => (
            CANONICAL_COLUMNS.iter().map(|c| c.to_string()).collect(),
            first,
        ),
        FormatVerdict::SeparateHeader { header_len } => (
            first_fields.iter().take(header_len).map(|f| f.to_string()).collect(),
            first + 1,
        ),
        FormatVerdict::InlineHeaderAndData { header_len } => {
            let headers: Vec<String> = first_fields
                .iter()
                .take(header_len)
                .map(|f| f.to_string())
                .collect();
            let payload = first_fields.iter().skip(header_len).copied();
            records.push(build_record(&headers, payload, file_name, first + 1));
            (headers, first + 1)
        }
    };

    for (idx, line) in lines.iter().enumerate().skip(data_start) {
        if line.trim().is_empty() {
            continue;
        }
        records.push(build_record(&headers, line.split('\t'), file_name, idx + 1));
    }

    debug!(
        file = file_name,
        format = %verdict.kind(),
        columns = headers.len(),
        records = records.len(),
        "parsed export"
    );

    ParsedExport {
        verdict,
        // surrounding whitespace does not count toward the reported width
        field_count: first_line.trim().split('\t').count(),
        headers,
        records,
    }
}

/// Read and parse one file. Any read failure is captured in
/// [`FileExtract::errors`] and leaves the file without records.
#[tracing::instrument(level = "debug", skip(path, detector), fields(path = %path.as_ref().display()))]
pub fn extract_file<P: AsRef<Path>>(path: P, detector: &dyn HeaderDetector) -> FileExtract {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match read_export_text(path) {
        Ok(text) => {
            let parsed = parse_export(&file_name, &text, detector);
            FileExtract {
                file_name,
                format: parsed.verdict.kind(),
                field_count: parsed.field_count,
                headers: parsed.headers,
                records: parsed.records,
                errors: Vec::new(),
            }
        }
        Err(e) => {
            warn!(file = %file_name, error = %e, "unreadable export");
            FileExtract {
                errors: vec![format!("Error reading {}: {:#}", file_name, e)],
                file_name,
                format: FormatKind::Unknown,
                field_count: 0,
                headers: Vec::new(),
                records: Vec::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ExportHeaderDetector;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    fn parse(text: &str) -> ParsedExport {
        parse_export("lib.txt", text, &ExportHeaderDetector::default())
    }

    #[test]
    fn inline_header_yields_embedded_first_row() {
        let text = "Name\tArtist\tAlbum\tGenre\tSize\tTime\tLocation\tSong A\tArtist A\tAlbum A\tRock\t1000\t200\tfile:///a\n\
                    Song B\tArtist B\tAlbum B\tPop\t2000\t300\tfile:///b\n";
        let parsed = parse(text);
        assert_eq!(
            parsed.verdict,
            FormatVerdict::InlineHeaderAndData { header_len: 7 }
        );
        assert_eq!(parsed.field_count, 14);
        assert_eq!(
            parsed.headers,
            vec!["Name", "Artist", "Album", "Genre", "Size", "Time", "Location"]
        );
        assert_eq!(parsed.records.len(), 2);

        let first = &parsed.records[0];
        assert_eq!(first.line_number, 1);
        assert_eq!(first.fields["Name"], "Song A");
        assert_eq!(first.fields["Location"], "file:///a");

        let second = &parsed.records[1];
        assert_eq!(second.line_number, 2);
        assert_eq!(second.fields["Genre"], "Pop");
        assert_eq!(second.source_file, "lib.txt");
    }

    #[test]
    fn separate_header_starts_data_on_line_two() {
        let text = "Name\tArtist\tAlbum\tGenre\tYear\tLocation\n\nSong\tBand\tRecord\n\tX\t\t\t\t\t\n";
        let parsed = parse(text);
        assert_eq!(parsed.verdict, FormatVerdict::SeparateHeader { header_len: 6 });
        assert_eq!(parsed.records.len(), 2);

        let short = &parsed.records[0];
        assert_eq!(short.line_number, 3);
        assert_eq!(short.fields["Album"], "Record");
        assert_eq!(short.fields["Year"], "");
        assert_eq!(short.fields["Location"], "");

        assert_eq!(parsed.records[1].line_number, 4);
        assert_eq!(parsed.records[1].fields["Artist"], "X");
    }

    #[test]
    fn unvalidated_header_names_are_kept_verbatim() {
        let text = "Name\tArtist\tAlbum\tGenre\tYear\tWork\tLocation\nA\tB\tC\tD\t1999\tOp. 9\tfile:///c\n";
        let parsed = parse(text);
        assert!(parsed.headers.contains(&"Work".to_string()));
        assert_eq!(parsed.records[0].fields["Work"], "Op. 9");
    }

    #[test]
    fn headerless_file_uses_fallback_columns() {
        let mut wide: Vec<String> = (0..30).map(|i| format!("v{i}")).collect();
        wide[0] = "Song".into();
        let text = format!("{}\r\nOnly\tTwo\r\n", wide.join("\t"));
        let parsed = parse(&text);
        assert_eq!(parsed.verdict, FormatVerdict::NoHeader);
        assert_eq!(parsed.headers.len(), 26);
        assert_eq!(parsed.records.len(), 2);

        let first = &parsed.records[0];
        assert_eq!(first.line_number, 1);
        assert_eq!(first.fields.len(), 26);
        assert_eq!(first.fields["Name"], "Song");
        // 26th value lands in Location, the rest are dropped
        assert_eq!(first.fields["Location"], "v25");

        let second = &parsed.records[1];
        assert_eq!(second.fields["Artist"], "Two");
        assert_eq!(second.fields["Composer"], "");
    }

    #[test]
    fn leading_blank_lines_do_not_hide_the_header() {
        let text = "\n  \nName\tArtist\tAlbum\tGenre\tYear\tLocation\nSong A\tBand\tRec\n";
        let parsed = parse(text);
        assert_eq!(parsed.verdict, FormatVerdict::SeparateHeader { header_len: 6 });
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].line_number, 4);
        assert_eq!(parsed.records[0].fields["Name"], "Song A");
    }

    #[test]
    fn bare_cr_files_parse_like_lf_files() {
        let text = "Name\tArtist\tAlbum\tGenre\tYear\tLocation\rSong A\tBand\tRec\rSong B\tBand\tRec\r";
        let parsed = parse(text);
        assert_eq!(parsed.verdict, FormatVerdict::SeparateHeader { header_len: 6 });
        assert_eq!(parsed.headers.last().map(String::as_str), Some("Location"));
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[1].line_number, 3);
        assert_eq!(parsed.records[1].fields["Name"], "Song B");
    }

    #[test]
    fn trailing_tab_is_not_counted_as_a_field() {
        let parsed = parse("Name\tArtist\tAlbum\tGenre\tYear\tLocation\t\nA\tB\n");
        assert_eq!(parsed.field_count, 6);
        assert_eq!(parsed.verdict, FormatVerdict::SeparateHeader { header_len: 6 });
    }

    #[test]
    fn empty_text_yields_no_records() {
        let parsed = parse("");
        assert_eq!(parsed.verdict, FormatVerdict::NoHeader);
        assert!(parsed.records.is_empty());
        assert!(parse("\n  \n").records.is_empty());
    }

    #[test]
    fn extract_file_reports_unreadable_files() -> Result<()> {
        let dir = tempdir()?;
        let detector = ExportHeaderDetector::default();

        // a directory cannot be read as a file
        let bogus = dir.path().join("folder.txt");
        fs::create_dir(&bogus)?;
        let out = extract_file(&bogus, &detector);
        assert_eq!(out.format, FormatKind::Unknown);
        assert!(out.records.is_empty());
        assert_eq!(out.errors.len(), 1);
        assert!(out.errors[0].starts_with("Error reading folder.txt"));

        let good = dir.path().join("good.txt");
        fs::write(&good, b"Song\tBand\xff\n")?;
        let out = extract_file(&good, &detector);
        assert!(out.errors.is_empty());
        assert_eq!(out.file_name, "good.txt");
        assert_eq!(out.records[0].fields["Artist"], "Band\u{FFFD}");
        Ok(())
    }
}
