// src/schema/types.rs

use serde::Serialize;
use std::fmt;

use crate::extract::RawRecord;

/// Provenance column holding the originating file name.
pub const SOURCE_FILE_COLUMN: &str = "_source_file";
/// Provenance column holding the 1-based line number within that file.
pub const LINE_NUMBER_COLUMN: &str = "_line_number";
pub const PROVENANCE_COLUMNS: [&str; 2] = [SOURCE_FILE_COLUMN, LINE_NUMBER_COLUMN];

/// The export's own column order. Used verbatim for files without a header
/// row, and as the preferred leading order of the unified schema.
pub const CANONICAL_COLUMNS: [&str; 26] = [
    "Name",
    "Artist",
    "Composer",
    "Album",
    "Grouping",
    "Genre",
    "Size",
    "Time",
    "Disc Number",
    "Disc Count",
    "Track Number",
    "Track Count",
    "Year",
    "Date Modified",
    "Date",
    "Date Added",
    "Bit Rate",
    "Sample Rate",
    "Volume Adjustment",
    "Kind",
    "Equalizer",
    "Comments",
    "Play Count",
    "Last Played",
    "My Rating",
    "Location",
];

/// How the first line of an export file is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatVerdict {
    /// Every line is data; columns come from [`CANONICAL_COLUMNS`].
    NoHeader,
    /// Line 1 holds `header_len` column names, data starts on line 2.
    SeparateHeader { header_len: usize },
    /// Line 1 holds `header_len` column names immediately followed by the
    /// fields of the first data row.
    InlineHeaderAndData { header_len: usize },
}

impl FormatVerdict {
    /// Number of leading fields of line 1 that are column names.
    pub fn header_len(&self) -> usize {
        match self {
            FormatVerdict::NoHeader => 0,
            FormatVerdict::SeparateHeader { header_len }
            | FormatVerdict::InlineHeaderAndData { header_len } => *header_len,
        }
    }

    pub fn has_header(&self) -> bool {
        !matches!(self, FormatVerdict::NoHeader)
    }

    pub fn kind(&self) -> FormatKind {
        match self {
            FormatVerdict::NoHeader => FormatKind::NoHeader,
            FormatVerdict::SeparateHeader { .. } => FormatKind::SeparateHeader,
            FormatVerdict::InlineHeaderAndData { .. } => FormatKind::HeaderPlusData,
        }
    }
}

/// Per-file layout label used for tallies and the validation report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FormatKind {
    HeaderPlusData,
    SeparateHeader,
    NoHeader,
    /// The first line could not be read at all.
    Unknown,
}

impl FormatKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatKind::HeaderPlusData => "header+data",
            FormatKind::SeparateHeader => "separate_header",
            FormatKind::NoHeader => "no_header",
            FormatKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A record laid out densely against a [`ColumnSchema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRow {
    /// One value per content column, in schema order.
    pub values: Vec<String>,
    pub source_file: String,
    pub line_number: usize,
}

impl CanonicalRow {
    /// The values that take part in duplicate detection.
    pub fn content(&self) -> &[String] {
        &self.values
    }
}

/// Ordered, unique column names shared by the whole corpus. The two
/// provenance columns are always last and are not stored in `content`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    content: Vec<String>,
}

impl ColumnSchema {
    /// Build a schema from content column names; provenance names are
    /// dropped from the input since they are always appended.
    pub fn new<I, S>(content: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = std::collections::HashSet::new();
        let content = content
            .into_iter()
            .map(Into::into)
            .filter(|c: &String| !PROVENANCE_COLUMNS.contains(&c.as_str()))
            .filter(|c| seen.insert(c.clone()))
            .collect();
        Self { content }
    }

    pub fn content_columns(&self) -> &[String] {
        &self.content
    }

    /// Content columns followed by the provenance columns.
    pub fn all_columns(&self) -> Vec<String> {
        self.content
            .iter()
            .cloned()
            .chain(PROVENANCE_COLUMNS.iter().map(|c| c.to_string()))
            .collect()
    }

    /// Total column count including provenance.
    pub fn len(&self) -> usize {
        self.content.len() + PROVENANCE_COLUMNS.len()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        match column {
            SOURCE_FILE_COLUMN => Some(self.content.len()),
            LINE_NUMBER_COLUMN => Some(self.content.len() + 1),
            _ => self.content.iter().position(|c| c == column),
        }
    }

    /// Lay a sparse record out against this schema; absent columns become "".
    pub fn reindex(&self, record: &RawRecord) -> CanonicalRow {
        let values = self
            .content
            .iter()
            .map(|col| record.fields.get(col).cloned().unwrap_or_default())
            .collect();
        CanonicalRow {
            values,
            source_file: record.source_file.clone(),
            line_number: record.line_number,
        }
    }

    /// Full output row including provenance, `len()` fields long.
    pub fn render_row(&self, row: &CanonicalRow) -> Vec<String> {
        let mut out = Vec::with_capacity(self.len());
        out.extend(row.values.iter().cloned());
        out.resize(self.content.len(), String::new());
        out.push(row.source_file.clone());
        out.push(row.line_number.to_string());
        out
    }
}
