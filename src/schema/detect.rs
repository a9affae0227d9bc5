//! Header detection for a single export file.
//!
//! The export tool writes one of three layouts. Which one a file uses is
//! decided from its first line alone by a [`HeaderDetector`]; the default
//! [`ExportHeaderDetector`] counts known column labels near the start of the
//! line and locates the end of the header at the `Location` label.

use serde::Deserialize;
use tracing::trace;

use super::types::FormatVerdict;

/// Labels whose presence marks a line as a header row.
pub const KNOWN_HEADER_LABELS: [&str; 11] = [
    "Name",
    "Artist",
    "Composer",
    "Album",
    "Genre",
    "Size",
    "Time",
    "Track Number",
    "Year",
    "Date",
    "Location",
];

/// The label that closes the header region when present.
const HEADER_TERMINATOR: &str = "Location";

/// Decides the layout of an export file from its first line.
pub trait HeaderDetector {
    fn detect(&self, first_line: &str) -> FormatVerdict;
}

/// Tunables for [`ExportHeaderDetector`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Minimum label matches for a line to count as a header.
    pub min_matches: usize,
    /// How many leading fields are inspected for label matches.
    pub scan_width: usize,
    /// A header line with more than `split + inline_margin` fields also
    /// carries the first data row.
    pub inline_margin: usize,
    /// Upper bound of the split point when no `Location` label is found.
    pub max_fallback_split: usize,
    pub labels: Vec<String>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_matches: 5,
            scan_width: 15,
            inline_margin: 5,
            max_fallback_split: 27,
            labels: KNOWN_HEADER_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Label-counting detector tuned to the media library's tab-separated export.
#[derive(Debug, Clone, Default)]
pub struct ExportHeaderDetector {
    config: DetectorConfig,
}

impl ExportHeaderDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    fn label_matches(&self, fields: &[&str]) -> usize {
        fields
            .iter()
            .take(self.config.scan_width)
            .filter(|f| self.config.labels.iter().any(|l| l == *f))
            .count()
    }

    fn split_point(&self, fields: &[&str]) -> usize {
        match fields.iter().position(|f| *f == HEADER_TERMINATOR) {
            Some(idx) => idx + 1,
            None => self.config.max_fallback_split.min(fields.len() / 2),
        }
    }
}

impl HeaderDetector for ExportHeaderDetector {
    fn detect(&self, first_line: &str) -> FormatVerdict {
        let fields: Vec<&str> = first_line.split('\t').collect();
        let matches = self.label_matches(&fields);

        if matches < self.config.min_matches {
            trace!(matches, "no header");
            return FormatVerdict::NoHeader;
        }

        let header_len = self.split_point(&fields);
        trace!(matches, header_len, fields = fields.len(), "header found");
        if fields.len() > header_len + self.config.inline_margin {
            FormatVerdict::InlineHeaderAndData { header_len }
        } else {
            FormatVerdict::SeparateHeader { header_len }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(line: &str) -> FormatVerdict {
        ExportHeaderDetector::default().detect(line)
    }

    #[test]
    fn inline_header_splits_after_location() {
        let line = "Name\tArtist\tAlbum\tGenre\tSize\tTime\tLocation\tSong A\tArtist A\tAlbum A\tRock\t1000\t200\tfile:///a";
        assert_eq!(
            detect(line),
            FormatVerdict::InlineHeaderAndData { header_len: 7 }
        );
    }

    #[test]
    fn header_alone_on_first_line() {
        let line = "Name\tArtist\tComposer\tAlbum\tGenre\tSize\tTime\tLocation";
        assert_eq!(detect(line), FormatVerdict::SeparateHeader { header_len: 8 });

        // a few trailing extras stay within the inline margin
        let line = "Name\tArtist\tAlbum\tGenre\tYear\tLocation\ta\tb\tc\td\te";
        assert_eq!(detect(line), FormatVerdict::SeparateHeader { header_len: 6 });
    }

    #[test]
    fn fewer_than_five_labels_is_data() {
        assert_eq!(detect("Name\tArtist\tAlbum\tGenre"), FormatVerdict::NoHeader);
        assert_eq!(
            detect("Song\tBand\tRecord\tRock\t123\t200\tfile:///x"),
            FormatVerdict::NoHeader
        );
        assert_eq!(detect(""), FormatVerdict::NoHeader);
    }

    #[test]
    fn labels_past_the_scan_width_do_not_count() {
        let mut fields: Vec<&str> = vec!["x"; 15];
        fields.extend(["Name", "Artist", "Album", "Genre", "Size", "Location"]);
        assert_eq!(detect(&fields.join("\t")), FormatVerdict::NoHeader);
    }

    #[test]
    fn missing_location_falls_back_to_half_the_fields() {
        // 5 labels + 5 values → split at min(27, 10 / 2) = 5, 10 > 5 + 5 is false
        let line = "Name\tArtist\tAlbum\tGenre\tYear\ta\tb\tc\td\te";
        assert_eq!(detect(line), FormatVerdict::SeparateHeader { header_len: 5 });

        // 5 labels + 67 values → split capped at 27, inline payload follows
        let mut fields = vec!["Name", "Artist", "Album", "Genre", "Year"];
        fields.extend(std::iter::repeat("v").take(67));
        assert_eq!(
            detect(&fields.join("\t")),
            FormatVerdict::InlineHeaderAndData { header_len: 27 }
        );
    }

    #[test]
    fn location_is_found_beyond_the_scan_width() {
        let mut fields = vec!["Name", "Artist", "Album", "Genre", "Year"];
        fields.extend(std::iter::repeat("Other").take(15));
        fields.push("Location");
        assert_eq!(
            detect(&fields.join("\t")),
            FormatVerdict::SeparateHeader { header_len: 21 }
        );
    }

    #[test]
    fn custom_threshold_is_honoured() {
        let detector = ExportHeaderDetector::new(DetectorConfig {
            min_matches: 3,
            ..DetectorConfig::default()
        });
        assert_eq!(
            detector.detect("Name\tArtist\tLocation"),
            FormatVerdict::SeparateHeader { header_len: 3 }
        );
    }
}
