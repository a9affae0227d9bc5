pub mod detect;
pub mod types;
pub mod unify;

pub use detect::{DetectorConfig, ExportHeaderDetector, HeaderDetector, KNOWN_HEADER_LABELS};
pub use types::{
    CanonicalRow, ColumnSchema, FormatKind, FormatVerdict, CANONICAL_COLUMNS, LINE_NUMBER_COLUMN,
    PROVENANCE_COLUMNS, SOURCE_FILE_COLUMN,
};
pub use unify::unify_columns;
