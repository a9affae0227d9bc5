use std::collections::{BTreeSet, HashSet};
use tracing::debug;

use super::types::{ColumnSchema, CANONICAL_COLUMNS, PROVENANCE_COLUMNS};

/// Merge the header sets seen across all files into one canonical schema.
///
/// Known columns come first in [`CANONICAL_COLUMNS`] order, unknown ones
/// follow sorted by name. The result does not depend on the order in which
/// the sets are supplied.
pub fn unify_columns<I, H, S>(header_sets: I) -> ColumnSchema
where
    I: IntoIterator<Item = H>,
    H: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut union: HashSet<String> = HashSet::new();
    for headers in header_sets {
        for h in headers {
            union.insert(h.as_ref().to_string());
        }
    }

    let preferred: Vec<&str> = CANONICAL_COLUMNS
        .iter()
        .copied()
        .filter(|c| union.contains(*c))
        .collect();

    let remaining: BTreeSet<&str> = union
        .iter()
        .map(String::as_str)
        .filter(|c| !CANONICAL_COLUMNS.contains(c) && !PROVENANCE_COLUMNS.contains(c))
        .collect();

    debug!(
        known = preferred.len(),
        extra = remaining.len(),
        "unified columns"
    );
    ColumnSchema::new(preferred.into_iter().chain(remaining))
}
