use std::collections::HashSet;
use tracing::debug;

use crate::schema::CanonicalRow;

/// Rows left after dropping exact content duplicates.
#[derive(Debug, Clone, Default)]
pub struct Deduplicated {
    pub rows: Vec<CanonicalRow>,
    pub duplicates: usize,
}

/// Drop every row whose content columns equal those of an earlier row.
///
/// Comparison is exact string equality over the content columns only, so two
/// rows differing just in provenance collapse into the first one seen. Input
/// order must be corpus order (files sorted by path, then line order).
pub fn dedupe(rows: Vec<CanonicalRow>) -> Deduplicated {
    let keep: Vec<bool> = {
        let mut seen: HashSet<&[String]> = HashSet::with_capacity(rows.len());
        rows.iter().map(|r| seen.insert(r.content())).collect()
    };

    let total = rows.len();
    let rows: Vec<CanonicalRow> = rows
        .into_iter()
        .zip(keep)
        .filter_map(|(row, keep)| keep.then_some(row))
        .collect();

    let duplicates = total - rows.len();
    debug!(total, duplicates, "deduplicated");
    Deduplicated { rows, duplicates }
}
