// ── Record normalization ──
//
// Reads provider exports and turns each row into a `NetworkRecord`. Rows
// that fail validation are logged and dropped; only an unreadable file
// is an error.

mod aws;
mod azure;
mod generic;
mod table;
mod tags;

use std::path::Path;

use tracing::{info, warn};

use crate::error::CoreError;
use crate::model::{NetworkRecord, Source};

pub use table::{Row, Table};
pub use tags::parse_tags;

/// Load and normalize an export file (`.csv`, `.xlsx`, or `.xls`).
pub fn normalize_file(path: &Path, source: Source) -> Result<Vec<NetworkRecord>, CoreError> {
    if !path.exists() {
        return Err(CoreError::Input {
            path: path.to_path_buf(),
            message: "file not found".into(),
        });
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let table = match extension.as_str() {
        "csv" => Table::read_csv(path)?,
        "xlsx" | "xls" => Table::read_workbook(path)?,
        _ => return Err(CoreError::UnsupportedFormat { extension }),
    };

    info!(path = %path.display(), rows = table.len(), "loaded input");
    Ok(normalize_table(&table, source))
}

/// Normalize every row of `table`, dropping rows that fail validation.
pub fn normalize_table(table: &Table, source: Source) -> Vec<NetworkRecord> {
    let mut records = Vec::with_capacity(table.len());

    for (index, row) in table.rows().enumerate() {
        match normalize_row(row, index, source) {
            Ok(record) => records.push(record),
            Err(e) => warn!(row = index, error = %e, "skipping row"),
        }
    }

    info!(%source, parsed = records.len(), dropped = table.len() - records.len(), "normalized");
    records
}

fn normalize_row(row: Row<'_>, index: usize, source: Source) -> Result<NetworkRecord, CoreError> {
    match source {
        Source::Aws => aws::normalize_row(row),
        Source::Azure => azure::normalize_row(row, index),
        Source::Gcp | Source::Alibaba | Source::Properties | Source::Custom => {
            generic::normalize_row(row, index, source)
        }
    }
}
