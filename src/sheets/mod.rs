//! Spreadsheet sources: where the two raw worksheets come from.
//!
//! A source returns the inventory worksheet as records and the image worksheet
//! as a bare grid ([`RawWorkbook`]). Credentials, if any, are given to the
//! source's constructor; nothing downstream ever sees them.
//!
//! * [`GoogleSheetsSource`]: live Google Sheets via the REST API
//! * [`CsvWorkbookSource`]: two local CSV exports

pub mod csv;
pub mod google;

pub use self::csv::CsvWorkbookSource;
pub use self::google::{GoogleSheetsSource, SpreadsheetRef};

use crate::error::CatalogError;
use crate::model::{RawRecord, RawWorkbook};
use async_trait::async_trait;

/// Anything that can produce both catalog worksheets.
#[async_trait]
pub trait SpreadsheetSource: Send + Sync {
    /// Read the inventory (first) and image lookup (second) worksheets.
    async fn fetch(&self) -> Result<RawWorkbook, CatalogError>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

/// Turn a grid with a header row into records.
///
/// Missing trailing cells become `""`; cells without a header are ignored.
/// A repeated header name keeps the first column's value. An empty grid gives
/// no records.
pub fn records_from_grid(grid: &[Vec<String>]) -> Vec<RawRecord> {
    let Some((header, data)) = grid.split_first() else {
        return Vec::new();
    };

    data.iter()
        .map(|row| {
            let mut rec = RawRecord::new();
            for (i, name) in header.iter().enumerate() {
                rec.entry(name.clone())
                    .or_insert_with(|| row.get(i).cloned().unwrap_or_default());
            }
            rec
        })
        .collect()
}
