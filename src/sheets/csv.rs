//! Local CSV exports of the two worksheets.

use super::{records_from_grid, SpreadsheetSource};
use crate::error::CatalogError;
use crate::model::RawWorkbook;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads the inventory and image worksheets from two CSV files.
///
/// Both files are read as plain grids; the inventory file's first row becomes
/// the record keys, the image file keeps its header row as row 0.
#[derive(Debug, Clone)]
pub struct CsvWorkbookSource {
    inventory_path: PathBuf,
    images_path: PathBuf,
}

impl CsvWorkbookSource {
    pub fn new(inventory_path: impl Into<PathBuf>, images_path: impl Into<PathBuf>) -> Self {
        Self {
            inventory_path: inventory_path.into(),
            images_path: images_path.into(),
        }
    }
}

#[async_trait]
impl SpreadsheetSource for CsvWorkbookSource {
    async fn fetch(&self) -> Result<RawWorkbook, CatalogError> {
        let inventory_path = self.inventory_path.clone();
        let images_path = self.images_path.clone();

        tokio::task::spawn_blocking(move || {
            let inventory = records_from_grid(&read_grid(&inventory_path)?);
            let image_grid = read_grid(&images_path)?;
            Ok::<_, CatalogError>(RawWorkbook {
                inventory,
                image_grid,
            })
        })
        .await
        .map_err(|e| CatalogError::Internal(format!("CSV read task panicked: {e}")))?
    }

    fn describe(&self) -> String {
        format!(
            "CSV files {} + {}",
            self.inventory_path.display(),
            self.images_path.display()
        )
    }
}

/// Read a CSV file as a ragged grid of strings, header included.
pub fn read_grid(path: &Path) -> Result<Vec<Vec<String>>, CatalogError> {
    let to_err = |source: ::csv::Error| CatalogError::CsvRead {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(to_err)?;

    let grid = reader
        .records()
        .map(|r| r.map(|rec| rec.iter().map(str::to_string).collect()))
        .collect::<Result<Vec<Vec<String>>, _>>()
        .map_err(to_err)?;

    debug!("Read {} CSV rows from {}", grid.len(), path.display());
    Ok(grid)
}
