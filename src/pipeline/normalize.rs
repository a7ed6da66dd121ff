//! Table normalization: raw worksheet data → typed inventory and image tables.
//!
//! The inventory worksheet arrives record-oriented and only needs its columns
//! checked. The image worksheet arrives as a bare grid whose header may repeat
//! a column name (sheet templates often carry two "Style Code 1" columns). The
//! first occurrence wins; later columns with the same name are dropped, not
//! merged.

use crate::config::ColumnMapping;
use crate::error::CatalogError;
use crate::model::{ImageLookupRow, ImageLookupTable, InventoryRow, InventoryTable, RawRecord};
use std::collections::HashSet;
use tracing::debug;

/// A grid with a de-duplicated header and rows aligned to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DedupedTable {
    /// Build from a raw grid using the first-column-wins rule.
    ///
    /// Short rows are padded with empty cells; cells beyond the header are
    /// ignored.
    pub fn from_grid(grid: &[Vec<String>]) -> Result<Self, CatalogError> {
        let (header, data) = grid.split_first().ok_or(CatalogError::EmptyImageTable)?;

        let mut seen = HashSet::new();
        let kept: Vec<usize> = header
            .iter()
            .enumerate()
            .filter(|(_, name)| seen.insert(name.as_str()))
            .map(|(i, _)| i)
            .collect();

        if kept.len() < header.len() {
            debug!(
                "Dropped {} duplicate image-table column(s)",
                header.len() - kept.len()
            );
        }

        let columns = kept.iter().map(|&i| header[i].clone()).collect();
        let rows = data
            .iter()
            .map(|row| {
                kept.iter()
                    .map(|&i| row.get(i).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }
}

/// Turn both raw worksheets into typed tables.
///
/// # Errors
/// * [`CatalogError::EmptyImageTable`] when the image grid has no header.
/// * [`CatalogError::MissingColumn`] when an inventory record or the image
///   header lacks a mapped column.
pub fn normalize(
    inventory: &[RawRecord],
    image_grid: &[Vec<String>],
    columns: &ColumnMapping,
) -> Result<(InventoryTable, ImageLookupTable), CatalogError> {
    let inventory = normalize_inventory(inventory, columns)?;
    let images = normalize_images(image_grid, columns)?;
    debug!(
        "Normalized {} inventory rows and {} image rows",
        inventory.len(),
        images.len()
    );
    Ok((inventory, images))
}

fn normalize_inventory(
    records: &[RawRecord],
    columns: &ColumnMapping,
) -> Result<InventoryTable, CatalogError> {
    let rows = records
        .iter()
        .enumerate()
        .map(|(i, rec)| -> Result<InventoryRow, CatalogError> {
            let cell = |column: &String| {
                rec.get(column)
                    .cloned()
                    .ok_or_else(|| CatalogError::MissingColumn {
                        table: "inventory",
                        column: column.clone(),
                        row: Some(i),
                    })
            };
            Ok(InventoryRow {
                product_name: cell(&columns.product_name)?,
                size: cell(&columns.size)?,
                site: cell(&columns.site)?,
                status: cell(&columns.status)?,
                style_code: cell(&columns.style_code)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(InventoryTable::new(rows))
}

fn normalize_images(
    grid: &[Vec<String>],
    columns: &ColumnMapping,
) -> Result<ImageLookupTable, CatalogError> {
    let table = DedupedTable::from_grid(grid)?;

    let index_of = |name: &String| {
        table
            .column_index(name)
            .ok_or_else(|| CatalogError::MissingColumn {
                table: "images",
                column: name.clone(),
                row: None,
            })
    };
    let key_idx = index_of(&columns.style_key)?;
    let url_idx = index_of(&columns.image_url)?;

    let rows = table
        .rows
        .iter()
        .map(|r| ImageLookupRow {
            style_key: r[key_idx].clone(),
            image_url: r[url_idx].clone(),
        })
        .collect();

    Ok(ImageLookupTable::new(rows))
}
