//! Domain records shared by every pipeline stage.
//!
//! Spreadsheet rows arrive loosely typed (column name → cell text). The
//! normalizer turns them into the statically declared records below once the
//! required columns are known, so later stages never look up a column by name.

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One inventory row as returned by the spreadsheet: column name → cell text.
pub type RawRecord = BTreeMap<String, String>;

/// Both worksheets exactly as the spreadsheet adapter returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawWorkbook {
    /// First worksheet, record-oriented (header row already applied).
    pub inventory: Vec<RawRecord>,
    /// Second worksheet, grid-oriented: row 0 is the header.
    pub image_grid: Vec<Vec<String>>,
}

/// One physical unit in stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub product_name: String,
    pub size: String,
    /// Warehouse code; the prefix encodes the city (`BOM…`, `DEL…`).
    pub site: String,
    pub status: String,
    /// Join key into the image lookup table. Not unique.
    pub style_code: String,
}

/// Inventory rows in worksheet order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryTable {
    pub rows: Vec<InventoryRow>,
}

impl InventoryTable {
    pub fn new(rows: Vec<InventoryRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct sizes in first-seen order, as offered by the size selector.
    pub fn distinct_sizes(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.rows
            .iter()
            .filter(|r| seen.insert(r.size.as_str()))
            .map(|r| r.size.clone())
            .collect()
    }
}

/// One product style and its raw image link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageLookupRow {
    pub style_key: String,
    /// Raw cell text; may carry a query string, be malformed, or be empty.
    pub image_url: String,
}

/// Image lookup rows in worksheet order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageLookupTable {
    pub rows: Vec<ImageLookupRow>,
}

impl ImageLookupTable {
    pub fn new(rows: Vec<ImageLookupRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A filtered inventory row joined with its image.
///
/// `image` is `None` until [`crate::pipeline::render::zip_images`] attaches the
/// fetched picture, and stays `None` when there was nothing to fetch or the
/// fetch failed.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub row: InventoryRow,
    /// Sanitised image URL; `None` when unmatched, empty, or dropped.
    pub resolved_image_url: Option<String>,
    pub image: Option<DynamicImage>,
}

impl CatalogEntry {
    pub fn new(row: InventoryRow, resolved_image_url: Option<String>) -> Self {
        Self {
            row,
            resolved_image_url,
            image: None,
        }
    }
}
