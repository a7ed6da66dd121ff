//! Result types returned by the generation entry points.

use crate::model::CatalogEntry;
use serde::{Deserialize, Serialize};

/// A finished catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogOutput {
    /// The PDF document. Not serialised; write it with
    /// [`crate::generate::generate_catalog_to_file`] or by hand.
    #[serde(skip)]
    pub pdf: Vec<u8>,
    /// One summary per rendered page, in page order.
    pub entries: Vec<EntrySummary>,
    pub stats: CatalogStats,
}

/// What ended up on one catalog page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub product_name: String,
    pub size: String,
    pub site: String,
    pub style_code: String,
    pub image_url: Option<String>,
    pub has_image: bool,
}

impl From<&CatalogEntry> for EntrySummary {
    fn from(e: &CatalogEntry) -> Self {
        Self {
            product_name: e.row.product_name.clone(),
            size: e.row.size.clone(),
            site: e.row.site.clone(),
            style_code: e.row.style_code.clone(),
            image_url: e.resolved_image_url.clone(),
            has_image: e.image.is_some(),
        }
    }
}

/// Counters and timings for one generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Inventory rows read from the spreadsheet.
    pub rows_read: usize,
    /// Inventory rows that passed the filters. Below `page_count` when
    /// [`crate::config::DuplicateKeyPolicy::FanOut`] splits a row.
    pub rows_matched: usize,
    /// Entries that had a URL to fetch.
    pub images_requested: usize,
    pub images_fetched: usize,
    /// Entries rendered without an image, for any reason.
    pub images_missing: usize,
    pub page_count: usize,
    pub total_duration_ms: u64,
    pub fetch_duration_ms: u64,
}
