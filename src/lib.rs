//! # sheet2catalog
//!
//! Turn a spreadsheet of stock into a printable product catalog.
//!
//! The inventory worksheet lists one row per unit in stock; a second worksheet
//! maps each style code to a product photo. This crate filters the inventory
//! by product name, size and warehouse city, joins it to the photos, downloads
//! them, and lays out one letter-size PDF page per unit.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Spreadsheet
//!  │
//!  ├─ 1. Read       Google Sheets API or CSV exports
//!  ├─ 2. Normalize  typed rows, duplicate image columns dropped (first wins)
//!  ├─ 3. Filter     status == "Available" + name / size / location
//!  ├─ 4. Join       style code → image URL, trimmed after ".jpg"
//!  ├─ 5. Fetch      one GET per image; failures leave the page without a picture
//!  └─ 6. Render     lopdf, one page per entry → catalog.pdf
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sheet2catalog::{generate_catalog_to_file, CatalogConfig, CsvWorkbookSource, FilterSpec, Location};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = CsvWorkbookSource::new("inventory.csv", "images.csv");
//!     let filters = FilterSpec::new().size("9").location(Location::Mumbai);
//!     let stats = generate_catalog_to_file(&source, &filters, "catalog.pdf", &CatalogConfig::default()).await?;
//!     eprintln!("{} pages, {} images", stats.page_count, stats.images_fetched);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `sheet2catalog` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod sheets;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    CatalogConfig, CatalogConfigBuilder, ColumnMapping, DuplicateKeyPolicy, FilterSpec,
    JoinPolicy, Location, PageLayout, TrailingImagePolicy,
};
pub use error::{CatalogError, ImageFetchError};
pub use generate::{
    generate_catalog, generate_catalog_sync, generate_catalog_to_file, generate_from_workbook,
    list_sizes, write_catalog, CATALOG_FILE_NAME, CATALOG_MIME_TYPE,
};
pub use model::{
    CatalogEntry, ImageLookupRow, ImageLookupTable, InventoryRow, InventoryTable, RawRecord,
    RawWorkbook,
};
pub use output::{CatalogOutput, CatalogStats, EntrySummary};
pub use pipeline::fetch::{fetch_image, fetch_images};
pub use pipeline::join::{build_catalog, sanitize_image_url};
pub use pipeline::normalize::normalize;
pub use pipeline::render::render_catalog;
pub use progress::{CatalogProgressCallback, NoopProgressCallback, ProgressCallback};
pub use sheets::{CsvWorkbookSource, GoogleSheetsSource, SpreadsheetRef, SpreadsheetSource};
