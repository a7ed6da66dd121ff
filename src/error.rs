//! Error types for the sheet2catalog library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`CatalogError`]: **Fatal**: the catalog cannot be generated at all
//!   (spreadsheet unreachable, a required column is missing, the PDF could
//!   not be written). Returned as `Err(CatalogError)` from the top-level
//!   `generate_catalog*` functions. No partial catalog is ever produced.
//!
//! * [`ImageFetchError`]: **Non-fatal**: a single product image could not be
//!   downloaded or decoded. The entry is still rendered, just without its
//!   picture, and the failure is counted in [`crate::output::CatalogStats`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the sheet2catalog library.
///
/// Image-level failures use [`ImageFetchError`] and never reach this type.
#[derive(Debug, Error)]
pub enum CatalogError {
    // ── Schema errors ─────────────────────────────────────────────────────
    /// A column the pipeline depends on is absent from a table.
    ///
    /// `row` is the 0-indexed data row that lacked the column, or `None` when
    /// the header itself does not declare it.
    #[error("Column '{column}' is missing from the {table} table{}", fmt_row(.row))]
    MissingColumn {
        table: &'static str,
        column: String,
        row: Option<usize>,
    },

    /// The image worksheet has no rows at all, not even a header.
    #[error("Image lookup table is empty: expected a header row declaring the style key and image columns")]
    EmptyImageTable,

    // ── Spreadsheet errors ────────────────────────────────────────────────
    /// The spreadsheet service rejected the credentials (HTTP 401/403).
    #[error("Spreadsheet access denied: {detail}\nCheck that the access token is valid and the sheet is shared with its account.")]
    Auth { detail: String },

    /// No spreadsheet matched the requested name.
    #[error("Spreadsheet '{name}' not found")]
    SpreadsheetNotFound { name: String },

    /// The spreadsheet could not be read for any other reason.
    #[error("Failed to read spreadsheet: {reason}")]
    SpreadsheetAccess { reason: String },

    /// A local CSV export could not be opened or parsed.
    #[error("Failed to read CSV '{path}': {source}")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    // ── Rendering errors ──────────────────────────────────────────────────
    /// Entries and fetched images disagree on length.
    #[error("Cannot pair {entries} catalog entries with {images} images")]
    LengthMismatch { entries: usize, images: usize },

    /// PDF assembly failed.
    #[error("PDF rendering failed: {0}")]
    Render(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output PDF.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// True for errors caused by the shape of the spreadsheet data.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            CatalogError::MissingColumn { .. } | CatalogError::EmptyImageTable
        )
    }
}

fn fmt_row(row: &Option<usize>) -> String {
    match row {
        Some(r) => format!(" (data row {})", r + 1),
        None => String::new(),
    }
}

/// A non-fatal error for a single product image.
///
/// Logged by the fetcher and turned into an absent image; the catalog
/// continues regardless.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum ImageFetchError {
    /// The request never produced a response (bad URL, DNS, TLS, timeout).
    #[error("Image {url}: request failed: {detail}")]
    Transport { url: String, detail: String },

    /// The server answered with a non-success status.
    #[error("Image {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    /// The body was downloaded but is not a decodable image.
    #[error("Image {url}: could not decode body: {detail}")]
    Decode { url: String, detail: String },
}
