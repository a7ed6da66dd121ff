//! End-to-end generation entry points.
//!
//! One call runs the whole chain (read sheets → normalize → filter/join →
//! fetch images → render) and either returns a complete PDF or an error.
//! Nothing is shared between calls, so concurrent generations for different
//! users need no coordination.

use crate::config::{CatalogConfig, FilterSpec};
use crate::error::CatalogError;
use crate::model::RawWorkbook;
use crate::output::{CatalogOutput, CatalogStats, EntrySummary};
use crate::pipeline::{fetch, filter, join, normalize, render};
use crate::sheets::SpreadsheetSource;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// File name offered for the finished catalog.
pub const CATALOG_FILE_NAME: &str = "catalog.pdf";
/// MIME type of the finished catalog.
pub const CATALOG_MIME_TYPE: &str = "application/pdf";

/// Read both worksheets from `source` and build the catalog.
///
/// # Errors
/// Returns `Err(CatalogError)` only for fatal problems: the spreadsheet could
/// not be read, a required column is missing, or rendering failed. Images
/// that fail to download are counted in `stats.images_missing` instead.
pub async fn generate_catalog(
    source: &dyn SpreadsheetSource,
    filters: &FilterSpec,
    config: &CatalogConfig,
) -> Result<CatalogOutput, CatalogError> {
    let start = Instant::now();
    info!("Reading {}", source.describe());
    let workbook = source.fetch().await?;
    let mut output = generate_from_workbook(&workbook, filters, config).await?;
    output.stats.total_duration_ms = start.elapsed().as_millis() as u64;
    Ok(output)
}

/// Build the catalog from worksheets that were already read.
pub async fn generate_from_workbook(
    workbook: &RawWorkbook,
    filters: &FilterSpec,
    config: &CatalogConfig,
) -> Result<CatalogOutput, CatalogError> {
    let start = Instant::now();

    // ── Step 1: Normalize ────────────────────────────────────────────────
    let (inventory, images) =
        normalize::normalize(&workbook.inventory, &workbook.image_grid, &config.columns)?;

    // ── Step 2: Filter and join ──────────────────────────────────────────
    let rows_matched = filter::filter_rows(&inventory.rows, filters).len();
    let entries = join::build_catalog(&inventory, &images, filters, &config.join);
    info!(
        "{} catalog entries from {} of {} inventory rows",
        entries.len(),
        rows_matched,
        inventory.len()
    );

    // ── Step 3: Fetch images ─────────────────────────────────────────────
    let urls: Vec<Option<String>> = entries
        .iter()
        .map(|e| e.resolved_image_url.clone())
        .collect();
    let images_requested = urls.iter().filter(|u| u.is_some()).count();

    let client = fetch::image_client(config.fetch_timeout_secs)
        .map_err(|e| CatalogError::Internal(format!("Failed to build HTTP client: {e}")))?;
    let fetch_start = Instant::now();
    let fetched = fetch::fetch_images(
        &client,
        &urls,
        config.fetch_concurrency,
        config.progress_callback.as_ref(),
    )
    .await;
    let fetch_duration_ms = fetch_start.elapsed().as_millis() as u64;

    // ── Step 4: Render ───────────────────────────────────────────────────
    let entries = render::zip_images(entries, fetched)?;
    let layout = config.layout.clone();
    let (pdf, entries) = tokio::task::spawn_blocking(move || {
        render::render_catalog(&entries, &layout).map(|pdf| (pdf, entries))
    })
    .await
    .map_err(|e| CatalogError::Internal(format!("Render task panicked: {e}")))??;

    // ── Step 5: Stats ────────────────────────────────────────────────────
    let images_fetched = entries.iter().filter(|e| e.image.is_some()).count();
    let stats = CatalogStats {
        rows_read: inventory.len(),
        rows_matched,
        images_requested,
        images_fetched,
        images_missing: entries.len() - images_fetched,
        page_count: entries.len(),
        total_duration_ms: start.elapsed().as_millis() as u64,
        fetch_duration_ms,
    };
    info!(
        "Catalog complete: {} pages, {}/{} images, {}ms",
        stats.page_count, stats.images_fetched, stats.images_requested, stats.total_duration_ms
    );

    Ok(CatalogOutput {
        pdf,
        entries: entries.iter().map(EntrySummary::from).collect(),
        stats,
    })
}

/// Generate the catalog and write it to `output_path`.
///
/// Uses atomic write (temp file + rename) so a failed run never leaves a
/// partial PDF behind.
pub async fn generate_catalog_to_file(
    source: &dyn SpreadsheetSource,
    filters: &FilterSpec,
    output_path: impl AsRef<Path>,
    config: &CatalogConfig,
) -> Result<CatalogStats, CatalogError> {
    let output = generate_catalog(source, filters, config).await?;
    write_catalog(output_path.as_ref(), &output.pdf).await?;
    Ok(output.stats)
}

/// Synchronous wrapper around [`generate_catalog`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_catalog_sync(
    source: &dyn SpreadsheetSource,
    filters: &FilterSpec,
    config: &CatalogConfig,
) -> Result<CatalogOutput, CatalogError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CatalogError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(generate_catalog(source, filters, config))
}

/// Sizes present in the inventory, in first-seen order.
///
/// These are the only values worth offering in a size selector.
pub async fn list_sizes(
    source: &dyn SpreadsheetSource,
    config: &CatalogConfig,
) -> Result<Vec<String>, CatalogError> {
    let workbook = source.fetch().await?;
    let (inventory, _) =
        normalize::normalize(&workbook.inventory, &workbook.image_grid, &config.columns)?;
    Ok(inventory.distinct_sizes())
}

/// Write PDF bytes via a temp file and rename, creating parent directories.
pub async fn write_catalog(path: &Path, bytes: &[u8]) -> Result<(), CatalogError> {
    let to_err = |source: std::io::Error| CatalogError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(to_err)?;
    }

    let tmp_path = path.with_extension("pdf.tmp");
    tokio::fs::write(&tmp_path, bytes).await.map_err(to_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(to_err)?;

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
