//! Progress-callback trait for per-image fetch events.
//!
//! Inject an [`Arc<dyn CatalogProgressCallback>`] via
//! [`crate::config::CatalogConfigBuilder::progress_callback`] to receive
//! events while product images are downloaded. Fetching is the only slow stage
//! of a generation, so it is the only one that reports progress.
//!
//! # Example
//!
//! ```rust
//! use sheet2catalog::{CatalogProgressCallback, CatalogConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     fetched: Arc<AtomicUsize>,
//! }
//!
//! impl CatalogProgressCallback for CountingCallback {
//!     fn on_image_complete(&self, index: usize, total: usize) {
//!         let done = self.fetched.fetch_add(1, Ordering::SeqCst) + 1;
//!         eprintln!("image {}/{} ({} done)", index + 1, total, done);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     fetched: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = CatalogConfig::builder()
//!     .progress_callback(counter as Arc<dyn CatalogProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the image fetcher as it works through the URL list.
///
/// Implementations must be `Send + Sync`: with `fetch_concurrency > 1` the
/// per-image methods may be called from different tasks in completion order.
/// All methods default to no-ops.
pub trait CatalogProgressCallback: Send + Sync {
    /// Called once before the first request.
    ///
    /// `total` counts every entry, including those without a URL.
    fn on_fetch_start(&self, total: usize) {
        let _ = total;
    }

    /// Called when an image downloaded and decoded.
    ///
    /// `index` is the 0-based catalog position.
    fn on_image_complete(&self, index: usize, total: usize) {
        let _ = (index, total);
    }

    /// Called when an entry ends up without an image (no URL or a failed fetch).
    fn on_image_error(&self, index: usize, total: usize, error: &str) {
        let _ = (index, total, error);
    }

    /// Called once after every entry has been attempted.
    fn on_fetch_complete(&self, total: usize, fetched: usize) {
        let _ = (total, fetched);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl CatalogProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::CatalogConfig`].
pub type ProgressCallback = Arc<dyn CatalogProgressCallback>;
