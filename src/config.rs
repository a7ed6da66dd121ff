//! Configuration types for catalog generation.
//!
//! All generation behaviour is controlled through [`CatalogConfig`], built via
//! its [`CatalogConfigBuilder`]. The user's row filters live separately in
//! [`FilterSpec`] because they change on every request while the config
//! usually does not.

use crate::error::CatalogError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Configuration for one catalog generation.
///
/// Built via [`CatalogConfig::builder()`] or using
/// [`CatalogConfig::default()`].
///
/// # Example
/// ```rust
/// use sheet2catalog::{CatalogConfig, TrailingImagePolicy};
///
/// let config = CatalogConfig::builder()
///     .fetch_concurrency(4)
///     .trailing_image(TrailingImagePolicy::Keep)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct CatalogConfig {
    /// Worksheet column names the pipeline reads.
    pub columns: ColumnMapping,

    /// How the join treats duplicate style keys and the trailing entry.
    pub join: JoinPolicy,

    /// Number of image downloads in flight at once. Default: 8.
    ///
    /// Output order never depends on this value.
    pub fetch_concurrency: usize,

    /// Per-image HTTP timeout in seconds. Default: 30.
    pub fetch_timeout_secs: u64,

    /// Page geometry of the rendered catalog.
    pub layout: PageLayout,

    /// Receives per-image fetch events. Default: None.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            join: JoinPolicy::default(),
            fetch_concurrency: 8,
            fetch_timeout_secs: 30,
            layout: PageLayout::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("columns", &self.columns)
            .field("join", &self.join)
            .field("fetch_concurrency", &self.fetch_concurrency)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("layout", &self.layout)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn CatalogProgressCallback>"),
            )
            .finish()
    }
}

impl CatalogConfig {
    /// Create a new builder for `CatalogConfig`.
    pub fn builder() -> CatalogConfigBuilder {
        CatalogConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`CatalogConfig`].
#[derive(Debug)]
pub struct CatalogConfigBuilder {
    config: CatalogConfig,
}

impl CatalogConfigBuilder {
    pub fn columns(mut self, columns: ColumnMapping) -> Self {
        self.config.columns = columns;
        self
    }

    pub fn duplicate_keys(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.config.join.duplicate_keys = policy;
        self
    }

    pub fn trailing_image(mut self, policy: TrailingImagePolicy) -> Self {
        self.config.join.trailing_image = policy;
        self
    }

    pub fn fetch_concurrency(mut self, n: usize) -> Self {
        self.config.fetch_concurrency = n;
        self
    }

    pub fn fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.config.fetch_timeout_secs = secs;
        self
    }

    pub fn layout(mut self, layout: PageLayout) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<CatalogConfig, CatalogError> {
        let c = &self.config;
        if c.fetch_concurrency == 0 {
            return Err(CatalogError::InvalidConfig(
                "Fetch concurrency must be ≥ 1".into(),
            ));
        }
        if c.fetch_timeout_secs == 0 {
            return Err(CatalogError::InvalidConfig(
                "Fetch timeout must be ≥ 1 second".into(),
            ));
        }
        if c.layout.image_size <= 0.0 {
            return Err(CatalogError::InvalidConfig(format!(
                "Image size must be positive, got {}",
                c.layout.image_size
            )));
        }
        c.columns.validate()?;
        Ok(self.config)
    }
}

// ── Columns ──────────────────────────────────────────────────────────────

/// Worksheet column names. Defaults match the inventory master sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub product_name: String,
    pub size: String,
    pub site: String,
    pub status: String,
    /// Join key on the inventory side.
    pub style_code: String,
    /// Join key on the image side.
    pub style_key: String,
    pub image_url: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            product_name: "Product List".into(),
            size: "Size".into(),
            site: "Site".into(),
            status: "Status".into(),
            style_code: "Style Code*".into(),
            style_key: "Style Code 1".into(),
            image_url: "image_0".into(),
        }
    }
}

impl ColumnMapping {
    fn validate(&self) -> Result<(), CatalogError> {
        let names = [
            &self.product_name,
            &self.size,
            &self.site,
            &self.status,
            &self.style_code,
            &self.style_key,
            &self.image_url,
        ];
        if names.iter().any(|n| n.trim().is_empty()) {
            return Err(CatalogError::InvalidConfig(
                "Column names must not be empty".into(),
            ));
        }
        if self.style_key == self.image_url {
            return Err(CatalogError::InvalidConfig(format!(
                "Style key and image URL columns must differ (both '{}')",
                self.style_key
            )));
        }
        Ok(())
    }
}

// ── Join policies ────────────────────────────────────────────────────────

/// Join behaviour knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinPolicy {
    pub duplicate_keys: DuplicateKeyPolicy,
    pub trailing_image: TrailingImagePolicy,
}

/// What to do when several image rows share a style key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DuplicateKeyPolicy {
    /// The first image row with the key wins. (default)
    #[default]
    FirstMatch,
    /// The last image row with the key wins.
    LastMatch,
    /// One catalog entry per matching image row.
    FanOut,
}

impl FromStr for DuplicateKeyPolicy {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" | "first-match" => Ok(Self::FirstMatch),
            "last" | "last-match" => Ok(Self::LastMatch),
            "fan-out" | "fanout" | "all" => Ok(Self::FanOut),
            other => Err(CatalogError::InvalidConfig(format!(
                "Unknown duplicate-key policy '{other}' (expected first, last or fan-out)"
            ))),
        }
    }
}

/// Whether the last joined entry keeps its image URL.
///
/// The inventory tool this crate replaces always lost the final image link
/// before fetching. `Keep` fixes that; `DropLast` approximates the old output
/// by rendering the last page without its image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrailingImagePolicy {
    /// Every entry keeps its URL. (default)
    #[default]
    Keep,
    /// The last entry's URL is discarded.
    DropLast,
}

// ── Filters ──────────────────────────────────────────────────────────────

/// Warehouse city selectable in the location filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    Mumbai,
    Delhi,
}

impl Location {
    /// Prefix a site code must carry to belong to this city.
    pub fn site_prefix(self) -> &'static str {
        match self {
            Location::Mumbai => "BOM",
            Location::Delhi => "DEL",
        }
    }

    /// Lenient parse: unknown labels mean "no location filter".
    pub fn from_label(label: &str) -> Option<Self> {
        label.parse().ok()
    }
}

impl FromStr for Location {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mumbai" => Ok(Location::Mumbai),
            "delhi" => Ok(Location::Delhi),
            other => Err(CatalogError::InvalidConfig(format!(
                "Unknown location '{other}' (expected Mumbai or Delhi)"
            ))),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Mumbai => f.write_str("Mumbai"),
            Location::Delhi => f.write_str("Delhi"),
        }
    }
}

/// User-selected row predicates, AND-combined. Empty fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Case-insensitive substring of the product name.
    pub product_name_contains: Option<String>,
    /// Exact size.
    pub size: Option<String>,
    pub location: Option<Location>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product_name_contains(mut self, needle: impl Into<String>) -> Self {
        self.product_name_contains = Some(needle.into());
        self
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the location from a selector label. Labels other than Mumbai or
    /// Delhi (such as "All") clear the location filter.
    pub fn location_label(mut self, label: &str) -> Self {
        self.location = Location::from_label(label);
        self
    }
}

// ── Layout ───────────────────────────────────────────────────────────────

/// Page geometry in PDF points (1/72 inch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub font_size: f32,
    /// Left edge of every text line.
    pub text_x: f32,
    /// Baselines of the product, size and site lines.
    pub text_lines_y: [f32; 3],
    /// Lower-left corner of the image box.
    pub image_origin: (f32, f32),
    /// Width and height of the image box.
    pub image_size: f32,
}

impl Default for PageLayout {
    /// US letter, Helvetica 12, image box 200 × 200 at (100, 100).
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            font_size: 12.0,
            text_x: 100.0,
            text_lines_y: [700.0, 680.0, 660.0],
            image_origin: (100.0, 100.0),
            image_size: 200.0,
        }
    }
}
