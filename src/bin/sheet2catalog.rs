//! CLI binary for sheet2catalog.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `CatalogConfig` / `FilterSpec` and reports the result.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use sheet2catalog::{
    generate_catalog, list_sizes, write_catalog, CatalogConfig, CatalogProgressCallback,
    CsvWorkbookSource, DuplicateKeyPolicy, FilterSpec, GoogleSheetsSource, Location,
    ProgressCallback, SpreadsheetRef, SpreadsheetSource, TrailingImagePolicy, CATALOG_FILE_NAME,
};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Progress bar over image downloads. Slots can finish out of order when
/// fetching concurrently, so only counts are shown.
struct CliProgressCallback {
    bar: ProgressBar,
    missing: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} images  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Fetching");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            missing: AtomicUsize::new(0),
        })
    }
}

impl CatalogProgressCallback for CliProgressCallback {
    fn on_fetch_start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.reset_eta();
    }

    fn on_image_complete(&self, _index: usize, _total: usize) {
        self.bar.inc(1);
    }

    fn on_image_error(&self, index: usize, total: usize, error: &str) {
        self.missing.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg = if error.chars().count() > 80 {
            let cut: String = error.chars().take(79).collect();
            format!("{cut}\u{2026}")
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} Entry {:>3}/{:<3}  {}",
            red("✗"),
            index + 1,
            total,
            dim(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_fetch_complete(&self, total: usize, fetched: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {}/{} images fetched  {}",
            if fetched == total { green("✔") } else { red("⚠") },
            bold(&fetched.to_string()),
            total,
            dim(&format!("({} without image)", self.missing.load(Ordering::SeqCst))),
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Live Google Sheet, size 9 in Mumbai
  sheet2catalog --sheet-name "MNSt | Inventory Master - Active" --size 9 --location mumbai

  # Offline from CSV exports
  sheet2catalog --inventory-csv inventory.csv --images-csv images.csv --name jordan

  # Which sizes are in stock?
  sheet2catalog --sheet-id 1AbC... --list-sizes

  # Reproduce the old tool exactly (last page without image)
  sheet2catalog --sheet-id 1AbC... --drop-last-image

ENVIRONMENT VARIABLES:
  GOOGLE_ACCESS_TOKEN     OAuth bearer token with Sheets (and Drive, for --sheet-name) scope
  RUST_LOG                Override log filter (e.g. sheet2catalog=debug)
"#;

/// Build a PDF product catalog from spreadsheet inventory.
#[derive(Parser, Debug)]
#[command(
    name = "sheet2catalog",
    version,
    about = "Build a PDF product catalog from spreadsheet inventory",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Google spreadsheet ID.
    #[arg(
        long,
        env = "SHEET2CATALOG_SHEET_ID",
        conflicts_with_all = ["sheet_name", "inventory_csv"]
    )]
    sheet_id: Option<String>,

    /// Google spreadsheet title (resolved via Drive search).
    #[arg(long, env = "SHEET2CATALOG_SHEET_NAME", conflicts_with = "inventory_csv")]
    sheet_name: Option<String>,

    /// OAuth access token for the Google APIs.
    #[arg(long, env = "GOOGLE_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Inventory worksheet exported as CSV.
    #[arg(long, requires = "images_csv")]
    inventory_csv: Option<PathBuf>,

    /// Image lookup worksheet exported as CSV.
    #[arg(long, requires = "inventory_csv")]
    images_csv: Option<PathBuf>,

    /// Keep products whose name contains this text (case-insensitive).
    #[arg(long)]
    name: Option<String>,

    /// Keep this exact size.
    #[arg(long)]
    size: Option<String>,

    /// Keep one warehouse city: mumbai or delhi.
    #[arg(long, value_enum)]
    location: Option<LocationArg>,

    /// Where to write the PDF.
    #[arg(short, long, env = "SHEET2CATALOG_OUTPUT", default_value = CATALOG_FILE_NAME)]
    output: PathBuf,

    /// Print the sizes in stock and exit.
    #[arg(long)]
    list_sizes: bool,

    /// Concurrent image downloads.
    #[arg(short, long, env = "SHEET2CATALOG_CONCURRENCY", default_value_t = 8)]
    concurrency: usize,

    /// Per-image download timeout in seconds.
    #[arg(long, env = "SHEET2CATALOG_FETCH_TIMEOUT", default_value_t = 30)]
    fetch_timeout: u64,

    /// Render the last entry without its image, matching the legacy catalogs.
    #[arg(long)]
    drop_last_image: bool,

    /// How to join duplicate style keys: first, last, fan-out.
    #[arg(long, default_value = "first")]
    duplicate_keys: String,

    /// Print run statistics as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "SHEET2CATALOG_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LocationArg {
    Mumbai,
    Delhi,
}

impl From<LocationArg> for Location {
    fn from(v: LocationArg) -> Self {
        match v {
            LocationArg::Mumbai => Location::Mumbai,
            LocationArg::Delhi => Location::Delhi,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.list_sizes;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let source = build_source(&cli)?;

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn CatalogProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Size listing mode ────────────────────────────────────────────────
    if cli.list_sizes {
        let sizes = list_sizes(source.as_ref(), &config)
            .await
            .context("Failed to read inventory")?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&sizes).context("Failed to serialise sizes")?
            );
        } else {
            for size in sizes {
                println!("{size}");
            }
        }
        return Ok(());
    }

    // ── Generate ─────────────────────────────────────────────────────────
    let filters = FilterSpec {
        product_name_contains: cli.name.clone(),
        size: cli.size.clone(),
        location: cli.location.map(Location::from),
    };

    let output = generate_catalog(source.as_ref(), &filters, &config)
        .await
        .context("Catalog generation failed")?;

    write_catalog(&cli.output, &output.pdf)
        .await
        .context("Failed to save catalog")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        );
    } else if !cli.quiet {
        let stats = &output.stats;
        eprintln!(
            "{}  {} pages  {}/{} images  {}ms  →  {}",
            green("✔"),
            stats.page_count,
            stats.images_fetched,
            stats.images_requested,
            stats.total_duration_ms,
            bold(&cli.output.display().to_string()),
        );
        if stats.page_count == 0 {
            eprintln!("   {}", dim("no inventory rows matched the filters"));
        }
    }

    Ok(())
}

/// Pick the spreadsheet source from the flags.
fn build_source(cli: &Cli) -> Result<Box<dyn SpreadsheetSource>> {
    if let (Some(inv), Some(img)) = (&cli.inventory_csv, &cli.images_csv) {
        return Ok(Box::new(CsvWorkbookSource::new(inv, img)));
    }

    let spreadsheet = match (&cli.sheet_id, &cli.sheet_name) {
        (Some(id), _) => SpreadsheetRef::Id(id.clone()),
        (None, Some(name)) => SpreadsheetRef::Name(name.clone()),
        (None, None) => {
            bail!("Specify --sheet-id, --sheet-name, or --inventory-csv with --images-csv")
        }
    };
    let token = cli
        .access_token
        .clone()
        .filter(|t| !t.is_empty())
        .context("Google Sheets needs an access token: pass --access-token or set GOOGLE_ACCESS_TOKEN")?;

    Ok(Box::new(GoogleSheetsSource::new(spreadsheet, token)))
}

/// Map CLI args to `CatalogConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<CatalogConfig> {
    let duplicate_keys: DuplicateKeyPolicy = cli
        .duplicate_keys
        .parse()
        .context("Invalid --duplicate-keys")?;
    let trailing = if cli.drop_last_image {
        TrailingImagePolicy::DropLast
    } else {
        TrailingImagePolicy::Keep
    };

    let mut builder = CatalogConfig::builder()
        .fetch_concurrency(cli.concurrency)
        .fetch_timeout_secs(cli.fetch_timeout)
        .duplicate_keys(duplicate_keys)
        .trailing_image(trailing);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
