//! Google Sheets over the v4 REST API.
//!
//! A spreadsheet is addressed either by ID or by its title. Titles are
//! resolved through a Drive v3 file search, which needs the bearer token to
//! carry a Drive scope as well as a Sheets scope.
//!
//! The first worksheet is read as inventory records, the second as the raw
//! image grid. Cells are requested as formatted text so sizes like `9.5` or
//! `10` arrive exactly as the sheet shows them.

use super::{records_from_grid, SpreadsheetSource};
use crate::error::CatalogError;
use crate::model::RawWorkbook;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info};

pub const DEFAULT_SHEETS_ENDPOINT: &str = "https://sheets.googleapis.com/v4/";
pub const DEFAULT_DRIVE_ENDPOINT: &str = "https://www.googleapis.com/drive/v3/";

const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

/// How the spreadsheet is identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetRef {
    /// The ID from the sheet's URL.
    Id(String),
    /// The human-readable title, resolved via Drive search.
    Name(String),
}

/// Reads both worksheets from Google Sheets with an explicit OAuth token.
#[derive(Clone)]
pub struct GoogleSheetsSource {
    client: reqwest::Client,
    spreadsheet: SpreadsheetRef,
    access_token: String,
    sheets_endpoint: Url,
    drive_endpoint: Url,
}

impl fmt::Debug for GoogleSheetsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleSheetsSource")
            .field("spreadsheet", &self.spreadsheet)
            .field("access_token", &"<redacted>")
            .field("sheets_endpoint", &self.sheets_endpoint.as_str())
            .field("drive_endpoint", &self.drive_endpoint.as_str())
            .finish()
    }
}

impl GoogleSheetsSource {
    pub fn new(spreadsheet: SpreadsheetRef, access_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            spreadsheet,
            access_token: access_token.into(),
            sheets_endpoint: Url::parse(DEFAULT_SHEETS_ENDPOINT).expect("valid default URL"),
            drive_endpoint: Url::parse(DEFAULT_DRIVE_ENDPOINT).expect("valid default URL"),
        }
    }

    /// Use a preconfigured HTTP client (proxies, timeouts).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Point at different API roots. Both must end with `/`.
    pub fn with_endpoints(mut self, sheets: &str, drive: &str) -> Result<Self, CatalogError> {
        let parse = |s: &str| {
            Url::parse(s)
                .map_err(|e| CatalogError::InvalidConfig(format!("bad endpoint '{s}': {e}")))
        };
        self.sheets_endpoint = parse(sheets)?;
        self.drive_endpoint = parse(drive)?;
        Ok(self)
    }

    async fn resolve_id(&self) -> Result<String, CatalogError> {
        let name = match &self.spreadsheet {
            SpreadsheetRef::Id(id) => return Ok(id.clone()),
            SpreadsheetRef::Name(name) => name,
        };

        let mut url = join(&self.drive_endpoint, &["files"])?;
        url.query_pairs_mut()
            .append_pair("q", &drive_query(name))
            .append_pair("fields", "files(id,name)")
            .append_pair("pageSize", "1");

        let list: FileList = self.get_json(url).await?;
        let file = list
            .files
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::SpreadsheetNotFound { name: name.clone() })?;
        debug!("Resolved spreadsheet '{}' → {}", name, file.id);
        Ok(file.id)
    }

    /// Worksheet titles ordered by their tab position.
    async fn worksheet_titles(&self, id: &str) -> Result<Vec<String>, CatalogError> {
        let mut url = join(&self.sheets_endpoint, &["spreadsheets", id])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties(title,index)");

        let meta: SpreadsheetMeta = self.get_json(url).await?;
        let mut props: Vec<SheetProperties> =
            meta.sheets.into_iter().map(|s| s.properties).collect();
        props.sort_by_key(|p| p.index);
        Ok(props.into_iter().map(|p| p.title).collect())
    }

    async fn values(&self, id: &str, title: &str) -> Result<Vec<Vec<String>>, CatalogError> {
        let range = a1_sheet_range(title);
        let mut url = join(&self.sheets_endpoint, &["spreadsheets", id, "values", &range])?;
        url.query_pairs_mut()
            .append_pair("majorDimension", "ROWS")
            .append_pair("valueRenderOption", "FORMATTED_VALUE");

        let range: ValueRange = self.get_json(url).await?;
        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| CatalogError::SpreadsheetAccess {
                reason: format!("{}: {}", url.path(), e),
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Auth {
                detail: format!("HTTP {status}: {}", body.trim()),
            });
        }
        if !status.is_success() {
            return Err(CatalogError::SpreadsheetAccess {
                reason: format!("{} returned HTTP {}", url.path(), status),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::SpreadsheetAccess {
                reason: format!("unexpected response from {}: {}", url.path(), e),
            })
    }
}

#[async_trait]
impl SpreadsheetSource for GoogleSheetsSource {
    async fn fetch(&self) -> Result<RawWorkbook, CatalogError> {
        let id = self.resolve_id().await?;
        let titles = self.worksheet_titles(&id).await?;
        let [inventory_title, images_title, ..] = titles.as_slice() else {
            return Err(CatalogError::SpreadsheetAccess {
                reason: format!(
                    "spreadsheet {id} has {} worksheet(s); need an inventory and an image sheet",
                    titles.len()
                ),
            });
        };

        let inventory_grid = self.values(&id, inventory_title).await?;
        let image_grid = self.values(&id, images_title).await?;
        info!(
            "Read worksheets '{}' ({} rows) and '{}' ({} rows)",
            inventory_title,
            inventory_grid.len(),
            images_title,
            image_grid.len()
        );

        Ok(RawWorkbook {
            inventory: records_from_grid(&inventory_grid),
            image_grid,
        })
    }

    fn describe(&self) -> String {
        match &self.spreadsheet {
            SpreadsheetRef::Id(id) => format!("Google Sheet {id}"),
            SpreadsheetRef::Name(name) => format!("Google Sheet '{name}'"),
        }
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
    #[serde(default)]
    index: u32,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    /// Omitted by the API when the worksheet is empty.
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn join(base: &Url, segments: &[&str]) -> Result<Url, CatalogError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| CatalogError::InvalidConfig(format!("endpoint '{base}' cannot be a base")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// A1 range covering a whole worksheet: the quoted title.
fn a1_sheet_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

fn drive_query(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
    format!("name = '{escaped}' and mimeType = '{SPREADSHEET_MIME}' and trashed = false")
}

fn cell_text(v: serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
