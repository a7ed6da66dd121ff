//! Google Sheets source against a local stand-in for the Sheets and Drive
//! REST APIs.

mod common;

use common::{serve, Route, TestServer};
use serde_json::json;
use sheet2catalog::{
    generate_catalog, CatalogConfig, CatalogError, FilterSpec, GoogleSheetsSource, Location,
    SpreadsheetRef, SpreadsheetSource,
};

fn source(server: &TestServer, spreadsheet: SpreadsheetRef) -> GoogleSheetsSource {
    GoogleSheetsSource::new(spreadsheet, "test-token")
        .with_endpoints(&server.url("/v4/"), &server.url("/drive/v3/"))
        .unwrap()
}

/// Metadata lists the image tab first to check ordering by index.
fn workbook_routes(id: &str) -> Vec<Route> {
    vec![
        Route::json(
            format!("/v4/spreadsheets/{id}"),
            json!({
                "sheets": [
                    { "properties": { "title": "Images", "index": 1 } },
                    { "properties": { "title": "Master Inventory", "index": 0 } }
                ]
            }),
        ),
        Route::json(
            format!("/v4/spreadsheets/{id}/values/'Master Inventory'"),
            json!({
                "range": "'Master Inventory'!A1:E3",
                "majorDimension": "ROWS",
                "values": [
                    ["Product List", "Size", "Site", "Status", "Style Code*"],
                    ["Air Max", "9", "BOM01", "Available", "S1"],
                    ["Air Force", 10, "DEL02", "Available"]
                ]
            }),
        ),
        Route::json(
            format!("/v4/spreadsheets/{id}/values/'Images'"),
            json!({
                "values": [
                    ["Style Code 1", "image_0"],
                    ["S1", ""]
                ]
            }),
        ),
    ]
}

#[tokio::test]
async fn reads_worksheets_by_tab_position() {
    let server = serve(workbook_routes("abc123")).await;
    let src = source(&server, SpreadsheetRef::Id("abc123".into()));

    let wb = src.fetch().await.unwrap();

    assert_eq!(wb.inventory.len(), 2);
    assert_eq!(wb.inventory[0]["Product List"], "Air Max");
    assert_eq!(wb.inventory[1]["Size"], "10");
    assert_eq!(wb.inventory[1]["Style Code*"], "");
    assert_eq!(wb.image_grid[0], ["Style Code 1", "image_0"]);

    let heads = server.request_heads();
    assert!(heads
        .iter()
        .all(|h| h.to_ascii_lowercase().contains("authorization: bearer test-token")));
}

#[tokio::test]
async fn resolves_title_through_drive() {
    let mut routes = workbook_routes("resolved-id");
    routes.push(Route::json(
        "/drive/v3/files",
        json!({ "files": [{ "id": "resolved-id", "name": "MNSt | Inventory" }] }),
    ));
    let server = serve(routes).await;
    let src = source(&server, SpreadsheetRef::Name("MNSt | Inventory".into()));

    let wb = src.fetch().await.unwrap();
    assert_eq!(wb.inventory.len(), 2);

    let heads = server.request_heads();
    assert!(heads[0].starts_with("GET /drive/v3/files?"), "{}", heads[0]);
}

#[tokio::test]
async fn unknown_title_is_not_found() {
    let server = serve(vec![Route::json("/drive/v3/files", json!({ "files": [] }))]).await;
    let src = source(&server, SpreadsheetRef::Name("Nope".into()));

    let err = src.fetch().await.unwrap_err();
    match err {
        CatalogError::SpreadsheetNotFound { name } => assert_eq!(name, "Nope"),
        other => panic!("expected SpreadsheetNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn rejected_token_is_auth_error() {
    let server = serve(vec![Route::new(
        "/v4/spreadsheets/abc123",
        401,
        "application/json",
        br#"{"error":{"code":401,"status":"UNAUTHENTICATED"}}"#.to_vec(),
    )])
    .await;
    let src = source(&server, SpreadsheetRef::Id("abc123".into()));

    let err = src.fetch().await.unwrap_err();
    assert!(matches!(err, CatalogError::Auth { .. }), "got {err:?}");
}

#[tokio::test]
async fn single_worksheet_is_rejected() {
    let server = serve(vec![Route::json(
        "/v4/spreadsheets/abc123",
        json!({ "sheets": [{ "properties": { "title": "Only", "index": 0 } }] }),
    )])
    .await;
    let src = source(&server, SpreadsheetRef::Id("abc123".into()));

    let err = src.fetch().await.unwrap_err();
    assert!(matches!(err, CatalogError::SpreadsheetAccess { .. }), "got {err:?}");
}

#[tokio::test]
async fn generates_catalog_from_live_sheet() {
    let server = serve(workbook_routes("abc123")).await;
    let src = source(&server, SpreadsheetRef::Id("abc123".into()));
    let config = CatalogConfig::default();
    let filters = FilterSpec::new().location(Location::Mumbai);

    let out = generate_catalog(&src, &filters, &config).await.unwrap();

    assert_eq!(out.stats.rows_read, 2);
    assert_eq!(out.entries.len(), 1);
    assert_eq!(out.entries[0].product_name, "Air Max");
    assert!(!out.entries[0].has_image);
}
