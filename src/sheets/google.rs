//! Google Sheets API v4 backend (blocking HTTP).

use super::{CellValue, GridHandle, SheetsBackend, a1};
use crate::errors::{AppError, AppResult};
use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
    #[serde(default)]
    index: usize,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

fn unavailable(e: impl std::fmt::Display) -> AppError {
    AppError::BackendUnavailable(e.to_string())
}

fn send(req: RequestBuilder) -> AppResult<Response> {
    let resp = req.send().map_err(unavailable)?;
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    let snippet: String = body.chars().take(200).collect();
    Err(AppError::BackendUnavailable(format!(
        "HTTP {}: {}",
        status,
        snippet.trim()
    )))
}

/// Client for one Google account, opening the configured worksheet tab.
pub struct GoogleSheets {
    client: Client,
    base_url: Url,
    token: String,
    worksheet_index: usize,
}

impl GoogleSheets {
    pub fn new(base_url: &str, token: &str, worksheet_index: usize) -> AppResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("invalid sheets_api_url '{}': {}", base_url, e)))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url,
            token: token.to_string(),
            worksheet_index,
        })
    }

    fn spreadsheet_url(&self, id: &str) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config("sheets_api_url cannot be a base".into()))?
            .pop_if_empty()
            .push("spreadsheets")
            .push(id);
        Ok(url)
    }
}

impl SheetsBackend for GoogleSheets {
    type Grid = Worksheet;

    fn open_by_id(&self, id: &str) -> AppResult<Worksheet> {
        let mut url = self.spreadsheet_url(id)?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties(title,index)");

        tracing::debug!(spreadsheet = id, "fetching spreadsheet metadata");
        let meta: SpreadsheetMeta = send(self.client.get(url).bearer_auth(&self.token))?
            .json()
            .map_err(unavailable)?;

        let title = meta
            .sheets
            .into_iter()
            .map(|s| s.properties)
            .find(|p| p.index == self.worksheet_index)
            .map(|p| p.title)
            .ok_or_else(|| {
                AppError::BackendUnavailable(format!(
                    "spreadsheet '{}' has no worksheet #{}",
                    id,
                    self.worksheet_index + 1
                ))
            })?;

        let mut values_url = self.spreadsheet_url(id)?;
        values_url
            .path_segments_mut()
            .map_err(|_| AppError::Config("sheets_api_url cannot be a base".into()))?
            .push("values");

        Ok(Worksheet {
            client: self.client.clone(),
            token: self.token.clone(),
            values_url,
            title,
        })
    }
}

/// A single tab of an opened spreadsheet.
pub struct Worksheet {
    client: Client,
    token: String,
    values_url: Url,
    title: String,
}

impl Worksheet {
    pub fn title(&self) -> &str {
        &self.title
    }

    fn range_url(&self, range: &str) -> Url {
        let mut url = self.values_url.clone();
        if let Ok(mut segs) = url.path_segments_mut() {
            segs.push(range);
        }
        url
    }

    fn get(&self, range: &str, major: &str) -> AppResult<Vec<String>> {
        let mut url = self.range_url(range);
        url.query_pairs_mut().append_pair("majorDimension", major);

        let vr: ValueRange = send(self.client.get(url).bearer_auth(&self.token))?
            .json()
            .map_err(unavailable)?;
        Ok(vr.values.into_iter().next().unwrap_or_default())
    }

    fn put(&self, range: &str, values: Vec<serde_json::Value>) -> AppResult<()> {
        let mut url = self.range_url(range);
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": [values],
        });
        send(self.client.put(url).bearer_auth(&self.token).json(&body))?;
        Ok(())
    }
}

impl GridHandle for Worksheet {
    fn column_values(&self, col: usize) -> AppResult<Vec<String>> {
        self.get(&a1::whole_column(&self.title, col), "COLUMNS")
    }

    fn row_values(&self, row: usize) -> AppResult<Vec<String>> {
        self.get(&a1::whole_row(&self.title, row), "ROWS")
    }

    fn append_row(&mut self, row: usize, values: &[CellValue]) -> AppResult<()> {
        tracing::debug!(sheet = %self.title, row, "appending row");
        let range = a1::cell(&self.title, row, 1);
        self.put(&range, values.iter().map(CellValue::to_json).collect())
    }

    fn set_cell(&mut self, row: usize, col: usize, value: &CellValue) -> AppResult<()> {
        tracing::debug!(sheet = %self.title, row, col, "writing cell");
        let range = a1::cell(&self.title, row, col);
        self.put(&range, vec![value.to_json()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn spreadsheet_url_appends_segments() {
        let gs = GoogleSheets::new("https://sheets.googleapis.com/v4", "t", 1).unwrap();
        let url = gs.spreadsheet_url("ABC123").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/ABC123"
        );
    }

    #[test]
    fn range_segment_is_escaped() {
        let ws = Worksheet {
            client: Client::new(),
            token: String::new(),
            values_url: Url::parse("https://h/v4/spreadsheets/X/values").unwrap(),
            title: "Meal log".into(),
        };
        let url = ws.range_url(&a1::cell(ws.title(), 2, 1));
        assert_eq!(url.as_str(), "https://h/v4/spreadsheets/X/values/'Meal%20log'!A2");
    }

    #[test]
    fn value_range_without_values_is_empty() {
        let vr: ValueRange = serde_json::from_str(r#"{"range":"'S'!A1:A1000","majorDimension":"COLUMNS"}"#).unwrap();
        assert!(vr.values.is_empty());
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let err = GoogleSheets::new("not a url", "t", 1).err().unwrap();
        assert!(matches!(err, AppError::Config(_)));
    }

    const META: &str = r#"{"sheets":[
        {"properties":{"title":"Summary","index":0}},
        {"properties":{"title":"Meals","index":1}}
    ]}"#;

    fn backend(server: &mockito::Server) -> GoogleSheets {
        GoogleSheets::new(&format!("{}/v4", server.url()), "tok", 1).unwrap()
    }

    fn mock_meta(server: &mut mockito::Server, body: &str) -> mockito::Mock {
        server
            .mock("GET", "/v4/spreadsheets/S1")
            .match_query(Matcher::UrlEncoded(
                "fields".into(),
                "sheets.properties(title,index)".into(),
            ))
            .match_header("authorization", "Bearer tok")
            .with_header("content-type", "application/json")
            .with_body(body)
            .create()
    }

    #[test]
    fn open_by_id_picks_the_configured_tab() {
        let mut server = mockito::Server::new();
        let meta = mock_meta(&mut server, META);

        let ws = backend(&server).open_by_id("S1").unwrap();
        assert_eq!(ws.title(), "Meals");
        meta.assert();
    }

    #[test]
    fn missing_worksheet_index_is_unavailable() {
        let mut server = mockito::Server::new();
        let _meta = mock_meta(
            &mut server,
            r#"{"sheets":[{"properties":{"title":"Only","index":0}}]}"#,
        );

        let err = backend(&server).open_by_id("S1").err().unwrap();
        assert!(matches!(&err, AppError::BackendUnavailable(m) if m.contains("no worksheet #2")));
    }

    #[test]
    fn unknown_spreadsheet_is_unavailable() {
        let mut server = mockito::Server::new();
        let missing = server
            .mock("GET", "/v4/spreadsheets/NOPE")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"error":{"code":404,"message":"Requested entity was not found."}}"#)
            .create();

        let err = backend(&server).open_by_id("NOPE").err().unwrap();
        assert!(matches!(&err, AppError::BackendUnavailable(m) if m.contains("404")));
        missing.assert();
    }

    #[test]
    fn column_values_reads_first_column_major_range() {
        let mut server = mockito::Server::new();
        let _meta = mock_meta(&mut server, META);
        let column = server
            .mock(
                "GET",
                Matcher::Regex(r"^/v4/spreadsheets/S1/values/('|%27)Meals('|%27)(!|%21)A(:|%3A)A$".into()),
            )
            .match_query(Matcher::UrlEncoded("majorDimension".into(), "COLUMNS".into()))
            .match_header("authorization", "Bearer tok")
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"range":"'Meals'!A1:A1000","majorDimension":"COLUMNS","values":[["","2024-01-01"]]}"#,
            )
            .create();

        let ws = backend(&server).open_by_id("S1").unwrap();
        assert_eq!(ws.column_values(1).unwrap(), vec!["", "2024-01-01"]);
        column.assert();
    }

    #[test]
    fn append_row_updates_the_exact_first_cell() {
        let mut server = mockito::Server::new();
        let _meta = mock_meta(&mut server, META);
        let update = server
            .mock(
                "PUT",
                Matcher::Regex(r"^/v4/spreadsheets/S1/values/('|%27)Meals('|%27)(!|%21)A3$".into()),
            )
            .match_query(Matcher::UrlEncoded("valueInputOption".into(), "RAW".into()))
            .match_header("authorization", "Bearer tok")
            .match_body(Matcher::Json(json!({
                "range": "'Meals'!A3",
                "majorDimension": "ROWS",
                "values": [["2024-01-02"]],
            })))
            .with_header("content-type", "application/json")
            .with_body(r#"{"updatedCells":1}"#)
            .create();

        let mut ws = backend(&server).open_by_id("S1").unwrap();
        ws.append_row(3, &[CellValue::Text("2024-01-02".into())]).unwrap();
        update.assert();
    }

    #[test]
    fn set_cell_sends_numbers_as_numbers() {
        let mut server = mockito::Server::new();
        let _meta = mock_meta(&mut server, META);
        let update = server
            .mock(
                "PUT",
                Matcher::Regex(r"^/v4/spreadsheets/S1/values/('|%27)Meals('|%27)(!|%21)C2$".into()),
            )
            .match_query(Matcher::UrlEncoded("valueInputOption".into(), "RAW".into()))
            .match_body(Matcher::Json(json!({
                "range": "'Meals'!C2",
                "majorDimension": "ROWS",
                "values": [[3]],
            })))
            .with_body("{}")
            .create();

        let mut ws = backend(&server).open_by_id("S1").unwrap();
        ws.set_cell(2, 3, &CellValue::Number(3)).unwrap();
        update.assert();
    }

    #[test]
    fn write_errors_carry_the_status() {
        let mut server = mockito::Server::new();
        let _meta = mock_meta(&mut server, META);
        let _denied = server
            .mock("PUT", Matcher::Any)
            .with_status(403)
            .with_body("The caller does not have permission")
            .create();

        let mut ws = backend(&server).open_by_id("S1").unwrap();
        let err = ws.set_cell(2, 2, &CellValue::Number(1)).unwrap_err();
        assert!(
            matches!(&err, AppError::BackendUnavailable(m) if m.contains("403") && m.contains("permission"))
        );
    }
}
