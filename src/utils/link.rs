//! Spreadsheet link parsing.

use regex::Regex;
use std::sync::LazyLock;

static SHEET_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/spreadsheets/d/([a-zA-Z0-9_-]+)").expect("valid sheet id regex")
});

/// Extract the spreadsheet id from a Google Sheets URL.
pub fn extract_sheet_id(link: &str) -> Option<String> {
    SHEET_ID_RE
        .captures(link)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
