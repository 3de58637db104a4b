use serde::{Deserialize, Serialize};
use time::{format_description::BorrowedFormatItem, macros::format_description, Date};

use crate::error::ApiError;

/// Calendar dates cross the wire as plain `YYYY-MM-DD` strings.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

pub fn parse_date(s: &str) -> Result<Date, ApiError> {
    Date::parse(s, DATE_FORMAT)
        .map_err(|_| ApiError::Validation(format!("Invalid date: {s}")))
}

pub fn format_date(date: Date) -> String {
    // The format description has no fallible components.
    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

/// Body of `POST /journals`. The owner comes from the bearer token, never
/// from the body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertJournalRequest {
    pub date: String,
    pub color: String,
    pub content: String,
    #[serde(default)]
    pub is_private: bool,
}

/// Projection returned by the read endpoints and by upsert. No owner
/// linkage; the caller already knows whose journal this is.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryResponse {
    pub date: String,
    pub color: String,
    pub content: String,
    pub is_private: bool,
}

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}
