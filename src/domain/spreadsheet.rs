use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Spreadsheet {
    pub id: i64,
    pub upload_id: String,
    pub file_name: String,
    pub file_type: String,
    pub sheet_count: i64,
    pub cell_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SpreadsheetInput {
    pub upload_id: String,
    pub file_name: String,
    pub file_type: String,
    pub sheet_count: i64,
    pub cell_count: i64,
}

/// A chart the user pinned to the dashboard. The label/value series are
/// stored as JSON text columns and rehydrated on read.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SavedChart {
    pub id: i64,
    pub spreadsheet_id: i64,
    pub chart_type: String,
    pub title: String,
    pub labels_json: String,
    pub values_json: String,
    pub source_sheet: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SavedChartInput {
    pub spreadsheet_id: i64,
    pub chart_type: String,
    pub title: String,
    pub labels_json: String,
    pub values_json: String,
    pub source_sheet: String,
}
