use super::super::{ParsedSheet, SpreadsheetIngestionUseCase};

use crate::domain::error::{AppError, Result};

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, DataType, Reader};
use tracing::debug;

impl SpreadsheetIngestionUseCase {
    pub(in crate::application::use_cases::spreadsheet_ingestion) fn parse_excel(
        &self,
        bytes: &[u8],
    ) -> Result<Vec<ParsedSheet>> {
        let cursor = Cursor::new(bytes.to_vec());
        let mut workbook = open_workbook_auto_from_rs(cursor)
            .map_err(|e| AppError::ParseError(format!("Failed to open Excel file: {}", e)))?;

        let sheet_names = workbook.sheet_names().to_vec();
        if sheet_names.is_empty() {
            return Err(AppError::ParseError("No worksheet found".to_string()));
        }

        let mut sheets = Vec::with_capacity(sheet_names.len());
        for name in sheet_names {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| {
                    AppError::ParseError(format!("Failed to read Excel range {:?}: {}", name, e))
                })?;

            let mut rows = Vec::new();
            for row in range.rows() {
                let row_data: Vec<String> = row
                    .iter()
                    .map(|cell| {
                        cell.as_string()
                            .map(|s| s.to_string())
                            .unwrap_or_else(|| format!("{}", cell))
                    })
                    .collect();
                rows.push(row_data);
            }

            debug!(sheet = %name, rows = rows.len(), "Parsed Excel worksheet");
            sheets.push(ParsedSheet { name, rows });
        }

        Ok(sheets)
    }
}
