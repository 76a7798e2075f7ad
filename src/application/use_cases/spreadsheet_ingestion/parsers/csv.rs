use super::super::{ParsedSheet, SpreadsheetIngestionUseCase};

use crate::domain::error::{AppError, Result};
use crate::infrastructure::csv::CsvParser;

use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::debug;

impl SpreadsheetIngestionUseCase {
    pub(in crate::application::use_cases::spreadsheet_ingestion) fn parse_csv(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<Vec<ParsedSheet>> {
        let content = CsvParser::decode_bytes(bytes);
        let delimiter = CsvParser::detect_delimiter(&content);

        debug!(file_name, delimiter = %(delimiter as char), "Parsing CSV upload");

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut rows: Vec<Vec<String>> = Vec::new();
        for result in reader.records() {
            let record = result
                .map_err(|e| AppError::ParseError(format!("Failed to parse CSV record: {}", e)))?;
            rows.push(record.iter().map(|field| field.to_string()).collect());
        }

        // A CSV upload is a single-sheet spreadsheet named after the file.
        let sheet_name = Path::new(file_name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.trim().is_empty())
            .unwrap_or("Sheet1")
            .to_string();

        Ok(vec![ParsedSheet {
            name: sheet_name,
            rows,
        }])
    }
}
