use crate::domain::cell::CellRecord;
use crate::domain::error::{AppError, Result};
use crate::domain::spreadsheet::{Spreadsheet, SpreadsheetInput};
use crate::infrastructure::db::repository::PlanixRepository;

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

mod parsers;
mod types;

pub use types::ParsedSheet;

pub struct SpreadsheetIngestionUseCase {
    repository: Arc<PlanixRepository>,
}

impl SpreadsheetIngestionUseCase {
    pub fn new(repository: Arc<PlanixRepository>) -> Self {
        Self { repository }
    }

    /// Parses an uploaded spreadsheet and persists its cells.
    ///
    /// The format is chosen by file extension (`csv`, `xls`, `xlsx`). Per
    /// sheet, the first spreadsheet row names the columns and every later
    /// non-blank row becomes one cell record per column, indexed from 0.
    pub async fn ingest(&self, file_name: &str, bytes: &[u8]) -> Result<Spreadsheet> {
        let file_type = file_extension(file_name);

        let sheets = match file_type.as_str() {
            "csv" => self.parse_csv(file_name, bytes)?,
            "xls" | "xlsx" => self.parse_excel(bytes)?,
            other => {
                return Err(AppError::ValidationError(format!(
                    "Unsupported file type: {:?} (expected csv, xls or xlsx)",
                    other
                )))
            }
        };

        let cells = sheets_to_cells(&sheets);
        let sheet_names: HashSet<&str> = cells.iter().map(|c| c.sheet_name.as_str()).collect();

        info!(
            file_name,
            sheets = sheet_names.len(),
            cells = cells.len(),
            "Ingesting spreadsheet"
        );

        let input = SpreadsheetInput {
            upload_id: Uuid::new_v4().to_string(),
            file_name: file_name.to_string(),
            file_type,
            sheet_count: sheet_names.len() as i64,
            cell_count: cells.len() as i64,
        };

        self.repository
            .insert_spreadsheet_with_cells(input, &cells)
            .await
    }
}

fn file_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default()
}

/// Flattens parsed sheets into cell records.
///
/// The first row of each sheet provides the column names; blank header
/// cells fall back to `col{i}`. Data rows are indexed from 0 and rows whose
/// cells are all blank are skipped.
fn sheets_to_cells(sheets: &[ParsedSheet]) -> Vec<CellRecord> {
    let mut cells = Vec::new();

    for sheet in sheets {
        let Some((header, data_rows)) = sheet.rows.split_first() else {
            continue;
        };

        let columns: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let name = name.trim();
                if name.is_empty() {
                    format!("col{}", idx)
                } else {
                    name.to_string()
                }
            })
            .collect();

        let mut row_index: i64 = 0;
        for row in data_rows {
            if row.iter().all(|value| value.trim().is_empty()) {
                continue;
            }

            for (idx, column) in columns.iter().enumerate() {
                let value = row.get(idx).cloned().unwrap_or_default();
                cells.push(CellRecord {
                    sheet_name: sheet.name.clone(),
                    row_index,
                    column_name: Some(column.clone()),
                    value: Some(value),
                });
            }
            row_index += 1;
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("vendas.XLSX"), "xlsx");
        assert_eq!(file_extension("a/b/vendas.csv"), "csv");
        assert_eq!(file_extension("semextensao"), "");
    }

    #[test]
    fn test_sheets_to_cells_indexes_data_rows_from_zero() {
        let sheets = vec![ParsedSheet {
            name: "Vendas".to_string(),
            rows: vec![
                vec!["Produto".to_string(), "Total".to_string()],
                vec!["Caneta".to_string(), "10".to_string()],
                vec!["Lapis".to_string(), "5".to_string()],
            ],
        }];

        let cells = sheets_to_cells(&sheets);
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0].row_index, 0);
        assert_eq!(cells[0].column_name.as_deref(), Some("Produto"));
        assert_eq!(cells[0].value.as_deref(), Some("Caneta"));
        assert_eq!(cells[3].row_index, 1);
        assert_eq!(cells[3].value.as_deref(), Some("5"));
    }

    #[test]
    fn test_sheets_to_cells_blank_header_fallback() {
        let sheets = vec![ParsedSheet {
            name: "S".to_string(),
            rows: vec![
                vec!["".to_string(), "Total".to_string()],
                vec!["x".to_string(), "1".to_string()],
            ],
        }];

        let cells = sheets_to_cells(&sheets);
        assert_eq!(cells[0].column_name.as_deref(), Some("col0"));
    }

    #[test]
    fn test_sheets_to_cells_skips_blank_rows_and_pads_short_rows() {
        let sheets = vec![ParsedSheet {
            name: "S".to_string(),
            rows: vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["  ".to_string(), "".to_string()],
                vec!["only-a".to_string()],
            ],
        }];

        let cells = sheets_to_cells(&sheets);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].row_index, 0);
        assert_eq!(cells[1].column_name.as_deref(), Some("b"));
        assert_eq!(cells[1].value.as_deref(), Some(""));
    }

    #[test]
    fn test_sheets_to_cells_header_only_sheet_yields_nothing() {
        let sheets = vec![ParsedSheet {
            name: "S".to_string(),
            rows: vec![vec!["a".to_string(), "b".to_string()]],
        }];

        assert!(sheets_to_cells(&sheets).is_empty());
    }
}
