use crate::domain::cell::{CellRecord, ReconstructedRow, SheetTable};

use std::collections::HashMap;

/// Rebuilds per-sheet tables from flat cell records.
///
/// Sheets come back in first-occurrence order; rows within a sheet are
/// sorted by ascending row index. A missing column name normalizes to the
/// empty-string key and a missing value to the empty string, so malformed
/// input degrades instead of failing. Duplicate (sheet, row, column)
/// triples resolve last-write-wins.
pub fn reconstruct(cells: &[CellRecord]) -> Vec<SheetTable> {
    #[derive(Default)]
    struct SheetAccum {
        // row_index -> position in `rows`
        positions: HashMap<i64, usize>,
        rows: Vec<(i64, ReconstructedRow)>,
    }

    let mut sheet_order: Vec<String> = Vec::new();
    let mut sheets: HashMap<String, SheetAccum> = HashMap::new();

    for cell in cells {
        if !sheets.contains_key(&cell.sheet_name) {
            sheet_order.push(cell.sheet_name.clone());
        }
        let accum = sheets.entry(cell.sheet_name.clone()).or_default();

        let position = *accum.positions.entry(cell.row_index).or_insert_with(|| {
            accum.rows.push((cell.row_index, ReconstructedRow::new()));
            accum.rows.len() - 1
        });

        let column = cell.column_name.clone().unwrap_or_default();
        let value = cell.value.clone().unwrap_or_default();
        accum.rows[position].1.insert(column, value);
    }

    sheet_order
        .into_iter()
        .map(|sheet_name| {
            let mut accum = sheets.remove(&sheet_name).unwrap_or_default();
            accum.rows.sort_by_key(|(row_index, _)| *row_index);
            SheetTable {
                sheet_name,
                rows: accum.rows.into_iter().map(|(_, row)| row).collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(sheet: &str, row: i64, column: &str, value: &str) -> CellRecord {
        CellRecord::new(sheet, row, column, value)
    }

    #[test]
    fn test_empty_input_yields_no_sheets() {
        assert!(reconstruct(&[]).is_empty());
    }

    #[test]
    fn test_groups_cells_into_rows() {
        let cells = vec![
            cell("Vendas", 0, "Produto", "Caneta"),
            cell("Vendas", 0, "Total", "10"),
            cell("Vendas", 1, "Produto", "Lapis"),
            cell("Vendas", 1, "Total", "5"),
        ];

        let tables = reconstruct(&cells);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].sheet_name, "Vendas");
        assert_eq!(tables[0].rows.len(), 2);
        assert_eq!(tables[0].rows[0].get("Produto"), Some("Caneta"));
        assert_eq!(tables[0].rows[1].get("Total"), Some("5"));
    }

    #[test]
    fn test_rows_sorted_by_ascending_index() {
        let cells = vec![
            cell("S", 7, "a", "third"),
            cell("S", -2, "a", "first"),
            cell("S", 3, "a", "second"),
        ];

        let tables = reconstruct(&cells);
        let values: Vec<&str> = tables[0]
            .rows
            .iter()
            .map(|row| row.get("a").unwrap())
            .collect();
        assert_eq!(values, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_row_count_equals_distinct_row_indexes() {
        let cells = vec![
            cell("S", 0, "a", "1"),
            cell("S", 0, "b", "2"),
            cell("S", 4, "a", "3"),
            cell("S", 4, "b", "4"),
            cell("S", 9, "a", "5"),
        ];

        let tables = reconstruct(&cells);
        assert_eq!(tables[0].rows.len(), 3);
    }

    #[test]
    fn test_sheet_order_is_first_occurrence() {
        let cells = vec![
            cell("B", 0, "x", "1"),
            cell("A", 0, "x", "2"),
            cell("B", 1, "x", "3"),
        ];

        let tables = reconstruct(&cells);
        let names: Vec<&str> = tables.iter().map(|t| t.sheet_name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_missing_column_name_becomes_empty_key() {
        let cells = vec![CellRecord {
            sheet_name: "S".to_string(),
            row_index: 0,
            column_name: None,
            value: Some("orphan".to_string()),
        }];

        let tables = reconstruct(&cells);
        assert_eq!(tables[0].rows[0].get(""), Some("orphan"));
    }

    #[test]
    fn test_missing_value_becomes_empty_string() {
        let cells = vec![CellRecord {
            sheet_name: "S".to_string(),
            row_index: 0,
            column_name: Some("a".to_string()),
            value: None,
        }];

        let tables = reconstruct(&cells);
        assert_eq!(tables[0].rows[0].get("a"), Some(""));
    }

    #[test]
    fn test_duplicate_triple_last_write_wins() {
        let cells = vec![cell("S", 0, "a", "old"), cell("S", 0, "a", "new")];

        let tables = reconstruct(&cells);
        assert_eq!(tables[0].rows[0].len(), 1);
        assert_eq!(tables[0].rows[0].get("a"), Some("new"));
    }

    #[test]
    fn test_deterministic_on_identical_input() {
        let cells = vec![
            cell("S2", 1, "b", "4"),
            cell("S1", 0, "a", "1"),
            cell("S1", 1, "a", "2"),
            cell("S2", 0, "b", "3"),
        ];

        assert_eq!(reconstruct(&cells), reconstruct(&cells));
    }
}
