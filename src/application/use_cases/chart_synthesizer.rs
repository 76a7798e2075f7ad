use crate::domain::cell::ReconstructedRow;
use crate::domain::chart::{ChartKind, ChartSpec};

/// Caller-facing knobs for chart synthesis.
///
/// Defaults reproduce the legacy dashboard behavior: the first
/// reconstructed row only establishes the column set and is excluded from
/// the data points, and the candidate set is unbounded.
#[derive(Debug, Clone)]
pub struct SynthesizerOptions {
    /// Treat the first reconstructed row as chartable data instead of
    /// reserving it as the column reference.
    pub include_first_row: bool,
    /// Upper bound on charts emitted per sheet. `None` means unbounded.
    pub max_charts_per_sheet: Option<usize>,
}

impl Default for SynthesizerOptions {
    fn default() -> Self {
        Self {
            include_first_row: false,
            max_charts_per_sheet: None,
        }
    }
}

/// Synthesizes chart specs from one reconstructed sheet table with the
/// legacy defaults. See [`synthesize_with`].
pub fn synthesize(table: &[ReconstructedRow], sheet_name: &str) -> Vec<ChartSpec> {
    synthesize_with(table, sheet_name, &SynthesizerOptions::default())
}

/// Enumerates every ordered (label, value) column pair of the table and
/// emits one bar chart per pair that yields at least one valid data point.
///
/// A data point is valid when the label cell is non-empty after trimming
/// and the value cell parses to a finite number. Invalid rows are skipped
/// silently; sheets with fewer than two rows produce nothing. The function
/// is total: sparse or malformed tables degrade to fewer or zero charts.
pub fn synthesize_with(
    table: &[ReconstructedRow],
    sheet_name: &str,
    options: &SynthesizerOptions,
) -> Vec<ChartSpec> {
    if table.len() < 2 {
        return Vec::new();
    }

    let headers: Vec<&str> = table[0].columns().collect();
    let data_rows: &[ReconstructedRow] = if options.include_first_row {
        table
    } else {
        &table[1..]
    };

    let mut charts = Vec::new();

    for &label_column in &headers {
        for &value_column in &headers {
            if label_column == value_column {
                continue;
            }
            if let Some(limit) = options.max_charts_per_sheet {
                if charts.len() >= limit {
                    return charts;
                }
            }

            let mut labels = Vec::new();
            let mut values = Vec::new();

            for row in data_rows {
                let label = row.get(label_column).unwrap_or("");
                let raw_value = row.get(value_column).unwrap_or("");

                if label.trim().is_empty() {
                    continue;
                }
                let Some(value) = parse_cell_number(raw_value) else {
                    continue;
                };

                labels.push(label.to_string());
                values.push(value);
            }

            if !labels.is_empty() {
                charts.push(ChartSpec {
                    chart_type: ChartKind::Bar,
                    title: format!("{} – {} por {}", sheet_name, value_column, label_column),
                    labels,
                    values,
                    source_sheet: sheet_name.to_string(),
                });
            }
        }
    }

    charts
}

/// Parses a cell as a number, substituting the first decimal comma with a
/// period (`"12,5"` -> 12.5). Thousands separators are not handled:
/// `"1.234,56"` becomes `"1.234.56"` and fails to parse. Non-finite
/// results are rejected so chart values stay finite.
fn parse_cell_number(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replacen(',', ".", 1);
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> ReconstructedRow {
        pairs
            .iter()
            .map(|(column, value)| (column.to_string(), value.to_string()))
            .collect()
    }

    fn vendas_table() -> Vec<ReconstructedRow> {
        vec![
            // First row only establishes the column set.
            row(&[("Produto", "Caneta"), ("Regiao", "Sul"), ("Total", "10")]),
            row(&[("Produto", "Lapis"), ("Regiao", "Norte"), ("Total", "5")]),
            row(&[("Produto", "Caderno"), ("Regiao", "Sul"), ("Total", "8")]),
            row(&[("Produto", "Borracha"), ("Regiao", "Leste"), ("Total", "2")]),
        ]
    }

    #[test]
    fn test_fewer_than_two_rows_yields_nothing() {
        assert!(synthesize(&[], "S").is_empty());
        assert!(synthesize(&[row(&[("a", "1")])], "S").is_empty());
    }

    #[test]
    fn test_attempts_all_ordered_pairs() {
        let charts = synthesize(&vendas_table(), "Vendas");
        // 3 columns -> 6 ordered non-diagonal pairs; only pairs whose value
        // column is numeric survive: (Produto,Total) and (Regiao,Total).
        assert_eq!(charts.len(), 2);

        let titles: Vec<&str> = charts.iter().map(|c| c.title.as_str()).collect();
        assert!(titles.contains(&"Vendas – Total por Produto"));
        assert!(titles.contains(&"Vendas – Total por Regiao"));
    }

    #[test]
    fn test_emits_bar_charts_in_header_order() {
        let charts = synthesize(&vendas_table(), "Vendas");
        assert!(charts.iter().all(|c| c.chart_type == ChartKind::Bar));
        // Outer loop over label columns in header order: Produto first.
        assert_eq!(charts[0].title, "Vendas – Total por Produto");
        assert_eq!(charts[0].source_sheet, "Vendas");
    }

    #[test]
    fn test_first_row_is_reserved() {
        let charts = synthesize(&vendas_table(), "Vendas");
        let produto_total = &charts[0];
        // "Caneta"/"10" from the reserved first row must not appear.
        assert_eq!(produto_total.labels, vec!["Lapis", "Caderno", "Borracha"]);
        assert_eq!(produto_total.values, vec![5.0, 8.0, 2.0]);
    }

    #[test]
    fn test_include_first_row_option() {
        let options = SynthesizerOptions {
            include_first_row: true,
            ..SynthesizerOptions::default()
        };
        let charts = synthesize_with(&vendas_table(), "Vendas", &options);
        assert_eq!(charts[0].labels.len(), 4);
        assert_eq!(charts[0].values[0], 10.0);
    }

    #[test]
    fn test_comma_decimal_normalization() {
        let table = vec![
            row(&[("Produto", "x"), ("Total", "0")]),
            row(&[("Produto", "Caneta"), ("Total", "12,5")]),
        ];
        let charts = synthesize(&table, "S");
        assert_eq!(charts[0].values, vec![12.5]);
    }

    #[test]
    fn test_thousands_separator_not_supported() {
        let table = vec![
            row(&[("Produto", "x"), ("Total", "0")]),
            row(&[("Produto", "Caneta"), ("Total", "1.234,56")]),
        ];
        // "1.234,56" -> "1.234.56": fails to parse, point is skipped.
        assert!(synthesize(&table, "S").is_empty());
    }

    #[test]
    fn test_skips_invalid_rows_without_aborting() {
        let table = vec![
            row(&[("Produto", "x"), ("Total", "0")]),
            row(&[("Produto", ""), ("Total", "3")]),
            row(&[("Produto", "   "), ("Total", "4")]),
            row(&[("Produto", "Caneta"), ("Total", "N/A")]),
            row(&[("Produto", "Lapis"), ("Total", "7")]),
        ];
        let charts = synthesize(&table, "S");
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].labels, vec!["Lapis"]);
        assert_eq!(charts[0].values, vec![7.0]);
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let table = vec![
            row(&[("Produto", "x"), ("Total", "0")]),
            row(&[("Produto", "a"), ("Total", "NaN")]),
            row(&[("Produto", "b"), ("Total", "inf")]),
            row(&[("Produto", "c"), ("Total", "-inf")]),
        ];
        assert!(synthesize(&table, "S").is_empty());
    }

    #[test]
    fn test_labels_and_values_stay_parallel() {
        let charts = synthesize(&vendas_table(), "Vendas");
        for chart in &charts {
            assert_eq!(chart.labels.len(), chart.values.len());
            assert!(!chart.labels.is_empty());
            assert!(chart.values.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_max_charts_per_sheet_cap() {
        let options = SynthesizerOptions {
            max_charts_per_sheet: Some(1),
            ..SynthesizerOptions::default()
        };
        let charts = synthesize_with(&vendas_table(), "Vendas", &options);
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].title, "Vendas – Total por Produto");
    }

    #[test]
    fn test_missing_column_in_row_treated_as_absent_value() {
        let table = vec![
            row(&[("Produto", "x"), ("Total", "0")]),
            row(&[("Produto", "Caneta")]),
            row(&[("Produto", "Lapis"), ("Total", "2")]),
        ];
        let charts = synthesize(&table, "S");
        assert_eq!(charts[0].labels, vec!["Lapis"]);
    }

    #[test]
    fn test_idempotent_on_identical_input() {
        let table = vendas_table();
        assert_eq!(synthesize(&table, "Vendas"), synthesize(&table, "Vendas"));
    }

    #[test]
    fn test_parse_cell_number() {
        assert_eq!(parse_cell_number("12,5"), Some(12.5));
        assert_eq!(parse_cell_number(" 42 "), Some(42.0));
        assert_eq!(parse_cell_number("-0,5"), Some(-0.5));
        assert_eq!(parse_cell_number(""), None);
        assert_eq!(parse_cell_number("N/A"), None);
        assert_eq!(parse_cell_number("NaN"), None);
    }
}
