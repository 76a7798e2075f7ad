use crate::domain::cell::CellRecord;
use crate::domain::error::{AppError, Result};

use super::PlanixRepository;

#[derive(sqlx::FromRow)]
struct CellEntity {
    sheet_name: String,
    row_index: i64,
    column_name: Option<String>,
    value: Option<String>,
}

impl PlanixRepository {
    /// All cells of a spreadsheet in insertion order, which preserves the
    /// sheet first-occurrence order the row reconstructor relies on.
    pub async fn fetch_cells(&self, spreadsheet_id: i64) -> Result<Vec<CellRecord>> {
        let rows = sqlx::query_as::<_, CellEntity>(
            "SELECT sheet_name, row_index, column_name, value
             FROM cells WHERE spreadsheet_id = ? ORDER BY id ASC",
        )
        .bind(spreadsheet_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch cells: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|r| CellRecord {
                sheet_name: r.sheet_name,
                row_index: r.row_index,
                column_name: r.column_name,
                value: r.value,
            })
            .collect())
    }
}
