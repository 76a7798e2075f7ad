use crate::domain::cell::CellRecord;
use crate::domain::error::{AppError, Result};
use crate::domain::spreadsheet::{Spreadsheet, SpreadsheetInput};

use super::PlanixRepository;

#[derive(sqlx::FromRow)]
struct SpreadsheetEntity {
    id: i64,
    upload_id: String,
    file_name: String,
    file_type: String,
    sheet_count: i64,
    cell_count: i64,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<SpreadsheetEntity> for Spreadsheet {
    fn from(e: SpreadsheetEntity) -> Self {
        Self {
            id: e.id,
            upload_id: e.upload_id,
            file_name: e.file_name,
            file_type: e.file_type,
            sheet_count: e.sheet_count,
            cell_count: e.cell_count,
            created_at: e.created_at,
        }
    }
}

impl PlanixRepository {
    /// Inserts the spreadsheet record and all its cells in one transaction
    /// so a failed upload leaves nothing behind.
    pub async fn insert_spreadsheet_with_cells(
        &self,
        input: SpreadsheetInput,
        cells: &[CellRecord],
    ) -> Result<Spreadsheet> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to begin transaction: {}", e)))?;

        let result = sqlx::query(
            "INSERT INTO spreadsheets (upload_id, file_name, file_type, sheet_count, cell_count)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&input.upload_id)
        .bind(&input.file_name)
        .bind(&input.file_type)
        .bind(input.sheet_count)
        .bind(input.cell_count)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to insert spreadsheet: {}", e)))?;

        let spreadsheet_id = result.last_insert_rowid();

        for cell in cells {
            sqlx::query(
                "INSERT INTO cells (spreadsheet_id, sheet_name, row_index, column_name, value)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(spreadsheet_id)
            .bind(&cell.sheet_name)
            .bind(cell.row_index)
            .bind(&cell.column_name)
            .bind(&cell.value)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to insert cell: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to commit transaction: {}", e)))?;

        self.get_spreadsheet(spreadsheet_id).await
    }

    pub async fn get_spreadsheet(&self, id: i64) -> Result<Spreadsheet> {
        sqlx::query_as::<_, SpreadsheetEntity>(
            "SELECT id, upload_id, file_name, file_type, sheet_count, cell_count, created_at
             FROM spreadsheets WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch spreadsheet: {}", e)))?
        .map(Spreadsheet::from)
        .ok_or_else(|| AppError::NotFound(format!("Spreadsheet {} not found", id)))
    }

    pub async fn list_spreadsheets(&self) -> Result<Vec<Spreadsheet>> {
        sqlx::query_as::<_, SpreadsheetEntity>(
            "SELECT id, upload_id, file_name, file_type, sheet_count, cell_count, created_at
             FROM spreadsheets ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list spreadsheets: {}", e)))
        .map(|entities| entities.into_iter().map(Spreadsheet::from).collect())
    }

    pub async fn delete_spreadsheet(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM spreadsheets WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete spreadsheet: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Spreadsheet {} not found", id)));
        }
        Ok(())
    }
}
