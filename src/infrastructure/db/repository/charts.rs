use crate::domain::error::{AppError, Result};
use crate::domain::spreadsheet::{SavedChart, SavedChartInput};

use super::PlanixRepository;

#[derive(sqlx::FromRow)]
struct SavedChartEntity {
    id: i64,
    spreadsheet_id: i64,
    chart_type: String,
    title: String,
    labels_json: String,
    values_json: String,
    source_sheet: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<SavedChartEntity> for SavedChart {
    fn from(e: SavedChartEntity) -> Self {
        Self {
            id: e.id,
            spreadsheet_id: e.spreadsheet_id,
            chart_type: e.chart_type,
            title: e.title,
            labels_json: e.labels_json,
            values_json: e.values_json,
            source_sheet: e.source_sheet,
            created_at: e.created_at,
        }
    }
}

impl PlanixRepository {
    pub async fn insert_saved_chart(&self, input: SavedChartInput) -> Result<SavedChart> {
        let result = sqlx::query(
            "INSERT INTO saved_charts (spreadsheet_id, chart_type, title, labels_json, values_json, source_sheet)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(input.spreadsheet_id)
        .bind(&input.chart_type)
        .bind(&input.title)
        .bind(&input.labels_json)
        .bind(&input.values_json)
        .bind(&input.source_sheet)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to insert saved chart: {}", e)))?;

        self.get_saved_chart(result.last_insert_rowid()).await
    }

    pub async fn get_saved_chart(&self, id: i64) -> Result<SavedChart> {
        sqlx::query_as::<_, SavedChartEntity>(
            "SELECT id, spreadsheet_id, chart_type, title, labels_json, values_json, source_sheet, created_at
             FROM saved_charts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch saved chart: {}", e)))?
        .map(SavedChart::from)
        .ok_or_else(|| AppError::NotFound(format!("Saved chart {} not found", id)))
    }

    pub async fn list_saved_charts(&self, spreadsheet_id: i64) -> Result<Vec<SavedChart>> {
        sqlx::query_as::<_, SavedChartEntity>(
            "SELECT id, spreadsheet_id, chart_type, title, labels_json, values_json, source_sheet, created_at
             FROM saved_charts WHERE spreadsheet_id = ? ORDER BY created_at DESC",
        )
        .bind(spreadsheet_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list saved charts: {}", e)))
        .map(|entities| entities.into_iter().map(SavedChart::from).collect())
    }

    pub async fn delete_saved_chart(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM saved_charts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete saved chart: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Saved chart {} not found", id)));
        }
        Ok(())
    }
}
