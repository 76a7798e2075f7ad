use crate::application::use_cases::chart_synthesizer::{synthesize_with, SynthesizerOptions};
use crate::application::use_cases::row_reconstructor::reconstruct;
use crate::domain::cell::SheetTable;
use crate::domain::chart::ChartSpec;
use crate::domain::error::Result;
use crate::infrastructure::db::repository::PlanixRepository;

use std::sync::Arc;

use tracing::info;

pub struct ChartGenerationUseCase {
    repository: Arc<PlanixRepository>,
}

impl ChartGenerationUseCase {
    pub fn new(repository: Arc<PlanixRepository>) -> Self {
        Self { repository }
    }

    /// Reconstructs the stored cells of a spreadsheet into per-sheet
    /// tables, in sheet first-occurrence order.
    pub async fn tables(&self, spreadsheet_id: i64) -> Result<Vec<SheetTable>> {
        let cells = self.repository.fetch_cells(spreadsheet_id).await?;
        Ok(reconstruct(&cells))
    }

    /// Synthesizes chart specs for every sheet of a spreadsheet and
    /// concatenates them in sheet order.
    pub async fn generate(
        &self,
        spreadsheet_id: i64,
        options: &SynthesizerOptions,
    ) -> Result<Vec<ChartSpec>> {
        let tables = self.tables(spreadsheet_id).await?;

        let mut charts = Vec::new();
        for table in &tables {
            charts.extend(synthesize_with(&table.rows, &table.sheet_name, options));
        }

        info!(
            spreadsheet_id,
            sheets = tables.len(),
            charts = charts.len(),
            "Synthesized charts"
        );

        Ok(charts)
    }
}
