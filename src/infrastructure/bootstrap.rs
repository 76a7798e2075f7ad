use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::application::{
    ChartGenerationUseCase, ChartSuggestionUseCase, SpreadsheetIngestionUseCase,
};
use crate::domain::error::Result;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::db::connection::init_db;
use crate::infrastructure::db::repository::PlanixRepository;
use crate::infrastructure::llm_clients::{LLMClient, RouterClient};
use crate::interfaces::http::HttpState;

/// Wires the database, repositories, use cases and LLM client into the
/// HTTP state.
pub async fn build_state(config: AppConfig) -> Result<HttpState> {
    let db_path = Path::new(&config.database.path);
    let pool = init_db(db_path).await?;
    info!(db_path = %db_path.display(), "Database ready");

    let repository = Arc::new(PlanixRepository::new(pool));
    let llm_client: Arc<dyn LLMClient + Send + Sync> = Arc::new(RouterClient::new());

    Ok(HttpState {
        ingestion: SpreadsheetIngestionUseCase::new(Arc::clone(&repository)),
        charts: ChartGenerationUseCase::new(Arc::clone(&repository)),
        suggestions: ChartSuggestionUseCase::new(llm_client),
        repository,
        config,
    })
}
