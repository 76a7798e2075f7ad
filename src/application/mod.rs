pub mod use_cases;

pub use use_cases::chart_generation::ChartGenerationUseCase;
pub use use_cases::chart_suggestion::ChartSuggestionUseCase;
pub use use_cases::spreadsheet_ingestion::SpreadsheetIngestionUseCase;
