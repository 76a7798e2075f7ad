pub mod chart_generation;
pub mod chart_suggestion;
pub mod chart_synthesizer;
pub mod row_reconstructor;
pub mod spreadsheet_ingestion;
